//! rastergen - generate plain, plasma and text images with ImageMagick.

use std::path::Path;
use std::process;

use clap::Parser;
use tracing::{debug, info, Level};

use rastergen::cli::{parse_style_pairs, Cli, Command};
use rastergen::config::{self, Config};
use rastergen::context::ServiceContext;
use rastergen::output::{resolve_output_path, save_artifact};
use rastergen::{GenerateError, GeneratorRequest, OutputFormat, StyleOptions};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), GenerateError> {
    // Load config
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(GenerateError::Config)?;

    // Validate parameters before anything can be run
    let request = build_request(&cli.command, &config)?;
    debug!(kind = request.kind(), ?request, "request");

    let convert_command = cli.convert_command.clone().unwrap_or_else(|| config.convert_command());
    let identify_command =
        cli.identify_command.clone().unwrap_or_else(|| config.identify_command());

    // Create context based on mode (live / recording / replaying)
    let replay_path = std::env::var("RASTERGEN_REPLAY").ok();
    let is_recording = std::env::var("RASTERGEN_REC").is_ok_and(|v| v == "true" || v == "1");

    let (ctx, recording_session) = if let Some(ref cassette_path) = replay_path {
        debug!(%cassette_path, "replaying");
        (ServiceContext::replaying(Path::new(cassette_path))?, None)
    } else if is_recording {
        debug!("recording mode enabled");
        let (ctx, session) = ServiceContext::recording(&convert_command, &identify_command);
        (ctx, Some(session))
    } else {
        debug!(%convert_command, %identify_command, "live");
        (ServiceContext::live(&convert_command, &identify_command), None)
    };

    // Generate
    let generated = ctx.generators().generate(request).await;
    drop(ctx);
    let (artifact, metadata) = generated?;

    // Save image
    let output_path = resolve_output_path(cli.output.as_deref(), &metadata);
    save_artifact(artifact, &metadata, &output_path)?;
    info!(path = %output_path.display(), format = %metadata.format, "saved");
    eprintln!("Saved: {}", output_path.display());

    // Finish recording if active
    if let Some(session) = recording_session {
        match session.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }

    Ok(())
}

/// Turn the parsed subcommand into a validated generator request.
fn build_request(command: &Command, config: &Config) -> Result<GeneratorRequest, GenerateError> {
    let format = |explicit: Option<&str>| {
        OutputFormat::new(explicit.unwrap_or(&config.defaults.format))
    };

    let request = match command {
        Command::Plain { width, height, color, format: explicit } => GeneratorRequest::Plain {
            width: *width,
            height: *height,
            color: color.clone(),
            format: Some(format(explicit.as_deref())?),
        },
        Command::Plasma { width, height, format: explicit } => GeneratorRequest::Plasma {
            width: *width,
            height: *height,
            format: Some(format(explicit.as_deref())?),
        },
        Command::Text { text, styles } => {
            let pairs = parse_style_pairs(styles).map_err(GenerateError::InvalidArgument)?;
            let mut options = StyleOptions::from_pairs(pairs)?;
            if options.format.is_none() {
                options.format = Some(format(None)?);
            }
            GeneratorRequest::Text { text: text.clone(), options }
        }
    };
    Ok(request)
}
