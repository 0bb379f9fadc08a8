//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};

/// Generate plain, plasma and text-label images with ImageMagick.
#[derive(Parser, Debug)]
#[command(name = "rastergen", version, about)]
pub struct Cli {
    /// What to generate.
    #[command(subcommand)]
    pub command: Command,

    /// Output file path (defaults to the suggested name, e.g. `text.png`).
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Render command override (e.g. "magick convert").
    #[arg(long, global = true)]
    pub convert_command: Option<String>,

    /// Measure command override (e.g. "magick identify").
    #[arg(long, global = true)]
    pub identify_command: Option<String>,

    /// Verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Generator subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// A solid color swatch.
    Plain {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// Fill color (e.g. red, "#ff0000").
        color: String,
        /// Output format: png, gif, jpg, ...
        #[arg(short, long)]
        format: Option<String>,
    },
    /// A fractal plasma texture.
    Plasma {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// Output format: png, gif, jpg, ...
        #[arg(short, long)]
        format: Option<String>,
    },
    /// A rendered text label.
    Text {
        /// The text to render.
        text: String,
        /// Style option as KEY=VALUE, repeatable (e.g. font-size=20, padding="10 5").
        #[arg(short, long = "style", value_name = "KEY=VALUE")]
        styles: Vec<String>,
    },
}

/// Split `KEY=VALUE` style arguments into pairs.
///
/// # Errors
///
/// Returns an error naming the first argument without an `=`.
pub fn parse_style_pairs(styles: &[String]) -> Result<Vec<(&str, &str)>, String> {
    styles
        .iter()
        .map(|s| {
            s.split_once('=')
                .map(|(k, v)| (k.trim(), v))
                .ok_or_else(|| format!("Style option '{s}' should look like KEY=VALUE"))
        })
        .collect()
}
