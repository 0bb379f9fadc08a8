//! Live adapter that shells out to ImageMagick's `convert` and `identify`.

use std::ffi::OsString;
use std::path::Path;

use tokio::process::Command;
use tracing::debug;

use crate::error::GenerateError;
use crate::params::OutputFormat;
use crate::ports::command_line::display_invocation;
use crate::ports::{Artifact, CommandArgs, CommandFuture, CommandLine, ImageAttributes};

/// Default render command.
pub const DEFAULT_CONVERT_COMMAND: &str = "convert";

/// Default measure command.
pub const DEFAULT_IDENTIFY_COMMAND: &str = "identify";

/// `identify` output template: format, width and height of each frame.
const IDENTIFY_FORMAT: &str = "%m %w %h\n";

/// Runs ImageMagick as child processes.
///
/// Command strings may hold several words (e.g. `magick convert`); the first
/// is the program and the rest are passed before the generated arguments.
#[derive(Debug, Clone)]
pub struct ImageMagick {
    convert_command: String,
    identify_command: String,
}

impl Default for ImageMagick {
    fn default() -> Self {
        Self::new(DEFAULT_CONVERT_COMMAND, DEFAULT_IDENTIFY_COMMAND)
    }
}

impl ImageMagick {
    /// Create an adapter using the given command strings.
    #[must_use]
    pub fn new(convert_command: impl Into<String>, identify_command: impl Into<String>) -> Self {
        Self { convert_command: convert_command.into(), identify_command: identify_command.into() }
    }

    /// The render command string.
    #[must_use]
    pub fn convert_command(&self) -> &str {
        &self.convert_command
    }

    /// The measure command string.
    #[must_use]
    pub fn identify_command(&self) -> &str {
        &self.identify_command
    }
}

impl CommandLine for ImageMagick {
    fn convert<'a>(
        &'a self,
        target: Option<Artifact>,
        args: &'a CommandArgs,
        format: Option<&'a OutputFormat>,
    ) -> CommandFuture<'a, Artifact> {
        Box::pin(async move {
            let artifact = match target {
                Some(artifact) => artifact,
                None => Artifact::create(format)?,
            };
            debug!(
                command = %display_invocation(&self.convert_command, args, &[artifact.path()]),
                "convert"
            );
            let mut argv: Vec<OsString> = args.to_argv().into_iter().map(OsString::from).collect();
            argv.push(artifact.path().as_os_str().to_owned());
            run(&self.convert_command, argv).await?;
            Ok(artifact)
        })
    }

    fn identify<'a>(&'a self, artifact: &'a Artifact) -> CommandFuture<'a, ImageAttributes> {
        Box::pin(async move {
            let mut args = CommandArgs::new();
            args.switch("-ping").setting("-format", IDENTIFY_FORMAT);
            debug!(
                command = %display_invocation(&self.identify_command, &args, &[artifact.path()]),
                "identify"
            );
            let mut argv: Vec<OsString> = args.to_argv().into_iter().map(OsString::from).collect();
            argv.push(artifact.path().as_os_str().to_owned());
            let stdout = run(&self.identify_command, argv).await?;
            ImageAttributes::parse(&self.identify_command, &String::from_utf8_lossy(&stdout))
        })
    }
}

/// Split a command string into program and leading arguments.
fn split_command(command: &str) -> Result<(&str, Vec<&str>), GenerateError> {
    let mut words = command.split_whitespace();
    let program = words
        .next()
        .ok_or_else(|| GenerateError::Config("Empty command configured".to_string()))?;
    Ok((program, words.collect()))
}

/// Run a command to completion and return its stdout.
///
/// A non-zero exit becomes [`GenerateError::Execution`] carrying stderr.
async fn run(command: &str, args: Vec<OsString>) -> Result<Vec<u8>, GenerateError> {
    let (program, leading) = split_command(command)?;
    let output = Command::new(program)
        .args(leading)
        .args(&args)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| GenerateError::Execution {
            program: command.to_string(),
            status: "failed to start".to_string(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        debug!(%command, status = %output.status, %stderr, "command failed");
        return Err(GenerateError::Execution {
            program: command.to_string(),
            status: output.status.to_string(),
            stderr,
        });
    }
    Ok(output.stdout)
}

/// True when the command's program can be found, either as a path or on `PATH`.
#[must_use]
pub fn command_exists(command: &str) -> bool {
    let Ok((program, _)) = split_command(command) else {
        return false;
    };
    if program.contains(std::path::MAIN_SEPARATOR) {
        return Path::new(program).is_file();
    }
    std::env::var_os("PATH")
        .is_some_and(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_multi_word_command() {
        let (program, leading) = split_command("magick convert").unwrap();
        assert_eq!(program, "magick");
        assert_eq!(leading, ["convert"]);
    }

    #[test]
    fn split_empty_command_fails() {
        assert!(split_command("   ").is_err());
    }

    #[test]
    fn defaults() {
        let im = ImageMagick::default();
        assert_eq!(im.convert_command(), "convert");
        assert_eq!(im.identify_command(), "identify");
    }

    #[tokio::test]
    async fn missing_program_is_execution_error() {
        let im = ImageMagick::new("rastergen-no-such-program", "identify");
        let mut args = CommandArgs::new();
        args.setting("-size", "1x1").operand("xc:red");

        let err = im.convert(None, &args, Some(&OutputFormat::png())).await.unwrap_err();

        assert!(err.is_execution());
        assert!(err.to_string().contains("failed to start"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_execution_error() {
        let im = ImageMagick::new("false", "identify");
        let err = im.convert(None, &CommandArgs::new(), None).await.unwrap_err();
        assert!(matches!(err, GenerateError::Execution { ref program, .. } if program == "false"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn convert_writes_into_target() {
        // `cp <src> <dest>` stands in for a renderer that writes its last argument.
        let dir = std::env::temp_dir().join("rastergen_im_target_test");
        std::fs::create_dir_all(&dir).unwrap();
        let src = dir.join("src.bin");
        std::fs::write(&src, b"rendered").unwrap();

        let im = ImageMagick::new("cp", "identify");
        let target = Artifact::create(Some(&OutputFormat::png())).unwrap();
        let target_path = target.path().to_path_buf();
        let mut args = CommandArgs::new();
        args.operand(src.to_string_lossy().into_owned());

        let artifact = im.convert(Some(target), &args, None).await.unwrap();

        assert_eq!(artifact.path(), target_path);
        assert_eq!(artifact.read().unwrap(), b"rendered");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn identify_parses_stdout() {
        // `echo` ignores the path and prints a canned measurement.
        let im = ImageMagick::new("convert", "echo PNG 31 9");
        let artifact = Artifact::create(None).unwrap();

        let attrs = im.identify(&artifact).await.unwrap();

        assert_eq!(attrs.format, "PNG");
        assert_eq!((attrs.width, attrs.height), (31, 9));
    }

    #[test]
    fn command_exists_checks_path() {
        assert!(!command_exists("rastergen-no-such-program"));
        assert!(!command_exists(""));
    }
}
