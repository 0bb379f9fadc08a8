//! Command-line port for the external raster tool.

use std::fmt::Write as _;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use tempfile::TempPath;

use crate::error::GenerateError;
use crate::params::OutputFormat;

/// A single command-line argument directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// A bare flag such as `-antialias`.
    Switch(&'static str),
    /// A flag followed by its value, e.g. `-pointsize 12`.
    Setting(&'static str, String),
    /// A positional operand, e.g. `xc:red` or `label:Hello`.
    Operand(String),
}

impl Arg {
    fn push_tokens(&self, out: &mut Vec<String>) {
        match self {
            Self::Switch(name) => out.push((*name).to_string()),
            Self::Setting(name, value) => {
                out.push((*name).to_string());
                out.push(value.clone());
            }
            Self::Operand(value) => out.push(value.clone()),
        }
    }
}

/// Ordered, structured argument list for one tool invocation.
///
/// The list is handed to the process as an argv vector, so no shell ever
/// interprets it. [`CommandArgs::to_command_string`] renders a quoted form for
/// logs and cassettes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArgs {
    args: Vec<Arg>,
}

impl CommandArgs {
    /// An empty argument list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bare flag.
    pub fn switch(&mut self, name: &'static str) -> &mut Self {
        self.args.push(Arg::Switch(name));
        self
    }

    /// Append a flag with a value.
    pub fn setting(&mut self, name: &'static str, value: impl Into<String>) -> &mut Self {
        self.args.push(Arg::Setting(name, value.into()));
        self
    }

    /// Append a positional operand.
    pub fn operand(&mut self, value: impl Into<String>) -> &mut Self {
        self.args.push(Arg::Operand(value.into()));
        self
    }

    /// Drop the last `count` directives.
    pub fn drop_last(&mut self, count: usize) -> &mut Self {
        let keep = self.args.len().saturating_sub(count);
        self.args.truncate(keep);
        self
    }

    /// Number of directives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// True when no directive has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Flatten into the argv tokens passed to the process.
    #[must_use]
    pub fn to_argv(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.args.len() * 2);
        for arg in &self.args {
            arg.push_tokens(&mut out);
        }
        out
    }

    /// Render as a single shell-quoted string.
    #[must_use]
    pub fn to_command_string(&self) -> String {
        let mut out = String::new();
        for (i, token) in self.to_argv().iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(&quote(token));
        }
        out
    }
}

/// Quote a token for display as part of a shell command.
///
/// Tokens made only of unambiguous characters are left bare; anything else is
/// wrapped in double quotes with `"`, `\`, `$` and `` ` `` escaped.
#[must_use]
pub fn quote(token: &str) -> String {
    let bare = !token.is_empty()
        && token.chars().all(|c| c.is_ascii_alphanumeric() || "-_./:+=,#%@".contains(c));
    if bare {
        return token.to_string();
    }
    let mut quoted = String::with_capacity(token.len() + 2);
    quoted.push('"');
    for c in token.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Handle to an image file produced by the external tool.
///
/// The file lives in the system temp directory under a random name and is
/// removed when the handle is dropped, unless it was persisted first.
#[derive(Debug)]
pub struct Artifact {
    path: TempPath,
}

impl Artifact {
    /// Allocate a fresh, uniquely named temp file for the given format.
    ///
    /// # Errors
    ///
    /// Returns an error if the temp file cannot be created.
    pub fn create(format: Option<&OutputFormat>) -> Result<Self, GenerateError> {
        let suffix = format.map(|f| format!(".{f}")).unwrap_or_default();
        let file = tempfile::Builder::new().prefix("rastergen-").suffix(&suffix).tempfile()?;
        Ok(Self { path: file.into_temp_path() })
    }

    /// Location of the image on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the image bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read(&self) -> Result<Vec<u8>, GenerateError> {
        Ok(std::fs::read(&self.path)?)
    }

    /// Move the image to `dest`, keeping it after the handle is gone.
    ///
    /// Falls back to copying when a rename is not possible (e.g. across
    /// filesystems); the temp file is then removed as usual.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can be neither renamed nor copied.
    pub fn persist(self, dest: &Path) -> Result<(), GenerateError> {
        match self.path.persist(dest) {
            Ok(()) => Ok(()),
            Err(e) => {
                std::fs::copy(&e.path, dest)?;
                Ok(())
            }
        }
    }
}

/// Attributes reported by the measure operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttributes {
    /// Format name as reported by the tool (e.g. `PNG`).
    pub format: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageAttributes {
    /// Parse one line of `identify -format "%m %w %h"` output.
    ///
    /// # Errors
    ///
    /// Returns an [`GenerateError::Execution`] quoting the output when it does
    /// not hold a format and two integer dimensions.
    pub fn parse(program: &str, output: &str) -> Result<Self, GenerateError> {
        let unparsable = || GenerateError::Execution {
            program: program.to_string(),
            status: "unparsable output".to_string(),
            stderr: output.trim().to_string(),
        };
        let line = output.lines().find(|l| !l.trim().is_empty()).ok_or_else(unparsable)?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [format, width, height, ..] = fields[..] else {
            return Err(unparsable());
        };
        Ok(Self {
            format: format.to_string(),
            width: width.parse().map_err(|_| unparsable())?,
            height: height.parse().map_err(|_| unparsable())?,
        })
    }
}

/// Boxed future returned by [`CommandLine`] operations.
pub type CommandFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, GenerateError>> + Send + 'a>>;

/// Runs the external raster tool.
///
/// Implementations only invoke; argument construction and validation belong to
/// the caller.
pub trait CommandLine: Send + Sync {
    /// Render `args` into an image.
    ///
    /// With a `target`, the result overwrites that artifact and it is returned.
    /// Otherwise a new temp file is allocated, named for `format`.
    fn convert<'a>(
        &'a self,
        target: Option<Artifact>,
        args: &'a CommandArgs,
        format: Option<&'a OutputFormat>,
    ) -> CommandFuture<'a, Artifact>;

    /// Query the format and dimensions of an existing artifact.
    fn identify<'a>(&'a self, artifact: &'a Artifact) -> CommandFuture<'a, ImageAttributes>;
}

/// Render a whole invocation (program, args, trailing operands) for logging.
pub(crate) fn display_invocation(program: &str, args: &CommandArgs, trailing: &[&Path]) -> String {
    let mut line = program.to_string();
    if !args.is_empty() {
        line.push(' ');
        line.push_str(&args.to_command_string());
    }
    for path in trailing {
        let _ = write!(line, " {}", quote(&path.to_string_lossy()));
    }
    line
}
