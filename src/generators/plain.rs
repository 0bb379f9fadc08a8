//! Solid color swatch generator.

use std::sync::Arc;

use super::{canvas_args, ArtifactMetadata, Generated};
use crate::error::GenerateError;
use crate::params::{validate_color, OutputFormat};
use crate::ports::{CommandArgs, CommandLine};

pub(crate) const NAME: &str = "plain";

/// Produces a `width`x`height` image filled with one color.
pub struct Plain {
    command_line: Arc<dyn CommandLine>,
}

impl Plain {
    /// Create the generator.
    #[must_use]
    pub fn new(command_line: Arc<dyn CommandLine>) -> Self {
        Self { command_line }
    }

    /// Arguments for a solid `color` canvas.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero dimension or a malformed color.
    pub fn args(width: u32, height: u32, color: &str) -> Result<CommandArgs, GenerateError> {
        validate_color("color", color)?;
        canvas_args(width, height, format!("xc:{color}"))
    }

    /// Generate the swatch. `format` defaults to `png`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad parameters, or an execution error if
    /// the tool fails.
    #[tracing::instrument(skip(self))]
    pub async fn call(
        &self,
        width: u32,
        height: u32,
        color: &str,
        format: Option<OutputFormat>,
    ) -> Result<Generated, GenerateError> {
        let format = format.unwrap_or_default();
        let args = Self::args(width, height, color)?;
        let artifact = self.command_line.convert(None, &args, Some(&format)).await?;
        Ok((artifact, ArtifactMetadata::new(NAME, format)))
    }
}
