//! Fractal plasma texture generator.

use std::sync::Arc;

use super::{canvas_args, ArtifactMetadata, Generated};
use crate::error::GenerateError;
use crate::params::OutputFormat;
use crate::ports::{CommandArgs, CommandLine};

pub(crate) const NAME: &str = "plasma";

/// Produces a `width`x`height` fractal noise texture.
pub struct Plasma {
    command_line: Arc<dyn CommandLine>,
}

impl Plasma {
    /// Create the generator.
    #[must_use]
    pub fn new(command_line: Arc<dyn CommandLine>) -> Self {
        Self { command_line }
    }

    /// Arguments for a plasma canvas.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero dimension.
    pub fn args(width: u32, height: u32) -> Result<CommandArgs, GenerateError> {
        canvas_args(width, height, "plasma:fractal".to_string())
    }

    /// Generate the texture. `format` defaults to `png`.
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
        format: Option<OutputFormat>,
    ) -> Result<Generated, GenerateError> {
        let format = format.unwrap_or_default();
        let args = Self::args(width, height)?;
        let artifact = self.command_line.convert(None, &args, Some(&format)).await?;
        Ok((artifact, ArtifactMetadata::new(NAME, format)))
    }
}
