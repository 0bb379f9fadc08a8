//! Image generators: plain swatches, plasma textures and text labels.
//!
//! Each generator turns typed parameters into a [`CommandArgs`] list and runs
//! it through a shared [`CommandLine`]. The produced [`Artifact`] is handed to
//! the caller, who owns its temp file from then on.

pub mod plain;
pub mod plasma;
pub mod text;

use std::sync::Arc;

use serde::Serialize;

use crate::error::GenerateError;
use crate::params::{validate_dimensions, OutputFormat};
use crate::ports::{Artifact, CommandArgs, CommandLine};
use crate::style::StyleOptions;

pub use plain::Plain;
pub use plasma::Plasma;
pub use text::Text;

/// Format and suggested file name of a generated image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactMetadata {
    /// Image format.
    pub format: OutputFormat,
    /// Suggested file name, e.g. `text.png`.
    pub name: String,
}

impl ArtifactMetadata {
    fn new(stem: &str, format: OutputFormat) -> Self {
        let name = format.file_name(stem);
        Self { format, name }
    }
}

/// A generated image and its metadata.
pub type Generated = (Artifact, ArtifactMetadata);

/// A request for one generated image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorRequest {
    /// Solid color swatch.
    Plain {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// Fill color.
        color: String,
        /// Output format, `png` when unset.
        format: Option<OutputFormat>,
    },
    /// Fractal plasma texture.
    Plasma {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// Output format, `png` when unset.
        format: Option<OutputFormat>,
    },
    /// Rendered text label.
    Text {
        /// The text to render.
        text: String,
        /// Style and padding options.
        options: StyleOptions,
    },
}

impl GeneratorRequest {
    /// Generator name, as used for the suggested file name.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Plain { .. } => plain::NAME,
            Self::Plasma { .. } => plasma::NAME,
            Self::Text { .. } => text::NAME,
        }
    }
}

/// The three generators sharing one command line.
pub struct Generators {
    /// Plain swatch generator.
    pub plain: Plain,
    /// Plasma texture generator.
    pub plasma: Plasma,
    /// Text label generator.
    pub text: Text,
}

impl Generators {
    /// Build all generators on top of the given command line.
    #[must_use]
    pub fn new(command_line: Arc<dyn CommandLine>) -> Self {
        Self {
            plain: Plain::new(Arc::clone(&command_line)),
            plasma: Plasma::new(Arc::clone(&command_line)),
            text: Text::new(command_line),
        }
    }

    /// Run the generator matching the request.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad parameters, or the command line's
    /// error when the external tool fails.
    pub async fn generate(&self, request: GeneratorRequest) -> Result<Generated, GenerateError> {
        match request {
            GeneratorRequest::Plain { width, height, color, format } => {
                self.plain.call(width, height, &color, format).await
            }
            GeneratorRequest::Plasma { width, height, format } => {
                self.plasma.call(width, height, format).await
            }
            GeneratorRequest::Text { text, options } => self.text.call(&text, &options).await,
        }
    }
}

/// `-size WxH <source>`: a fixed-size canvas filled from a pseudo-image.
fn canvas_args(width: u32, height: u32, source: String) -> Result<CommandArgs, GenerateError> {
    validate_dimensions(width, height)?;
    let mut args = CommandArgs::new();
    args.setting("-size", format!("{width}x{height}")).operand(source);
    Ok(args)
}
