//! Generate raster images by composing ImageMagick command lines.
//!
//! Three generators are provided: a solid color swatch ([`generators::Plain`]),
//! a fractal plasma texture ([`generators::Plasma`]) and a rendered text label
//! with optional padding ([`generators::Text`]). They run through the
//! [`ports::CommandLine`] port, implemented by the live ImageMagick adapter and
//! by record/replay adapters that work from YAML cassettes.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod generators;
pub mod output;
pub mod padding;
pub mod params;
pub mod ports;
pub mod style;

pub use error::GenerateError;
pub use generators::{ArtifactMetadata, GeneratorRequest, Generators};
pub use padding::PaddingBox;
pub use params::OutputFormat;
pub use ports::{Artifact, CommandLine, ImageAttributes};
pub use style::StyleOptions;
