//! Unified error type for rastergen.

use thiserror::Error;

/// Errors that can occur while generating an image.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A padding shorthand string could not be parsed.
    #[error("Couldn't parse padding string '{0}' - should be a css-style string")]
    InvalidPadding(String),

    /// A style option carried a value outside its enumeration.
    #[error("Invalid {key} '{value}'. Valid: {valid}")]
    InvalidStyle {
        /// Canonical option key (e.g. `font_weight`).
        key: &'static str,
        /// The rejected value.
        value: String,
        /// Human readable list of accepted values.
        valid: &'static str,
    },

    /// A style option key that is not recognized.
    #[error("Unknown text option '{0}'")]
    UnknownOption(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The external tool failed or produced output we could not use.
    #[error("{program} failed ({status}): {stderr}")]
    Execution {
        /// The program that was run.
        program: String,
        /// Exit status, or a short reason when the process never ran.
        status: String,
        /// Diagnostic output from the tool.
        stderr: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Image format conversion error.
    #[error("Image conversion error: {0}")]
    ImageConversion(String),

    /// A replayed interaction could not be served.
    #[error("Replay error: {0}")]
    Replay(String),
}

impl GenerateError {
    /// True for errors raised locally before any external process is spawned.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidPadding(_)
                | Self::InvalidStyle { .. }
                | Self::UnknownOption(_)
                | Self::InvalidArgument(_)
        )
    }

    /// True when the external tool reported a failure.
    #[must_use]
    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution { .. })
    }
}
