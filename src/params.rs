//! Parameter validation shared by the generators.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GenerateError;

/// Output image format symbol, e.g. `png` or `gif`.
///
/// Always lowercase ASCII alphanumeric so it is safe to use as a file
/// extension and in a suggested file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OutputFormat(String);

impl OutputFormat {
    /// Validate and normalize a format name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, too long, or contains anything
    /// other than ASCII letters and digits.
    pub fn new(name: &str) -> Result<Self, GenerateError> {
        let trimmed = name.trim();
        if trimmed.is_empty()
            || trimmed.len() > 10
            || !trimmed.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(GenerateError::InvalidArgument(format!(
                "Unsupported format '{name}'. Expected a short alphanumeric name such as png"
            )));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// The PNG format, used when no format is requested.
    #[must_use]
    pub fn png() -> Self {
        Self("png".to_string())
    }

    /// The format name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Suggested file name for an artifact of this format, e.g. `plain.png`.
    #[must_use]
    pub fn file_name(&self, stem: &str) -> String {
        format!("{stem}.{}", self.0)
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::png()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for OutputFormat {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = GenerateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<OutputFormat> for String {
    fn from(format: OutputFormat) -> Self {
        format.0
    }
}

/// Validate canvas dimensions.
///
/// # Errors
///
/// Returns an error if either side is zero.
pub fn validate_dimensions(width: u32, height: u32) -> Result<(), GenerateError> {
    if width == 0 || height == 0 {
        return Err(GenerateError::InvalidArgument(format!(
            "Image size must be positive, got {width}x{height}"
        )));
    }
    Ok(())
}

/// Validate a color value (`red`, `#ff0000`, `rgba(0,0,0,0.5)`, `none`, ...).
///
/// Color syntax is left to the external tool, so spaced forms such as
/// `rgb(255, 0, 0)` pass through unchanged. Values are one argv token each.
///
/// # Errors
///
/// Returns an error if the color is blank, starts with `-` (it would be read
/// as an option), or contains control characters.
pub fn validate_color(key: &str, color: &str) -> Result<(), GenerateError> {
    if color.trim().is_empty() || color.starts_with('-') || color.chars().any(char::is_control) {
        return Err(GenerateError::InvalidArgument(format!("Invalid {key} '{color}'")));
    }
    Ok(())
}

/// Parse a pixel length such as `10` or `10px`.
///
/// Returns `None` when the value is not a non-negative integer.
#[must_use]
pub fn parse_pixels(value: &str) -> Option<u32> {
    let value = value.trim();
    let digits = value.strip_suffix("px").unwrap_or(value);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_normalizes_case() {
        assert_eq!(OutputFormat::new("PNG").unwrap().as_str(), "png");
        assert_eq!(OutputFormat::new(" gif ").unwrap().as_str(), "gif");
    }

    #[test]
    fn format_rejects_path_like_values() {
        assert!(OutputFormat::new("").is_err());
        assert!(OutputFormat::new("png:/etc/passwd").is_err());
        assert!(OutputFormat::new("../png").is_err());
        assert!(OutputFormat::new("averyveryverylongformat").is_err());
    }

    #[test]
    fn format_file_name() {
        assert_eq!(OutputFormat::png().file_name("plasma"), "plasma.png");
        assert_eq!(OutputFormat::default(), OutputFormat::png());
    }

    #[test]
    fn format_serde_validates() {
        let format: OutputFormat = serde_json::from_str("\"JPG\"").unwrap();
        assert_eq!(format.as_str(), "jpg");
        assert!(serde_json::from_str::<OutputFormat>("\"no good\"").is_err());
    }

    #[test]
    fn dimensions() {
        assert!(validate_dimensions(100, 50).is_ok());
        assert!(validate_dimensions(0, 50).is_err());
        assert!(validate_dimensions(100, 0).is_err());
    }

    #[test]
    fn colors() {
        assert!(validate_color("color", "red").is_ok());
        assert!(validate_color("color", "#ff000080").is_ok());
        assert!(validate_color("color", "rgba(0,0,0,0.5)").is_ok());
        assert!(validate_color("color", "rgb(255, 0, 0)").is_ok());
        assert!(validate_color("color", "rgba(0, 0, 0, 0.5)").is_ok());
        assert!(validate_color("color", "").is_err());
        assert!(validate_color("color", "   ").is_err());
        assert!(validate_color("color", "-fill").is_err());
        assert!(validate_color("color", "red\n").is_err());
    }

    #[test]
    fn pixels() {
        assert_eq!(parse_pixels("10"), Some(10));
        assert_eq!(parse_pixels("10px"), Some(10));
        assert_eq!(parse_pixels(" 7 "), Some(7));
        assert_eq!(parse_pixels("-3"), None);
        assert_eq!(parse_pixels("px"), None);
        assert_eq!(parse_pixels("10em"), None);
        assert_eq!(parse_pixels("1.5"), None);
    }
}
