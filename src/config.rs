//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::adapters::live::imagemagick::{DEFAULT_CONVERT_COMMAND, DEFAULT_IDENTIFY_COMMAND};

/// Environment variable overriding the render command.
pub const CONVERT_COMMAND_ENV: &str = "RASTERGEN_CONVERT_COMMAND";

/// Environment variable overriding the measure command.
pub const IDENTIFY_COMMAND_ENV: &str = "RASTERGEN_IDENTIFY_COMMAND";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// External tool commands.
    #[serde(default)]
    pub commands: CommandsConfig,

    /// Default parameter values (used when CLI flags are not given).
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// External tool commands.
#[derive(Debug, Default, Deserialize)]
pub struct CommandsConfig {
    /// Render command, e.g. `convert` or `magick convert`.
    pub convert: Option<String>,
    /// Measure command, e.g. `identify` or `magick identify`.
    pub identify: Option<String>,
}

/// Default parameter values from config file.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Default output format for every generator.
    pub format: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self { format: "png".to_string() }
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Get the render command, preferring the environment variable.
    #[must_use]
    pub fn convert_command(&self) -> String {
        std::env::var(CONVERT_COMMAND_ENV)
            .ok()
            .or_else(|| self.commands.convert.clone())
            .unwrap_or_else(|| DEFAULT_CONVERT_COMMAND.to_string())
    }

    /// Get the measure command, preferring the environment variable.
    #[must_use]
    pub fn identify_command(&self) -> String {
        std::env::var(IDENTIFY_COMMAND_ENV)
            .ok()
            .or_else(|| self.commands.identify.clone())
            .unwrap_or_else(|| DEFAULT_IDENTIFY_COMMAND.to_string())
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `RASTERGEN_CONFIG` environment variable
/// 3. `~/.config/rastergen/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("RASTERGEN_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

/// Default config path: `~/.config/rastergen/config.toml`.
fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/rastergen/config.toml")
    } else {
        PathBuf::from("rastergen.toml")
    }
}
