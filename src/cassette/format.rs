//! Cassette file format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded session of command-line interactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cassette {
    /// Session name.
    pub name: String,
    /// When the session was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Source revision the recording was made from.
    pub commit: String,
    /// Interactions in call order.
    pub interactions: Vec<Interaction>,
}

/// One call through a port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Position in the session, starting at 0.
    pub seq: u64,
    /// Port name, e.g. `command_line`.
    pub port: String,
    /// Method name, e.g. `convert`.
    pub method: String,
    /// Call input.
    pub input: serde_json::Value,
    /// Call result, `{"Ok": ...}` or `{"Err": "message"}`.
    pub output: serde_json::Value,
}

/// Input of a recorded `convert` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertInput {
    /// The argv tokens, without program name or output path.
    pub args: Vec<String>,
    /// Requested output format.
    #[serde(default)]
    pub format: Option<String>,
    /// Whether the call rendered into an existing artifact.
    #[serde(default)]
    pub into_existing: bool,
}

/// Image bytes produced by a recorded `convert` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedArtifact {
    /// Raw image bytes, base64 in the cassette.
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

/// Serde helper for serializing `Vec<u8>` as base64 strings in cassettes.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize bytes as base64 string.
    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        serializer.serialize_str(&encoded)
    }

    /// Deserialize base64 string to bytes.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}
