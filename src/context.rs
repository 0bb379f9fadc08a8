//! Service context that bundles the command line port.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::adapters::live::imagemagick::{command_exists, ImageMagick};
use crate::adapters::recording::command_line::RecordingCommandLine;
use crate::adapters::replaying::command_line::ReplayingCommandLine;
use crate::cassette::config::load_cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::GenerateError;
use crate::generators::Generators;
use crate::ports::CommandLine;

/// Bundles the port trait objects into a single context.
pub struct ServiceContext {
    /// Command line port.
    pub command_line: Arc<dyn CommandLine>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Finish the recording and write the cassette file to disk.
    ///
    /// The context that produced this session must be dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapter still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

impl ServiceContext {
    /// Create a live context running the given ImageMagick commands.
    #[must_use]
    pub fn live(convert_command: &str, identify_command: &str) -> Self {
        for command in [convert_command, identify_command] {
            if !command_exists(command) {
                warn!(%command, "command not found; is ImageMagick installed?");
            }
        }
        Self { command_line: Arc::new(ImageMagick::new(convert_command, identify_command)) }
    }

    /// Create a recording context that wraps a live adapter with a recorder.
    ///
    /// The cassette is written under `.rastergen/cassettes/<timestamp>/`.
    #[must_use]
    pub fn recording(convert_command: &str, identify_command: &str) -> (Self, RecordingSession) {
        let live = ImageMagick::new(convert_command, identify_command);

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let output_dir = PathBuf::from(".rastergen/cassettes").join(&timestamp);

        let commit = get_commit_hash();
        let path = output_dir.join("command_line.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-command_line"),
            &commit,
        )));

        let recording = RecordingCommandLine::new(Box::new(live), Arc::clone(&recorder));

        let ctx = Self { command_line: Arc::new(recording) };
        let session = RecordingSession { recorder };

        (ctx, session)
    }

    /// Create a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, GenerateError> {
        let replayer = load_cassette(path)
            .map_err(|e| GenerateError::Config(format!("Failed to load cassette: {e}")))?;
        let replayer = Arc::new(Mutex::new(replayer));
        Ok(Self { command_line: Arc::new(ReplayingCommandLine::new(replayer)) })
    }

    /// The generators, all sharing this context's command line.
    #[must_use]
    pub fn generators(&self) -> Generators {
        Generators::new(Arc::clone(&self.command_line))
    }
}

/// Get the current git commit hash, or "unknown" if unavailable.
fn get_commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
