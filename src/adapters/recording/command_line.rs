//! Recording adapter for the `CommandLine` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::format::{ConvertInput, RecordedArtifact};
use crate::cassette::recorder::CassetteRecorder;
use crate::error::GenerateError;
use crate::params::OutputFormat;
use crate::ports::{Artifact, CommandArgs, CommandFuture, CommandLine, ImageAttributes};

/// Port name used in cassettes.
pub(crate) const PORT: &str = "command_line";

/// Records every call while delegating to an inner implementation.
///
/// `convert` results are stored as the produced image bytes so a replay can
/// recreate the file. Output that cannot be read back fails the call, and the
/// failure is what gets recorded.
pub struct RecordingCommandLine {
    inner: Box<dyn CommandLine>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingCommandLine {
    /// Creates a new recording command line wrapping the given implementation.
    pub fn new(inner: Box<dyn CommandLine>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl CommandLine for RecordingCommandLine {
    fn convert<'a>(
        &'a self,
        target: Option<Artifact>,
        args: &'a CommandArgs,
        format: Option<&'a OutputFormat>,
    ) -> CommandFuture<'a, Artifact> {
        Box::pin(async move {
            let input = ConvertInput {
                args: args.to_argv(),
                format: format.map(|f| f.as_str().to_string()),
                into_existing: target.is_some(),
            };
            let result = match self.inner.convert(target, args, format).await {
                Ok(artifact) => tokio::fs::read(artifact.path())
                    .await
                    .map(|data| (artifact, RecordedArtifact { data }))
                    .map_err(GenerateError::from),
                Err(e) => Err(e),
            };
            let recorded = result.as_ref().map(|(_, recorded)| recorded);
            record_result(&self.recorder, PORT, "convert", &input, &recorded);
            result.map(|(artifact, _)| artifact)
        })
    }

    fn identify<'a>(&'a self, artifact: &'a Artifact) -> CommandFuture<'a, ImageAttributes> {
        Box::pin(async move {
            let result = self.inner.identify(artifact).await;
            record_result(&self.recorder, PORT, "identify", &serde_json::json!({}), &result);
            result
        })
    }
}
