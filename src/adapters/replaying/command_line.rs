//! Replaying adapter for the `CommandLine` port.

use std::sync::{Arc, Mutex};

use super::{next_interaction, replay_result};
use crate::adapters::recording::command_line::PORT;
use crate::cassette::format::{ConvertInput, RecordedArtifact};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::GenerateError;
use crate::params::OutputFormat;
use crate::ports::{Artifact, CommandArgs, CommandFuture, CommandLine, ImageAttributes};

/// Serves recorded `convert` and `identify` results from a cassette.
///
/// Replayed `convert` calls write the recorded image bytes into a fresh temp
/// file (or the target artifact), so callers get a real file back. When the
/// cassette holds the recorded arguments they must match the call exactly.
pub struct ReplayingCommandLine {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingCommandLine {
    /// Create a replaying command line backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl CommandLine for ReplayingCommandLine {
    fn convert<'a>(
        &'a self,
        target: Option<Artifact>,
        args: &'a CommandArgs,
        format: Option<&'a OutputFormat>,
    ) -> CommandFuture<'a, Artifact> {
        Box::pin(async move {
            let (input, output) = next_interaction(&self.replayer, PORT, "convert")?;
            if let Ok(recorded) = serde_json::from_value::<ConvertInput>(input) {
                let argv = args.to_argv();
                if recorded.args != argv {
                    return Err(GenerateError::Replay(format!(
                        "convert arguments differ from the cassette: expected [{}], got [{}]",
                        recorded.args.join(" "),
                        argv.join(" ")
                    )));
                }
            }
            let recorded: RecordedArtifact = replay_result("convert", output)?;
            let artifact = match target {
                Some(artifact) => artifact,
                None => Artifact::create(format)?,
            };
            tokio::fs::write(artifact.path(), &recorded.data).await?;
            Ok(artifact)
        })
    }

    fn identify<'a>(&'a self, _artifact: &'a Artifact) -> CommandFuture<'a, ImageAttributes> {
        Box::pin(async move {
            let (_, output) = next_interaction(&self.replayer, PORT, "identify")?;
            replay_result("identify", output)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn replaying(interactions: Vec<Interaction>) -> ReplayingCommandLine {
        let cassette = Cassette {
            name: "t".into(),
            recorded_at: Utc::now(),
            commit: "c".into(),
            interactions,
        };
        ReplayingCommandLine::new(Arc::new(Mutex::new(CassetteReplayer::new(&cassette))))
    }

    fn convert(seq: u64, args: &[&str], data_b64: &str) -> Interaction {
        Interaction {
            seq,
            port: PORT.into(),
            method: "convert".into(),
            input: json!({ "args": args }),
            output: json!({ "Ok": { "data": data_b64 } }),
        }
    }

    #[tokio::test]
    async fn convert_writes_recorded_bytes() {
        let replay = replaying(vec![convert(0, &["-size", "1x1", "xc:red"], "aGVsbG8=")]);
        let mut args = CommandArgs::new();
        args.setting("-size", "1x1").operand("xc:red");

        let artifact = replay.convert(None, &args, Some(&OutputFormat::png())).await.unwrap();

        assert_eq!(artifact.read().unwrap(), b"hello");
        assert_eq!(artifact.path().extension().unwrap(), "png");
    }

    #[tokio::test]
    async fn argument_mismatch_is_reported() {
        let replay = replaying(vec![convert(0, &["-size", "1x1", "xc:red"], "")]);
        let mut args = CommandArgs::new();
        args.setting("-size", "2x2").operand("xc:red");

        let err = replay.convert(None, &args, None).await.unwrap_err();

        assert!(matches!(err, GenerateError::Replay(ref m) if m.contains("2x2")));
    }

    #[tokio::test]
    async fn identify_serves_attributes() {
        let replay = replaying(vec![Interaction {
            seq: 0,
            port: PORT.into(),
            method: "identify".into(),
            input: json!({}),
            output: json!({"Ok": {"format": "PNG", "width": 20, "height": 10}}),
        }]);
        let artifact = Artifact::create(None).unwrap();

        let attrs = replay.identify(&artifact).await.unwrap();

        assert_eq!((attrs.width, attrs.height), (20, 10));
        assert!(replay.identify(&artifact).await.is_err());
    }
}
