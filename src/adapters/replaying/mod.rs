//! Replaying adapters that serve recorded interactions from cassettes.

pub mod command_line;

use std::sync::{Arc, Mutex, PoisonError};

use crate::cassette::replayer::CassetteReplayer;
use crate::error::GenerateError;

/// Retrieve the next recorded `(input, output)` pair for a port and method.
pub(crate) fn next_interaction(
    replayer: &Arc<Mutex<CassetteReplayer>>,
    port: &str,
    method: &str,
) -> Result<(serde_json::Value, serde_json::Value), GenerateError> {
    let mut guard = replayer.lock().unwrap_or_else(PoisonError::into_inner);
    let interaction = guard.next_interaction(port, method)?;
    Ok((interaction.input.clone(), interaction.output.clone()))
}

/// Deserialize a replayed output.
///
/// A recorded `Err` replays as an execution failure of `program`, so callers
/// see the same kind of error the live tool produced.
pub(crate) fn replay_result<T: serde::de::DeserializeOwned>(
    program: &str,
    output: serde_json::Value,
) -> Result<T, GenerateError> {
    if let Some(err_val) = output.get("Err").or_else(|| output.get("err")) {
        let msg = err_val.as_str().unwrap_or("replayed error").to_string();
        return Err(GenerateError::Execution {
            program: program.to_string(),
            status: "recorded failure".to_string(),
            stderr: msg,
        });
    }
    let value = match output.get("Ok").or_else(|| output.get("ok")) {
        Some(ok_val) => ok_val.clone(),
        None => output,
    };
    serde_json::from_value(value)
        .map_err(|e| GenerateError::Replay(format!("Malformed {program} output in cassette: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ImageAttributes;
    use serde_json::json;

    #[test]
    fn ok_value_deserializes() {
        let attrs: ImageAttributes =
            replay_result("identify", json!({"Ok": {"format": "PNG", "width": 3, "height": 4}}))
                .unwrap();
        assert_eq!((attrs.width, attrs.height), (3, 4));
    }

    #[test]
    fn bare_value_deserializes() {
        let attrs: ImageAttributes =
            replay_result("identify", json!({"format": "GIF", "width": 1, "height": 2})).unwrap();
        assert_eq!(attrs.format, "GIF");
    }

    #[test]
    fn recorded_error_is_execution_error() {
        let err = replay_result::<ImageAttributes>("convert", json!({"Err": "no decode delegate"}))
            .unwrap_err();
        assert!(err.is_execution());
        assert!(err.to_string().contains("no decode delegate"));
    }

    #[test]
    fn malformed_output_is_replay_error() {
        let err = replay_result::<ImageAttributes>("identify", json!({"Ok": {"width": "x"}}))
            .unwrap_err();
        assert!(matches!(err, GenerateError::Replay(_)));
    }
}
