// Host bridge adapter
//
// The UI talks to an external host process that owns the file dialogs,
// the encoder, and the font handling. Outbound operations suspend the
// caller until the host replies; inbound callbacks are pushed by the
// host and carried to the UI loop as events. Request IDs are allocated
// here and opaque to everything else.

pub mod stdio;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("host process is not running")]
    HostGone,

    #[error("i/o error talking to host: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed message from host: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("host rejected {op}: {message}")]
    Rejected { op: String, message: String },

    #[error("unexpected reply shape for {op}")]
    BadReply { op: &'static str },
}

/// Outbound surface: the fixed set of operations the UI may ask of the host.
pub trait HostBridge {
    fn select_encoder(&self, name: &str) -> Result<String, BridgeError>;
    fn select_input_files(&self) -> Result<Option<Vec<String>>, BridgeError>;
    fn select_output_files(&self) -> Result<Option<String>, BridgeError>;
    fn select_font_file(&self) -> Result<Option<String>, BridgeError>;
    fn generate_video(&self, settings: &Map<String, Value>) -> Result<(), BridgeError>;
    fn terminate_process(&self) -> Result<(), BridgeError>;
    fn open_file(&self, path: &str) -> Result<(), BridgeError>;
    fn open_dir(&self, path: &str) -> Result<(), BridgeError>;

    /// Answer a pending getAllLog callback.
    fn reply_all_log(&self, request_id: Uuid, log: &str) -> Result<(), BridgeError>;
}

/// Inbound surface: callbacks pushed by the host.
///
/// Payloads stay raw; validation happens at the UI boundary, where a
/// wrong-shaped payload is dropped silently rather than rejected.
#[derive(Debug, Clone)]
pub enum HostEvent {
    AddLog(Value),
    AddError(Value),
    ShowAlert(Value),
    QuitProcess(Value),
    ShowProgress(Value),
    GetAllLog { request_id: Uuid },
    /// Synthesized locally when the startup encoder query resolves;
    /// never parsed off the wire.
    CodecResolved(String),
}

#[derive(Debug, Serialize)]
pub(crate) struct Request<'a> {
    pub id: Uuid,
    pub op: &'a str,
    pub args: Value,
}

#[derive(Debug, Deserialize)]
struct InboundFrame {
    id: Option<Uuid>,
    result: Option<Value>,
    error: Option<String>,
    event: Option<String>,
    arg: Option<Value>,
}

/// A decoded line from the host.
#[derive(Debug)]
pub(crate) enum Inbound {
    /// Reply to an outstanding request.
    Reply {
        id: Uuid,
        result: Result<Value, String>,
    },
    /// Host-initiated callback.
    Event(HostEvent),
    /// Recognizably framed but not something we handle; dropped.
    Ignored,
}

pub(crate) fn parse_inbound(line: &str) -> Result<Inbound, BridgeError> {
    let frame: InboundFrame = serde_json::from_str(line)?;

    if let Some(name) = frame.event {
        let arg = frame.arg.unwrap_or(Value::Null);
        let event = match name.as_str() {
            "addLog" => HostEvent::AddLog(arg),
            "addError" => HostEvent::AddError(arg),
            "showAlert" => HostEvent::ShowAlert(arg),
            "quitProcess" => HostEvent::QuitProcess(arg),
            "showProgress" => HostEvent::ShowProgress(arg),
            "getAllLog" => match frame.id {
                Some(request_id) => HostEvent::GetAllLog { request_id },
                // A log request we cannot answer is useless.
                None => return Ok(Inbound::Ignored),
            },
            _ => {
                tracing::debug!(event = %name, "ignoring unknown host event");
                return Ok(Inbound::Ignored);
            }
        };
        return Ok(Inbound::Event(event));
    }

    if let Some(id) = frame.id {
        let result = match frame.error {
            Some(message) => Err(message),
            None => Ok(frame.result.unwrap_or(Value::Null)),
        };
        return Ok(Inbound::Reply { id, result });
    }

    Ok(Inbound::Ignored)
}

/// Decode an optional path-list reply (null means the picker was cancelled).
pub(crate) fn decode_path_list(value: Value, op: &'static str) -> Result<Option<Vec<String>>, BridgeError> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => {
            let mut paths = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => paths.push(s),
                    _ => return Err(BridgeError::BadReply { op }),
                }
            }
            Ok(Some(paths))
        }
        _ => Err(BridgeError::BadReply { op }),
    }
}

/// Decode an optional single-path reply.
pub(crate) fn decode_path(value: Value, op: &'static str) -> Result<Option<String>, BridgeError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        _ => Err(BridgeError::BadReply { op }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_with_id_op_args() {
        let id = Uuid::new_v4();
        let req = Request {
            id,
            op: "selectInputFiles",
            args: Value::Null,
        };
        let line = serde_json::to_string(&req).unwrap();
        let round: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(round["op"], "selectInputFiles");
        assert_eq!(round["id"], json!(id.to_string()));
        assert!(round["args"].is_null());
    }

    #[test]
    fn parses_result_reply() {
        let id = Uuid::new_v4();
        let line = format!(r#"{{"id":"{id}","result":"h264_nvenc"}}"#);
        match parse_inbound(&line).unwrap() {
            Inbound::Reply { id: got, result } => {
                assert_eq!(got, id);
                assert_eq!(result.unwrap(), json!("h264_nvenc"));
            }
            other => panic!("expected reply, got {other:?}"),
        }
    }

    #[test]
    fn parses_error_reply() {
        let id = Uuid::new_v4();
        let line = format!(r#"{{"id":"{id}","error":"no such encoder"}}"#);
        match parse_inbound(&line).unwrap() {
            Inbound::Reply { result, .. } => {
                assert_eq!(result.unwrap_err(), "no such encoder");
            }
            other => panic!("expected reply, got {other:?}"),
        }
    }

    #[test]
    fn parses_host_events() {
        match parse_inbound(r#"{"event":"addLog","arg":"frame=1\n"}"#).unwrap() {
            Inbound::Event(HostEvent::AddLog(v)) => assert_eq!(v, json!("frame=1\n")),
            other => panic!("expected addLog, got {other:?}"),
        }
        match parse_inbound(r#"{"event":"showProgress","arg":0.25}"#).unwrap() {
            Inbound::Event(HostEvent::ShowProgress(v)) => assert_eq!(v, json!(0.25)),
            other => panic!("expected showProgress, got {other:?}"),
        }
    }

    #[test]
    fn get_all_log_requires_an_id() {
        assert!(matches!(
            parse_inbound(r#"{"event":"getAllLog"}"#).unwrap(),
            Inbound::Ignored
        ));

        let id = Uuid::new_v4();
        let line = format!(r#"{{"event":"getAllLog","id":"{id}"}}"#);
        match parse_inbound(&line).unwrap() {
            Inbound::Event(HostEvent::GetAllLog { request_id }) => assert_eq!(request_id, id),
            other => panic!("expected getAllLog, got {other:?}"),
        }
    }

    #[test]
    fn unknown_events_are_ignored_not_errors() {
        assert!(matches!(
            parse_inbound(r#"{"event":"somethingNew","arg":1}"#).unwrap(),
            Inbound::Ignored
        ));
    }

    #[test]
    fn garbage_lines_are_codec_errors() {
        assert!(parse_inbound("not json at all").is_err());
    }

    #[test]
    fn decodes_path_replies() {
        assert_eq!(
            decode_path_list(json!(["/a.mp4", "/b.mp4"]), "selectInputFiles").unwrap(),
            Some(vec!["/a.mp4".to_string(), "/b.mp4".to_string()])
        );
        assert_eq!(
            decode_path_list(Value::Null, "selectInputFiles").unwrap(),
            None
        );
        assert!(decode_path_list(json!(42), "selectInputFiles").is_err());

        assert_eq!(
            decode_path(json!("/out.mp4"), "selectOutputFiles").unwrap(),
            Some("/out.mp4".to_string())
        );
        assert_eq!(decode_path(Value::Null, "selectOutputFiles").unwrap(), None);
        assert!(decode_path(json!(["/out.mp4"]), "selectOutputFiles").is_err());
    }
}
