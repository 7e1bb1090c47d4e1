// Stdio transport for the host bridge
//
// The host runs as a child process. Requests go to its stdin as one JSON
// object per line; a reader thread routes replies to the waiting caller
// and forwards host-initiated events to the UI channel.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::{
    decode_path, decode_path_list, parse_inbound, BridgeError, HostBridge, HostEvent, Inbound,
    Request,
};

type PendingMap = Arc<Mutex<HashMap<Uuid, mpsc::Sender<Result<Value, String>>>>>;

pub struct StdioBridge {
    stdin: Mutex<ChildStdin>,
    pending: PendingMap,
    child: Mutex<Child>,
}

impl StdioBridge {
    /// Spawn the host command and start the reader thread.
    pub fn spawn(
        command: &str,
        args: &[String],
        events: Sender<HostEvent>,
    ) -> Result<Self, BridgeError> {
        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()?;

        let stdin = child.stdin.take().ok_or(BridgeError::HostGone)?;
        let stdout = child.stdout.take().ok_or(BridgeError::HostGone)?;

        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let reader_pending = Arc::clone(&pending);
        thread::spawn(move || reader_loop(stdout, reader_pending, events));

        Ok(Self {
            stdin: Mutex::new(stdin),
            pending,
            child: Mutex::new(child),
        })
    }

    fn write_line(&self, value: &Value) -> Result<(), BridgeError> {
        let mut line = serde_json::to_string(value)?;
        line.push('\n');
        let mut stdin = self.stdin.lock().unwrap();
        stdin.write_all(line.as_bytes())?;
        stdin.flush()?;
        Ok(())
    }

    /// Issue a request and block until the host replies.
    fn call(&self, op: &'static str, args: Value) -> Result<Value, BridgeError> {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel();
        self.pending.lock().unwrap().insert(id, tx);

        let request = Request { id, op, args };
        let framed = serde_json::to_value(&request)?;
        if let Err(e) = self.write_line(&framed) {
            self.pending.lock().unwrap().remove(&id);
            return Err(e);
        }

        // The reader thread drops the sender when the host goes away.
        match rx.recv() {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(message)) => Err(BridgeError::Rejected {
                op: op.to_string(),
                message,
            }),
            Err(_) => Err(BridgeError::HostGone),
        }
    }
}

impl HostBridge for StdioBridge {
    fn select_encoder(&self, name: &str) -> Result<String, BridgeError> {
        match self.call("selectEncoder", json!([name]))? {
            Value::String(codec) => Ok(codec),
            _ => Err(BridgeError::BadReply {
                op: "selectEncoder",
            }),
        }
    }

    fn select_input_files(&self) -> Result<Option<Vec<String>>, BridgeError> {
        let value = self.call("selectInputFiles", Value::Null)?;
        decode_path_list(value, "selectInputFiles")
    }

    fn select_output_files(&self) -> Result<Option<String>, BridgeError> {
        let value = self.call("selectOutputFiles", Value::Null)?;
        decode_path(value, "selectOutputFiles")
    }

    fn select_font_file(&self) -> Result<Option<String>, BridgeError> {
        let value = self.call("selectFontFile", Value::Null)?;
        decode_path(value, "selectFontFile")
    }

    fn generate_video(&self, settings: &Map<String, Value>) -> Result<(), BridgeError> {
        self.call("generateVideo", json!([settings]))?;
        Ok(())
    }

    fn terminate_process(&self) -> Result<(), BridgeError> {
        self.call("terminateProcess", Value::Null)?;
        Ok(())
    }

    fn open_file(&self, path: &str) -> Result<(), BridgeError> {
        self.call("openFile", json!([path]))?;
        Ok(())
    }

    fn open_dir(&self, path: &str) -> Result<(), BridgeError> {
        self.call("openDir", json!([path]))?;
        Ok(())
    }

    fn reply_all_log(&self, request_id: Uuid, log: &str) -> Result<(), BridgeError> {
        self.write_line(&json!({ "id": request_id, "result": log }))
    }
}

impl Drop for StdioBridge {
    fn drop(&mut self) {
        let mut child = self.child.lock().unwrap();
        let _ = child.kill();
        let _ = child.wait();
    }
}

fn reader_loop(stdout: ChildStdout, pending: PendingMap, events: Sender<HostEvent>) {
    let reader = BufReader::new(stdout);
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("host stdout closed: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match parse_inbound(&line) {
            Ok(Inbound::Reply { id, result }) => {
                let waiter = pending.lock().unwrap().remove(&id);
                match waiter {
                    Some(tx) => {
                        let _ = tx.send(result);
                    }
                    None => tracing::debug!(%id, "reply for unknown request"),
                }
            }
            Ok(Inbound::Event(event)) => {
                if events.send(event).is_err() {
                    // UI is gone; nothing left to deliver to.
                    break;
                }
            }
            Ok(Inbound::Ignored) => {}
            Err(e) => {
                tracing::warn!("dropping malformed host line: {e}");
            }
        }
    }

    // Unblock every caller still waiting on a reply.
    pending.lock().unwrap().clear();
}
