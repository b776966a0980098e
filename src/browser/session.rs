use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};

use crate::browser::driver::{FieldState, FilePayload, PageDriver};
use crate::browser::protocol::{DriverRequest, DriverResponse};
use crate::dom::node::{ExtractedPage, NodeId};
use crate::engine::error::EngineError;

/// Default sidecar script, relative to the working directory.
pub const DEFAULT_SERVER_SCRIPT: &str = "node/page-driver/page_server.js";

/// A persistent browser session backed by page_server.js.
///
/// Launches a long-lived Node.js process that keeps a Chromium page open.
/// Commands are sent as NDJSON over stdin, responses read from stdout.
/// Node ids are assigned by the sidecar during `extract` and stay valid
/// until the next navigation or extraction.
pub struct BrowserSession {
    child: Child,
    stdin: std::process::ChildStdin,
    reader: BufReader<std::process::ChildStdout>,
    current_url: Option<String>,
}

impl BrowserSession {
    /// Launch a new session by spawning the sidecar script.
    pub fn launch(script: &str) -> Result<Self, EngineError> {
        let mut child = Command::new("node")
            .arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| EngineError::SubprocessSpawn {
                script: script.to_string(),
                source: e,
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            EngineError::SessionIo("Failed to capture stdin of page_server.js".into())
        })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            EngineError::SessionIo("Failed to capture stdout of page_server.js".into())
        })?;

        let mut reader = BufReader::new(stdout);

        // Wait for the ready signal
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| EngineError::SessionIo(format!("Failed to read ready signal: {}", e)))?;

        let response: DriverResponse =
            serde_json::from_str(line.trim()).map_err(|e| EngineError::JsonParse {
                context: "page_server.js ready signal".into(),
                source: e,
            })?;

        if !response.ok || response.ready != Some(true) {
            return Err(EngineError::SessionProtocol {
                command: "launch".into(),
                error: "Did not receive ready signal from page_server.js".into(),
            });
        }

        Ok(BrowserSession {
            child,
            stdin,
            reader,
            current_url: None,
        })
    }

    /// Send a request and read the response.
    fn send(&mut self, request: &DriverRequest) -> Result<DriverResponse, EngineError> {
        let json = serde_json::to_string(request).map_err(|e| EngineError::JsonSerialize {
            context: "DriverRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json).map_err(|e| {
            EngineError::SessionIo(format!("Failed to write to page_server.js stdin: {}", e))
        })?;

        self.stdin.flush().map_err(|e| {
            EngineError::SessionIo(format!("Failed to flush page_server.js stdin: {}", e))
        })?;

        let mut line = String::new();
        self.reader.read_line(&mut line).map_err(|e| {
            EngineError::SessionIo(format!("Failed to read from page_server.js stdout: {}", e))
        })?;

        if line.trim().is_empty() {
            return Err(EngineError::SessionIo(
                "Empty response from page_server.js (process may have died)".into(),
            ));
        }

        serde_json::from_str(line.trim()).map_err(|e| EngineError::JsonParse {
            context: "page_server.js response".into(),
            source: e,
        })
    }

    /// Send a request and verify it succeeded.
    fn send_ok(
        &mut self,
        request: &DriverRequest,
        command_name: &str,
    ) -> Result<DriverResponse, EngineError> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(EngineError::SessionProtocol {
                command: command_name.into(),
                error: response.error.unwrap_or_else(|| "Unknown error".into()),
            });
        }
        Ok(response)
    }

    /// Last URL navigated to (cached, no browser call).
    pub fn last_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    /// Quit the browser session.
    pub fn quit(&mut self) -> Result<(), EngineError> {
        // Best-effort quit — don't fail hard if the process is already gone
        let _ = self.send(&DriverRequest::quit());
        let _ = self.child.wait();
        Ok(())
    }
}

impl PageDriver for BrowserSession {
    fn navigate(&mut self, url: &str) -> Result<(), EngineError> {
        self.send_ok(&DriverRequest::navigate(url), "navigate")?;
        self.current_url = Some(url.to_string());
        Ok(())
    }

    fn extract(&mut self) -> Result<ExtractedPage, EngineError> {
        let response = self.send_ok(&DriverRequest::extract(), "extract")?;
        let data = response.data.ok_or_else(|| EngineError::SessionProtocol {
            command: "extract".into(),
            error: "No data in extract response".into(),
        })?;
        serde_json::from_value(data).map_err(|e| EngineError::JsonParse {
            context: "extract payload".into(),
            source: e,
        })
    }

    fn focus(&mut self, node: NodeId) -> Result<(), EngineError> {
        self.send_ok(&DriverRequest::focus(node), "focus").map(|_| ())
    }

    fn clear(&mut self, node: NodeId) -> Result<(), EngineError> {
        self.send_ok(&DriverRequest::clear(node), "clear").map(|_| ())
    }

    fn click(&mut self, node: NodeId) -> Result<(), EngineError> {
        self.send_ok(&DriverRequest::click(node), "click").map(|_| ())
    }

    fn insert_text(&mut self, node: NodeId, text: &str) -> Result<(), EngineError> {
        self.send_ok(&DriverRequest::insert_text(node, text), "insert_text")
            .map(|_| ())
    }

    fn set_value(&mut self, node: NodeId, value: &str) -> Result<(), EngineError> {
        self.send_ok(&DriverRequest::set_value(node, value), "set_value")
            .map(|_| ())
    }

    fn type_chars(&mut self, node: NodeId, text: &str) -> Result<(), EngineError> {
        self.send_ok(&DriverRequest::type_chars(node, text), "type_chars")
            .map(|_| ())
    }

    fn select_option(&mut self, node: NodeId, value: &str) -> Result<(), EngineError> {
        self.send_ok(&DriverRequest::select_option(node, value), "select_option")
            .map(|_| ())
    }

    fn select_index(&mut self, node: NodeId, index: i32) -> Result<(), EngineError> {
        self.send_ok(&DriverRequest::select_index(node, index), "select_index")
            .map(|_| ())
    }

    fn set_checked(&mut self, node: NodeId, checked: bool) -> Result<(), EngineError> {
        self.send_ok(&DriverRequest::set_checked(node, checked), "set_checked")
            .map(|_| ())
    }

    fn set_text(&mut self, node: NodeId, text: &str) -> Result<(), EngineError> {
        self.send_ok(&DriverRequest::set_text(node, text), "set_text")
            .map(|_| ())
    }

    fn upload_file(&mut self, node: NodeId, file: &FilePayload) -> Result<(), EngineError> {
        self.send_ok(&DriverRequest::upload_file(node, file), "upload_file")
            .map(|_| ())
    }

    fn drag_drop_file(&mut self, node: NodeId, file: &FilePayload) -> Result<(), EngineError> {
        self.send_ok(&DriverRequest::drag_drop_file(node, file), "drag_drop_file")
            .map(|_| ())
    }

    fn query_state(&mut self, node: NodeId) -> Result<FieldState, EngineError> {
        let response = self.send_ok(&DriverRequest::query_state(node), "query_state")?;
        response.state.ok_or_else(|| EngineError::SessionProtocol {
            command: "query_state".into(),
            error: "No state in query_state response".into(),
        })
    }

    fn wait(&mut self, ms: u64) -> Result<(), EngineError> {
        self.send_ok(&DriverRequest::wait(ms), "wait").map(|_| ())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Best-effort cleanup
        let _ = self.quit();
    }
}
