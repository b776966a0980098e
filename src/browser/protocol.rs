use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::browser::driver::{FieldState, FilePayload};
use crate::dom::node::NodeId;

/// Request sent to page_server.js over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DriverRequest {
    Navigate {
        cmd: &'static str,
        url: String,
    },
    Extract {
        cmd: &'static str,
    },
    NodeOp {
        cmd: &'static str,
        node: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        index: Option<i32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        checked: Option<bool>,
    },
    File {
        cmd: &'static str,
        node: u32,
        filename: String,
        mime: String,
        /// File bytes, base64.
        data: String,
    },
    Wait {
        cmd: &'static str,
        duration_ms: u64,
    },
    Quit {
        cmd: &'static str,
    },
}

impl DriverRequest {
    pub fn navigate(url: &str) -> Self {
        DriverRequest::Navigate {
            cmd: "navigate",
            url: url.to_string(),
        }
    }

    pub fn extract() -> Self {
        DriverRequest::Extract { cmd: "extract" }
    }

    fn node_op(cmd: &'static str, node: NodeId) -> Self {
        DriverRequest::NodeOp {
            cmd,
            node: node.0,
            text: None,
            value: None,
            index: None,
            checked: None,
        }
    }

    pub fn focus(node: NodeId) -> Self {
        Self::node_op("focus", node)
    }

    pub fn clear(node: NodeId) -> Self {
        Self::node_op("clear", node)
    }

    pub fn click(node: NodeId) -> Self {
        Self::node_op("click", node)
    }

    pub fn insert_text(node: NodeId, text: &str) -> Self {
        DriverRequest::NodeOp {
            cmd: "insert_text",
            node: node.0,
            text: Some(text.to_string()),
            value: None,
            index: None,
            checked: None,
        }
    }

    pub fn set_value(node: NodeId, value: &str) -> Self {
        DriverRequest::NodeOp {
            cmd: "set_value",
            node: node.0,
            text: None,
            value: Some(value.to_string()),
            index: None,
            checked: None,
        }
    }

    pub fn type_chars(node: NodeId, text: &str) -> Self {
        DriverRequest::NodeOp {
            cmd: "type_chars",
            node: node.0,
            text: Some(text.to_string()),
            value: None,
            index: None,
            checked: None,
        }
    }

    pub fn select_option(node: NodeId, value: &str) -> Self {
        DriverRequest::NodeOp {
            cmd: "select_option",
            node: node.0,
            text: None,
            value: Some(value.to_string()),
            index: None,
            checked: None,
        }
    }

    pub fn select_index(node: NodeId, index: i32) -> Self {
        DriverRequest::NodeOp {
            cmd: "select_index",
            node: node.0,
            text: None,
            value: None,
            index: Some(index),
            checked: None,
        }
    }

    pub fn set_checked(node: NodeId, checked: bool) -> Self {
        DriverRequest::NodeOp {
            cmd: "set_checked",
            node: node.0,
            text: None,
            value: None,
            index: None,
            checked: Some(checked),
        }
    }

    pub fn set_text(node: NodeId, text: &str) -> Self {
        DriverRequest::NodeOp {
            cmd: "set_text",
            node: node.0,
            text: Some(text.to_string()),
            value: None,
            index: None,
            checked: None,
        }
    }

    pub fn query_state(node: NodeId) -> Self {
        Self::node_op("query_state", node)
    }

    pub fn upload_file(node: NodeId, file: &FilePayload) -> Self {
        Self::file_op("upload_file", node, file)
    }

    pub fn drag_drop_file(node: NodeId, file: &FilePayload) -> Self {
        Self::file_op("drag_drop_file", node, file)
    }

    fn file_op(cmd: &'static str, node: NodeId, file: &FilePayload) -> Self {
        use base64::Engine as _;
        DriverRequest::File {
            cmd,
            node: node.0,
            filename: file.filename.clone(),
            mime: file.mime.clone(),
            data: base64::engine::general_purpose::STANDARD.encode(&file.bytes),
        }
    }

    pub fn wait(duration_ms: u64) -> Self {
        DriverRequest::Wait {
            cmd: "wait",
            duration_ms,
        }
    }

    pub fn quit() -> Self {
        DriverRequest::Quit { cmd: "quit" }
    }
}

/// Response received from page_server.js over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct DriverResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
    /// Extraction payload for `extract`.
    #[serde(default)]
    pub data: Option<Value>,
    /// Element state for `query_state`.
    #[serde(default)]
    pub state: Option<FieldState>,
}
