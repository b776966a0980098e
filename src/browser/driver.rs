use serde::{Deserialize, Serialize};

use crate::dom::node::{ExtractedPage, NodeId};
use crate::engine::error::EngineError;

/// Live state of one element, queried for verification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldState {
    pub exists: bool,
    pub value: String,
    pub checked: bool,
    pub selected_index: i32,
    /// Label of the selected option, for native selects.
    pub selected_label: Option<String>,
    /// Rendered inner text, for rich text and overlay triggers.
    pub text: String,
}

/// A document to attach to a file input or dropzone.
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Everything the engine may do to a page. The live implementation talks
/// to the Playwright sidecar; tests use `MockPage`. All heuristics stay on
/// this side of the seam — the driver is a dumb executor.
pub trait PageDriver {
    fn navigate(&mut self, url: &str) -> Result<(), EngineError>;

    /// Serialize the page (plus open shadow roots and same-origin iframe
    /// documents) as a DomNode tree with fresh node ids.
    fn extract(&mut self) -> Result<ExtractedPage, EngineError>;

    fn focus(&mut self, node: NodeId) -> Result<(), EngineError>;

    /// Select-all + delete through the editing command API.
    fn clear(&mut self, node: NodeId) -> Result<(), EngineError>;

    /// Native, trusted-equivalent click on the physical element.
    fn click(&mut self, node: NodeId) -> Result<(), EngineError>;

    /// Tier 1 text entry: editing-command insertion after focus. Reaches
    /// most frameworks' internal listeners.
    fn insert_text(&mut self, node: NodeId, text: &str) -> Result<(), EngineError>;

    /// Tier 2: native value setter + synthetic input/change events, for
    /// frameworks that override their own setter.
    fn set_value(&mut self, node: NodeId, value: &str) -> Result<(), EngineError>;

    /// Tier 3: per-character keydown/keypress/input/keyup simulation.
    fn type_chars(&mut self, node: NodeId, text: &str) -> Result<(), EngineError>;

    /// Set a native select by option value and fire change.
    fn select_option(&mut self, node: NodeId, value: &str) -> Result<(), EngineError>;

    /// Set a native select by index (snapshot restore path).
    fn select_index(&mut self, node: NodeId, index: i32) -> Result<(), EngineError>;

    /// Set checked state directly (snapshot restore path).
    fn set_checked(&mut self, node: NodeId, checked: bool) -> Result<(), EngineError>;

    /// Overwrite an element's text content (overlay display sync).
    fn set_text(&mut self, node: NodeId, text: &str) -> Result<(), EngineError>;

    /// DataTransfer assignment to a file input.
    fn upload_file(&mut self, node: NodeId, file: &FilePayload) -> Result<(), EngineError>;

    /// Synthetic dragenter/dragover/drop onto a dropzone.
    fn drag_drop_file(&mut self, node: NodeId, file: &FilePayload) -> Result<(), EngineError>;

    fn query_state(&mut self, node: NodeId) -> Result<FieldState, EngineError>;

    /// Explicit yield: give the host framework time to re-render.
    fn wait(&mut self, ms: u64) -> Result<(), EngineError>;
}
