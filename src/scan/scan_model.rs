use std::collections::HashMap;

use serde::Serialize;

use crate::dom::node::{NodeId, Rect};

/// Broad control family a field belongs to. Finer detail (email vs tel vs
/// number) stays in `input_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ControlKind {
    Text,
    Textarea,
    RichText,
    Select,
    Radio,
    Checkbox,
    Date,
    Month,
    File,
}

/// Which label-resolution tier produced the label. Kept so trace output
/// and reports can show where a label came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LabelSource {
    ExplicitFor,
    WrappingLabel,
    AriaLabelledBy,
    AriaLabel,
    PrecedingText,
    ContainerText,
}

/// One selectable choice: a `<option>`, or one physical radio in a group.
#[derive(Debug, Clone, Serialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
    /// The physical element to click, where one exists (radios).
    pub node: Option<NodeId>,
    pub selected: bool,
}

/// One visible, fillable element found by the scanner. Radio groups
/// collapse to a single field per `name`. Holds only the driver node id —
/// never the element — and is dropped with the pass.
#[derive(Debug, Clone, Serialize)]
pub struct ScannedField {
    pub node: NodeId,
    pub control: ControlKind,
    pub tag: String,
    pub input_type: Option<String>,
    pub label: Option<String>,
    pub label_source: Option<LabelSource>,
    pub html_id: Option<String>,
    pub name: Option<String>,
    pub placeholder: Option<String>,
    pub autocomplete: Option<String>,
    /// Raw attribute text used by attribute-sourced classification.
    pub attrs: HashMap<String, String>,
    pub options: Vec<FieldOption>,
    pub value: String,
    pub checked: bool,
    pub required: bool,
    pub rect: Rect,
}

impl ScannedField {
    /// Label if present, else the strongest attribute hint. Used for
    /// report lines and AI batch descriptions.
    pub fn display_name(&self) -> String {
        self.label
            .clone()
            .or_else(|| self.placeholder.clone())
            .or_else(|| self.name.clone())
            .or_else(|| self.html_id.clone())
            .unwrap_or_else(|| format!("{} {}", self.tag, self.node))
    }

    pub fn is_free_text(&self) -> bool {
        matches!(
            self.control,
            ControlKind::Text | ControlKind::Textarea | ControlKind::RichText
        )
    }
}
