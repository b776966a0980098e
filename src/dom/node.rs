use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Driver-assigned element id. Unique across all frames of one extract
/// call; dies with the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Layout box as reported by the driver (page coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn is_laid_out(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// A rendered `<option>` inside a native select.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionNode {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub selected: bool,
}

/// Content of an iframe. Cross-origin frames carry no children and are
/// skipped silently by every visitor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameContent {
    #[serde(default)]
    pub same_origin: bool,
    #[serde(default)]
    pub children: Vec<DomNode>,
}

/// One element in the extraction payload. The driver serializes the whole
/// page (plus open shadow roots and same-origin iframe documents) as a
/// tree of these.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomNode {
    pub node: u32,
    pub tag: String,
    pub text: Option<String>,
    pub value: Option<String>,
    pub checked: Option<bool>,
    pub selected_index: Option<i32>,

    pub id: Option<String>,
    pub name: Option<String>,
    pub r#type: Option<String>,
    pub role: Option<String>,
    pub placeholder: Option<String>,
    pub autocomplete: Option<String>,
    pub aria_label: Option<String>,
    pub aria_labelledby: Option<String>,
    #[serde(rename = "for")]
    pub for_target: Option<String>,

    pub content_editable: bool,
    pub required: bool,
    pub disabled: bool,
    pub readonly: bool,
    /// Computed by the driver: display:none, visibility:hidden, or a
    /// hidden ancestor.
    pub hidden: bool,

    pub rect: Rect,
    pub attributes: HashMap<String, String>,
    pub options: Vec<OptionNode>,

    pub children: Vec<DomNode>,
    /// Children of an open shadow root attached to this element.
    pub shadow: Vec<DomNode>,
    pub frame: Option<FrameContent>,
}

impl DomNode {
    pub fn node_id(&self) -> NodeId {
        NodeId(self.node)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    pub fn is_visible(&self) -> bool {
        !self.hidden && self.rect.is_laid_out()
    }

    /// Trimmed own text, if any.
    pub fn trimmed_text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

/// The full payload of one `extract` driver call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedPage {
    pub url: String,
    pub title: String,
    pub dom: Vec<DomNode>,
}

// ============================================================================
// DomIndex — borrow-only lookup structures over one extracted tree
// ============================================================================

/// Lookup maps built once per extract: node id → node, html id → node,
/// child → parent, and document order. Borrows the tree; rebuilt after
/// every structural mutation.
pub struct DomIndex<'a> {
    by_node: HashMap<NodeId, &'a DomNode>,
    by_html_id: HashMap<&'a str, &'a DomNode>,
    parent: HashMap<NodeId, NodeId>,
    order: HashMap<NodeId, usize>,
}

impl<'a> DomIndex<'a> {
    pub fn build(page: &'a ExtractedPage) -> Self {
        let mut index = DomIndex {
            by_node: HashMap::new(),
            by_html_id: HashMap::new(),
            parent: HashMap::new(),
            order: HashMap::new(),
        };
        for root in &page.dom {
            index.add(root, None);
        }
        index
    }

    fn add(&mut self, node: &'a DomNode, parent: Option<NodeId>) {
        let id = node.node_id();
        let position = self.order.len();
        self.order.insert(id, position);
        self.by_node.insert(id, node);
        if let Some(html_id) = node.id.as_deref() {
            self.by_html_id.entry(html_id).or_insert(node);
        }
        if let Some(p) = parent {
            self.parent.insert(id, p);
        }

        for child in node.shadow.iter().chain(node.children.iter()) {
            self.add(child, Some(id));
        }
        if let Some(frame) = &node.frame {
            if frame.same_origin {
                for child in &frame.children {
                    self.add(child, Some(id));
                }
            }
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&'a DomNode> {
        self.by_node.get(&id).copied()
    }

    pub fn by_html_id(&self, html_id: &str) -> Option<&'a DomNode> {
        self.by_html_id.get(html_id).copied()
    }

    pub fn parent_of(&self, id: NodeId) -> Option<&'a DomNode> {
        self.parent.get(&id).and_then(|p| self.get(*p))
    }

    /// Document-order position, for stable sorting.
    pub fn position(&self, id: NodeId) -> usize {
        self.order.get(&id).copied().unwrap_or(usize::MAX)
    }

    /// Walk ancestors from the nearest parent outward.
    pub fn ancestors(&self, id: NodeId) -> Vec<&'a DomNode> {
        let mut chain = Vec::new();
        let mut current = id;
        while let Some(parent_id) = self.parent.get(&current) {
            if let Some(parent) = self.get(*parent_id) {
                chain.push(parent);
            }
            current = *parent_id;
        }
        chain
    }

    /// Siblings that precede `id` in its parent's child list, nearest first.
    pub fn preceding_siblings(&self, id: NodeId) -> Vec<&'a DomNode> {
        let Some(parent) = self.parent_of(id) else {
            return Vec::new();
        };
        let mut before: Vec<&'a DomNode> = Vec::new();
        for child in parent.shadow.iter().chain(parent.children.iter()) {
            if child.node_id() == id {
                break;
            }
            before.push(child);
        }
        before.reverse();
        before
    }
}
