use std::collections::HashMap;

use crate::browser::driver::{FieldState, FilePayload, PageDriver};
use crate::dom::node::{DomNode, ExtractedPage, NodeId};
use crate::engine::error::EngineError;

/// How a mock element reacts to each text-entry tier. Defaults accept
/// everything; tests flip flags to force the executor to escalate.
#[derive(Debug, Clone)]
pub struct ElementBehavior {
    pub accept_insert_text: bool,
    pub accept_set_value: bool,
    pub accept_type_chars: bool,
    pub accept_upload: bool,
}

impl Default for ElementBehavior {
    fn default() -> Self {
        ElementBehavior {
            accept_insert_text: true,
            accept_set_value: true,
            accept_type_chars: true,
            accept_upload: true,
        }
    }
}

/// In-memory page driver. Holds a DomNode tree, mutates it the way the
/// sidecar would mutate the real page, and records every operation so
/// tests can assert on interaction order and counts.
pub struct MockPage {
    pub url: String,
    pub title: String,
    dom: Vec<DomNode>,
    behaviors: HashMap<u32, ElementBehavior>,
    /// Clicking key appends these nodes under the given parent ("Add
    /// another" sections).
    on_click_append: HashMap<u32, (u32, Vec<DomNode>)>,
    /// Clicking key writes a value into another element (overlay options
    /// updating their trigger).
    on_click_set: HashMap<u32, (u32, String)>,
    pub ops: Vec<String>,
}

impl MockPage {
    pub fn new(url: &str, title: &str, dom: Vec<DomNode>) -> Self {
        MockPage {
            url: url.to_string(),
            title: title.to_string(),
            dom,
            behaviors: HashMap::new(),
            on_click_append: HashMap::new(),
            on_click_set: HashMap::new(),
            ops: Vec::new(),
        }
    }

    pub fn set_behavior(&mut self, node: u32, behavior: ElementBehavior) {
        self.behaviors.insert(node, behavior);
    }

    pub fn on_click_append(&mut self, clicked: u32, parent: u32, nodes: Vec<DomNode>) {
        self.on_click_append.insert(clicked, (parent, nodes));
    }

    pub fn on_click_set(&mut self, clicked: u32, target: u32, value: &str) {
        self.on_click_set.insert(clicked, (target, value.to_string()));
    }

    pub fn op_count(&self, prefix: &str) -> usize {
        self.ops.iter().filter(|o| o.starts_with(prefix)).count()
    }

    /// Current value of an element, for post-pass assertions.
    pub fn value_of(&self, node: u32) -> Option<String> {
        find(&self.dom, node).and_then(|n| n.value.clone())
    }

    pub fn checked_of(&self, node: u32) -> Option<bool> {
        find(&self.dom, node).and_then(|n| n.checked)
    }

    fn behavior(&self, node: u32) -> ElementBehavior {
        self.behaviors.get(&node).cloned().unwrap_or_default()
    }

    fn require_mut(&mut self, node: NodeId) -> Result<&mut DomNode, EngineError> {
        find_mut(&mut self.dom, node.0).ok_or(EngineError::NodeGone {
            node,
            context: "mock page".into(),
        })
    }
}

// ============================================================================
// Tree helpers
// ============================================================================

fn find(nodes: &[DomNode], id: u32) -> Option<&DomNode> {
    for n in nodes {
        if n.node == id {
            return Some(n);
        }
        if let Some(hit) = find(&n.children, id)
            .or_else(|| find(&n.shadow, id))
            .or_else(|| n.frame.as_ref().and_then(|f| find(&f.children, id)))
        {
            return Some(hit);
        }
    }
    None
}

fn find_mut(nodes: &mut [DomNode], id: u32) -> Option<&mut DomNode> {
    for n in nodes {
        if n.node == id {
            return Some(n);
        }
        if let Some(hit) = find_mut(&mut n.children, id) {
            return Some(hit);
        }
        if let Some(hit) = find_mut(&mut n.shadow, id) {
            return Some(hit);
        }
        if let Some(frame) = n.frame.as_mut() {
            if let Some(hit) = find_mut(&mut frame.children, id) {
                return Some(hit);
            }
        }
    }
    None
}

fn uncheck_radio_group(nodes: &mut [DomNode], name: &str) {
    for n in nodes.iter_mut() {
        if n.tag == "input"
            && n.r#type.as_deref() == Some("radio")
            && n.name.as_deref() == Some(name)
        {
            n.checked = Some(false);
        }
        uncheck_radio_group(&mut n.children, name);
        uncheck_radio_group(&mut n.shadow, name);
        if let Some(frame) = n.frame.as_mut() {
            uncheck_radio_group(&mut frame.children, name);
        }
    }
}

// ============================================================================
// PageDriver implementation
// ============================================================================

impl PageDriver for MockPage {
    fn navigate(&mut self, url: &str) -> Result<(), EngineError> {
        self.ops.push(format!("navigate {}", url));
        self.url = url.to_string();
        Ok(())
    }

    fn extract(&mut self) -> Result<ExtractedPage, EngineError> {
        self.ops.push("extract".to_string());
        Ok(ExtractedPage {
            url: self.url.clone(),
            title: self.title.clone(),
            dom: self.dom.clone(),
        })
    }

    fn focus(&mut self, node: NodeId) -> Result<(), EngineError> {
        self.ops.push(format!("focus {}", node));
        self.require_mut(node).map(|_| ())
    }

    fn clear(&mut self, node: NodeId) -> Result<(), EngineError> {
        self.ops.push(format!("clear {}", node));
        let el = self.require_mut(node)?;
        el.value = Some(String::new());
        Ok(())
    }

    fn click(&mut self, node: NodeId) -> Result<(), EngineError> {
        self.ops.push(format!("click {}", node));

        if let Some((parent, appended)) = self.on_click_append.get(&node.0).cloned() {
            let parent_node = find_mut(&mut self.dom, parent).ok_or(EngineError::NodeGone {
                node: NodeId(parent),
                context: "click append target".into(),
            })?;
            parent_node.children.extend(appended);
        }
        if let Some((target, value)) = self.on_click_set.get(&node.0).cloned() {
            if let Some(el) = find_mut(&mut self.dom, target) {
                el.value = Some(value.clone());
                el.text = Some(value);
            }
        }

        let (tag, input_type, name) = {
            let el = self.require_mut(node)?;
            (el.tag.clone(), el.r#type.clone(), el.name.clone())
        };
        if tag == "input" {
            match input_type.as_deref() {
                Some("radio") => {
                    if let Some(name) = name {
                        uncheck_radio_group(&mut self.dom, &name);
                    }
                    self.require_mut(node)?.checked = Some(true);
                }
                Some("checkbox") => {
                    let el = self.require_mut(node)?;
                    el.checked = Some(!el.checked.unwrap_or(false));
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn insert_text(&mut self, node: NodeId, text: &str) -> Result<(), EngineError> {
        self.ops.push(format!("insert_text {}", node));
        let accept = self.behavior(node.0).accept_insert_text;
        let el = self.require_mut(node)?;
        if accept {
            let mut value = el.value.clone().unwrap_or_default();
            value.push_str(text);
            el.value = Some(value);
            if el.content_editable {
                el.text = el.value.clone();
            }
        }
        Ok(())
    }

    fn set_value(&mut self, node: NodeId, value: &str) -> Result<(), EngineError> {
        self.ops.push(format!("set_value {}", node));
        let accept = self.behavior(node.0).accept_set_value;
        let el = self.require_mut(node)?;
        if accept {
            el.value = Some(value.to_string());
        }
        Ok(())
    }

    fn type_chars(&mut self, node: NodeId, text: &str) -> Result<(), EngineError> {
        self.ops.push(format!("type_chars {}", node));
        let accept = self.behavior(node.0).accept_type_chars;
        let el = self.require_mut(node)?;
        if accept {
            let mut value = el.value.clone().unwrap_or_default();
            value.push_str(text);
            el.value = Some(value);
        }
        Ok(())
    }

    fn select_option(&mut self, node: NodeId, value: &str) -> Result<(), EngineError> {
        self.ops.push(format!("select_option {}", node));
        let el = self.require_mut(node)?;
        let position = el
            .options
            .iter()
            .position(|o| o.value == value || o.label == value);
        if let Some(at) = position {
            for (i, option) in el.options.iter_mut().enumerate() {
                option.selected = i == at;
            }
            el.value = Some(el.options[at].value.clone());
            el.selected_index = Some(at as i32);
        }
        Ok(())
    }

    fn select_index(&mut self, node: NodeId, index: i32) -> Result<(), EngineError> {
        self.ops.push(format!("select_index {}", node));
        let el = self.require_mut(node)?;
        if index >= 0 {
            if let Some(option) = el.options.get(index as usize) {
                el.value = Some(option.value.clone());
            }
        } else {
            el.value = Some(String::new());
        }
        el.selected_index = Some(index);
        let at = index;
        for (i, option) in el.options.iter_mut().enumerate() {
            option.selected = i as i32 == at;
        }
        Ok(())
    }

    fn set_checked(&mut self, node: NodeId, checked: bool) -> Result<(), EngineError> {
        self.ops.push(format!("set_checked {}", node));
        self.require_mut(node)?.checked = Some(checked);
        Ok(())
    }

    fn set_text(&mut self, node: NodeId, text: &str) -> Result<(), EngineError> {
        self.ops.push(format!("set_text {}", node));
        self.require_mut(node)?.text = Some(text.to_string());
        Ok(())
    }

    fn upload_file(&mut self, node: NodeId, file: &FilePayload) -> Result<(), EngineError> {
        self.ops.push(format!("upload_file {} {}", node, file.filename));
        let accept = self.behavior(node.0).accept_upload;
        let el = self.require_mut(node)?;
        if accept {
            el.value = Some(file.filename.clone());
        }
        Ok(())
    }

    fn drag_drop_file(&mut self, node: NodeId, file: &FilePayload) -> Result<(), EngineError> {
        self.ops
            .push(format!("drag_drop_file {} {}", node, file.filename));
        let el = self.require_mut(node)?;
        el.value = Some(file.filename.clone());
        Ok(())
    }

    fn query_state(&mut self, node: NodeId) -> Result<FieldState, EngineError> {
        let Some(el) = find(&self.dom, node.0) else {
            return Ok(FieldState::default());
        };
        let selected_index = el
            .selected_index
            .or_else(|| el.options.iter().position(|o| o.selected).map(|i| i as i32))
            .unwrap_or(-1);
        let selected_label = if selected_index >= 0 {
            el.options.get(selected_index as usize).map(|o| o.label.clone())
        } else {
            None
        };
        Ok(FieldState {
            exists: true,
            value: el.value.clone().unwrap_or_default(),
            checked: el.checked.unwrap_or(false),
            selected_index,
            selected_label,
            text: el.text.clone().unwrap_or_default(),
        })
    }

    fn wait(&mut self, _ms: u64) -> Result<(), EngineError> {
        // Mock pages settle instantly.
        Ok(())
    }
}
