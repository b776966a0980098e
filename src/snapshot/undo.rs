use log::{debug, warn};

use crate::browser::driver::PageDriver;
use crate::dom::node::{DomNode, ExtractedPage, NodeId};
use crate::dom::visit;
use crate::engine::error::EngineError;
use crate::fill::fill_model::MappedField;
use crate::scan::scan_model::ControlKind;

/// Previous state of one element, enough to put it back exactly.
#[derive(Debug, Clone)]
pub struct SnapshotEntry {
    pub node: NodeId,
    pub value: String,
    pub checked: bool,
    pub selected_index: i32,
    pub control: ControlKind,
    /// Regenerable CSS-ish selector, kept so a future session can
    /// re-resolve the element if node ids died with the pass.
    pub selector: String,
}

/// Pre-fill DOM snapshot. Created before a pass touches anything,
/// consumed exactly once on undo.
pub struct Snapshot {
    entries: Vec<SnapshotEntry>,
    consumed: bool,
}

impl Snapshot {
    /// Record the current state of every element the pass may touch,
    /// including each physical radio in collapsed groups.
    pub fn capture(page: &ExtractedPage, mapped: &[MappedField]) -> Snapshot {
        let mut entries = Vec::new();

        for field in mapped {
            let scanned = &field.classified.field;
            let mut nodes = vec![scanned.node];
            for option in &scanned.options {
                if let Some(node) = option.node {
                    nodes.push(node);
                }
            }
            for node in nodes {
                if let Some(dom) = visit::find(&page.dom, |n| n.node_id() == node) {
                    entries.push(SnapshotEntry {
                        node,
                        value: dom.value.clone().unwrap_or_default(),
                        checked: dom.checked.unwrap_or(false),
                        selected_index: dom.selected_index.unwrap_or(-1),
                        control: scanned.control,
                        selector: selector_for(dom),
                    });
                }
            }
        }

        Snapshot {
            entries,
            consumed: false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Roll every captured element back. Consumes the snapshot: a second
    /// restore is a no-op. Elements that disappeared are skipped; the
    /// count of restored elements is returned.
    pub fn restore(&mut self, driver: &mut dyn PageDriver) -> Result<usize, EngineError> {
        if self.consumed {
            return Ok(0);
        }
        self.consumed = true;

        let mut restored = 0;
        for entry in &self.entries {
            let result = match entry.control {
                ControlKind::Select => driver.select_index(entry.node, entry.selected_index),
                ControlKind::Radio | ControlKind::Checkbox => {
                    driver.set_checked(entry.node, entry.checked)
                }
                _ => driver.set_value(entry.node, &entry.value),
            };
            match result {
                Ok(()) => restored += 1,
                Err(e) => {
                    debug!("undo skipped {} ({}): {}", entry.node, entry.selector, e);
                }
            }
        }

        if restored < self.entries.len() {
            warn!(
                "undo restored {}/{} elements",
                restored,
                self.entries.len()
            );
        }
        Ok(restored)
    }
}

fn selector_for(node: &DomNode) -> String {
    if let Some(id) = &node.id {
        return format!("#{}", id);
    }
    if let Some(name) = &node.name {
        return format!("{}[name=\"{}\"]", node.tag, name);
    }
    node.tag.clone()
}
