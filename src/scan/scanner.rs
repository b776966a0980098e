use std::collections::HashMap;

use log::debug;

use crate::dom::node::{DomIndex, DomNode, ExtractedPage};
use crate::dom::visit;
use crate::scan::labels::resolve_label;
use crate::scan::scan_model::{ControlKind, FieldOption, ScannedField};

/// Walk one extracted page and return every visible, fillable element as a
/// normalized `ScannedField`, radio groups collapsed to one per name.
/// Cross-origin iframe content never reaches us — the driver marks those
/// frames and the visitor skips them.
pub fn scan(page: &ExtractedPage) -> Vec<ScannedField> {
    let index = DomIndex::build(page);

    let mut fields: Vec<ScannedField> = Vec::new();
    // name → position in `fields` of the radio group's ScannedField
    let mut radio_groups: HashMap<String, usize> = HashMap::new();

    let stats = visit::visit(&page.dom, &mut |node| {
        let Some(control) = control_kind(node) else {
            return;
        };
        if !node.is_visible() && control != ControlKind::File {
            // File inputs are routinely hidden behind styled dropzones;
            // everything else must be laid out to count.
            return;
        }
        if node.disabled || node.readonly {
            return;
        }

        if control == ControlKind::Radio {
            collapse_radio(node, &index, page, &mut fields, &mut radio_groups);
            return;
        }

        fields.push(build_field(node, control, &index, page));
    });

    debug!(
        "scanned {} fields ({} nodes, {} shadow roots, {} same-origin frames, {} cross-origin skipped)",
        fields.len(),
        stats.nodes,
        stats.shadow_roots,
        stats.same_origin_frames,
        stats.cross_origin_skipped
    );

    fields
}

// ============================================================================
// Control-kind resolution
// ============================================================================

/// Which control family the node belongs to, or None for anything the
/// engine does not fill.
fn control_kind(node: &DomNode) -> Option<ControlKind> {
    match node.tag.as_str() {
        "textarea" => return Some(ControlKind::Textarea),
        "select" => return Some(ControlKind::Select),
        "input" => {}
        _ => {
            if node.content_editable {
                return Some(ControlKind::RichText);
            }
            return None;
        }
    }

    match node.r#type.as_deref() {
        None
        | Some("text")
        | Some("email")
        | Some("tel")
        | Some("url")
        | Some("number")
        | Some("search")
        | Some("password") => Some(ControlKind::Text),

        Some("date") | Some("datetime-local") => Some(ControlKind::Date),
        Some("month") => Some(ControlKind::Month),

        Some("radio") => Some(ControlKind::Radio),
        Some("checkbox") => Some(ControlKind::Checkbox),
        Some("file") => Some(ControlKind::File),

        // Non-interactive or chrome input types
        Some("hidden") | Some("submit") | Some("button") | Some("reset") | Some("image")
        | Some("range") | Some("color") => None,

        // Unknown type attribute → be conservative
        _ => None,
    }
}

// ============================================================================
// Field construction
// ============================================================================

fn build_field(
    node: &DomNode,
    control: ControlKind,
    index: &DomIndex<'_>,
    page: &ExtractedPage,
) -> ScannedField {
    let (label, label_source) = match resolve_label(node, index, &page.dom) {
        Some((text, source)) => (Some(text), Some(source)),
        None => (None, None),
    };

    let options = node
        .options
        .iter()
        .map(|o| FieldOption {
            value: o.value.clone(),
            label: o.label.clone(),
            node: None,
            selected: o.selected,
        })
        .collect();

    ScannedField {
        node: node.node_id(),
        control,
        tag: node.tag.clone(),
        input_type: node.r#type.clone(),
        label,
        label_source,
        html_id: node.id.clone(),
        name: node.name.clone(),
        placeholder: node.placeholder.clone(),
        autocomplete: node.autocomplete.clone(),
        attrs: classification_attrs(node),
        options,
        value: node.value.clone().unwrap_or_default(),
        checked: node.checked.unwrap_or(false),
        required: node.required,
        rect: node.rect,
    }
}

/// Collapse same-named radios into one field whose options are the
/// physical inputs. The group's label comes from the first radio that
/// resolves one above the per-input tier (usually a fieldset legend or
/// container text).
fn collapse_radio(
    node: &DomNode,
    index: &DomIndex<'_>,
    page: &ExtractedPage,
    fields: &mut Vec<ScannedField>,
    radio_groups: &mut HashMap<String, usize>,
) {
    let group_name = node
        .name
        .clone()
        .unwrap_or_else(|| format!("__radio_{}", node.node));

    let option = FieldOption {
        value: node.value.clone().unwrap_or_default(),
        label: radio_option_label(node, index, page),
        node: Some(node.node_id()),
        selected: node.checked.unwrap_or(false),
    };

    if let Some(&at) = radio_groups.get(&group_name) {
        let group = &mut fields[at];
        if option.selected {
            group.checked = true;
            group.value = option.value.clone();
        }
        group.options.push(option);
        return;
    }

    let mut field = build_field(node, ControlKind::Radio, index, page);
    // The per-input label belongs to the option, not the group; prefer a
    // group-scoped label from the enclosing fieldset/container.
    field.label = group_label(node, index).or(field.label);
    field.value = if option.selected {
        option.value.clone()
    } else {
        String::new()
    };
    field.checked = option.selected;
    field.options = vec![option];
    radio_groups.insert(group_name, fields.len());
    fields.push(field);
}

/// Label for one physical radio: its own resolved label, else its value.
fn radio_option_label(node: &DomNode, index: &DomIndex<'_>, page: &ExtractedPage) -> String {
    resolve_label(node, index, &page.dom)
        .map(|(text, _)| text)
        .or_else(|| node.value.clone())
        .unwrap_or_default()
}

/// A radio group's question text: the nearest fieldset legend's text.
fn group_label(node: &DomNode, index: &DomIndex<'_>) -> Option<String> {
    let fieldset = index
        .ancestors(node.node_id())
        .into_iter()
        .find(|a| a.tag == "fieldset")?;
    let legend = visit::find(std::slice::from_ref(fieldset), |n| n.tag == "legend")?;
    let mut parts: Vec<&str> = Vec::new();
    visit::visit(std::slice::from_ref(legend), &mut |n| {
        if let Some(t) = n.trimmed_text() {
            parts.push(t);
        }
    });
    let text = parts.join(" ");
    if text.is_empty() { None } else { Some(text) }
}

fn classification_attrs(node: &DomNode) -> HashMap<String, String> {
    let mut attrs = HashMap::new();
    if let Some(id) = &node.id {
        attrs.insert("id".to_string(), id.clone());
    }
    if let Some(name) = &node.name {
        attrs.insert("name".to_string(), name.clone());
    }
    if let Some(placeholder) = &node.placeholder {
        attrs.insert("placeholder".to_string(), placeholder.clone());
    }
    if let Some(role) = &node.role {
        attrs.insert("role".to_string(), role.clone());
    }
    for key in [
        "class",
        "data-automation-id",
        "data-qa",
        "data-field",
        "aria-describedby",
        "aria-autocomplete",
        "aria-haspopup",
        "pattern",
    ] {
        if let Some(v) = node.attr(key) {
            attrs.insert(key.to_string(), v.to_string());
        }
    }
    attrs
}
