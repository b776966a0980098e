use crate::dom::node::{DomIndex, DomNode};
use crate::dom::visit;
use crate::scan::scan_model::LabelSource;

/// Longest text any tier may return. Proximity heuristics would otherwise
/// happily capture paragraph copy.
const MAX_LABEL_LEN: usize = 160;

/// Shorter bound for the sibling/container proximity tiers.
const MAX_NEARBY_LEN: usize = 90;

/// Resolve a field's label through the 6-tier fallback. Explicit
/// associations always win over proximity heuristics; the first tier that
/// yields a non-empty, length-bounded result is used.
pub fn resolve_label(
    field: &DomNode,
    index: &DomIndex<'_>,
    roots: &[DomNode],
) -> Option<(String, LabelSource)> {
    if let Some(text) = explicit_for(field, roots) {
        return Some((text, LabelSource::ExplicitFor));
    }
    if let Some(text) = wrapping_label(field, index) {
        return Some((text, LabelSource::WrappingLabel));
    }
    if let Some(text) = aria_labelledby(field, index) {
        return Some((text, LabelSource::AriaLabelledBy));
    }
    if let Some(text) = aria_label(field) {
        return Some((text, LabelSource::AriaLabel));
    }
    if let Some(text) = preceding_sibling_text(field, index) {
        return Some((text, LabelSource::PrecedingText));
    }
    if let Some(text) = container_label_descendant(field, index) {
        return Some((text, LabelSource::ContainerText));
    }
    None
}

// ============================================================================
// Tiers, strongest first
// ============================================================================

/// Tier 1: `<label for="...">` matching the field's html id. Labels can
/// live anywhere in the document, so this searches the whole tree.
fn explicit_for(field: &DomNode, roots: &[DomNode]) -> Option<String> {
    let html_id = field.id.as_deref()?;
    let mut found = None;
    visit::visit(roots, &mut |n| {
        if found.is_none() && n.tag == "label" && n.for_target.as_deref() == Some(html_id) {
            found = subtree_text(n, MAX_LABEL_LEN);
        }
    });
    found
}

/// Tier 2: nearest `<label>` ancestor wrapping the field.
fn wrapping_label(field: &DomNode, index: &DomIndex<'_>) -> Option<String> {
    index
        .ancestors(field.node_id())
        .into_iter()
        .find(|a| a.tag == "label")
        .and_then(|label| subtree_text(label, MAX_LABEL_LEN))
}

/// Tier 3: `aria-labelledby` id references, joined in attribute order.
fn aria_labelledby(field: &DomNode, index: &DomIndex<'_>) -> Option<String> {
    let refs = field.aria_labelledby.as_deref()?;
    let parts: Vec<String> = refs
        .split_whitespace()
        .filter_map(|id| index.by_html_id(id))
        .filter_map(|n| subtree_text(n, MAX_LABEL_LEN))
        .collect();
    bounded(parts.join(" "), MAX_LABEL_LEN)
}

/// Tier 4: `aria-label` attribute.
fn aria_label(field: &DomNode) -> Option<String> {
    bounded(field.aria_label.clone()?, MAX_LABEL_LEN)
}

/// Tier 5: short text in a preceding sibling, nearest first.
fn preceding_sibling_text(field: &DomNode, index: &DomIndex<'_>) -> Option<String> {
    for sibling in index.preceding_siblings(field.node_id()) {
        if is_fillable_tag(&sibling.tag) {
            // Another control between us and any text: no association.
            return None;
        }
        if let Some(text) = subtree_text(sibling, MAX_NEARBY_LEN) {
            return Some(text);
        }
    }
    None
}

/// Tier 6: a label-like descendant of the field's container. Catches the
/// `<div><span class="field-label">…</span><input></div>` shape without a
/// real label element.
fn container_label_descendant(field: &DomNode, index: &DomIndex<'_>) -> Option<String> {
    let container = index.parent_of(field.node_id())?;
    let candidates = visit::find_all(std::slice::from_ref(container), |n| {
        n.node != field.node && looks_like_label(n)
    });
    candidates
        .into_iter()
        .find_map(|n| subtree_text(n, MAX_NEARBY_LEN))
}

// ============================================================================
// Helpers
// ============================================================================

fn looks_like_label(node: &DomNode) -> bool {
    if node.tag == "label" || node.tag == "legend" {
        return true;
    }
    if !matches!(node.tag.as_str(), "span" | "div" | "p") {
        return false;
    }
    node.attr("class")
        .map(|c| {
            let c = c.to_lowercase();
            c.contains("label") || c.contains("question") || c.contains("field-title")
        })
        .unwrap_or(false)
}

fn is_fillable_tag(tag: &str) -> bool {
    matches!(tag, "input" | "textarea" | "select")
}

/// Concatenated own + descendant text, whitespace-collapsed, or None when
/// empty or over the bound.
fn subtree_text(node: &DomNode, max_len: usize) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    visit::visit(std::slice::from_ref(node), &mut |n| {
        if let Some(t) = n.trimmed_text() {
            parts.push(t);
        }
    });
    bounded(parts.join(" "), max_len)
}

fn bounded(raw: String, max_len: usize) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() || collapsed.len() > max_len {
        None
    } else {
        Some(collapsed)
    }
}
