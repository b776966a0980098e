use log::debug;

use crate::browser::driver::PageDriver;
use crate::classify::classifier::normalize;
use crate::dom::node::{DomNode, NodeId};
use crate::dom::visit;
use crate::engine::context::PassContext;
use crate::engine::error::EngineError;
use crate::fill::fill_model::{FillOutcome, MappedField};
use crate::fill::verify::{values_match, verify_select};

/// Fill a select. Native selects with rendered options take the direct
/// path; a select with zero rendered options is the
/// framework-only-renders-overlay pattern and goes through the custom
/// dropdown flow against the adjacent trigger.
pub fn fill_select(
    driver: &mut dyn PageDriver,
    field: &MappedField,
    value: &str,
    ctx: &mut PassContext,
) -> Result<(FillOutcome, u8), EngineError> {
    let scanned = &field.classified.field;

    if scanned.options.is_empty() {
        return fill_custom_dropdown(driver, scanned.node, value, ctx);
    }

    // Exact, then substring either direction. The mapper pre-matched the
    // value, so exact normally hits on the first try.
    let wanted = normalize(value);
    let option = scanned
        .options
        .iter()
        .find(|o| values_match(&o.label, value) || values_match(&o.value, value))
        .or_else(|| {
            scanned.options.iter().find(|o| {
                let label = normalize(&o.label);
                !label.is_empty() && (label.contains(&wanted) || wanted.contains(&label))
            })
        });

    let Some(option) = option else {
        return Ok((FillOutcome::Skipped, 0));
    };

    driver.select_option(scanned.node, &option.value)?;
    driver.wait(ctx.settings.step_delay_ms)?;

    if verify_select(driver, scanned.node, &option.label)?
        || verify_select(driver, scanned.node, &option.value)?
    {
        Ok((FillOutcome::Filled, 1))
    } else {
        Ok((FillOutcome::FilledUnverified, 1))
    }
}

// ============================================================================
// Custom dropdown overlays
// ============================================================================

/// Open → (optional) search → click sequence against a custom dropdown,
/// then force-sync the visible display text when the framework leaves it
/// stale.
pub fn fill_custom_dropdown(
    driver: &mut dyn PageDriver,
    trigger: NodeId,
    value: &str,
    ctx: &mut PassContext,
) -> Result<(FillOutcome, u8), EngineError> {
    let step = ctx.settings.step_delay_ms;

    driver.click(trigger)?;
    driver.wait(step.max(120))?;

    let mut page = driver.extract()?;
    let Some(overlay) = find_overlay(&page.dom) else {
        debug!("no overlay appeared for trigger {}", trigger);
        return Ok((FillOutcome::FilledUnverified, 1));
    };
    let overlay_id = overlay.node_id();

    // Search-driven listboxes filter as you type.
    if let Some(search) = find_search_input(overlay) {
        let search_id = search.node_id();
        driver.insert_text(search_id, value)?;
        driver.wait(step.max(120))?;
        page = driver.extract()?;
    }

    let overlay_nodes: &[DomNode] = match visit::find(&page.dom, |n| n.node_id() == overlay_id) {
        Some(overlay) => std::slice::from_ref(overlay),
        None => &page.dom,
    };
    let Some(option) = find_overlay_option(overlay_nodes, value) else {
        debug!("no option matching '{}' in overlay {}", value, overlay_id);
        return Ok((FillOutcome::FilledUnverified, 1));
    };

    driver.click(option.node_id())?;
    driver.wait(step)?;

    // Verify through the trigger's state; fall back to a display-text
    // force-sync when the framework applied the value but left the
    // visible text stale.
    let state = driver.query_state(trigger)?;
    if values_match(value, &state.value) || values_match(value, &state.text) {
        return Ok((FillOutcome::Filled, 1));
    }

    if let Some(display) = find_display_node(driver, trigger)? {
        driver.set_text(display, value)?;
        let state = driver.query_state(trigger)?;
        if values_match(value, &state.value) || values_match(value, &state.text) {
            return Ok((FillOutcome::Filled, 2));
        }
    }
    Ok((FillOutcome::FilledUnverified, 2))
}

/// The open overlay: the deepest visible listbox/menu-shaped node.
/// Depth beats class-name matching — class names churn with every
/// framework release.
fn find_overlay(roots: &[DomNode]) -> Option<&DomNode> {
    let mut best: Option<(usize, &DomNode)> = None;
    walk_depth(roots, 0, &mut |node, depth| {
        if !node.is_visible() {
            return;
        }
        let shaped = node.role.as_deref() == Some("listbox")
            || node.role.as_deref() == Some("menu")
            || node
                .attr("class")
                .map(|c| {
                    let c = c.to_lowercase();
                    c.contains("dropdown") || c.contains("menu") || c.contains("options")
                })
                .unwrap_or(false);
        if shaped && best.map(|(d, _)| depth > d).unwrap_or(true) {
            best = Some((depth, node));
        }
    });
    best.map(|(_, n)| n)
}

fn walk_depth<'a>(nodes: &'a [DomNode], depth: usize, f: &mut impl FnMut(&'a DomNode, usize)) {
    for node in nodes {
        f(node, depth);
        walk_depth(&node.shadow, depth + 1, f);
        walk_depth(&node.children, depth + 1, f);
        if let Some(frame) = &node.frame {
            if frame.same_origin {
                walk_depth(&frame.children, depth + 1, f);
            }
        }
    }
}

fn find_search_input(overlay: &DomNode) -> Option<&DomNode> {
    visit::find(std::slice::from_ref(overlay), |n| {
        n.tag == "input"
            && matches!(n.r#type.as_deref(), None | Some("text") | Some("search"))
            && n.is_visible()
    })
}

/// Best option inside the overlay: exact text, then substring either way.
fn find_overlay_option<'a>(roots: &'a [DomNode], value: &str) -> Option<&'a DomNode> {
    let wanted = normalize(value);
    let options = visit::find_all(roots, |n| {
        n.is_visible()
            && (n.role.as_deref() == Some("option")
                || matches!(n.tag.as_str(), "li")
                || n.attr("class").map(|c| c.contains("option")).unwrap_or(false))
            && n.trimmed_text().is_some()
    });

    options
        .iter()
        .find(|n| normalize(n.trimmed_text().unwrap_or_default()) == wanted)
        .or_else(|| {
            options.iter().find(|n| {
                let text = normalize(n.trimmed_text().unwrap_or_default());
                !text.is_empty() && (text.contains(&wanted) || wanted.contains(&text))
            })
        })
        .copied()
}

/// The trigger's visible display text node: deepest visible descendant
/// carrying text.
fn find_display_node(
    driver: &mut dyn PageDriver,
    trigger: NodeId,
) -> Result<Option<NodeId>, EngineError> {
    let page = driver.extract()?;
    let Some(trigger_node) = visit::find(&page.dom, |n| n.node_id() == trigger) else {
        return Ok(None);
    };
    let mut best: Option<(usize, NodeId)> = None;
    walk_depth(std::slice::from_ref(trigger_node), 0, &mut |node, depth| {
        if node.is_visible() && node.trimmed_text().is_some() {
            if best.map(|(d, _)| depth > d).unwrap_or(true) {
                best = Some((depth, node.node_id()));
            }
        }
    });
    Ok(best.map(|(_, id)| id))
}
