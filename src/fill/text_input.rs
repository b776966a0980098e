use log::debug;

use crate::browser::driver::PageDriver;
use crate::classify::classifier::normalize;
use crate::dom::node::NodeId;
use crate::dom::visit;
use crate::engine::context::PassContext;
use crate::engine::error::EngineError;
use crate::fill::fill_model::{FillOutcome, MappedField};
use crate::fill::verify::{values_match, verify_text};
use crate::scan::scan_model::ControlKind;

/// Text entry with escalating fallback tiers, verified after each:
///   1. focus + clear + editing-command insertion
///   2. native setter + synthetic input/change events
///   3. per-character key simulation
/// Typeahead and rich-text widgets route to their own flows first.
pub fn fill_text(
    driver: &mut dyn PageDriver,
    field: &MappedField,
    value: &str,
    ctx: &mut PassContext,
) -> Result<(FillOutcome, u8), EngineError> {
    let scanned = &field.classified.field;

    if is_typeahead(field) {
        return fill_typeahead(driver, scanned.node, value, ctx);
    }
    if scanned.control == ControlKind::RichText {
        return fill_rich_text(driver, scanned.node, value, ctx);
    }

    escalate_tiers(driver, scanned.node, value, ctx)
}

/// The bounded tier loop: attempt tier k, verify, escalate. Never more
/// than `max_attempts` tiers; a mismatch after the last tier degrades to
/// FilledUnverified because several frameworks apply values on their next
/// render tick.
pub fn escalate_tiers(
    driver: &mut dyn PageDriver,
    node: NodeId,
    value: &str,
    ctx: &mut PassContext,
) -> Result<(FillOutcome, u8), EngineError> {
    let step = ctx.settings.step_delay_ms;
    let tiers = ctx.settings.max_attempts.clamp(1, 3);

    for attempt in 1..=tiers {
        match attempt {
            1 => {
                driver.focus(node)?;
                driver.wait(step)?;
                driver.clear(node)?;
                driver.insert_text(node, value)?;
            }
            2 => {
                driver.set_value(node, value)?;
            }
            _ => {
                driver.focus(node)?;
                driver.clear(node)?;
                driver.type_chars(node, value)?;
            }
        }
        driver.wait(step)?;

        if verify_text(driver, node, value)? {
            return Ok((FillOutcome::Filled, attempt));
        }
        debug!("text tier {} did not verify for {}", attempt, node);
    }

    Ok((FillOutcome::FilledUnverified, tiers))
}

// ============================================================================
// Typeahead
// ============================================================================

fn is_typeahead(field: &MappedField) -> bool {
    let attrs = &field.classified.field.attrs;
    attrs.get("role").map(|r| r == "combobox").unwrap_or(false)
        || attrs
            .get("aria-autocomplete")
            .map(|a| a == "list" || a == "both")
            .unwrap_or(false)
}

/// Type into the input, wait for the filtered list, click the best
/// matching option.
fn fill_typeahead(
    driver: &mut dyn PageDriver,
    node: NodeId,
    value: &str,
    ctx: &mut PassContext,
) -> Result<(FillOutcome, u8), EngineError> {
    let step = ctx.settings.step_delay_ms;

    driver.focus(node)?;
    driver.clear(node)?;
    driver.insert_text(node, value)?;
    driver.wait(step.max(120))?;

    let page = driver.extract()?;
    let wanted = normalize(value);
    let option = visit::find(&page.dom, |n| {
        if !n.is_visible() {
            return false;
        }
        let is_option = n.role.as_deref() == Some("option")
            || (n.tag == "li" && n.attr("class").map(|c| c.contains("option")).unwrap_or(false));
        is_option
            && n.trimmed_text()
                .map(|t| {
                    let t = normalize(t);
                    t == wanted || t.contains(&wanted)
                })
                .unwrap_or(false)
    });

    match option {
        Some(option) => {
            let option_id = option.node_id();
            driver.click(option_id)?;
            driver.wait(step)?;
            let state = driver.query_state(node)?;
            if values_match(value, &state.value) || state.value.to_lowercase().contains(&wanted) {
                Ok((FillOutcome::Filled, 1))
            } else {
                Ok((FillOutcome::FilledUnverified, 1))
            }
        }
        // No filtered list appeared: keep the typed text and fall back to
        // the plain tiers for verification.
        None => escalate_tiers(driver, node, value, ctx),
    }
}

// ============================================================================
// Rich text (contenteditable)
// ============================================================================

fn fill_rich_text(
    driver: &mut dyn PageDriver,
    node: NodeId,
    value: &str,
    ctx: &mut PassContext,
) -> Result<(FillOutcome, u8), EngineError> {
    let step = ctx.settings.step_delay_ms;

    driver.focus(node)?;
    driver.wait(step)?;
    driver.clear(node)?;
    driver.insert_text(node, value)?;
    driver.wait(step)?;

    let state = driver.query_state(node)?;
    if values_match(value, &state.text) || values_match(value, &state.value) {
        return Ok((FillOutcome::Filled, 1));
    }

    // Editors that ignore insertion commands: write the content directly.
    driver.set_text(node, value)?;
    driver.wait(step)?;
    let state = driver.query_state(node)?;
    if values_match(value, &state.text) {
        Ok((FillOutcome::Filled, 2))
    } else {
        Ok((FillOutcome::FilledUnverified, 2))
    }
}
