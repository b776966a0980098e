use crate::browser::driver::PageDriver;
use crate::dom::node::NodeId;
use crate::engine::error::EngineError;

/// Case-insensitive, whitespace-trimmed equality — the comparison every
/// fallback tier verifies with.
pub fn values_match(expected: &str, actual: &str) -> bool {
    expected.trim().eq_ignore_ascii_case(actual.trim())
}

/// Did the written value stick? Checks value first, then rendered text
/// (rich text editors report through innerText).
pub fn verify_text(
    driver: &mut dyn PageDriver,
    node: NodeId,
    expected: &str,
) -> Result<bool, EngineError> {
    let state = driver.query_state(node)?;
    if !state.exists {
        return Ok(false);
    }
    Ok(values_match(expected, &state.value) || values_match(expected, &state.text))
}

/// Is the physical radio/checkbox now checked?
pub fn verify_checked(driver: &mut dyn PageDriver, node: NodeId) -> Result<bool, EngineError> {
    let state = driver.query_state(node)?;
    Ok(state.exists && state.checked)
}

/// Does the select now show the expected option (by label or value)?
pub fn verify_select(
    driver: &mut dyn PageDriver,
    node: NodeId,
    expected: &str,
) -> Result<bool, EngineError> {
    let state = driver.query_state(node)?;
    if !state.exists {
        return Ok(false);
    }
    if values_match(expected, &state.value) {
        return Ok(true);
    }
    Ok(state
        .selected_label
        .as_deref()
        .map(|l| values_match(expected, l))
        .unwrap_or(false))
}
