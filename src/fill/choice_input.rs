use crate::browser::driver::PageDriver;
use crate::classify::classifier::normalize;
use crate::engine::context::PassContext;
use crate::engine::error::EngineError;
use crate::fill::fill_model::{FillOutcome, MappedField};
use crate::fill::verify::{values_match, verify_checked};
use crate::scan::scan_model::FieldOption;

/// Click the physical radio whose label or value matches the target, so
/// host listeners fire. Group membership was already resolved by the
/// scanner's per-name collapse.
pub fn fill_radio(
    driver: &mut dyn PageDriver,
    field: &MappedField,
    value: &str,
    ctx: &mut PassContext,
) -> Result<(FillOutcome, u8), EngineError> {
    let scanned = &field.classified.field;

    let Some(option) = match_choice(&scanned.options, value) else {
        return Ok((FillOutcome::Skipped, 0));
    };
    let Some(node) = option.node else {
        return Ok((FillOutcome::Skipped, 0));
    };

    driver.click(node)?;
    driver.wait(ctx.settings.step_delay_ms)?;

    if verify_checked(driver, node)? {
        Ok((FillOutcome::Filled, 1))
    } else {
        // One more click; some frameworks swallow the first synthetic
        // event while hydrating.
        driver.click(node)?;
        driver.wait(ctx.settings.step_delay_ms)?;
        if verify_checked(driver, node)? {
            Ok((FillOutcome::Filled, 2))
        } else {
            Ok((FillOutcome::FilledUnverified, 2))
        }
    }
}

/// Check or uncheck to match a truthy/falsy target value.
pub fn fill_checkbox(
    driver: &mut dyn PageDriver,
    field: &MappedField,
    value: &str,
    ctx: &mut PassContext,
) -> Result<(FillOutcome, u8), EngineError> {
    let scanned = &field.classified.field;
    let desired = is_truthy(value);

    let state = driver.query_state(scanned.node)?;
    if state.checked == desired {
        return Ok((FillOutcome::Filled, 0));
    }

    driver.click(scanned.node)?;
    driver.wait(ctx.settings.step_delay_ms)?;

    let state = driver.query_state(scanned.node)?;
    if state.checked == desired {
        Ok((FillOutcome::Filled, 1))
    } else {
        Ok((FillOutcome::FilledUnverified, 1))
    }
}

/// Label match first, then value, exact then substring.
fn match_choice<'a>(options: &'a [FieldOption], value: &str) -> Option<&'a FieldOption> {
    let wanted = normalize(value);
    options
        .iter()
        .find(|o| values_match(&o.label, value) || values_match(&o.value, value))
        .or_else(|| {
            options.iter().find(|o| {
                let label = normalize(&o.label);
                !label.is_empty() && (label.contains(&wanted) || wanted.contains(&label))
            })
        })
}

pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "yes" | "true" | "1" | "checked" | "on" | "y"
    )
}
