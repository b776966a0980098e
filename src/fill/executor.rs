use log::{debug, warn};

use crate::browser::driver::PageDriver;
use crate::dom::node::ExtractedPage;
use crate::engine::context::PassContext;
use crate::fill::choice_input::{fill_checkbox, fill_radio};
use crate::fill::date_input::fill_date;
use crate::fill::fill_model::{FillDetail, FillOutcome, FillStrategy, MapStatus, MappedField};
use crate::fill::select_input::fill_select;
use crate::fill::text_input::fill_text;
use crate::trace::trace::TraceEvent;

/// Fill one mapped field. Every fill is isolated: an error here becomes a
/// failed detail, never a pass abort. The caller owns inter-field pacing.
pub fn fill_field(
    driver: &mut dyn PageDriver,
    page: &ExtractedPage,
    field: &MappedField,
    ctx: &mut PassContext,
) -> FillDetail {
    let detail = match field.status {
        MapStatus::NoData => {
            FillDetail::new(field, FillOutcome::Skipped).with_message("no profile data")
        }
        MapStatus::Ambiguous => FillDetail::new(field, FillOutcome::Skipped)
            .with_message("confidence below review threshold"),
        MapStatus::NeedsAi => FillDetail::new(field, FillOutcome::NeedsAi),
        // File attachment is platform-owned; the pass routes it through
        // the active handler.
        MapStatus::NeedsFile => FillDetail::new(field, FillOutcome::NeedsFile),
        MapStatus::Ready => fill_ready(driver, page, field, ctx),
    };

    let step = ctx.next_step();
    ctx.tracer.log(
        &TraceEvent::now(step, "fill")
            .with_field(detail.label.clone())
            .with_identifier(detail.identifier.clone())
            .with_strategy(format!("{:?}", field.strategy))
            .with_attempt(detail.attempts)
            .with_outcome(format!("{:?}", detail.outcome))
            .with_confidence(field.classified.confidence),
    );

    detail
}

fn fill_ready(
    driver: &mut dyn PageDriver,
    page: &ExtractedPage,
    field: &MappedField,
    ctx: &mut PassContext,
) -> FillDetail {
    let Some(value) = field.value.clone() else {
        return FillDetail::new(field, FillOutcome::Skipped).with_message("no value resolved");
    };

    debug!(
        "filling '{}' ({}) with strategy {:?}",
        field.classified.field.display_name(),
        field.classified.identifier.as_key(),
        field.strategy
    );

    let result = match field.strategy {
        FillStrategy::Text => fill_text(driver, field, &value, ctx),
        FillStrategy::Date => fill_date(driver, page, field, &value, ctx),
        FillStrategy::Select => fill_select(driver, field, &value, ctx),
        FillStrategy::Radio => fill_radio(driver, field, &value, ctx),
        FillStrategy::Checkbox => fill_checkbox(driver, field, &value, ctx),
        // Reaching here with a File strategy means the mapper saw no
        // document; report it deferred rather than failing.
        FillStrategy::File => return FillDetail::new(field, FillOutcome::NeedsFile),
    };

    match result {
        Ok((FillOutcome::Skipped, attempts)) => FillDetail::new(field, FillOutcome::Skipped)
            .with_attempts(attempts)
            .with_message("no matching option"),
        Ok((outcome, attempts)) => FillDetail::new(field, outcome).with_attempts(attempts),
        Err(e) => {
            warn!(
                "fill failed for '{}': {}",
                field.classified.field.display_name(),
                e
            );
            FillDetail::new(field, FillOutcome::Failed).with_message(e.to_string())
        }
    }
}
