use std::time::Instant;

use log::{info, warn};

use crate::ai::ai_model::JobContext;
use crate::ai::client::AiClient;
use crate::browser::driver::PageDriver;
use crate::classify::classifier::classify_all;
use crate::engine::context::PassContext;
use crate::engine::error::EngineError;
use crate::fill::fill_model::{FillDetail, FillOutcome, MapStatus, MappedField};
use crate::platform::handler::active_handler;
use crate::profile::mapper::map_all;
use crate::profile::profile_model::CandidateProfile;
use crate::report::report_model::FillReport;
use crate::screening::resolver::run_screening_pass;
use crate::snapshot::undo::Snapshot;
use crate::trace::trace::TraceEvent;

/// Everything a pass produces: the report for the surrounding system and
/// the pre-fill snapshot for undo.
pub struct PassOutcome {
    pub report: FillReport,
    pub snapshot: Snapshot,
}

/// One complete fill pass over the current page:
/// scan → classify → map → snapshot → multi-step sections → fill →
/// screening → AI fallback → report.
///
/// The pass always completes and returns a full per-field report; every
/// field fill is isolated, and the collaborators degrade to deferrals on
/// failure. Cancellation is honored between fields only.
pub fn run_fill_pass(
    driver: &mut dyn PageDriver,
    profile: &CandidateProfile,
    job: &JobContext,
    ai: Option<&dyn AiClient>,
    ctx: &mut PassContext,
) -> Result<PassOutcome, EngineError> {
    let started = Instant::now();

    let page = driver.extract()?;
    let handler = active_handler(&page);
    info!("active platform handler: {}", handler.name());
    let step = ctx.next_step();
    ctx.tracer.log(
        &TraceEvent::now(step, "detect")
            .with_field(page.url.clone())
            .with_outcome(handler.name()),
    );

    let fields = handler.scan(&page);
    let classified = classify_all(&fields);
    let mapped = map_all(&classified, profile, &ctx.settings);
    info!("scanned {} fields, {} mapped ready", fields.len(), ready_count(&mapped));

    let snapshot = Snapshot::capture(&page, &mapped);

    let mut details: Vec<FillDetail> = Vec::new();

    // Repeatable sections first: the handler expands them, fills them
    // positionally, and claims their nodes so the main loop skips them.
    match handler.handle_multi_step(driver, profile, ctx) {
        Ok(section_details) => details.extend(section_details),
        Err(e) => warn!("multi-step expansion failed, continuing: {}", e),
    }

    let ai_active = ctx.settings.use_ai && ai.is_some();

    // Main loop: sequential, delayed, isolated per field.
    for field in &mapped {
        if ctx.cancel_requested() {
            info!("pass cancelled between fields");
            details.push(
                FillDetail::new(field, FillOutcome::Skipped).with_message("pass cancelled"),
            );
            continue;
        }
        if ctx.is_claimed(field.classified.field.node) {
            continue;
        }
        // AI-eligible fields are deferred to the batch stage when a
        // client is available.
        if ai_active && ai_eligible(field) {
            continue;
        }

        let detail = match field.status {
            MapStatus::NeedsFile => {
                handler.handle_file_upload(driver, &page, field, profile, ctx)
            }
            _ => handler.fill_field(driver, &page, field, ctx),
        };
        // Deferred and skipped fields stay unclaimed so the screening
        // resolver may still target them.
        if matches!(
            detail.outcome,
            FillOutcome::Filled | FillOutcome::FilledUnverified | FillOutcome::Failed
        ) {
            ctx.claim(field.classified.field.node);
        }
        details.push(detail);

        std::thread::sleep(std::time::Duration::from_millis(ctx.settings.field_delay_ms));
    }

    // Screening questions render as free-floating text; a second,
    // independent pass finds and answers them.
    if ctx.settings.run_screening && !ctx.cancel_requested() {
        match run_screening_pass(driver, profile, ctx) {
            Ok(screening_details) => details.extend(screening_details),
            Err(e) => warn!("screening pass failed, continuing: {}", e),
        }
    }

    // AI fallback for everything the deterministic pipeline left behind.
    if ai_active && !ctx.cancel_requested() {
        if let Some(ai) = ai {
            let current = driver.extract()?;
            details.extend(crate::ai::fallback::run_ai_fallback(
                driver, &current, &mapped, profile, job, ai, ctx,
            ));
        }
    }

    let report = FillReport::from_details(
        &page.url,
        handler.name(),
        details,
        started.elapsed().as_millis(),
    );
    let step = ctx.next_step();
    ctx.tracer.log(
        &TraceEvent::now(step, "report")
            .with_outcome(format!(
                "filled={} failed={} needs_ai={}",
                report.filled, report.failed, report.needs_ai
            )),
    );

    Ok(PassOutcome { report, snapshot })
}

fn ai_eligible(field: &MappedField) -> bool {
    matches!(field.status, MapStatus::NeedsAi | MapStatus::Ambiguous)
}

fn ready_count(mapped: &[MappedField]) -> usize {
    mapped
        .iter()
        .filter(|f| matches!(f.status, MapStatus::Ready))
        .count()
}
