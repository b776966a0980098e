//! formpilot — a browser-driven autofill engine for job-application
//! forms.
//!
//! Given an arbitrary form served by one of a dozen+ applicant-tracking
//! systems, the engine identifies which semantic field each input
//! represents, populates it from a structured candidate profile, and
//! verifies the fill. A Playwright sidecar executes DOM commands over an
//! NDJSON protocol; every heuristic lives on this side of that seam.
//!
//! Data flow: Scanner → Classifier → Mapper → {Fill Executor | AI
//! fallback | Screening resolver} → Verification, with a pre-fill
//! Snapshot available for undo throughout.

pub mod ai;
pub mod browser;
pub mod classify;
pub mod cli;
pub mod dom;
pub mod engine;
pub mod fill;
pub mod platform;
pub mod profile;
pub mod report;
pub mod scan;
pub mod screening;
pub mod snapshot;
pub mod trace;

use browser::driver::PageDriver;
use classify::classifier::classify_all;
use classify::classify_model::ClassifiedField;
use dom::node::ExtractedPage;
use engine::error::EngineError;

pub use engine::context::{FillSettings, PassContext};
pub use engine::pass::{run_fill_pass, PassOutcome};

/// Extract the current page and run detection + classification through
/// the active platform handler, without mutating anything. The read-only
/// half of a pass, reused by `scan`-style tooling and tests.
pub fn scan_page(
    driver: &mut dyn PageDriver,
) -> Result<(ExtractedPage, Vec<ClassifiedField>), EngineError> {
    let page = driver.extract()?;
    let handler = platform::handler::active_handler(&page);
    let classified = classify_all(&handler.scan(&page));
    Ok((page, classified))
}
