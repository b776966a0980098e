use serde::Serialize;

use crate::fill::fill_model::{FillDetail, FillOutcome};

/// The complete result of one fill pass, consumed by the surrounding
/// system for usage tracking and UI display.
#[derive(Debug, Clone, Serialize)]
pub struct FillReport {
    pub url: String,
    pub platform: String,
    pub duration_ms: u128,

    pub filled: usize,
    pub filled_unverified: usize,
    pub skipped: usize,
    pub failed: usize,
    pub needs_ai: usize,
    pub needs_file: usize,

    pub details: Vec<FillDetail>,
}

impl FillReport {
    pub fn from_details(
        url: &str,
        platform: &str,
        details: Vec<FillDetail>,
        duration_ms: u128,
    ) -> Self {
        let count = |outcome: &FillOutcome| details.iter().filter(|d| d.outcome == *outcome).count();
        FillReport {
            url: url.to_string(),
            platform: platform.to_string(),
            duration_ms,
            filled: count(&FillOutcome::Filled),
            filled_unverified: count(&FillOutcome::FilledUnverified),
            skipped: count(&FillOutcome::Skipped),
            failed: count(&FillOutcome::Failed),
            needs_ai: count(&FillOutcome::NeedsAi),
            needs_file: count(&FillOutcome::NeedsFile),
            details,
        }
    }

    /// Nothing failed outright. Skips and deferrals are expected.
    pub fn all_ok(&self) -> bool {
        self.failed == 0
    }

    pub fn total(&self) -> usize {
        self.details.len()
    }
}
