use serde::Serialize;

use crate::classify::classify_model::ClassifiedField;

/// How the executor will mutate the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FillStrategy {
    Text,
    Date,
    Select,
    Radio,
    Checkbox,
    File,
}

/// Mapper verdict for one classified field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MapStatus {
    /// Value resolved and (for choice fields) pre-matched to an option.
    Ready,
    /// The profile has nothing for this field. A skip, not an error.
    NoData,
    /// Unknown or open-ended; deferred to the AI fallback.
    NeedsAi,
    /// Document attachment; deferred to the file-upload path.
    NeedsFile,
    /// Confidence below the review threshold; surfaced, not filled.
    Ambiguous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    CoverLetter,
}

/// A classified field with its resolved value and fill plan.
#[derive(Debug, Clone, Serialize)]
pub struct MappedField {
    pub classified: ClassifiedField,
    pub value: Option<String>,
    pub strategy: FillStrategy,
    pub status: MapStatus,
    pub document: Option<DocumentKind>,
}

/// Terminal outcome of one field fill.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FillOutcome {
    /// Written and verified.
    Filled,
    /// Written, but verification never matched — several frameworks apply
    /// values on their next render tick, so this is not a hard failure.
    FilledUnverified,
    Skipped,
    Failed,
    NeedsAi,
    NeedsFile,
}

/// One line of the per-pass report.
#[derive(Debug, Clone, Serialize)]
pub struct FillDetail {
    pub label: String,
    pub identifier: String,
    pub strategy: Option<FillStrategy>,
    pub outcome: FillOutcome,
    pub attempts: u8,
    pub confidence: f32,
    pub message: Option<String>,
}

impl FillDetail {
    pub fn new(field: &MappedField, outcome: FillOutcome) -> Self {
        FillDetail {
            label: field.classified.field.display_name(),
            identifier: field.classified.identifier.as_key().to_string(),
            strategy: Some(field.strategy),
            outcome,
            attempts: 0,
            confidence: field.classified.confidence,
            message: None,
        }
    }

    pub fn with_attempts(mut self, attempts: u8) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn with_message(mut self, message: impl ToString) -> Self {
        self.message = Some(message.to_string());
        self
    }
}
