use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// One JSONL trace line. Built incrementally as a phase progresses.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub step: u64,

    pub phase: String,

    pub field: Option<String>,
    pub identifier: Option<String>,
    pub strategy: Option<String>,
    pub attempt: Option<u8>,
    pub outcome: Option<String>,

    pub confidence: Option<f32>,
    pub suppression_reason: Option<String>,
}

impl TraceEvent {
    pub fn now(step: u64, phase: impl ToString) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            step,
            phase: phase.to_string(),
            field: None,
            identifier: None,
            strategy: None,
            attempt: None,
            outcome: None,
            confidence: None,
            suppression_reason: None,
        }
    }

    pub fn with_field(mut self, field: impl ToString) -> Self {
        self.field = Some(field.to_string());
        self
    }

    pub fn with_identifier(mut self, identifier: impl ToString) -> Self {
        self.identifier = Some(identifier.to_string());
        self
    }

    pub fn with_strategy(mut self, strategy: impl ToString) -> Self {
        self.strategy = Some(strategy.to_string());
        self
    }

    pub fn with_attempt(mut self, attempt: u8) -> Self {
        self.attempt = Some(attempt);
        self
    }

    pub fn with_outcome(mut self, outcome: impl ToString) -> Self {
        self.outcome = Some(outcome.to_string());
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_suppression(mut self, reason: impl ToString) -> Self {
        self.suppression_reason = Some(reason.to_string());
        self
    }
}
