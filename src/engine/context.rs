use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::dom::node::NodeId;
use crate::trace::logger::TraceLogger;

/// Default knobs; every one of these is config-overridable.
pub const DEFAULT_FIELD_DELAY_MS: u64 = 150;
pub const DEFAULT_STEP_DELAY_MS: u64 = 60;
pub const MAX_FILL_ATTEMPTS: u8 = 3;
pub const REVIEW_CONFIDENCE: f32 = 0.55;
pub const AI_CONFIDENCE_FLOOR: f32 = 0.2;
pub const FUZZY_OPTION_FLOOR: f64 = 0.84;

/// Tunables for one pass.
#[derive(Debug, Clone)]
pub struct FillSettings {
    /// Gap between fields: target frameworks need real time between a
    /// mutation and their re-render.
    pub field_delay_ms: u64,
    /// Gap between focus / clear / type / verify steps on one field.
    pub step_delay_ms: u64,
    /// Tier escalation bound; the retry loop is never open-ended.
    pub max_attempts: u8,
    pub review_confidence: f32,
    pub ai_floor: f32,
    pub fuzzy_floor: f64,
    /// Default unanswered screening questions to a conservative value at
    /// reduced confidence instead of leaving them unmapped.
    pub screening_defaults: bool,
    pub use_ai: bool,
    pub run_screening: bool,
}

impl Default for FillSettings {
    fn default() -> Self {
        FillSettings {
            field_delay_ms: DEFAULT_FIELD_DELAY_MS,
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
            max_attempts: MAX_FILL_ATTEMPTS,
            review_confidence: REVIEW_CONFIDENCE,
            ai_floor: AI_CONFIDENCE_FLOOR,
            fuzzy_floor: FUZZY_OPTION_FLOOR,
            screening_defaults: true,
            use_ai: true,
            run_screening: true,
        }
    }
}

/// Per-pass state. Everything that used to be tempting as a module-level
/// cache lives here instead, so nothing leaks between pages or passes.
pub struct PassContext {
    pub settings: FillSettings,
    /// Nodes the main pipeline owns; the screening resolver must not
    /// write into these.
    pub claimed: HashSet<NodeId>,
    /// Repeatable-section instances added this pass, by section key.
    pub section_counts: HashMap<String, usize>,
    pub tracer: TraceLogger,
    step: u64,
    cancel: Arc<AtomicBool>,
}

impl PassContext {
    pub fn new(settings: FillSettings, tracer: TraceLogger) -> Self {
        PassContext {
            settings,
            claimed: HashSet::new(),
            section_counts: HashMap::new(),
            tracer,
            step: 0,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn next_step(&mut self) -> u64 {
        self.step += 1;
        self.step
    }

    /// Handle callers can use to abort between fields. Cancellation is
    /// cooperative only — never mid-mutation.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn cancel_requested(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    pub fn claim(&mut self, node: NodeId) {
        self.claimed.insert(node);
    }

    pub fn is_claimed(&self, node: NodeId) -> bool {
        self.claimed.contains(&node)
    }
}
