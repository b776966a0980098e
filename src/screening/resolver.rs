use std::collections::HashSet;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::browser::driver::PageDriver;
use crate::classify::classifier;
use crate::classify::classify_model::{ClassifiedField, FieldCategory, FieldIdentifier};
use crate::dom::node::ExtractedPage;
use crate::dom::visit;
use crate::engine::context::PassContext;
use crate::engine::error::EngineError;
use crate::fill::executor;
use crate::fill::fill_model::{FillDetail, FillOutcome, FillStrategy, MapStatus, MappedField};
use crate::profile::profile_model::CandidateProfile;
use crate::scan::scan_model::{ControlKind, ScannedField};
use crate::scan::scanner;
use crate::screening::rules::{matches_any_rule, resolve_screening_answer};
use crate::screening::screening_model::{AnswerInteraction, ScreeningQuestion};

/// Question text length bounds: long enough to be a sentence, short
/// enough to not be a paragraph of boilerplate.
const MIN_QUESTION_LEN: usize = 12;
const MAX_QUESTION_LEN: usize = 240;

/// How far below its text a question's answer control can sit.
const MAX_ANSWER_DISTANCE: f32 = 300.0;

static QUESTION_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(do|are|is|was|have|has|can|could|would|will|what|when|where|which|who|why|how)\b")
        .unwrap()
});

/// Second, independent pass for screening questions that render as
/// free-floating text with no label association. Finds question-shaped
/// blocks, resolves each against the rule table, and writes the answer
/// into the nearest unclaimed control below the question.
pub fn run_screening_pass(
    driver: &mut dyn PageDriver,
    profile: &CandidateProfile,
    ctx: &mut PassContext,
) -> Result<Vec<FillDetail>, EngineError> {
    let page = driver.extract()?;
    let questions = collect_questions(&page);
    let fields = scanner::scan(&page);

    let mut details = Vec::new();
    for question in questions {
        let Some(answer) =
            resolve_screening_answer(&question.text, profile, ctx.settings.screening_defaults)
        else {
            continue;
        };

        let Some(target) = find_answer_target(&question, &fields, &answer.interaction, ctx) else {
            debug!("no unclaimed target for screening question '{}'", question.text);
            continue;
        };

        ctx.claim(target.field.node);
        let mapped = MappedField {
            strategy: target.strategy,
            classified: target.classified(),
            value: Some(answer.answer.clone()),
            status: MapStatus::Ready,
            document: None,
        };

        let mut detail = executor::fill_field(driver, &page, &mapped, ctx);
        detail.label = truncate(&question.text, 80);
        detail.identifier = answer.key.to_string();
        if answer.defaulted && detail.outcome == FillOutcome::Filled {
            detail.message = Some("defaulted answer; flagged for review".to_string());
        }
        details.push(detail);

        std::thread::sleep(std::time::Duration::from_millis(ctx.settings.field_delay_ms));
    }
    Ok(details)
}

// ============================================================================
// Question collection
// ============================================================================

/// Visible, length-bounded, keyword- or question-shaped text blocks,
/// deduplicated by (text fingerprint, vertical bucket).
pub fn collect_questions(page: &ExtractedPage) -> Vec<ScreeningQuestion> {
    let mut seen: HashSet<(String, i32)> = HashSet::new();
    let mut questions = Vec::new();

    visit::visit(&page.dom, &mut |node| {
        if !node.is_visible() {
            return;
        }
        // Labels and options belong to the main pipeline's label
        // resolution; fieldset legends arrive through radio groups.
        if matches!(node.tag.as_str(), "label" | "option" | "legend" | "script" | "style") {
            return;
        }
        let Some(text) = node.trimmed_text() else {
            return;
        };
        if text.len() < MIN_QUESTION_LEN || text.len() > MAX_QUESTION_LEN {
            return;
        }
        if !is_question_shaped(text) {
            return;
        }

        let key = (fingerprint(text), (node.rect.y / 40.0) as i32);
        if !seen.insert(key) {
            return;
        }
        questions.push(ScreeningQuestion {
            node: node.node_id(),
            text: text.to_string(),
            rect: node.rect,
        });
    });

    questions.sort_by(|a, b| a.rect.y.total_cmp(&b.rect.y));
    questions
}

fn is_question_shaped(text: &str) -> bool {
    text.contains('?') || QUESTION_SHAPE.is_match(text) || matches_any_rule(text)
}

/// sha1 over normalized text; cheap identity for dedup.
fn fingerprint(text: &str) -> String {
    use sha1::{Digest, Sha1};
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    let mut hasher = Sha1::new();
    hasher.update(normalized.as_bytes());
    format!("{:x}", hasher.finalize())
}

// ============================================================================
// Answer target location
// ============================================================================

struct AnswerTarget {
    field: ScannedField,
    strategy: FillStrategy,
}

impl AnswerTarget {
    fn classified(&self) -> ClassifiedField {
        ClassifiedField {
            identifier: FieldIdentifier::Unknown,
            category: FieldCategory::Screening,
            confidence: 0.7,
            field: self.field.clone(),
        }
    }
}

/// Nearest suitable control strictly below the question, skipping nodes
/// the main pipeline already owns and fields whose own identifier is a
/// standard personal field.
fn find_answer_target(
    question: &ScreeningQuestion,
    fields: &[ScannedField],
    interaction: &AnswerInteraction,
    ctx: &PassContext,
) -> Option<AnswerTarget> {
    let below = |f: &ScannedField| {
        let dy = f.rect.center_y() - question.rect.center_y();
        dy > 0.0 && dy < MAX_ANSWER_DISTANCE
    };

    let candidates: Vec<&ScannedField> = fields
        .iter()
        .filter(|f| !ctx.is_claimed(f.node))
        .filter(|f| below(f))
        .filter(|f| !owned_by_main_pipeline(f))
        .collect();

    let pick = |pred: &dyn Fn(&ScannedField) -> bool| {
        candidates
            .iter()
            .filter(|f| pred(f))
            .min_by(|a, b| {
                let da = a.rect.center_y() - question.rect.center_y();
                let db = b.rect.center_y() - question.rect.center_y();
                da.total_cmp(&db)
            })
            .copied()
    };

    match interaction {
        AnswerInteraction::YesNo => {
            // A radio group with yes/no options is the canonical shape;
            // fall back to a lone checkbox, then any text input.
            if let Some(field) = pick(&|f| f.control == ControlKind::Radio && has_yes_no(f)) {
                return Some(AnswerTarget {
                    field: field.clone(),
                    strategy: FillStrategy::Radio,
                });
            }
            if let Some(field) = pick(&|f| f.control == ControlKind::Select) {
                return Some(AnswerTarget {
                    field: field.clone(),
                    strategy: FillStrategy::Select,
                });
            }
            if let Some(field) = pick(&|f| f.control == ControlKind::Checkbox) {
                return Some(AnswerTarget {
                    field: field.clone(),
                    strategy: FillStrategy::Checkbox,
                });
            }
            pick(&|f| f.is_free_text()).map(|field| AnswerTarget {
                field: field.clone(),
                strategy: FillStrategy::Text,
            })
        }
        AnswerInteraction::Dropdown => pick(&|f| f.control == ControlKind::Select)
            .or_else(|| pick(&|f| f.is_free_text()))
            .map(|field| AnswerTarget {
                strategy: if field.control == ControlKind::Select {
                    FillStrategy::Select
                } else {
                    FillStrategy::Text
                },
                field: field.clone(),
            }),
        AnswerInteraction::Text => pick(&|f| f.is_free_text())
            .or_else(|| pick(&|f| f.control == ControlKind::Select))
            .map(|field| AnswerTarget {
                strategy: if field.control == ControlKind::Select {
                    FillStrategy::Select
                } else {
                    FillStrategy::Text
                },
                field: field.clone(),
            }),
    }
}

fn has_yes_no(field: &ScannedField) -> bool {
    let mut yes = false;
    let mut no = false;
    for option in &field.options {
        let label = option.label.trim().to_lowercase();
        if label == "yes" || label.starts_with("yes,") {
            yes = true;
        }
        if label == "no" || label.starts_with("no,") {
            no = true;
        }
    }
    yes && no
}

/// Fields the main pipeline owns by identity, regardless of claim state.
fn owned_by_main_pipeline(field: &ScannedField) -> bool {
    let classified = classifier::classify(field);
    if classified.confidence < 0.6 {
        return false;
    }
    matches!(
        classified.category,
        FieldCategory::Personal
            | FieldCategory::Address
            | FieldCategory::Demographics
            | FieldCategory::Documents
    )
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        text.to_string()
    } else {
        let mut cut = max;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}…", &text[..cut])
    }
}
