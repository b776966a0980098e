use once_cell::sync::Lazy;
use regex::Regex;

use crate::scan::scan_model::{ControlKind, ScannedField};

/// Curated phrasings that open a free-text prompt.
static OPEN_ENDED_PHRASES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(describe|tell (us|me) about|explain|why (do|are|did|would|should)|what (is|are|do|does|would|interests?|motivates?)|how (do|did|would|have)|in your own words|share (an|your)|give an example|walk us through)\b",
    )
    .unwrap()
});

/// A question indicator: a question mark, or an interrogative opener.
static QUESTION_OPENER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(do|are|is|was|have|has|can|could|would|will|what|when|where|which|who|why|how)\b")
        .unwrap()
});

const LONG_QUESTION_WORDS: usize = 20;
const INPUT_MIN_WORDS: usize = 6;
const INPUT_LONG_LABEL: usize = 80;

/// Is this free-text field asking an open-ended question rather than a
/// structured value? Textareas need a single signal; single-line inputs
/// need a stronger combination, since they usually hold short structured
/// answers even under long labels.
pub fn is_open_ended_question(field: &ScannedField) -> bool {
    let Some(label) = field.label.as_deref() else {
        return false;
    };
    let words = label.split_whitespace().count();
    let has_phrase = OPEN_ENDED_PHRASES.is_match(label);
    let has_indicator = label.contains('?') || QUESTION_OPENER.is_match(label);

    match field.control {
        ControlKind::Textarea | ControlKind::RichText => {
            has_phrase || has_indicator || words > LONG_QUESTION_WORDS
        }
        ControlKind::Text => {
            (has_indicator && words >= INPUT_MIN_WORDS) || label.len() >= INPUT_LONG_LABEL
        }
        _ => false,
    }
}
