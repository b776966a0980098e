use crate::classify::classify_model::{ClassifiedField, FieldIdentifier};
use crate::classify::open_ended::is_open_ended_question;
use crate::classify::patterns::{autocomplete_identifier, PATTERNS};
use crate::scan::scan_model::ScannedField;

/// Confidence assigned to an `autocomplete`-attribute match.
const AUTOCOMPLETE_CONFIDENCE: f32 = 0.9;

/// Attribute-sourced matches score this much below label-sourced ones.
const ATTRIBUTE_PENALTY: f32 = 0.1;

/// A deterministic assignment at or above this is never overridden by the
/// open-ended pass.
const OPEN_ENDED_OVERRIDE_CEILING: f32 = 0.95;

/// Assign a semantic identifier to one scanned field. Pure: same input,
/// same output, regardless of what was classified before or after it.
pub fn classify(field: &ScannedField) -> ClassifiedField {
    let (identifier, confidence) = classify_inner(field);

    // Open-ended detection runs as its own pass over free-text controls
    // and wins unless the deterministic match was essentially exact.
    if field.is_free_text()
        && confidence < OPEN_ENDED_OVERRIDE_CEILING
        && is_open_ended_question(field)
    {
        let identifier = FieldIdentifier::OpenEndedQuestion;
        return ClassifiedField {
            field: field.clone(),
            identifier,
            category: identifier.category(),
            confidence: confidence.max(0.75),
        };
    }

    ClassifiedField {
        field: field.clone(),
        identifier,
        category: identifier.category(),
        confidence,
    }
}

pub fn classify_all(fields: &[ScannedField]) -> Vec<ClassifiedField> {
    fields.iter().map(classify).collect()
}

fn classify_inner(field: &ScannedField) -> (FieldIdentifier, f32) {
    // The autocomplete attribute, when present and mapped, is the site
    // author's own declaration — authoritative.
    if let Some(token) = field.autocomplete.as_deref() {
        if let Some(identifier) = autocomplete_identifier(token) {
            return (identifier, AUTOCOMPLETE_CONFIDENCE);
        }
    }

    let label_best = field
        .label
        .as_deref()
        .map(|label| best_match(&normalize(label)))
        .unwrap_or((FieldIdentifier::Unknown, 0.0));

    let attr_best = attribute_text(field)
        .iter()
        .map(|text| best_match(&normalize(text)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(ident, score)| (ident, (score - ATTRIBUTE_PENALTY).max(0.0)))
        .unwrap_or((FieldIdentifier::Unknown, 0.0));

    // Label-sourced wins ties.
    if attr_best.1 > label_best.1 {
        attr_best
    } else {
        label_best
    }
}

// ============================================================================
// Scoring
// ============================================================================

/// Best (identifier, score) over the whole pattern table for one
/// normalized text. Three match kinds:
///   exact                 → 1.0
///   pattern within text   → 0.6..=0.95 scaled by pattern/text length
///   text within pattern   → 0.6..=0.95 scaled the other way (short inputs
///                           like "zip" against pattern "zip code")
fn best_match(text: &str) -> (FieldIdentifier, f32) {
    if text.is_empty() {
        return (FieldIdentifier::Unknown, 0.0);
    }

    let mut best = (FieldIdentifier::Unknown, 0.0f32);
    for (identifier, patterns) in PATTERNS {
        for pattern in *patterns {
            let score = match_score(text, pattern);
            if score > best.1 {
                best = (*identifier, score);
            }
        }
    }
    best
}

fn match_score(text: &str, pattern: &str) -> f32 {
    if text == pattern {
        return 1.0;
    }
    if contains_word(text, pattern) {
        return scaled(pattern.len(), text.len());
    }
    if text.len() >= 3 && contains_word(pattern, text) {
        return scaled(text.len(), pattern.len());
    }
    0.0
}

/// Substring scaled by length ratio into [0.6, 0.95]: the more of the text
/// the pattern explains, the closer to exact.
fn scaled(matched_len: usize, total_len: usize) -> f32 {
    let ratio = matched_len as f32 / total_len.max(1) as f32;
    0.6 + 0.35 * ratio.clamp(0.0, 1.0)
}

/// Substring match on word boundaries, so "state" does not fire inside
/// "estate planning".
fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack
        .match_indices(needle)
        .any(|(at, _)| {
            let before_ok = at == 0 || haystack.as_bytes()[at - 1] == b' ';
            let end = at + needle.len();
            let after_ok = end == haystack.len() || haystack.as_bytes()[end] == b' ';
            before_ok && after_ok
        })
}

/// Lowercase, collapse every non-alphanumeric run to one space.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_space = true;
    for c in text.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
            last_space = false;
        } else if !last_space {
            out.push(' ');
            last_space = true;
        }
    }
    out.trim_end().to_string()
}

/// Attribute texts in classification priority order.
fn attribute_text(field: &ScannedField) -> Vec<String> {
    let mut texts = Vec::new();
    if let Some(placeholder) = &field.placeholder {
        texts.push(placeholder.clone());
    }
    if let Some(name) = &field.name {
        texts.push(name.clone());
    }
    if let Some(id) = &field.html_id {
        texts.push(id.clone());
    }
    for key in ["data-automation-id", "data-qa", "data-field"] {
        if let Some(v) = field.attrs.get(key) {
            texts.push(v.clone());
        }
    }
    texts
}
