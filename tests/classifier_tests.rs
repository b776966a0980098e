mod common;

use common::{label_for, page, text_input, textarea};
use formpilot::classify::classifier::{classify, classify_all, normalize};
use formpilot::classify::classify_model::{FieldCategory, FieldIdentifier};
use formpilot::scan::scanner::scan;

fn scan_one(dom: Vec<formpilot::dom::node::DomNode>) -> formpilot::scan::scan_model::ScannedField {
    let mut fields = scan(&page(dom));
    assert_eq!(fields.len(), 1, "fixture should scan to one field");
    fields.remove(0)
}

// =========================================================================
// Match kinds and confidence
// =========================================================================

#[test]
fn exact_label_match_scores_full_confidence() {
    let field = scan_one(vec![
        label_for(1, "fn", "First Name", 10.0),
        text_input(2, "fn", 40.0),
    ]);
    let classified = classify(&field);

    assert_eq!(classified.identifier, FieldIdentifier::FirstName);
    assert_eq!(classified.category, FieldCategory::Personal);
    assert!(
        (classified.confidence - 1.0).abs() < f32::EPSILON,
        "Exact label match is 1.0, got {}",
        classified.confidence
    );
}

#[test]
fn substring_match_scales_between_06_and_095() {
    let field = scan_one(vec![
        label_for(1, "fn", "Please enter your first name here", 10.0),
        text_input(2, "fn", 40.0),
    ]);
    let classified = classify(&field);

    assert_eq!(classified.identifier, FieldIdentifier::FirstName);
    assert!(
        classified.confidence >= 0.6 && classified.confidence <= 0.95,
        "Substring match scales by length ratio, got {}",
        classified.confidence
    );
    assert!(
        classified.confidence < 1.0,
        "Substring match never reaches exact confidence"
    );
}

#[test]
fn reverse_substring_matches_short_field_text() {
    // Field text "zip" is shorter than the pattern "zip code".
    let field = scan_one(vec![
        label_for(1, "z", "Zip", 10.0),
        text_input(2, "z", 40.0),
    ]);
    let classified = classify(&field);
    assert_eq!(classified.identifier, FieldIdentifier::ZipCode);
    assert!(classified.confidence >= 0.6);
}

#[test]
fn attribute_match_is_penalized_vs_label_match() {
    // Same signal from a label vs from a name attribute.
    let labeled = scan_one(vec![
        label_for(1, "a", "Email Address", 10.0),
        text_input(2, "a", 40.0),
    ]);
    let mut attr_input = text_input(1, "b", 10.0);
    attr_input.name = Some("email address".to_string());
    let attributed = scan_one(vec![attr_input]);

    let labeled = classify(&labeled);
    let attributed = classify(&attributed);
    assert_eq!(labeled.identifier, FieldIdentifier::Email);
    assert_eq!(attributed.identifier, FieldIdentifier::Email);
    assert!(
        attributed.confidence < labeled.confidence,
        "Attribute-sourced match ({}) must score below label-sourced ({})",
        attributed.confidence,
        labeled.confidence
    );
}

#[test]
fn autocomplete_attribute_is_authoritative() {
    let mut input = text_input(1, "weird-id", 10.0);
    input.autocomplete = Some("given-name".to_string());
    // A misleading label that would otherwise classify differently.
    let field = scan_one(vec![
        label_for(2, "weird-id", "Company", 40.0),
        input,
    ]);

    let classified = classify(&field);
    assert_eq!(
        classified.identifier,
        FieldIdentifier::FirstName,
        "autocomplete mapping overrides the label"
    );
    assert!((classified.confidence - 0.9).abs() < 1e-6, "Fixed 0.9 for autocomplete");
}

#[test]
fn unmatched_field_stays_unknown() {
    let field = scan_one(vec![
        label_for(1, "x", "Frobnication quotient", 10.0),
        text_input(2, "x", 40.0),
    ]);
    let classified = classify(&field);
    assert_eq!(classified.identifier, FieldIdentifier::Unknown);
    assert_eq!(classified.confidence, 0.0);
}

// =========================================================================
// Purity: idempotent, order-independent
// =========================================================================

#[test]
fn classify_is_idempotent_and_order_independent() {
    let dom = vec![
        label_for(1, "a", "First Name", 10.0),
        text_input(2, "a", 30.0),
        label_for(3, "b", "Last Name", 60.0),
        text_input(4, "b", 80.0),
        label_for(5, "c", "Email", 110.0),
        text_input(6, "c", 130.0),
    ];
    let fields = scan(&page(dom));

    let forward = classify_all(&fields);
    let mut reversed_input = fields.clone();
    reversed_input.reverse();
    let mut reversed = classify_all(&reversed_input);
    reversed.reverse();

    for (a, b) in forward.iter().zip(reversed.iter()) {
        assert_eq!(a.identifier, b.identifier, "Order must not change assignments");
        assert_eq!(a.confidence, b.confidence, "Order must not change confidence");
    }

    let again = classify_all(&fields);
    for (a, b) in forward.iter().zip(again.iter()) {
        assert_eq!(a.identifier, b.identifier, "Repeat runs are identical");
        assert_eq!(a.confidence, b.confidence);
    }
}

// =========================================================================
// Open-ended question detection
// =========================================================================

#[test]
fn textarea_with_open_ended_phrasing_is_flagged() {
    // Scenario C phrasing.
    let field = scan_one(vec![
        label_for(1, "q", "Describe your clinical approach to medication management", 10.0),
        textarea(2, "q", 40.0),
    ]);
    let classified = classify(&field);
    assert_eq!(
        classified.identifier,
        FieldIdentifier::OpenEndedQuestion,
        "Curated phrasing flags a textarea"
    );
}

#[test]
fn textarea_needs_only_one_signal() {
    let field = scan_one(vec![
        label_for(1, "q", "Why nursing?", 10.0),
        textarea(2, "q", 40.0),
    ]);
    assert_eq!(classify(&field).identifier, FieldIdentifier::OpenEndedQuestion);
}

#[test]
fn single_line_input_needs_a_stronger_combination() {
    // Question indicator but fewer than 6 words: not open-ended.
    let short = scan_one(vec![
        label_for(1, "q", "Why us?", 10.0),
        text_input(2, "q", 40.0),
    ]);
    assert_ne!(
        classify(&short).identifier,
        FieldIdentifier::OpenEndedQuestion,
        "Short question on a single-line input stays structured"
    );

    // Question indicator plus >= 6 words: open-ended.
    let long = scan_one(vec![
        label_for(1, "q", "What would make you a great fit for this role", 10.0),
        text_input(2, "q", 40.0),
    ]);
    assert_eq!(classify(&long).identifier, FieldIdentifier::OpenEndedQuestion);
}

#[test]
fn structured_textarea_is_not_flagged() {
    let field = scan_one(vec![
        label_for(1, "q", "Street Address", 10.0),
        textarea(2, "q", 40.0),
    ]);
    assert_eq!(
        classify(&field).identifier,
        FieldIdentifier::AddressLine1,
        "Structured labels keep their identifier even on textareas"
    );
}

#[test]
fn very_long_label_flags_textarea() {
    let label: String = std::iter::repeat("word").take(25).collect::<Vec<_>>().join(" ");
    let field = scan_one(vec![
        label_for(1, "q", &label, 10.0),
        textarea(2, "q", 40.0),
    ]);
    assert_eq!(classify(&field).identifier, FieldIdentifier::OpenEndedQuestion);
}

// =========================================================================
// Normalization
// =========================================================================

#[test]
fn normalize_collapses_punctuation_and_case() {
    assert_eq!(normalize("First-Name*"), "first name");
    assert_eq!(normalize("  Email   Address "), "email address");
    assert_eq!(normalize("ZIP/Postal Code"), "zip postal code");
}
