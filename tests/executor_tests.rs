mod common;

use common::{el, label_for, radio, select, text_input};
use formpilot::browser::driver::PageDriver;
use formpilot::browser::mock::{ElementBehavior, MockPage};
use formpilot::classify::classifier::classify_all;
use formpilot::engine::context::{FillSettings, PassContext};
use formpilot::fill::executor::fill_field;
use formpilot::fill::fill_model::{FillOutcome, MapStatus, MappedField};
use formpilot::fill::verify::values_match;
use formpilot::profile::mapper::map_all;
use formpilot::scan::scanner::scan;
use formpilot::trace::logger::TraceLogger;

fn ctx() -> PassContext {
    PassContext::new(FillSettings::default(), TraceLogger::disabled())
}

/// Scan + classify + map one mock page against the sample profile.
fn mapped_fields(mock: &mut MockPage) -> Vec<MappedField> {
    let extracted = mock.extract().expect("mock extract");
    let classified = classify_all(&scan(&extracted));
    map_all(&classified, &common::sample_profile(), &FillSettings::default())
}

// =========================================================================
// Scenario A: text input labelled "First Name" → filled "Sarah", verified
// =========================================================================

#[test]
fn text_fill_first_tier_succeeds_and_verifies() {
    let dom = vec![label_for(1, "fname", "First Name", 10.0), text_input(2, "fname", 40.0)];
    let mut mock = MockPage::new("https://jobs.example.com/a", "Apply", dom);

    let mapped = mapped_fields(&mut mock);
    assert_eq!(mapped.len(), 1);
    assert!(mapped[0].classified.confidence >= 0.9, "Scenario A: confidence >= 0.9");

    let extracted = mock.extract().unwrap();
    let detail = fill_field(&mut mock, &extracted, &mapped[0], &mut ctx());

    assert_eq!(detail.outcome, FillOutcome::Filled, "verified on tier 1");
    assert_eq!(detail.attempts, 1);
    assert_eq!(mock.value_of(2).as_deref(), Some("Sarah"));
}

// =========================================================================
// Tier escalation
// =========================================================================

#[test]
fn rejected_insertion_escalates_to_native_setter() {
    let dom = vec![label_for(1, "fname", "First Name", 10.0), text_input(2, "fname", 40.0)];
    let mut mock = MockPage::new("https://jobs.example.com/a", "Apply", dom);
    mock.set_behavior(
        2,
        ElementBehavior {
            accept_insert_text: false,
            ..ElementBehavior::default()
        },
    );

    let mapped = mapped_fields(&mut mock);
    let extracted = mock.extract().unwrap();
    let detail = fill_field(&mut mock, &extracted, &mapped[0], &mut ctx());

    assert_eq!(detail.outcome, FillOutcome::Filled);
    assert_eq!(detail.attempts, 2, "escalated exactly one tier");
    assert_eq!(mock.value_of(2).as_deref(), Some("Sarah"));
}

#[test]
fn double_rejection_escalates_to_key_simulation() {
    let dom = vec![label_for(1, "fname", "First Name", 10.0), text_input(2, "fname", 40.0)];
    let mut mock = MockPage::new("https://jobs.example.com/a", "Apply", dom);
    mock.set_behavior(
        2,
        ElementBehavior {
            accept_insert_text: false,
            accept_set_value: false,
            ..ElementBehavior::default()
        },
    );

    let mapped = mapped_fields(&mut mock);
    let extracted = mock.extract().unwrap();
    let detail = fill_field(&mut mock, &extracted, &mapped[0], &mut ctx());

    assert_eq!(detail.outcome, FillOutcome::Filled);
    assert_eq!(detail.attempts, 3, "last-resort key simulation");
    assert!(mock.op_count("type_chars") >= 1, "tier 3 typed characters");
}

#[test]
fn exhausted_tiers_degrade_to_filled_unverified() {
    let dom = vec![label_for(1, "fname", "First Name", 10.0), text_input(2, "fname", 40.0)];
    let mut mock = MockPage::new("https://jobs.example.com/a", "Apply", dom);
    mock.set_behavior(
        2,
        ElementBehavior {
            accept_insert_text: false,
            accept_set_value: false,
            accept_type_chars: false,
            ..ElementBehavior::default()
        },
    );

    let mapped = mapped_fields(&mut mock);
    let extracted = mock.extract().unwrap();
    let detail = fill_field(&mut mock, &extracted, &mapped[0], &mut ctx());

    assert_eq!(
        detail.outcome,
        FillOutcome::FilledUnverified,
        "a mismatch after the last tier is uncertainty, not hard failure"
    );
    assert_eq!(detail.attempts, 3, "the retry loop is bounded");
}

// =========================================================================
// Verification comparison
// =========================================================================

#[test]
fn verification_is_case_insensitive_and_trimmed() {
    assert!(values_match("Sarah", "sarah"));
    assert!(values_match(" Texas ", "texas"));
    assert!(!values_match("Sarah", "Sara"));
}

// =========================================================================
// Native select
// =========================================================================

#[test]
fn native_select_picks_matched_option() {
    let dom = vec![
        label_for(1, "st", "State of Licensure", 10.0),
        select(2, "st", &[("", "Select..."), ("tx", "Texas"), ("ca", "California")], 40.0),
    ];
    let mut mock = MockPage::new("https://jobs.example.com/a", "Apply", dom);

    let mapped = mapped_fields(&mut mock);
    assert_eq!(
        mapped[0].value.as_deref(),
        Some("Texas"),
        "Scenario B: abbreviation cross-referenced before the executor runs"
    );

    let extracted = mock.extract().unwrap();
    let detail = fill_field(&mut mock, &extracted, &mapped[0], &mut ctx());
    assert_eq!(detail.outcome, FillOutcome::Filled);
    assert_eq!(mock.value_of(2).as_deref(), Some("tx"), "option value applied natively");
}

// =========================================================================
// Radio / checkbox
// =========================================================================

#[test]
fn radio_fill_clicks_the_physical_element() {
    let dom = vec![
        radio(1, "authorized", "yes", "Yes", 10.0),
        radio(2, "authorized", "no", "No", 40.0),
    ];
    let mut mock = MockPage::new("https://jobs.example.com/a", "Apply", dom);

    let extracted = mock.extract().unwrap();
    let classified = classify_all(&scan(&extracted));
    // "authorized" isn't a label the classifier knows; force a ready map.
    let mapped = MappedField {
        classified: classified[0].clone(),
        value: Some("Yes".to_string()),
        strategy: formpilot::fill::fill_model::FillStrategy::Radio,
        status: MapStatus::Ready,
        document: None,
    };

    let detail = fill_field(&mut mock, &extracted, &mapped, &mut ctx());
    assert_eq!(detail.outcome, FillOutcome::Filled);
    assert_eq!(mock.checked_of(1), Some(true), "the Yes radio is physically clicked");
    assert_eq!(mock.checked_of(2), Some(false), "group siblings are released");
    assert!(mock.op_count("click") >= 1, "host listeners see a real click");
}

#[test]
fn checkbox_fill_is_idempotent_on_desired_state() {
    let mut cb = el(1, "input", 10.0);
    cb.r#type = Some("checkbox".to_string());
    cb.checked = Some(true);
    cb.aria_label = Some("I consent to a background check".to_string());
    let mut mock = MockPage::new("https://jobs.example.com/a", "Apply", vec![cb]);

    let extracted = mock.extract().unwrap();
    let classified = classify_all(&scan(&extracted));
    let mapped = MappedField {
        classified: classified[0].clone(),
        value: Some("Yes".to_string()),
        strategy: formpilot::fill::fill_model::FillStrategy::Checkbox,
        status: MapStatus::Ready,
        document: None,
    };

    let detail = fill_field(&mut mock, &extracted, &mapped, &mut ctx());
    assert_eq!(detail.outcome, FillOutcome::Filled);
    assert_eq!(mock.op_count("click"), 0, "already checked: no click needed");
}

// =========================================================================
// Custom dropdown overlay
// =========================================================================

#[test]
fn zero_option_select_goes_through_the_overlay() {
    // A framework select that renders no options; clicking the trigger
    // reveals an overlay listbox whose option click syncs the value.
    let trigger = select(2, "lic", &[], 40.0);
    let dom = vec![label_for(1, "lic", "State of Licensure", 10.0), trigger];
    let mut mock = MockPage::new("https://jobs.example.com/a", "Apply", dom);

    let mut overlay = el(10, "div", 80.0);
    overlay.role = Some("listbox".to_string());
    let mut opt_tx = el(11, "li", 90.0);
    opt_tx.role = Some("option".to_string());
    opt_tx.text = Some("Texas".to_string());
    let mut opt_ca = el(12, "li", 120.0);
    opt_ca.role = Some("option".to_string());
    opt_ca.text = Some("California".to_string());
    overlay.children = vec![opt_tx, opt_ca];

    mock.on_click_append(2, 2, vec![overlay]);
    mock.on_click_set(11, 2, "Texas");

    let extracted = mock.extract().unwrap();
    let classified = classify_all(&scan(&extracted));
    let mapped = MappedField {
        classified: classified[0].clone(),
        value: Some("Texas".to_string()),
        strategy: formpilot::fill::fill_model::FillStrategy::Select,
        status: MapStatus::Ready,
        document: None,
    };

    let detail = fill_field(&mut mock, &extracted, &mapped, &mut ctx());
    assert_eq!(detail.outcome, FillOutcome::Filled, "open → click → synced");
    assert_eq!(mock.value_of(2).as_deref(), Some("Texas"));
}

// =========================================================================
// Failure isolation
// =========================================================================

#[test]
fn missing_node_fails_the_field_not_the_pass() {
    let dom = vec![label_for(1, "fname", "First Name", 10.0), text_input(2, "fname", 40.0)];
    let mut mock = MockPage::new("https://jobs.example.com/a", "Apply", dom);

    let mapped = mapped_fields(&mut mock);
    let extracted = mock.extract().unwrap();

    // Simulate the element dying between scan and fill.
    let mut stale = mapped[0].clone();
    stale.classified.field.node = formpilot::dom::node::NodeId(999);

    let detail = fill_field(&mut mock, &extracted, &stale, &mut ctx());
    assert_eq!(detail.outcome, FillOutcome::Failed);
    assert!(detail.message.is_some(), "failures carry a message");
}
