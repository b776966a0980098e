mod common;

use common::{label_for, radio, sample_profile, select, text_input, text_node, textarea};
use formpilot::ai::ai_model::JobContext;
use formpilot::browser::mock::MockPage;
use formpilot::engine::context::{FillSettings, PassContext};
use formpilot::engine::pass::run_fill_pass;
use formpilot::trace::logger::TraceLogger;

fn ctx() -> PassContext {
    PassContext::new(FillSettings::default(), TraceLogger::disabled())
}

fn application_page() -> MockPage {
    let dom = vec![
        label_for(1, "fname", "First Name", 10.0),
        text_input(2, "fname", 40.0),
        label_for(3, "lname", "Last Name", 80.0),
        text_input(4, "lname", 110.0),
        label_for(5, "email", "Email Address", 150.0),
        text_input(6, "email", 180.0),
        label_for(7, "state", "State of Licensure", 220.0),
        select(8, "state", &[("", "Select..."), ("tx", "Texas"), ("ca", "California")], 250.0),
        radio(9, "authorized", "yes", "Yes", 300.0),
        radio(10, "authorized", "no", "No", 330.0),
        label_for(11, "essay", "Describe your clinical approach to medication management", 380.0),
        textarea(12, "essay", 410.0),
        text_node(13, "Years of clinical experience", 470.0),
        text_input(14, "q_14734", 500.0),
    ];
    MockPage::new("https://jobs.example.com/apply/123", "Application", dom)
}

// =========================================================================
// Full pass, no AI client
// =========================================================================

#[test]
fn pass_completes_and_reports_every_field() {
    let mut mock = application_page();
    let mut context = ctx();

    let outcome = run_fill_pass(
        &mut mock,
        &sample_profile(),
        &JobContext::default(),
        None,
        &mut context,
    )
    .expect("the pass always completes");

    let report = &outcome.report;
    assert_eq!(report.platform, "generic");
    assert!(report.all_ok(), "nothing should hard-fail: {:?}", report.details);

    assert_eq!(mock.value_of(2).as_deref(), Some("Sarah"), "first name filled");
    assert_eq!(mock.value_of(4).as_deref(), Some("Chen"), "last name filled");
    assert_eq!(
        mock.value_of(6).as_deref(),
        Some("sarah.chen@example.com"),
        "email filled"
    );
    assert_eq!(
        mock.value_of(8).as_deref(),
        Some("tx"),
        "Scenario B: TX cross-referenced to the Texas option"
    );

    // Scenario C: the open-ended textarea is deferred, never filled.
    assert_eq!(mock.value_of(12).as_deref(), None, "open-ended textarea untouched");
    assert!(report.needs_ai >= 1, "the open-ended question is reported as needs-ai");

    // Scenario E: screening resolver answered the free-floating question.
    assert_eq!(
        mock.value_of(14).as_deref(),
        Some("8"),
        "years of experience answered by the screening pass"
    );

    assert!(report.filled >= 5, "report counts the fills: {:?}", report.details);
}

#[test]
fn snapshot_from_the_pass_can_undo_everything() {
    let mut mock = application_page();
    let mut context = ctx();

    let mut outcome = run_fill_pass(
        &mut mock,
        &sample_profile(),
        &JobContext::default(),
        None,
        &mut context,
    )
    .expect("pass");

    assert_eq!(mock.value_of(2).as_deref(), Some("Sarah"));
    outcome.snapshot.restore(&mut mock).expect("undo");
    assert_eq!(
        mock.value_of(2).as_deref(),
        Some(""),
        "undo returns the field to its pre-fill (empty) value"
    );
}

// =========================================================================
// Screening toggle
// =========================================================================

#[test]
fn screening_pass_can_be_disabled() {
    let mut mock = application_page();
    let mut settings = FillSettings::default();
    settings.run_screening = false;
    let mut context = PassContext::new(settings, TraceLogger::disabled());

    run_fill_pass(
        &mut mock,
        &sample_profile(),
        &JobContext::default(),
        None,
        &mut context,
    )
    .expect("pass");

    assert_eq!(
        mock.value_of(14).as_deref(),
        None,
        "screening targets stay untouched when the pass is off"
    );
}

// =========================================================================
// Cooperative cancellation
// =========================================================================

#[test]
fn cancellation_is_honored_between_fields() {
    let mut mock = application_page();
    let mut context = ctx();

    // Cancel before the pass starts: every field is skipped, the pass
    // still completes with a full report.
    context
        .cancel_handle()
        .store(true, std::sync::atomic::Ordering::Relaxed);

    let outcome = run_fill_pass(
        &mut mock,
        &sample_profile(),
        &JobContext::default(),
        None,
        &mut context,
    )
    .expect("a cancelled pass still returns a report");

    assert!(outcome.report.filled == 0, "no field was mutated after cancel");
    assert!(
        outcome.report.skipped > 0,
        "skips are reported, not silently dropped"
    );
    assert_eq!(mock.value_of(2).as_deref(), None);
}

// =========================================================================
// Empty profile: everything degrades to no-data
// =========================================================================

#[test]
fn empty_profile_never_fabricates() {
    let mut mock = application_page();
    let mut context = ctx();

    let outcome = run_fill_pass(
        &mut mock,
        &common::empty_profile(),
        &JobContext::default(),
        None,
        &mut context,
    )
    .expect("pass");

    assert_eq!(mock.value_of(2).as_deref(), None, "no data, no write");
    assert_eq!(mock.value_of(6).as_deref(), None);
    assert!(outcome.report.filled <= 2, "only screening defaults may fill");
    assert!(outcome.report.skipped >= 4, "no-data fields are reported as skips");
}
