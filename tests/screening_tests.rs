mod common;

use common::{empty_profile, label_for, radio, sample_profile, text_input, text_node};
use formpilot::browser::mock::MockPage;
use formpilot::engine::context::{FillSettings, PassContext};
use formpilot::fill::fill_model::FillOutcome;
use formpilot::screening::resolver::{collect_questions, run_screening_pass};
use formpilot::screening::rules::resolve_screening_answer;
use formpilot::screening::screening_model::AnswerInteraction;
use formpilot::trace::logger::TraceLogger;

fn ctx() -> PassContext {
    PassContext::new(FillSettings::default(), TraceLogger::disabled())
}

// =========================================================================
// Pure rule resolution
// =========================================================================

#[test]
fn work_authorization_resolves_from_typed_preference() {
    let mut profile = sample_profile();
    profile.preferences.work_authorized = Some(true);

    let answer = resolve_screening_answer(
        "Are you legally authorized to work in the United States?",
        &profile,
        true,
    )
    .expect("rule must match");
    assert_eq!(answer.answer, "Yes");
    assert_eq!(answer.interaction, AnswerInteraction::YesNo);
    assert!(!answer.defaulted, "Profile-derived answers are not defaults");
}

#[test]
fn licensure_answers_truthfully_from_profile() {
    let answer = resolve_screening_answer(
        "Do you hold an active nursing license?",
        &sample_profile(),
        true,
    )
    .expect("rule must match");
    assert_eq!(answer.answer, "Yes", "Sample profile has an active license");

    let answer = resolve_screening_answer(
        "Do you hold an active nursing license?",
        &empty_profile(),
        true,
    )
    .expect("rule must match");
    assert_eq!(answer.answer, "No", "No licenses means a truthful No, never a default");
}

#[test]
fn felony_defaults_conservatively_and_is_flagged() {
    let answer = resolve_screening_answer(
        "Have you ever been convicted of a felony?",
        &sample_profile(),
        true,
    )
    .expect("rule must match");
    assert_eq!(answer.answer, "No");
    assert!(answer.defaulted, "Defaults are flagged for review");

    assert!(
        resolve_screening_answer(
            "Have you ever been convicted of a felony?",
            &sample_profile(),
            false,
        )
        .is_none(),
        "With defaults disabled the question stays unanswered"
    );
}

#[test]
fn stored_answer_beats_everything() {
    let mut profile = sample_profile();
    profile
        .screening_answers
        .insert("sponsorship".to_string(), "Yes".to_string());
    let answer = resolve_screening_answer(
        "Will you now or in the future require visa sponsorship?",
        &profile,
        true,
    )
    .expect("rule must match");
    assert_eq!(answer.answer, "Yes");
    assert!(!answer.defaulted);
}

#[test]
fn years_of_experience_resolves_as_text_interaction() {
    let answer = resolve_screening_answer(
        "How many years of clinical experience do you have?",
        &sample_profile(),
        true,
    )
    .expect("rule must match");
    assert_eq!(answer.answer, "8");
    assert_eq!(answer.interaction, AnswerInteraction::Text);
}

#[test]
fn unmatched_text_resolves_to_nothing() {
    assert!(
        resolve_screening_answer("What is your favorite color?", &sample_profile(), true)
            .is_none(),
        "No rule, no answer"
    );
}

// =========================================================================
// Question collection
// =========================================================================

#[test]
fn question_blocks_dedupe_by_text_and_position() {
    let dom = vec![
        text_node(1, "Are you authorized to work in the US?", 100.0),
        // Same text, same vertical bucket: a styling duplicate.
        text_node(2, "Are you authorized to work in the US?", 102.0),
        // Same text, far away: a genuinely repeated question.
        text_node(3, "Are you authorized to work in the US?", 600.0),
    ];
    let questions = collect_questions(&common::page(dom));
    assert_eq!(questions.len(), 2, "Dedup is (text, vertical bucket)");
}

#[test]
fn bounded_lengths_exclude_headlines_and_paragraphs() {
    let long = "a ".repeat(200);
    let dom = vec![
        text_node(1, "Apply now", 10.0),
        text_node(2, &long, 50.0),
        text_node(3, "Do you require sponsorship?", 90.0),
    ];
    let questions = collect_questions(&common::page(dom));
    assert_eq!(questions.len(), 1);
    assert!(questions[0].text.contains("sponsorship"));
}

// =========================================================================
// Full screening pass (Scenario E)
// =========================================================================

#[test]
fn answer_lands_in_nearest_unclaimed_input_below() {
    let dom = vec![
        text_node(1, "Years of clinical experience", 100.0),
        text_input(2, "exp", 140.0),
    ];
    let mut mock = MockPage::new("https://jobs.example.com/a", "Apply", dom);

    let details = run_screening_pass(&mut mock, &sample_profile(), &mut ctx()).unwrap();
    assert_eq!(details.len(), 1, "One question answered");
    assert_eq!(details[0].outcome, FillOutcome::Filled);
    assert_eq!(
        mock.value_of(2).as_deref(),
        Some("8"),
        "Scenario E: '8' typed into the nearest unclaimed input"
    );
}

#[test]
fn yes_no_questions_prefer_radio_groups() {
    let dom = vec![
        text_node(1, "Are you authorized to work in the United States?", 100.0),
        radio(2, "q1", "yes", "Yes", 140.0),
        radio(3, "q1", "no", "No", 170.0),
    ];
    let mut mock = MockPage::new("https://jobs.example.com/a", "Apply", dom);

    let mut profile = sample_profile();
    profile.preferences.work_authorized = Some(true);

    let details = run_screening_pass(&mut mock, &profile, &mut ctx()).unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].outcome, FillOutcome::Filled);
    assert_eq!(mock.checked_of(2), Some(true), "Yes radio clicked");
}

#[test]
fn claimed_inputs_are_never_touched() {
    let dom = vec![
        text_node(1, "Years of clinical experience", 100.0),
        text_input(2, "exp", 140.0),
    ];
    let mut mock = MockPage::new("https://jobs.example.com/a", "Apply", dom);

    let mut context = ctx();
    context.claim(formpilot::dom::node::NodeId(2));

    let details = run_screening_pass(&mut mock, &sample_profile(), &mut context).unwrap();
    assert!(details.is_empty(), "The only candidate was already owned");
    assert_eq!(mock.value_of(2).as_deref(), None, "Claimed input untouched");
}

#[test]
fn personal_fields_below_a_question_are_excluded() {
    // An email input sits below the question; the resolver must not
    // hijack a field the main pipeline owns by identity.
    let dom = vec![
        text_node(1, "Years of clinical experience", 100.0),
        label_for(2, "em", "Email Address", 130.0),
        text_input(3, "em", 160.0),
    ];
    let mut mock = MockPage::new("https://jobs.example.com/a", "Apply", dom);

    let details = run_screening_pass(&mut mock, &sample_profile(), &mut ctx()).unwrap();
    assert!(
        details.is_empty(),
        "Standard personal fields are excluded from screening targets"
    );
    assert_eq!(mock.value_of(3).as_deref(), None);
}

#[test]
fn defaulted_fill_carries_a_review_message() {
    let dom = vec![
        text_node(1, "Have you ever been convicted of a felony?", 100.0),
        radio(2, "fel", "yes", "Yes", 140.0),
        radio(3, "fel", "no", "No", 170.0),
    ];
    let mut mock = MockPage::new("https://jobs.example.com/a", "Apply", dom);

    let details = run_screening_pass(&mut mock, &sample_profile(), &mut ctx()).unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(mock.checked_of(3), Some(true), "Conservative No clicked");
    assert!(
        details[0].message.as_deref().unwrap_or("").contains("review"),
        "Defaulted answers are flagged in the report"
    );
}
