mod common;

use common::{button, container, el, page_at, sample_profile, text_input, text_node};
use formpilot::browser::mock::MockPage;
use formpilot::dom::node::{DomNode, FrameContent};
use formpilot::engine::context::{FillSettings, PassContext};
use formpilot::platform::handler::{active_handler, hostname};
use formpilot::platform::sections::{fill_repeatable_section, SectionKind};
use formpilot::trace::logger::TraceLogger;

fn ctx() -> PassContext {
    PassContext::new(FillSettings::default(), TraceLogger::disabled())
}

// =========================================================================
// Registry: first matching predicate wins, generic as fallback
// =========================================================================

#[test]
fn hostname_parsing() {
    assert_eq!(hostname("https://acme.wd5.myworkdayjobs.com/en-US/jobs"), "acme.wd5.myworkdayjobs.com");
    assert_eq!(hostname("http://jobs.lever.co/acme?x=1"), "jobs.lever.co");
    assert_eq!(hostname("jobs.lever.co/acme"), "jobs.lever.co");
}

#[test]
fn workday_detected_by_hostname() {
    let page = page_at("https://acme.wd5.myworkdayjobs.com/en-US/careers/apply", vec![]);
    assert_eq!(active_handler(&page).name(), "workday");
}

#[test]
fn workday_detected_by_dom_marker_on_vanity_domain() {
    let mut input = text_input(1, "x", 10.0);
    input
        .attributes
        .insert("data-automation-id".to_string(), "firstName".to_string());
    let page = page_at("https://careers.acmehealth.com/apply", vec![input]);
    assert_eq!(
        active_handler(&page).name(),
        "workday",
        "Characteristic DOM marker wins even off the vendor hostname"
    );
}

#[test]
fn lever_greenhouse_ashby_detected_by_hostname() {
    assert_eq!(
        active_handler(&page_at("https://jobs.lever.co/acme/123/apply", vec![])).name(),
        "lever"
    );
    assert_eq!(
        active_handler(&page_at("https://boards.greenhouse.io/acme/jobs/1", vec![])).name(),
        "greenhouse"
    );
    assert_eq!(
        active_handler(&page_at("https://jobs.ashbyhq.com/acme/1", vec![])).name(),
        "ashby"
    );
}

#[test]
fn unknown_page_falls_back_to_generic() {
    let page = page_at("https://careers.smallclinic.example/apply", vec![]);
    assert_eq!(active_handler(&page).name(), "generic");
}

// =========================================================================
// Workday scan: listbox trigger synthesis
// =========================================================================

#[test]
fn workday_scan_includes_listbox_triggers() {
    let mut trigger = el(1, "button", 10.0);
    trigger
        .attributes
        .insert("aria-haspopup".to_string(), "listbox".to_string());
    trigger
        .attributes
        .insert("data-automation-id".to_string(), "stateDropdown".to_string());
    trigger.aria_label = Some("State of Licensure".to_string());

    let page = page_at("https://acme.wd5.myworkdayjobs.com/apply", vec![trigger]);
    let handler = active_handler(&page);
    let fields = handler.scan(&page);

    assert_eq!(fields.len(), 1, "The button substitute is scanned as a field");
    assert!(
        fields[0].options.is_empty(),
        "No rendered options: it must route through the dropdown handler"
    );
}

// =========================================================================
// iCIMS: scan scoped to the content iframe
// =========================================================================

#[test]
fn icims_scan_is_scoped_to_the_content_iframe() {
    let mut frame = el(10, "iframe", 50.0);
    frame.id = Some("icims_content_iframe".to_string());
    frame.frame = Some(FrameContent {
        same_origin: true,
        children: vec![text_input(11, "inside", 60.0)],
    });
    let outer_noise = text_input(1, "site-search", 10.0);

    let page = page_at("https://careers-acme.icims.com/jobs/1/apply", vec![outer_noise, frame]);
    let handler = active_handler(&page);
    assert_eq!(handler.name(), "icims");

    let fields = handler.scan(&page);
    assert_eq!(fields.len(), 1, "Outer chrome inputs are ignored");
    assert_eq!(fields[0].html_id.as_deref(), Some("inside"));
}

// =========================================================================
// Repeatable sections (Scenario D)
// =========================================================================

/// One blank education row: school, degree, field of study inputs.
fn education_row(base: u32, y: f32) -> Vec<DomNode> {
    vec![
        text_input(base, &format!("school-{}", base), y),
        {
            let mut n = text_input(base + 1, &format!("degree-{}", base), y);
            n.rect.x = 240.0;
            n
        },
        {
            let mut n = text_input(base + 2, &format!("fos-{}", base), y);
            n.rect.x = 470.0;
            n
        },
    ]
}

#[test]
fn two_entries_one_blank_block_means_exactly_one_add_click() {
    // "Add another Education": one blank block is already rendered, the
    // profile has two entries, so exactly one expansion click.
    let mut section_children = vec![text_node(2, "Education", 20.0)];
    section_children.extend(education_row(20, 60.0));
    section_children.push(button(3, "Add another Education", 120.0));
    let section = container(1, 10.0, section_children);

    let mut mock = MockPage::new(
        "https://acme.wd5.myworkdayjobs.com/apply",
        "Apply",
        vec![section],
    );
    // Clicking Add appends a second blank row to the section.
    mock.on_click_append(3, 1, education_row(30, 160.0));

    let profile = sample_profile();
    assert_eq!(profile.education.len(), 2, "fixture sanity");

    let mut context = ctx();
    let details =
        fill_repeatable_section(&mut mock, &profile, &mut context, SectionKind::Education, false)
            .expect("section fill");

    assert_eq!(mock.op_count("click #3"), 1, "Exactly one Add click");
    assert!(
        details.iter().filter(|d| d.outcome == formpilot::fill::fill_model::FillOutcome::Filled).count() >= 4,
        "Both blocks got their columns filled"
    );
    assert_eq!(
        mock.value_of(20).as_deref(),
        Some("University of Texas at Austin"),
        "First block takes the first profile entry (array order)"
    );
    assert_eq!(
        mock.value_of(30).as_deref(),
        Some("Texas State University"),
        "Second block takes the second profile entry"
    );
    assert_eq!(
        mock.value_of(21).as_deref(),
        Some("MSN"),
        "Columns assigned positionally left to right"
    );
}

#[test]
fn sections_with_enough_blocks_click_nothing() {
    let mut section_children = vec![text_node(2, "Education", 20.0)];
    section_children.extend(education_row(20, 60.0));
    section_children.extend(education_row(30, 160.0));
    section_children.push(button(3, "Add another Education", 230.0));
    let section = container(1, 10.0, section_children);

    let mut mock = MockPage::new(
        "https://acme.wd5.myworkdayjobs.com/apply",
        "Apply",
        vec![section],
    );

    let mut context = ctx();
    fill_repeatable_section(&mut mock, &sample_profile(), &mut context, SectionKind::Education, false)
        .expect("section fill");

    assert_eq!(mock.op_count("click #3"), 0, "No expansion needed");
}

#[test]
fn empty_profile_section_is_untouched() {
    let mut section_children = vec![text_node(2, "Education", 20.0)];
    section_children.extend(education_row(20, 60.0));
    section_children.push(button(3, "Add another Education", 120.0));
    let section = container(1, 10.0, section_children);

    let mut mock = MockPage::new(
        "https://acme.wd5.myworkdayjobs.com/apply",
        "Apply",
        vec![section],
    );

    let mut context = ctx();
    let details = fill_repeatable_section(
        &mut mock,
        &common::empty_profile(),
        &mut context,
        SectionKind::Education,
        false,
    )
    .expect("section fill");

    assert!(details.is_empty());
    assert_eq!(mock.op_count("click"), 0);
}

#[test]
fn prefilled_entries_are_deleted_before_repopulating() {
    // The platform's resume parser inserted an entry; a delete control
    // sits in the section. With delete_prefilled the engine clears it
    // before adding its own.
    let mut delete_btn = button(4, "", 100.0);
    delete_btn.aria_label = Some("Delete Education 1".to_string());

    let mut section_children = vec![text_node(2, "Education", 20.0)];
    section_children.extend(education_row(20, 60.0));
    section_children.push(delete_btn);
    section_children.push(button(3, "Add another Education", 140.0));
    let section = container(1, 10.0, section_children);

    let mut mock = MockPage::new(
        "https://acme.wd5.myworkdayjobs.com/apply",
        "Apply",
        vec![section],
    );

    let mut context = ctx();
    let _ = fill_repeatable_section(
        &mut mock,
        &sample_profile(),
        &mut context,
        SectionKind::Education,
        true,
    );

    assert!(
        mock.op_count("click #4") >= 1,
        "The platform-inserted entry is deleted before repopulating"
    );
}
