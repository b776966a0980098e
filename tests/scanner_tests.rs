mod common;

use common::{container, el, label_for, page, radio, select, text_input, text_node};
use formpilot::dom::node::{DomNode, FrameContent};
use formpilot::scan::scan_model::{ControlKind, LabelSource};
use formpilot::scan::scanner::scan;

// =========================================================================
// Visibility and interactivity filters
// =========================================================================

#[test]
fn skips_hidden_and_zero_size_elements() {
    let mut hidden = text_input(1, "hidden-style", 10.0);
    hidden.hidden = true;

    let mut zero = text_input(2, "zero-size", 40.0);
    zero.rect.width = 0.0;
    zero.rect.height = 0.0;

    let visible = text_input(3, "visible", 70.0);

    let fields = scan(&page(vec![hidden, zero, visible]));
    assert_eq!(fields.len(), 1, "Only the laid-out element is scanned");
    assert_eq!(fields[0].html_id.as_deref(), Some("visible"));
}

#[test]
fn skips_non_interactive_input_types() {
    let mut nodes = Vec::new();
    for (i, t) in ["hidden", "submit", "button", "reset", "image"].iter().enumerate() {
        let mut node = el(i as u32 + 1, "input", 10.0 + 30.0 * i as f32);
        node.r#type = Some(t.to_string());
        nodes.push(node);
    }
    nodes.push(text_input(99, "real", 300.0));

    let fields = scan(&page(nodes));
    assert_eq!(fields.len(), 1, "Chrome input types are not fillable");
}

#[test]
fn skips_disabled_and_readonly() {
    let mut disabled = text_input(1, "disabled", 10.0);
    disabled.disabled = true;
    let mut readonly = text_input(2, "readonly", 40.0);
    readonly.readonly = true;

    let fields = scan(&page(vec![disabled, readonly]));
    assert!(fields.is_empty(), "Disabled/readonly inputs are not fillable");
}

#[test]
fn hidden_file_inputs_are_kept() {
    // File inputs hide behind styled dropzones; they must still be found.
    let mut file = el(1, "input", 10.0);
    file.r#type = Some("file".to_string());
    file.hidden = true;
    file.rect.width = 0.0;

    let fields = scan(&page(vec![file]));
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].control, ControlKind::File);
}

// =========================================================================
// Radio collapse
// =========================================================================

#[test]
fn same_named_radios_collapse_to_one_field() {
    let nodes = vec![
        radio(1, "authorized", "yes", "Yes", 10.0),
        radio(2, "authorized", "no", "No", 40.0),
        radio(3, "authorized", "maybe", "Prefer not to say", 70.0),
    ];

    let fields = scan(&page(nodes));
    assert_eq!(fields.len(), 1, "N same-named radios collapse to exactly one field");
    assert_eq!(fields[0].control, ControlKind::Radio);
    assert_eq!(fields[0].options.len(), 3, "Each physical radio becomes an option");
    assert!(
        fields[0].options.iter().all(|o| o.node.is_some()),
        "Every option keeps its clickable node"
    );
}

#[test]
fn distinct_radio_groups_stay_separate() {
    let nodes = vec![
        radio(1, "authorized", "yes", "Yes", 10.0),
        radio(2, "authorized", "no", "No", 40.0),
        radio(3, "relocate", "yes", "Yes", 100.0),
        radio(4, "relocate", "no", "No", 130.0),
    ];

    let fields = scan(&page(nodes));
    assert_eq!(fields.len(), 2, "Different names are different groups");
}

#[test]
fn checked_radio_sets_group_value() {
    let mut yes = radio(1, "authorized", "yes", "Yes", 10.0);
    yes.checked = Some(true);
    let nodes = vec![yes, radio(2, "authorized", "no", "No", 40.0)];

    let fields = scan(&page(nodes));
    assert_eq!(fields[0].value, "yes");
    assert!(fields[0].checked);
}

// =========================================================================
// Shadow roots and iframes
// =========================================================================

#[test]
fn descends_into_open_shadow_roots() {
    let mut host = el(1, "custom-widget", 10.0);
    host.shadow = vec![text_input(2, "shadowed", 20.0)];

    let fields = scan(&page(vec![host]));
    assert_eq!(fields.len(), 1, "Shadow-root content is scanned");
    assert_eq!(fields[0].html_id.as_deref(), Some("shadowed"));
}

#[test]
fn descends_into_same_origin_iframes() {
    let mut frame = el(1, "iframe", 10.0);
    frame.frame = Some(FrameContent {
        same_origin: true,
        children: vec![text_input(2, "framed", 20.0)],
    });

    let fields = scan(&page(vec![frame]));
    assert_eq!(fields.len(), 1, "Same-origin iframe content is scanned");
}

#[test]
fn cross_origin_iframes_are_silently_skipped() {
    let mut frame = el(1, "iframe", 10.0);
    frame.frame = Some(FrameContent {
        same_origin: false,
        children: Vec::new(),
    });

    let fields = scan(&page(vec![frame, text_input(2, "outside", 60.0)]));
    assert_eq!(fields.len(), 1, "Cross-origin frames contribute nothing, no error");
}

// =========================================================================
// Label resolution priority
// =========================================================================

#[test]
fn explicit_label_association_always_wins() {
    // Proximity text sits right next to the input, but the explicit
    // <label for> association must win regardless.
    let input = text_input(3, "fname", 50.0);
    let dom = vec![
        label_for(1, "fname", "First Name", 10.0),
        container(2, 40.0, vec![text_node(4, "Unrelated nearby text", 45.0), input]),
    ];

    let fields = scan(&page(dom));
    assert_eq!(fields.len(), 1);
    assert_eq!(
        fields[0].label.as_deref(),
        Some("First Name"),
        "Explicit association beats proximity heuristics"
    );
    assert_eq!(fields[0].label_source, Some(LabelSource::ExplicitFor));
}

#[test]
fn wrapping_label_resolves() {
    let mut label = el(1, "label", 10.0);
    label.text = Some("Email Address".to_string());
    label.children = vec![text_input(2, "email", 12.0)];

    let fields = scan(&page(vec![label]));
    assert_eq!(fields[0].label.as_deref(), Some("Email Address"));
    assert_eq!(fields[0].label_source, Some(LabelSource::WrappingLabel));
}

#[test]
fn aria_label_resolves_when_no_label_element() {
    let mut input = text_input(1, "phone", 10.0);
    input.aria_label = Some("Phone Number".to_string());

    let fields = scan(&page(vec![input]));
    assert_eq!(fields[0].label.as_deref(), Some("Phone Number"));
    assert_eq!(fields[0].label_source, Some(LabelSource::AriaLabel));
}

#[test]
fn aria_labelledby_resolves_references() {
    let mut input = text_input(2, "city", 40.0);
    input.aria_labelledby = Some("city-label".to_string());
    let mut label_node = text_node(1, "City", 10.0);
    label_node.id = Some("city-label".to_string());

    let fields = scan(&page(vec![label_node, input]));
    assert_eq!(fields[0].label.as_deref(), Some("City"));
    assert_eq!(fields[0].label_source, Some(LabelSource::AriaLabelledBy));
}

#[test]
fn preceding_sibling_text_is_a_fallback() {
    let dom = vec![container(
        1,
        10.0,
        vec![text_node(2, "Zip Code", 12.0), text_input(3, "zip", 40.0)],
    )];

    let fields = scan(&page(dom));
    assert_eq!(fields[0].label.as_deref(), Some("Zip Code"));
    assert_eq!(fields[0].label_source, Some(LabelSource::PrecedingText));
}

#[test]
fn paragraph_length_sibling_text_is_rejected() {
    let long_text = "a".repeat(200);
    let dom = vec![container(
        1,
        10.0,
        vec![text_node(2, &long_text, 12.0), text_input(3, "q", 40.0)],
    )];

    let fields = scan(&page(dom));
    assert_eq!(fields[0].label, None, "Length bound keeps paragraph text out of labels");
}

// =========================================================================
// Select option extraction
// =========================================================================

#[test]
fn select_options_are_captured() {
    let dom = vec![select(
        1,
        "state",
        &[("", "Select a state"), ("TX", "Texas"), ("CA", "California")],
        10.0,
    )];

    let fields = scan(&page(dom));
    assert_eq!(fields[0].control, ControlKind::Select);
    assert_eq!(fields[0].options.len(), 3);
    assert_eq!(fields[0].options[1].label, "Texas");
}

// =========================================================================
// Rich text
// =========================================================================

#[test]
fn contenteditable_scans_as_rich_text() {
    let mut editor: DomNode = el(1, "div", 10.0);
    editor.content_editable = true;
    editor.aria_label = Some("Cover letter".to_string());

    let fields = scan(&page(vec![editor]));
    assert_eq!(fields[0].control, ControlKind::RichText);
}
