mod common;

use common::{label_for, radio, sample_profile, select, text_input};
use formpilot::browser::driver::PageDriver;
use formpilot::browser::mock::MockPage;
use formpilot::classify::classifier::classify_all;
use formpilot::dom::node::NodeId;
use formpilot::engine::context::FillSettings;
use formpilot::profile::mapper::map_all;
use formpilot::scan::scanner::scan;
use formpilot::snapshot::undo::Snapshot;

fn build_mock() -> MockPage {
    let mut prefilled = text_input(2, "fname", 40.0);
    prefilled.value = Some("Old Value".to_string());

    let mut yes = radio(4, "auth", "yes", "Yes", 110.0);
    yes.checked = Some(true);

    let dom = vec![
        label_for(1, "fname", "First Name", 10.0),
        prefilled,
        select(3, "state", &[("tx", "Texas"), ("ca", "California")], 80.0),
        yes,
        radio(5, "auth", "no", "No", 140.0),
    ];
    MockPage::new("https://jobs.example.com/a", "Apply", dom)
}

fn capture(mock: &mut MockPage) -> Snapshot {
    let extracted = mock.extract().expect("extract");
    let classified = classify_all(&scan(&extracted));
    let mapped = map_all(&classified, &sample_profile(), &FillSettings::default());
    Snapshot::capture(&extracted, &mapped)
}

#[test]
fn snapshot_captures_every_touchable_element() {
    let mut mock = build_mock();
    let snapshot = capture(&mut mock);
    // Text input + select + two physical radios (group node + options).
    assert!(snapshot.len() >= 4, "captured {} entries", snapshot.len());
}

#[test]
fn restore_rolls_back_values_checks_and_selections() {
    let mut mock = build_mock();
    let mut snapshot = capture(&mut mock);

    // Mutate everything the way a fill pass would.
    mock.set_value(NodeId(2), "Sarah").unwrap();
    mock.select_option(NodeId(3), "ca").unwrap();
    mock.click(NodeId(5)).unwrap(); // flips the radio group

    assert_eq!(mock.value_of(2).as_deref(), Some("Sarah"));
    assert_eq!(mock.checked_of(5), Some(true));

    let restored = snapshot.restore(&mut mock).expect("restore");
    assert!(restored >= 4);

    assert_eq!(
        mock.value_of(2).as_deref(),
        Some("Old Value"),
        "Text value rolled back"
    );
    assert_eq!(mock.checked_of(4), Some(true), "Original radio re-checked");
    assert_eq!(mock.checked_of(5), Some(false), "Filled radio released");
}

#[test]
fn snapshot_is_consumed_exactly_once() {
    let mut mock = build_mock();
    let mut snapshot = capture(&mut mock);

    let first = snapshot.restore(&mut mock).expect("first restore");
    assert!(first > 0);

    mock.set_value(NodeId(2), "Changed Again").unwrap();
    let second = snapshot.restore(&mut mock).expect("second restore");
    assert_eq!(second, 0, "A consumed snapshot is a no-op");
    assert_eq!(
        mock.value_of(2).as_deref(),
        Some("Changed Again"),
        "Second restore touched nothing"
    );
}

#[test]
fn vanished_elements_are_skipped_not_fatal() {
    let mut mock = build_mock();
    let mut snapshot = capture(&mut mock);

    // Replace the page wholesale: all node ids die.
    let mut empty = MockPage::new("https://jobs.example.com/b", "Next", vec![]);
    let restored = snapshot.restore(&mut empty).expect("restore still succeeds");
    assert_eq!(restored, 0, "Nothing to restore, no error");
}
