use chrono::{Datelike, NaiveDate};
use formpilot::profile::dates::{canonical, detect_convention, parse_flexible, DateConvention};
use formpilot::profile::options::{cross_reference, match_option};
use formpilot::scan::scan_model::FieldOption;

fn option(value: &str, label: &str) -> FieldOption {
    FieldOption {
        value: value.to_string(),
        label: label.to_string(),
        node: None,
        selected: false,
    }
}

// =========================================================================
// Date parsing
// =========================================================================

#[test]
fn parse_flexible_handles_common_shapes() {
    let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    assert_eq!(parse_flexible("2024-03-05"), Some(expected), "ISO");
    assert_eq!(parse_flexible("03/05/2024"), Some(expected), "US slashes");
    assert_eq!(parse_flexible("March 5, 2024"), Some(expected), "Long form");

    let month = NaiveDate::from_ymd_opt(2021, 5, 1).unwrap();
    assert_eq!(parse_flexible("2021-05"), Some(month), "ISO month precision");
    assert_eq!(parse_flexible("05/2021"), Some(month), "US month precision");
    assert_eq!(parse_flexible("May 2021"), Some(month), "Named month precision");

    assert_eq!(parse_flexible(""), None);
    assert_eq!(parse_flexible("yesterday"), None);
}

// =========================================================================
// Convention detection
// =========================================================================

#[test]
fn detect_convention_from_placeholder_hints() {
    assert_eq!(detect_convention("MM/DD/YYYY"), Some(DateConvention::MonthDayYear));
    assert_eq!(detect_convention("dd/mm/yyyy"), Some(DateConvention::DayMonthYear));
    assert_eq!(detect_convention("YYYY-MM-DD"), Some(DateConvention::Iso));
    assert_eq!(detect_convention("MM/YYYY"), Some(DateConvention::MonthYear));
    assert_eq!(detect_convention("First name"), None, "Non-date hints detect nothing");
}

// =========================================================================
// Round-trip property: canonical date → target format → back
// =========================================================================

#[test]
fn day_precision_conventions_round_trip_exactly() {
    let date = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
    for convention in [
        DateConvention::MonthDayYear,
        DateConvention::DayMonthYear,
        DateConvention::Iso,
    ] {
        let rendered = convention.format(date);
        let back = convention.parse(&rendered);
        assert_eq!(
            back,
            Some(date),
            "{:?} must reproduce the same calendar date (rendered '{}')",
            convention,
            rendered
        );
    }
}

#[test]
fn month_precision_conventions_round_trip_to_month() {
    let date = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
    for convention in [DateConvention::MonthYear, DateConvention::IsoMonth] {
        let rendered = convention.format(date);
        let back = convention.parse(&rendered).expect("must parse its own output");
        assert_eq!((back.year(), back.month()), (2025, 11), "{:?}", convention);
    }
}

#[test]
fn canonical_is_month_day_year() {
    let date = NaiveDate::from_ymd_opt(2027, 4, 30).unwrap();
    assert_eq!(canonical(date), "04/30/2027");
}

// =========================================================================
// Option matching ladder
// =========================================================================

#[test]
fn exact_match_wins_case_insensitively() {
    let options = vec![option("tx", "Texas"), option("ca", "California")];
    let hit = match_option("texas", &options, 0.84).expect("exact hit");
    assert_eq!(hit.label, "Texas");
}

#[test]
fn abbreviation_cross_reference_both_directions() {
    assert_eq!(cross_reference("TX"), Some("Texas"));
    assert_eq!(cross_reference("texas"), Some("TX"));
    assert_eq!(cross_reference("BSN"), Some("Bachelor of Science in Nursing"));
    assert_eq!(cross_reference("frobnicate"), None);

    let options = vec![option("1", "Texas"), option("2", "California")];
    let hit = match_option("TX", &options, 0.84).expect("abbreviation expands to the option");
    assert_eq!(hit.label, "Texas");

    let options = vec![option("1", "TX"), option("2", "CA")];
    let hit = match_option("Texas", &options, 0.84).expect("full name collapses to the option");
    assert_eq!(hit.label, "TX");
}

#[test]
fn substring_matches_either_direction() {
    let options = vec![option("1", "Registered Nurse (RN)"), option("2", "Physician")];
    let hit = match_option("Registered Nurse", &options, 0.84).expect("value within label");
    assert_eq!(hit.value, "1");

    let options = vec![option("1", "Nurse"), option("2", "Physician")];
    let hit = match_option("Nurse Practitioner", &options, 0.84).expect("label within value");
    assert_eq!(hit.value, "1");
}

#[test]
fn fuzzy_match_respects_similarity_floor() {
    let options = vec![option("1", "Pennsylvania")];
    assert!(
        match_option("Pennsylvannia", &options, 0.84).is_some(),
        "A near-typo clears the floor"
    );
    assert!(
        match_option("Ohio", &options, 0.84).is_none(),
        "Dissimilar text stays unmatched"
    );
}

#[test]
fn placeholder_options_are_never_matched() {
    let options = vec![
        option("", "Select a state..."),
        option("", "-- choose --"),
        option("tx", "Texas"),
    ];
    let hit = match_option("Select", &options, 0.84);
    assert!(
        hit.is_none() || hit.unwrap().label == "Texas",
        "Placeholder rows are filtered before matching"
    );
}
