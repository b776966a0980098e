use strsim::jaro_winkler;

use crate::scan::scan_model::FieldOption;

/// US state abbreviation ↔ name cross-reference, both directions.
pub const US_STATES: &[(&str, &str)] = &[
    ("AL", "Alabama"), ("AK", "Alaska"), ("AZ", "Arizona"), ("AR", "Arkansas"),
    ("CA", "California"), ("CO", "Colorado"), ("CT", "Connecticut"), ("DE", "Delaware"),
    ("DC", "District of Columbia"), ("FL", "Florida"), ("GA", "Georgia"), ("HI", "Hawaii"),
    ("ID", "Idaho"), ("IL", "Illinois"), ("IN", "Indiana"), ("IA", "Iowa"),
    ("KS", "Kansas"), ("KY", "Kentucky"), ("LA", "Louisiana"), ("ME", "Maine"),
    ("MD", "Maryland"), ("MA", "Massachusetts"), ("MI", "Michigan"), ("MN", "Minnesota"),
    ("MS", "Mississippi"), ("MO", "Missouri"), ("MT", "Montana"), ("NE", "Nebraska"),
    ("NV", "Nevada"), ("NH", "New Hampshire"), ("NJ", "New Jersey"), ("NM", "New Mexico"),
    ("NY", "New York"), ("NC", "North Carolina"), ("ND", "North Dakota"), ("OH", "Ohio"),
    ("OK", "Oklahoma"), ("OR", "Oregon"), ("PA", "Pennsylvania"), ("RI", "Rhode Island"),
    ("SC", "South Carolina"), ("SD", "South Dakota"), ("TN", "Tennessee"), ("TX", "Texas"),
    ("UT", "Utah"), ("VT", "Vermont"), ("VA", "Virginia"), ("WA", "Washington"),
    ("WV", "West Virginia"), ("WI", "Wisconsin"), ("WY", "Wyoming"),
];

/// Common degree abbreviation ↔ name pairs seen in education selects.
pub const DEGREES: &[(&str, &str)] = &[
    ("ADN", "Associate Degree in Nursing"),
    ("BSN", "Bachelor of Science in Nursing"),
    ("MSN", "Master of Science in Nursing"),
    ("DNP", "Doctor of Nursing Practice"),
    ("BA", "Bachelor of Arts"),
    ("BS", "Bachelor of Science"),
    ("MA", "Master of Arts"),
    ("MS", "Master of Science"),
    ("MBA", "Master of Business Administration"),
    ("MD", "Doctor of Medicine"),
    ("PhD", "Doctor of Philosophy"),
];

/// Expand a known abbreviation to its full name, or collapse a full name
/// to its abbreviation. Returns None when the text is neither.
pub fn cross_reference(text: &str) -> Option<&'static str> {
    let t = text.trim();
    for (abbr, name) in US_STATES.iter().chain(DEGREES.iter()) {
        if t.eq_ignore_ascii_case(abbr) {
            return Some(name);
        }
        if t.eq_ignore_ascii_case(name) {
            return Some(abbr);
        }
    }
    None
}

/// Match a resolved profile value against a field's rendered options so
/// the executor only ever targets an option known to exist:
/// exact → abbreviation/name cross-reference → substring either
/// direction → fuzzy distance above the similarity floor.
pub fn match_option<'a>(
    value: &str,
    options: &'a [FieldOption],
    fuzzy_floor: f64,
) -> Option<&'a FieldOption> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let candidates: Vec<&FieldOption> = options.iter().filter(|o| !is_placeholder(o)).collect();

    // Exact, against label then value.
    for option in &candidates {
        if option.label.trim().eq_ignore_ascii_case(value)
            || option.value.trim().eq_ignore_ascii_case(value)
        {
            return Some(option);
        }
    }

    // Abbreviation/name cross-reference: "TX" finds "Texas" and back.
    if let Some(expanded) = cross_reference(value) {
        for option in &candidates {
            if option.label.trim().eq_ignore_ascii_case(expanded)
                || option.value.trim().eq_ignore_ascii_case(expanded)
            {
                return Some(option);
            }
        }
    }

    // Substring, either direction, longest option text first so
    // "Registered Nurse (RN)" beats "RN First Assistant".
    let value_lower = value.to_lowercase();
    let mut by_len: Vec<&&FieldOption> = candidates.iter().collect();
    by_len.sort_by_key(|o| std::cmp::Reverse(o.label.len()));
    for option in by_len {
        let label_lower = option.label.trim().to_lowercase();
        if label_lower.is_empty() {
            continue;
        }
        if label_lower.contains(&value_lower) || value_lower.contains(&label_lower) {
            return Some(option);
        }
    }

    // Fuzzy floor: best Jaro-Winkler over the floor wins.
    candidates
        .iter()
        .map(|o| (jaro_winkler(&o.label.trim().to_lowercase(), &value_lower), *o))
        .filter(|(score, _)| *score >= fuzzy_floor)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, o)| o)
}

/// "Select…", "--", "Choose an option" placeholder rows.
fn is_placeholder(option: &FieldOption) -> bool {
    let label = option.label.trim().to_lowercase();
    label.is_empty()
        || label.starts_with("--")
        || label.starts_with("select")
        || label.starts_with("choose")
        || label.starts_with("please select")
        || (option.value.trim().is_empty() && label.len() < 3)
}
