use chrono::Utc;

use crate::classify::classify_model::{ClassifiedField, FieldIdentifier};
use crate::classify::classifier::normalize;
use crate::engine::context::FillSettings;
use crate::fill::fill_model::{DocumentKind, FillStrategy, MapStatus, MappedField};
use crate::profile::dates::{canonical, parse_flexible};
use crate::profile::options::{match_option, US_STATES};
use crate::profile::profile_model::{CandidateProfile, Education, License, WorkExperience};
use crate::scan::scan_model::ControlKind;

/// Confidence reported for a defaulted screening answer, deliberately
/// under the review threshold so every default shows up for review.
const SCREENING_DEFAULT_CONFIDENCE: f32 = 0.4;

/// Resolve one classified field against the profile. Pure per field: all
/// selection state (best license, best education) is recomputed from the
/// profile each call.
pub fn map_field(
    classified: &ClassifiedField,
    profile: &CandidateProfile,
    settings: &FillSettings,
) -> MappedField {
    let strategy = strategy_for(classified);

    // Deferred categories first: these never resolve deterministically.
    match classified.identifier {
        FieldIdentifier::Unknown | FieldIdentifier::OpenEndedQuestion => {
            return build(classified, None, strategy, MapStatus::NeedsAi, None);
        }
        FieldIdentifier::Resume => {
            let status = if profile.documents.resume_url.is_some() {
                MapStatus::NeedsFile
            } else {
                MapStatus::NoData
            };
            return build(classified, None, strategy, status, Some(DocumentKind::Resume));
        }
        FieldIdentifier::CoverLetter => {
            let status = if profile.documents.cover_letter_url.is_some()
                || profile.documents.cover_letter_text.is_some()
            {
                MapStatus::NeedsFile
            } else {
                MapStatus::NoData
            };
            return build(classified, None, strategy, status, Some(DocumentKind::CoverLetter));
        }
        _ => {}
    }

    let mut resolved = resolve_value(classified, profile, settings);

    // Choice fields: re-match against the rendered options now, so the
    // executor only ever targets an option known to exist.
    if matches!(strategy, FillStrategy::Select | FillStrategy::Radio)
        && !classified.field.options.is_empty()
    {
        resolved = match resolved {
            Resolved::Value(value, conf) => {
                match match_option(&value, &classified.field.options, settings.fuzzy_floor) {
                    Some(option) => Resolved::Value(option.label.clone(), conf),
                    None => Resolved::None,
                }
            }
            Resolved::None => Resolved::None,
        };
    }

    match resolved {
        Resolved::None => build(classified, None, strategy, MapStatus::NoData, None),
        Resolved::Value(value, lowered_confidence) => {
            if classified.confidence < settings.review_confidence {
                return build(classified, Some(value), strategy, MapStatus::Ambiguous, None);
            }
            let mut mapped = build(classified, Some(value), strategy, MapStatus::Ready, None);
            if let Some(conf) = lowered_confidence {
                mapped.classified.confidence = mapped.classified.confidence.min(conf);
            }
            mapped
        }
    }
}

pub fn map_all(
    classified: &[ClassifiedField],
    profile: &CandidateProfile,
    settings: &FillSettings,
) -> Vec<MappedField> {
    classified
        .iter()
        .map(|c| map_field(c, profile, settings))
        .collect()
}

// ============================================================================
// Value resolution — the identifier dispatch table
// ============================================================================

enum Resolved {
    /// Resolved value, optionally with a lowered confidence (screening
    /// defaults).
    Value(String, Option<f32>),
    None,
}

fn some(value: impl Into<String>) -> Resolved {
    let v: String = value.into();
    if v.trim().is_empty() {
        Resolved::None
    } else {
        Resolved::Value(v, None)
    }
}

fn opt(value: &Option<String>) -> Resolved {
    match value {
        Some(v) if !v.trim().is_empty() => Resolved::Value(v.clone(), None),
        _ => Resolved::None,
    }
}

fn opt_date(value: &Option<String>) -> Resolved {
    match value.as_deref().and_then(parse_flexible) {
        Some(d) => Resolved::Value(canonical(d), None),
        // Unparseable but present: pass the raw value through.
        None => opt(value),
    }
}

fn resolve_value(
    classified: &ClassifiedField,
    profile: &CandidateProfile,
    settings: &FillSettings,
) -> Resolved {
    use FieldIdentifier::*;

    let p = profile;
    match classified.identifier {
        FirstName => opt(&p.personal.first_name),
        LastName => opt(&p.personal.last_name),
        FullName => p.personal.full_name().map(some).unwrap_or(Resolved::None),
        Email => opt(&p.personal.email),
        Phone => opt(&p.personal.phone),
        DateOfBirth => opt_date(&p.personal.date_of_birth),
        LinkedinUrl => opt(&p.personal.linkedin_url),
        WebsiteUrl => opt(&p.personal.website_url),

        AddressLine1 => opt(&p.address.line1),
        AddressLine2 => opt(&p.address.line2),
        City => opt(&p.address.city),
        State => opt(&p.address.state),
        ZipCode => opt(&p.address.zip_code),
        Country => opt(&p.address.country),

        Gender => opt(&p.eeo.gender),
        Race => opt(&p.eeo.race),
        HispanicLatino => opt(&p.eeo.hispanic_latino),
        VeteranStatus => opt(&p.eeo.veteran_status),
        DisabilityStatus => opt(&p.eeo.disability_status),

        LicenseNumber => license_field(classified, p, |l| opt(&l.number)),
        LicenseState => license_field(classified, p, |l| opt(&l.state)),
        LicenseType => license_field(classified, p, |l| opt(&l.license_type)),
        LicenseExpiration => license_field(classified, p, |l| opt_date(&l.expiration_date)),
        NpiNumber => opt(&p.personal.npi_number),
        Certifications => {
            if p.certifications.is_empty() {
                Resolved::None
            } else {
                some(p.certifications.join(", "))
            }
        }

        SchoolName => education_field(p, |e| opt(&e.school_name)),
        Degree => education_field(p, |e| opt(&e.degree)),
        FieldOfStudy => education_field(p, |e| opt(&e.field_of_study)),
        EducationStartDate => education_field(p, |e| opt_date(&e.start_date)),
        EducationEndDate => education_field(p, |e| opt_date(&e.end_date)),
        Gpa => education_field(p, |e| opt(&e.gpa)),

        EmployerName => work_field(p, |w| opt(&w.employer_name)),
        JobTitle => work_field(p, |w| opt(&w.job_title)),
        WorkStartDate => work_field(p, |w| opt_date(&w.start_date)),
        WorkEndDate => work_field(p, |w| {
            if w.current {
                // Never write "Present" into a date field.
                Resolved::None
            } else {
                opt_date(&w.end_date)
            }
        }),
        WorkDescription => work_field(p, |w| opt(&w.description)),
        YearsExperience => years_experience(p),

        WorkAuthorization => screening(p, settings, "work_authorization", || {
            p.preferences.work_authorized.map(yes_no)
        }, Some("Yes")),
        Sponsorship => screening(p, settings, "sponsorship", || {
            p.preferences.requires_sponsorship.map(yes_no)
        }, Some("No")),
        FelonyConviction => screening(p, settings, "felony_conviction", || None, Some("No")),
        BackgroundCheck => screening(p, settings, "background_check", || None, Some("Yes")),
        DrugScreen => screening(p, settings, "drug_screen", || None, Some("Yes")),
        EducationLevel => education_level(p),

        DesiredSalary => opt(&p.preferences.desired_salary),
        AvailableStartDate => opt_date(&p.preferences.available_start_date),
        Relocation => p
            .preferences
            .willing_to_relocate
            .map(|b| some(yes_no(b)))
            .unwrap_or(Resolved::None),
        ReferralSource => match p.screening_answers.get("referral_source") {
            Some(v) => some(v.clone()),
            None => Resolved::None,
        },

        Resume | CoverLetter | Unknown | OpenEndedQuestion => Resolved::None,
    }
}

fn yes_no(b: bool) -> String {
    if b { "Yes".to_string() } else { "No".to_string() }
}

/// Screening lookup order: explicit stored answer, typed profile field,
/// then the conservative default at reduced confidence (when enabled).
fn screening(
    profile: &CandidateProfile,
    settings: &FillSettings,
    key: &str,
    typed: impl Fn() -> Option<String>,
    default: Option<&str>,
) -> Resolved {
    if let Some(answer) = profile.screening_answers.get(key) {
        return some(answer.clone());
    }
    if let Some(answer) = typed() {
        return some(answer);
    }
    match default {
        Some(d) if settings.screening_defaults => {
            Resolved::Value(d.to_string(), Some(SCREENING_DEFAULT_CONFIDENCE))
        }
        _ => Resolved::None,
    }
}

// ============================================================================
// Collection priority selection
// ============================================================================

/// Pick the license a form field most plausibly refers to: state hint
/// from the label, then type hint, then active, then advanced-practice
/// over base, stable tie-break on profile order.
fn best_license<'a>(classified: &ClassifiedField, profile: &'a [License]) -> Option<&'a License> {
    if profile.is_empty() {
        return None;
    }
    let label = normalize(classified.field.label.as_deref().unwrap_or(""));
    let state_hint = label_state_hint(&label);
    let type_hint = label_type_hint(&label);

    profile
        .iter()
        .enumerate()
        .max_by_key(|(i, l)| {
            let state_match = match (&state_hint, &l.state) {
                (Some(hint), Some(s)) => state_matches(hint, s),
                _ => false,
            };
            let type_match = match (&type_hint, &l.license_type) {
                (Some(hint), Some(t)) => t.eq_ignore_ascii_case(hint),
                _ => false,
            };
            (
                state_match,
                type_match,
                l.active,
                l.is_advanced_practice(),
                std::cmp::Reverse(*i),
            )
        })
        .map(|(_, l)| l)
}

fn license_field(
    classified: &ClassifiedField,
    profile: &CandidateProfile,
    get: impl Fn(&License) -> Resolved,
) -> Resolved {
    match best_license(classified, &profile.licenses) {
        Some(license) => get(license),
        None => Resolved::None,
    }
}

/// First US state mentioned in a normalized label, as its abbreviation.
fn label_state_hint(label: &str) -> Option<String> {
    for (abbr, name) in US_STATES {
        if label.contains(&name.to_lowercase()) {
            return Some((*abbr).to_string());
        }
    }
    // Bare abbreviations only count as whole words ("tx license number").
    label
        .split_whitespace()
        .find_map(|w| US_STATES.iter().find(|(a, _)| a.eq_ignore_ascii_case(w)))
        .map(|(a, _)| (*a).to_string())
}

fn label_type_hint(label: &str) -> Option<String> {
    for t in ["aprn", "pmhnp", "crna", "cnm", "cns", "np", "rn", "lpn", "lvn"] {
        if label.split_whitespace().any(|w| w == t) {
            return Some(t.to_uppercase());
        }
    }
    None
}

fn state_matches(hint: &str, state: &str) -> bool {
    if state.eq_ignore_ascii_case(hint) {
        return true;
    }
    US_STATES
        .iter()
        .any(|(a, n)| a.eq_ignore_ascii_case(hint) && n.eq_ignore_ascii_case(state))
}

/// Education priority: highest degree level, then most recent end date,
/// stable tie-break on profile order.
fn best_education(profile: &[Education]) -> Option<&Education> {
    profile.iter().enumerate().max_by_key(|(i, e)| {
        let level = degree_level(e.degree.as_deref().unwrap_or(""));
        let end = e.end_date.as_deref().and_then(parse_flexible);
        (level, end, std::cmp::Reverse(*i))
    })
    .map(|(_, e)| e)
}

fn education_field(
    profile: &CandidateProfile,
    get: impl Fn(&Education) -> Resolved,
) -> Resolved {
    match best_education(&profile.education) {
        Some(education) => get(education),
        None => Resolved::None,
    }
}

fn degree_level(degree: &str) -> u8 {
    let d = degree.to_lowercase();
    if d.contains("doctor") || d.contains("dnp") || d.contains("phd") || d.contains("md") {
        4
    } else if d.contains("master") || d.contains("msn") || d.contains("mba") {
        3
    } else if d.contains("bachelor") || d.contains("bsn") {
        2
    } else if d.contains("associate") || d.contains("adn") {
        1
    } else {
        0
    }
}

fn education_level(profile: &CandidateProfile) -> Resolved {
    match highest_education_level(profile) {
        Some(level) => some(level),
        None => Resolved::None,
    }
}

/// Highest completed education level, as the strings ATS selects use.
/// Shared with the screening resolver.
pub fn highest_education_level(profile: &CandidateProfile) -> Option<String> {
    let best = profile
        .education
        .iter()
        .map(|e| degree_level(e.degree.as_deref().unwrap_or("")))
        .max()
        .unwrap_or(0);
    match best {
        4 => Some("Doctorate".to_string()),
        3 => Some("Master's Degree".to_string()),
        2 => Some("Bachelor's Degree".to_string()),
        1 => Some("Associate Degree".to_string()),
        _ => None,
    }
}

/// Work priority: current employment first, then latest start date,
/// stable tie-break on profile order.
fn best_work(profile: &[WorkExperience]) -> Option<&WorkExperience> {
    profile.iter().enumerate().max_by_key(|(i, w)| {
        let start = w.start_date.as_deref().and_then(parse_flexible);
        (w.current, start, std::cmp::Reverse(*i))
    })
    .map(|(_, w)| w)
}

fn work_field(
    profile: &CandidateProfile,
    get: impl Fn(&WorkExperience) -> Resolved,
) -> Resolved {
    match best_work(&profile.work_experience) {
        Some(work) => get(work),
        None => Resolved::None,
    }
}

fn years_experience(profile: &CandidateProfile) -> Resolved {
    match years_experience_value(profile) {
        Some(years) => some(years),
        None => Resolved::None,
    }
}

/// Stated years of experience, else derived from the earliest work start
/// date. Shared with the screening resolver.
pub fn years_experience_value(profile: &CandidateProfile) -> Option<String> {
    if let Some(years) = profile.preferences.years_experience {
        return Some(years.to_string());
    }
    let earliest = profile
        .work_experience
        .iter()
        .filter_map(|w| w.start_date.as_deref().and_then(parse_flexible))
        .min()?;
    let days = (Utc::now().date_naive() - earliest).num_days();
    if days <= 0 {
        None
    } else {
        Some((days / 365).to_string())
    }
}

// ============================================================================
// Strategy selection
// ============================================================================

fn strategy_for(classified: &ClassifiedField) -> FillStrategy {
    use FieldIdentifier::*;
    match classified.field.control {
        ControlKind::Select => FillStrategy::Select,
        ControlKind::Radio => FillStrategy::Radio,
        ControlKind::Checkbox => FillStrategy::Checkbox,
        ControlKind::File => FillStrategy::File,
        ControlKind::Date | ControlKind::Month => FillStrategy::Date,
        _ => match classified.identifier {
            DateOfBirth | LicenseExpiration | EducationStartDate | EducationEndDate
            | WorkStartDate | WorkEndDate | AvailableStartDate => FillStrategy::Date,
            Resume | CoverLetter => FillStrategy::File,
            _ => FillStrategy::Text,
        },
    }
}

fn build(
    classified: &ClassifiedField,
    value: Option<String>,
    strategy: FillStrategy,
    status: MapStatus,
    document: Option<DocumentKind>,
) -> MappedField {
    MappedField {
        classified: classified.clone(),
        value,
        strategy,
        status,
        document,
    }
}
