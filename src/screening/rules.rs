use once_cell::sync::Lazy;
use regex::Regex;

use crate::profile::dates::{canonical, parse_flexible};
use crate::profile::mapper::{highest_education_level, years_experience_value};
use crate::profile::profile_model::CandidateProfile;
use crate::screening::screening_model::{AnswerInteraction, ScreeningAnswer};

/// One screening rule: a recognizer regex, a profile-derived resolver,
/// and an optional conservative default.
struct Rule {
    key: &'static str,
    pattern: Regex,
    resolve: fn(&CandidateProfile) -> Option<String>,
    interaction: AnswerInteraction,
    default: Option<&'static str>,
}

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule {
            key: "work_authorization",
            pattern: rx(r"(authorized|eligible|legal(ly)? able) to work|work authorization"),
            resolve: |p| p.preferences.work_authorized.map(yes_no),
            interaction: AnswerInteraction::YesNo,
            default: Some("Yes"),
        },
        Rule {
            key: "licensure",
            pattern: rx(r"(hold|have|possess).{0,40}\blicen[sc]e|\blicensed\b|active .{0,20}licen[sc]e"),
            resolve: |p| {
                // Truthful either way: the profile is the source.
                Some(yes_no(p.licenses.iter().any(|l| l.active)))
            },
            interaction: AnswerInteraction::YesNo,
            default: None,
        },
        Rule {
            key: "pediatric_experience",
            pattern: rx(r"pediatric|\bpeds\b|children|adolescent"),
            resolve: |p| {
                let mentions = p.work_experience.iter().any(|w| {
                    [w.description.as_deref(), w.job_title.as_deref()]
                        .into_iter()
                        .flatten()
                        .any(|t| {
                            let t = t.to_lowercase();
                            t.contains("pediatric") || t.contains("peds")
                        })
                });
                Some(yes_no(mentions))
            },
            interaction: AnswerInteraction::YesNo,
            default: None,
        },
        Rule {
            key: "sponsorship",
            pattern: rx(r"sponsorship|\bvisa\b|sponsor you"),
            resolve: |p| p.preferences.requires_sponsorship.map(yes_no),
            interaction: AnswerInteraction::YesNo,
            default: Some("No"),
        },
        Rule {
            key: "felony_conviction",
            pattern: rx(r"felony|convicted|criminal (history|record|conviction)"),
            resolve: |_| None,
            interaction: AnswerInteraction::YesNo,
            default: Some("No"),
        },
        Rule {
            key: "background_check",
            pattern: rx(r"background (check|screening|investigation)"),
            resolve: |_| None,
            interaction: AnswerInteraction::YesNo,
            default: Some("Yes"),
        },
        Rule {
            key: "drug_screen",
            pattern: rx(r"drug (screen|test)"),
            resolve: |_| None,
            interaction: AnswerInteraction::YesNo,
            default: Some("Yes"),
        },
        Rule {
            key: "education_level",
            pattern: rx(r"highest (level of )?education|education level|highest degree"),
            resolve: highest_education_level,
            interaction: AnswerInteraction::Dropdown,
            default: None,
        },
        Rule {
            key: "years_experience",
            pattern: rx(r"years of .{0,30}experience|how many years"),
            resolve: years_experience_value,
            interaction: AnswerInteraction::Text,
            default: None,
        },
        Rule {
            key: "salary",
            pattern: rx(r"salary|compensation|desired (pay|rate)|pay expectation"),
            resolve: |p| p.preferences.desired_salary.clone(),
            interaction: AnswerInteraction::Text,
            default: None,
        },
        Rule {
            key: "availability",
            pattern: rx(r"(available|earliest).{0,20}start|start date|when (can|could) you start"),
            resolve: |p| {
                p.preferences
                    .available_start_date
                    .as_deref()
                    .and_then(parse_flexible)
                    .map(canonical)
            },
            interaction: AnswerInteraction::Text,
            default: None,
        },
    ]
});

fn rx(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){}", pattern)).expect("static screening rule regex")
}

fn yes_no(b: bool) -> String {
    if b { "Yes".to_string() } else { "No".to_string() }
}

/// Pure resolution of one question text against the fixed rule table.
/// Lookup order per rule: stored screening answer, profile-derived value,
/// then the conservative default (when enabled). Returns None when no
/// rule matches or nothing resolves.
pub fn resolve_screening_answer(
    text: &str,
    profile: &CandidateProfile,
    allow_defaults: bool,
) -> Option<ScreeningAnswer> {
    let rule = RULES.iter().find(|r| r.pattern.is_match(text))?;

    if let Some(stored) = profile.screening_answers.get(rule.key) {
        return Some(ScreeningAnswer {
            key: rule.key,
            answer: stored.clone(),
            interaction: rule.interaction,
            defaulted: false,
        });
    }
    if let Some(answer) = (rule.resolve)(profile) {
        return Some(ScreeningAnswer {
            key: rule.key,
            answer,
            interaction: rule.interaction,
            defaulted: false,
        });
    }
    match rule.default {
        Some(default) if allow_defaults => Some(ScreeningAnswer {
            key: rule.key,
            answer: default.to_string(),
            interaction: rule.interaction,
            defaulted: true,
        }),
        _ => None,
    }
}

/// Does any rule recognize this text as a screening question?
pub fn matches_any_rule(text: &str) -> bool {
    RULES.iter().any(|r| r.pattern.is_match(text))
}
