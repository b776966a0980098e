use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The candidate profile as served by the profile-storage service.
/// Read-only for the engine: the mapper degrades to "no data" when a
/// section is empty and never writes back or fabricates values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateProfile {
    pub personal: PersonalInfo,
    pub address: Address,
    pub eeo: EeoAnswers,
    /// Ordered; earlier entries are the candidate's preferred credentials.
    pub licenses: Vec<License>,
    pub education: Vec<Education>,
    pub work_experience: Vec<WorkExperience>,
    /// Answer overrides keyed by screening-rule key (`work_authorization`,
    /// `felony_conviction`, …).
    pub screening_answers: HashMap<String, String>,
    pub documents: Documents,
    pub references: Vec<Reference>,
    pub certifications: Vec<String>,
    pub preferences: Preferences,
    pub metadata: ProfileMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub linkedin_url: Option<String>,
    pub website_url: Option<String>,
    /// National Provider Identifier, when the candidate has one.
    pub npi_number: Option<String>,
}

impl PersonalInfo {
    pub fn full_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(f), Some(l)) => Some(format!("{} {}", f, l)),
            (Some(f), None) => Some(f.clone()),
            (None, Some(l)) => Some(l.clone()),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

/// Voluntary self-identification answers, stored as the candidate's
/// literal choices so EEO selects can match option text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EeoAnswers {
    pub gender: Option<String>,
    pub race: Option<String>,
    pub hispanic_latino: Option<String>,
    pub veteran_status: Option<String>,
    pub disability_status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct License {
    /// Credential type, e.g. "RN", "APRN", "LPN".
    pub license_type: Option<String>,
    pub state: Option<String>,
    pub number: Option<String>,
    pub expiration_date: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    pub advanced_practice: bool,
    pub compact: bool,
}

impl License {
    /// Advanced-practice credentials outrank base licenses when a form
    /// asks for "your license" without qualification.
    pub fn is_advanced_practice(&self) -> bool {
        if self.advanced_practice {
            return true;
        }
        matches!(
            self.license_type.as_deref().map(str::to_uppercase).as_deref(),
            Some("APRN") | Some("NP") | Some("CRNA") | Some("CNM") | Some("CNS") | Some("PMHNP")
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub school_name: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkExperience {
    pub employer_name: Option<String>,
    pub job_title: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Current employment: end dates are suppressed, never written as
    /// "Present" into a date field.
    pub current: bool,
    pub description: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Documents {
    pub resume_url: Option<String>,
    pub resume_filename: Option<String>,
    pub cover_letter_url: Option<String>,
    pub cover_letter_text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reference {
    pub name: Option<String>,
    pub relationship: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub desired_salary: Option<String>,
    pub available_start_date: Option<String>,
    pub willing_to_relocate: Option<bool>,
    pub years_experience: Option<u32>,
    pub work_authorized: Option<bool>,
    pub requires_sponsorship: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileMetadata {
    pub updated_at: Option<String>,
    pub source: Option<String>,
}

fn default_true() -> bool {
    true
}
