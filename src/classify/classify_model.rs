use serde::Serialize;

use crate::scan::scan_model::ScannedField;

/// Closed identifier vocabulary the deterministic pipeline can assign.
/// Everything else stays `Unknown` and is surfaced to the AI fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldIdentifier {
    // Personal
    FirstName,
    LastName,
    FullName,
    Email,
    Phone,
    DateOfBirth,
    LinkedinUrl,
    WebsiteUrl,
    // Address
    AddressLine1,
    AddressLine2,
    City,
    State,
    ZipCode,
    Country,
    // Demographics (EEO)
    Gender,
    Race,
    HispanicLatino,
    VeteranStatus,
    DisabilityStatus,
    // Licensure
    LicenseNumber,
    LicenseState,
    LicenseType,
    LicenseExpiration,
    NpiNumber,
    Certifications,
    // Education
    SchoolName,
    Degree,
    FieldOfStudy,
    EducationStartDate,
    EducationEndDate,
    Gpa,
    // Work history
    EmployerName,
    JobTitle,
    WorkStartDate,
    WorkEndDate,
    WorkDescription,
    YearsExperience,
    // Screening
    WorkAuthorization,
    Sponsorship,
    FelonyConviction,
    BackgroundCheck,
    DrugScreen,
    EducationLevel,
    // Preferences
    DesiredSalary,
    AvailableStartDate,
    Relocation,
    ReferralSource,
    // Documents
    Resume,
    CoverLetter,
    // Escape hatches
    Unknown,
    OpenEndedQuestion,
}

/// Semantic grouping, used for reporting and for the screening resolver's
/// "already owned by the main pipeline" exclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldCategory {
    Personal,
    Address,
    Demographics,
    Licensure,
    Education,
    WorkHistory,
    Screening,
    Preferences,
    Documents,
    Unknown,
}

impl FieldIdentifier {
    pub fn category(self) -> FieldCategory {
        use FieldIdentifier::*;
        match self {
            FirstName | LastName | FullName | Email | Phone | DateOfBirth | LinkedinUrl
            | WebsiteUrl => FieldCategory::Personal,
            AddressLine1 | AddressLine2 | City | State | ZipCode | Country => {
                FieldCategory::Address
            }
            Gender | Race | HispanicLatino | VeteranStatus | DisabilityStatus => {
                FieldCategory::Demographics
            }
            LicenseNumber | LicenseState | LicenseType | LicenseExpiration | NpiNumber
            | Certifications => FieldCategory::Licensure,
            SchoolName | Degree | FieldOfStudy | EducationStartDate | EducationEndDate | Gpa => {
                FieldCategory::Education
            }
            EmployerName | JobTitle | WorkStartDate | WorkEndDate | WorkDescription
            | YearsExperience => FieldCategory::WorkHistory,
            WorkAuthorization | Sponsorship | FelonyConviction | BackgroundCheck | DrugScreen
            | EducationLevel | OpenEndedQuestion => FieldCategory::Screening,
            DesiredSalary | AvailableStartDate | Relocation | ReferralSource => {
                FieldCategory::Preferences
            }
            Resume | CoverLetter => FieldCategory::Documents,
            Unknown => FieldCategory::Unknown,
        }
    }

    /// Wire key used by the AI collaborators and the JSON report.
    pub fn as_key(self) -> &'static str {
        use FieldIdentifier::*;
        match self {
            FirstName => "first_name",
            LastName => "last_name",
            FullName => "full_name",
            Email => "email",
            Phone => "phone",
            DateOfBirth => "date_of_birth",
            LinkedinUrl => "linkedin_url",
            WebsiteUrl => "website_url",
            AddressLine1 => "address_line1",
            AddressLine2 => "address_line2",
            City => "city",
            State => "state",
            ZipCode => "zip_code",
            Country => "country",
            Gender => "gender",
            Race => "race",
            HispanicLatino => "hispanic_latino",
            VeteranStatus => "veteran_status",
            DisabilityStatus => "disability_status",
            LicenseNumber => "license_number",
            LicenseState => "license_state",
            LicenseType => "license_type",
            LicenseExpiration => "license_expiration",
            NpiNumber => "npi_number",
            Certifications => "certifications",
            SchoolName => "school_name",
            Degree => "degree",
            FieldOfStudy => "field_of_study",
            EducationStartDate => "education_start_date",
            EducationEndDate => "education_end_date",
            Gpa => "gpa",
            EmployerName => "employer_name",
            JobTitle => "job_title",
            WorkStartDate => "work_start_date",
            WorkEndDate => "work_end_date",
            WorkDescription => "work_description",
            YearsExperience => "years_experience",
            WorkAuthorization => "work_authorization",
            Sponsorship => "sponsorship",
            FelonyConviction => "felony_conviction",
            BackgroundCheck => "background_check",
            DrugScreen => "drug_screen",
            EducationLevel => "education_level",
            DesiredSalary => "desired_salary",
            AvailableStartDate => "available_start_date",
            Relocation => "relocation",
            ReferralSource => "referral_source",
            Resume => "resume",
            CoverLetter => "cover_letter",
            Unknown => "unknown",
            OpenEndedQuestion => "open_ended_question",
        }
    }

    /// Inverse of `as_key`, for reintegrating AI classifications.
    pub fn from_key(key: &str) -> FieldIdentifier {
        use FieldIdentifier::*;
        match key {
            "first_name" => FirstName,
            "last_name" => LastName,
            "full_name" => FullName,
            "email" => Email,
            "phone" => Phone,
            "date_of_birth" => DateOfBirth,
            "linkedin_url" => LinkedinUrl,
            "website_url" => WebsiteUrl,
            "address_line1" => AddressLine1,
            "address_line2" => AddressLine2,
            "city" => City,
            "state" => State,
            "zip_code" => ZipCode,
            "country" => Country,
            "gender" => Gender,
            "race" => Race,
            "hispanic_latino" => HispanicLatino,
            "veteran_status" => VeteranStatus,
            "disability_status" => DisabilityStatus,
            "license_number" => LicenseNumber,
            "license_state" => LicenseState,
            "license_type" => LicenseType,
            "license_expiration" => LicenseExpiration,
            "npi_number" => NpiNumber,
            "certifications" => Certifications,
            "school_name" => SchoolName,
            "degree" => Degree,
            "field_of_study" => FieldOfStudy,
            "education_start_date" => EducationStartDate,
            "education_end_date" => EducationEndDate,
            "gpa" => Gpa,
            "employer_name" => EmployerName,
            "job_title" => JobTitle,
            "work_start_date" => WorkStartDate,
            "work_end_date" => WorkEndDate,
            "work_description" => WorkDescription,
            "years_experience" => YearsExperience,
            "work_authorization" => WorkAuthorization,
            "sponsorship" => Sponsorship,
            "felony_conviction" => FelonyConviction,
            "background_check" => BackgroundCheck,
            "drug_screen" => DrugScreen,
            "education_level" => EducationLevel,
            "desired_salary" => DesiredSalary,
            "available_start_date" => AvailableStartDate,
            "relocation" => Relocation,
            "referral_source" => ReferralSource,
            "resume" => Resume,
            "cover_letter" => CoverLetter,
            "open_ended_question" => OpenEndedQuestion,
            _ => Unknown,
        }
    }
}

/// A scanned field with its semantic assignment.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedField {
    pub field: ScannedField,
    pub identifier: FieldIdentifier,
    pub category: FieldCategory,
    pub confidence: f32,
}
