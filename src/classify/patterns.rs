use crate::classify::classify_model::FieldIdentifier;

/// Static identifier → keyword-pattern table. Patterns are matched against
/// normalized text (lowercased, punctuation collapsed to spaces). Order
/// within a row matters only for readability; the classifier scores every
/// pattern and keeps the best.
pub const PATTERNS: &[(FieldIdentifier, &[&str])] = &[
    (FieldIdentifier::FirstName, &["first name", "given name", "legal first name", "forename"]),
    (FieldIdentifier::LastName, &["last name", "family name", "surname", "legal last name"]),
    (FieldIdentifier::FullName, &["full name", "your name", "legal name", "name as it appears"]),
    (FieldIdentifier::Email, &["email", "email address", "e mail"]),
    (FieldIdentifier::Phone, &["phone", "phone number", "mobile", "cell phone", "telephone", "contact number"]),
    (FieldIdentifier::DateOfBirth, &["date of birth", "birth date", "dob"]),
    (FieldIdentifier::LinkedinUrl, &["linkedin", "linkedin profile", "linkedin url"]),
    (FieldIdentifier::WebsiteUrl, &["website", "personal website", "portfolio url", "portfolio"]),

    (FieldIdentifier::AddressLine1, &["address", "street address", "address line 1", "address 1"]),
    (FieldIdentifier::AddressLine2, &["address line 2", "address 2", "apt", "apartment", "suite", "unit number"]),
    (FieldIdentifier::City, &["city", "town"]),
    (FieldIdentifier::State, &["state", "province", "state province", "state or province"]),
    (FieldIdentifier::ZipCode, &["zip", "zip code", "postal code", "postcode"]),
    (FieldIdentifier::Country, &["country", "country region"]),

    (FieldIdentifier::Gender, &["gender", "gender identity", "sex"]),
    (FieldIdentifier::Race, &["race", "ethnicity", "race ethnicity", "racial background"]),
    (FieldIdentifier::HispanicLatino, &["hispanic", "latino", "hispanic or latino"]),
    (FieldIdentifier::VeteranStatus, &["veteran", "veteran status", "protected veteran", "military service"]),
    (FieldIdentifier::DisabilityStatus, &["disability", "disability status", "disabled"]),

    (FieldIdentifier::LicenseNumber, &["license number", "licence number", "rn license number", "license no", "certification number"]),
    (FieldIdentifier::LicenseState, &["license state", "state of licensure", "licensure state", "state licensed", "licensing state"]),
    (FieldIdentifier::LicenseType, &["license type", "type of license", "credential type", "licensure type"]),
    (FieldIdentifier::LicenseExpiration, &["license expiration", "license expiry", "expiration date of license", "license expiration date"]),
    (FieldIdentifier::NpiNumber, &["npi", "npi number", "national provider identifier"]),
    (FieldIdentifier::Certifications, &["certifications", "certification", "credentials held"]),

    (FieldIdentifier::SchoolName, &["school", "school name", "university", "college", "institution", "name of school"]),
    (FieldIdentifier::Degree, &["degree", "degree earned", "degree type", "qualification"]),
    (FieldIdentifier::FieldOfStudy, &["field of study", "major", "area of study", "discipline", "concentration"]),
    (FieldIdentifier::EducationStartDate, &["education start date", "enrollment date", "from date attended", "attended from"]),
    (FieldIdentifier::EducationEndDate, &["graduation date", "education end date", "date of graduation", "attended to", "completion date"]),
    (FieldIdentifier::Gpa, &["gpa", "grade point average"]),

    (FieldIdentifier::EmployerName, &["employer", "employer name", "company", "company name", "organization", "current employer", "most recent employer"]),
    (FieldIdentifier::JobTitle, &["job title", "title", "position title", "current title", "role title"]),
    (FieldIdentifier::WorkStartDate, &["start date of employment", "employment start date", "from date", "date started"]),
    (FieldIdentifier::WorkEndDate, &["end date of employment", "employment end date", "to date", "date ended"]),
    (FieldIdentifier::WorkDescription, &["responsibilities", "job duties", "duties", "description of duties", "role description"]),
    (FieldIdentifier::YearsExperience, &["years of experience", "years experience", "years of clinical experience", "years in practice", "total experience"]),

    (FieldIdentifier::WorkAuthorization, &["authorized to work", "work authorization", "legally authorized", "eligible to work"]),
    (FieldIdentifier::Sponsorship, &["sponsorship", "require sponsorship", "visa sponsorship", "need sponsorship"]),
    (FieldIdentifier::FelonyConviction, &["felony", "convicted of a felony", "criminal conviction", "convicted of a crime"]),
    (FieldIdentifier::BackgroundCheck, &["background check", "background screening", "consent to a background"]),
    (FieldIdentifier::DrugScreen, &["drug screen", "drug test", "drug screening"]),
    (FieldIdentifier::EducationLevel, &["highest level of education", "education level", "highest degree"]),

    (FieldIdentifier::DesiredSalary, &["desired salary", "salary expectation", "expected salary", "salary requirements", "desired compensation", "desired pay"]),
    (FieldIdentifier::AvailableStartDate, &["available start date", "date available", "earliest start date", "availability date", "when can you start"]),
    (FieldIdentifier::Relocation, &["willing to relocate", "relocation", "open to relocation"]),
    (FieldIdentifier::ReferralSource, &["how did you hear", "referral source", "source of referral", "who referred you"]),

    (FieldIdentifier::Resume, &["resume", "cv", "curriculum vitae", "upload resume", "attach resume"]),
    (FieldIdentifier::CoverLetter, &["cover letter", "covering letter", "letter of interest"]),
];

/// Fixed `autocomplete` attribute mapping. When the attribute is present
/// and mapped, it is authoritative (the site author told us what the
/// field is) at a fixed 0.9.
pub fn autocomplete_identifier(token: &str) -> Option<FieldIdentifier> {
    let token = token.trim().to_lowercase();
    // Tokens may carry section prefixes ("section-blue shipping given-name");
    // the field token is last.
    let token = token.rsplit(' ').next().unwrap_or("");
    match token {
        "given-name" => Some(FieldIdentifier::FirstName),
        "family-name" => Some(FieldIdentifier::LastName),
        "name" => Some(FieldIdentifier::FullName),
        "email" => Some(FieldIdentifier::Email),
        "tel" | "tel-national" => Some(FieldIdentifier::Phone),
        "bday" => Some(FieldIdentifier::DateOfBirth),
        "street-address" | "address-line1" => Some(FieldIdentifier::AddressLine1),
        "address-line2" => Some(FieldIdentifier::AddressLine2),
        "address-level2" => Some(FieldIdentifier::City),
        "address-level1" => Some(FieldIdentifier::State),
        "postal-code" => Some(FieldIdentifier::ZipCode),
        "country" | "country-name" => Some(FieldIdentifier::Country),
        "organization" => Some(FieldIdentifier::EmployerName),
        "organization-title" => Some(FieldIdentifier::JobTitle),
        "url" => Some(FieldIdentifier::WebsiteUrl),
        _ => None,
    }
}
