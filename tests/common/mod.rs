#![allow(dead_code)]

use std::collections::HashMap;

use formpilot::dom::node::{DomNode, ExtractedPage, OptionNode, Rect};
use formpilot::profile::profile_model::{
    CandidateProfile, Education, License, WorkExperience,
};

pub fn rect(x: f32, y: f32) -> Rect {
    Rect {
        x,
        y,
        width: 220.0,
        height: 28.0,
    }
}

/// A visible element with sane defaults.
pub fn el(id: u32, tag: &str, y: f32) -> DomNode {
    DomNode {
        node: id,
        tag: tag.to_string(),
        rect: rect(10.0, y),
        ..DomNode::default()
    }
}

pub fn text_input(id: u32, html_id: &str, y: f32) -> DomNode {
    let mut node = el(id, "input", y);
    node.r#type = Some("text".to_string());
    node.id = Some(html_id.to_string());
    node
}

pub fn textarea(id: u32, html_id: &str, y: f32) -> DomNode {
    let mut node = el(id, "textarea", y);
    node.id = Some(html_id.to_string());
    node
}

pub fn label_for(id: u32, target: &str, text: &str, y: f32) -> DomNode {
    let mut node = el(id, "label", y);
    node.for_target = Some(target.to_string());
    node.text = Some(text.to_string());
    node
}

pub fn text_node(id: u32, text: &str, y: f32) -> DomNode {
    let mut node = el(id, "div", y);
    node.text = Some(text.to_string());
    node
}

pub fn select(id: u32, html_id: &str, options: &[(&str, &str)], y: f32) -> DomNode {
    let mut node = el(id, "select", y);
    node.id = Some(html_id.to_string());
    node.options = options
        .iter()
        .map(|(value, label)| OptionNode {
            value: value.to_string(),
            label: label.to_string(),
            selected: false,
        })
        .collect();
    node
}

pub fn radio(id: u32, name: &str, value: &str, label: &str, y: f32) -> DomNode {
    let mut node = el(id, "input", y);
    node.r#type = Some("radio".to_string());
    node.name = Some(name.to_string());
    node.value = Some(value.to_string());
    node.aria_label = Some(label.to_string());
    node
}

pub fn container(id: u32, y: f32, children: Vec<DomNode>) -> DomNode {
    let mut node = el(id, "div", y);
    node.rect.width = 600.0;
    node.rect.height = 400.0;
    node.children = children;
    node
}

pub fn button(id: u32, text: &str, y: f32) -> DomNode {
    let mut node = el(id, "button", y);
    node.text = Some(text.to_string());
    node
}

pub fn page(dom: Vec<DomNode>) -> ExtractedPage {
    ExtractedPage {
        url: "https://jobs.example.com/apply/123".to_string(),
        title: "Application".to_string(),
        dom,
    }
}

pub fn page_at(url: &str, dom: Vec<DomNode>) -> ExtractedPage {
    ExtractedPage {
        url: url.to_string(),
        title: "Application".to_string(),
        dom,
    }
}

// ============================================================================
// Profile fixtures
// ============================================================================

/// A realistic candidate: one active TX APRN license plus an older
/// inactive RN license, two education entries, one current job.
pub fn sample_profile() -> CandidateProfile {
    let mut profile = CandidateProfile::default();

    profile.personal.first_name = Some("Sarah".to_string());
    profile.personal.last_name = Some("Chen".to_string());
    profile.personal.email = Some("sarah.chen@example.com".to_string());
    profile.personal.phone = Some("555-0142".to_string());

    profile.address.line1 = Some("410 Brazos St".to_string());
    profile.address.city = Some("Austin".to_string());
    profile.address.state = Some("TX".to_string());
    profile.address.zip_code = Some("78701".to_string());
    profile.address.country = Some("United States".to_string());

    profile.licenses = vec![
        License {
            license_type: Some("APRN".to_string()),
            state: Some("TX".to_string()),
            number: Some("AP123456".to_string()),
            expiration_date: Some("2027-04-30".to_string()),
            active: true,
            ..License::default()
        },
        License {
            license_type: Some("RN".to_string()),
            state: Some("CA".to_string()),
            number: Some("RN998877".to_string()),
            expiration_date: Some("2020-01-31".to_string()),
            active: false,
            ..License::default()
        },
    ];

    profile.education = vec![
        Education {
            school_name: Some("University of Texas at Austin".to_string()),
            degree: Some("MSN".to_string()),
            field_of_study: Some("Psychiatric-Mental Health".to_string()),
            start_date: Some("2016-08-01".to_string()),
            end_date: Some("2018-05-15".to_string()),
            ..Education::default()
        },
        Education {
            school_name: Some("Texas State University".to_string()),
            degree: Some("BSN".to_string()),
            field_of_study: Some("Nursing".to_string()),
            start_date: Some("2010-08-01".to_string()),
            end_date: Some("2014-05-15".to_string()),
            ..Education::default()
        },
    ];

    profile.work_experience = vec![WorkExperience {
        employer_name: Some("Hill Country Behavioral Health".to_string()),
        job_title: Some("Psychiatric Nurse Practitioner".to_string()),
        start_date: Some("2018-06-01".to_string()),
        end_date: None,
        current: true,
        description: Some("Outpatient medication management".to_string()),
        location: Some("Austin, TX".to_string()),
    }];

    profile.preferences.years_experience = Some(8);
    profile.documents.resume_url = Some("https://cdn.example.com/sarah-chen.pdf".to_string());

    profile
}

pub fn empty_profile() -> CandidateProfile {
    CandidateProfile::default()
}

/// Attribute map literal helper.
pub fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
