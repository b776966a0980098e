use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Job/employer context shipped with every AI request; improves both
/// classification and generated answers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobContext {
    pub job_title: Option<String>,
    pub job_description: Option<String>,
    pub employer_name: Option<String>,
}

/// One unresolved field as the classifier sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub index: usize,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub attributes: HashMap<String, String>,
    pub field_type: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyFieldsRequest {
    pub fields: Vec<FieldDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer_name: Option<String>,
}

/// One classification result, positionally tied back by `index`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassifiedAnswer {
    pub index: usize,
    pub identifier: Option<String>,
    pub profile_key: Option<String>,
    pub value: Option<String>,
    pub confidence: f32,
    pub is_question: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassifyFieldsResponse {
    pub classified: Vec<ClassifiedAnswer>,
    pub model: String,
    pub resume_used: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenEndedRequest {
    pub question_text: String,
    pub question_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenEndedResponse {
    pub answer: String,
    pub question_key: String,
    pub model: String,
    pub based_on_stored_response: bool,
}
