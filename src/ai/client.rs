use std::time::Duration;

use reqwest::StatusCode;

use crate::ai::ai_model::{
    ClassifiedAnswer, ClassifyFieldsRequest, ClassifyFieldsResponse, OpenEndedRequest,
    OpenEndedResponse,
};
use crate::engine::error::EngineError;

/// The remote classification/answer collaborators, behind a trait so the
/// pass is testable without a network.
pub trait AiClient {
    fn classify_fields(
        &self,
        request: &ClassifyFieldsRequest,
    ) -> Result<ClassifyFieldsResponse, EngineError>;

    fn answer_question(&self, request: &OpenEndedRequest)
        -> Result<OpenEndedResponse, EngineError>;
}

// ============================================================================
// HTTP client
// ============================================================================

pub struct HttpAiClient {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

impl HttpAiClient {
    pub fn new(endpoint: &str, api_key: Option<&str>) -> Result<Self, EngineError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(45))
            .build()
            .map_err(|e| EngineError::Http {
                context: "building AI client".into(),
                source: e,
            })?;
        Ok(HttpAiClient {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.map(|s| s.to_string()),
            client,
        })
    }

    fn post<Req: serde::Serialize, Resp: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        request: &Req,
    ) -> Result<Resp, EngineError> {
        let url = format!("{}/{}", self.endpoint, path);
        let mut builder = self.client.post(&url).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().map_err(|e| EngineError::Http {
            context: format!("POST {}", url),
            source: e,
        })?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(EngineError::RateLimited { retry_after_secs });
        }
        if !response.status().is_success() {
            return Err(EngineError::AiResponse(format!(
                "{} returned HTTP {}",
                path,
                response.status()
            )));
        }

        response.json().map_err(|e| EngineError::Http {
            context: format!("decoding {} response", path),
            source: e,
        })
    }
}

impl AiClient for HttpAiClient {
    fn classify_fields(
        &self,
        request: &ClassifyFieldsRequest,
    ) -> Result<ClassifyFieldsResponse, EngineError> {
        self.post("classify-fields", request)
    }

    fn answer_question(
        &self,
        request: &OpenEndedRequest,
    ) -> Result<OpenEndedResponse, EngineError> {
        self.post("answer-question", request)
    }
}

// ============================================================================
// Mock client (tests, and runs with AI disabled)
// ============================================================================

/// Canned responses for tests. Classifications are matched by index.
#[derive(Default)]
pub struct MockAiClient {
    pub classifications: Vec<ClassifiedAnswer>,
    pub answer: Option<String>,
}

impl AiClient for MockAiClient {
    fn classify_fields(
        &self,
        request: &ClassifyFieldsRequest,
    ) -> Result<ClassifyFieldsResponse, EngineError> {
        let indices: Vec<usize> = request.fields.iter().map(|f| f.index).collect();
        Ok(ClassifyFieldsResponse {
            classified: self
                .classifications
                .iter()
                .filter(|c| indices.contains(&c.index))
                .cloned()
                .collect(),
            model: "mock".to_string(),
            resume_used: false,
        })
    }

    fn answer_question(
        &self,
        request: &OpenEndedRequest,
    ) -> Result<OpenEndedResponse, EngineError> {
        match &self.answer {
            Some(answer) => Ok(OpenEndedResponse {
                answer: answer.clone(),
                question_key: request.question_key.clone(),
                model: "mock".to_string(),
                based_on_stored_response: false,
            }),
            None => Err(EngineError::AiResponse("no canned answer".into())),
        }
    }
}
