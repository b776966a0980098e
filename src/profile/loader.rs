use std::time::Duration;

use crate::engine::error::EngineError;
use crate::profile::profile_model::CandidateProfile;

/// Load a candidate profile from a local JSON file or an HTTP(S) URL.
/// Fetched once per pass; any caching/TTL lives with the remote service.
pub fn load_profile(source: &str) -> Result<CandidateProfile, EngineError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        load_remote(source)
    } else {
        load_file(source)
    }
}

fn load_file(path: &str) -> Result<CandidateProfile, EngineError> {
    let content = std::fs::read_to_string(path).map_err(|e| EngineError::ProfileLoad {
        source_desc: path.to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| EngineError::JsonParse {
        context: format!("profile file {}", path),
        source: e,
    })
}

fn load_remote(url: &str) -> Result<CandidateProfile, EngineError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()
        .map_err(|e| EngineError::Http {
            context: "building profile client".to_string(),
            source: e,
        })?;

    let response = client.get(url).send().map_err(|e| EngineError::Http {
        context: format!("fetching profile from {}", url),
        source: e,
    })?;

    if !response.status().is_success() {
        return Err(EngineError::ProfileLoad {
            source_desc: url.to_string(),
            message: format!("HTTP {}", response.status()),
        });
    }

    response.json().map_err(|e| EngineError::Http {
        context: "decoding profile JSON".to_string(),
        source: e,
    })
}
