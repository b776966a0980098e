use std::fmt;

use crate::dom::node::NodeId;

#[derive(Debug)]
pub enum EngineError {
    /// Node.js driver subprocess failed to spawn
    SubprocessSpawn { script: String, source: std::io::Error },

    /// Reading from / writing to the driver subprocess failed
    SessionIo(String),

    /// Driver reported a command failure (ok=false)
    SessionProtocol { command: String, error: String },

    /// JSON parsing failed (driver output, profile, AI response)
    JsonParse { context: String, source: serde_json::Error },

    /// JSON serialization failed (driver command, AI request)
    JsonSerialize { context: String, source: serde_json::Error },

    /// Extracted DOM had an unexpected structure
    DomStructure(String),

    /// A node id from the current pass no longer resolves in the page
    NodeGone { node: NodeId, context: String },

    /// Candidate profile could not be loaded
    ProfileLoad { source_desc: String, message: String },

    /// HTTP request failed (AI collaborators, document fetch)
    Http { context: String, source: reqwest::Error },

    /// Remote AI classifier returned 429
    RateLimited { retry_after_secs: Option<u64> },

    /// AI collaborator returned a malformed or unusable payload
    AiResponse(String),

    /// Document fetch/validation failed (resume, cover letter)
    Document(String),

    /// Configuration was invalid
    Config(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::SubprocessSpawn { script, source } => {
                write!(f, "Failed to spawn {} (is Node.js installed?): {}", script, source)
            }
            EngineError::SessionIo(msg) => {
                write!(f, "Driver session I/O error: {}", msg)
            }
            EngineError::SessionProtocol { command, error } => {
                write!(f, "Driver command '{}' failed: {}", command, error)
            }
            EngineError::JsonParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            EngineError::JsonSerialize { context, source } => {
                write!(f, "JSON serialize error ({}): {}", context, source)
            }
            EngineError::DomStructure(msg) => {
                write!(f, "Unexpected DOM structure: {}", msg)
            }
            EngineError::NodeGone { node, context } => {
                write!(f, "Node {} no longer present: {}", node, context)
            }
            EngineError::ProfileLoad { source_desc, message } => {
                write!(f, "Failed to load profile from {}: {}", source_desc, message)
            }
            EngineError::Http { context, source } => {
                write!(f, "HTTP error ({}): {}", context, source)
            }
            EngineError::RateLimited { retry_after_secs } => match retry_after_secs {
                Some(s) => write!(f, "AI classifier rate limited (retry after {}s)", s),
                None => write!(f, "AI classifier rate limited"),
            },
            EngineError::AiResponse(msg) => {
                write!(f, "Unusable AI response: {}", msg)
            }
            EngineError::Document(msg) => {
                write!(f, "Document error: {}", msg)
            }
            EngineError::Config(msg) => {
                write!(f, "Invalid configuration: {}", msg)
            }
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::SubprocessSpawn { source, .. } => Some(source),
            EngineError::JsonParse { source, .. } => Some(source),
            EngineError::JsonSerialize { source, .. } => Some(source),
            EngineError::Http { source, .. } => Some(source),
            _ => None,
        }
    }
}
