//! Error types for provider adapters.

use thiserror::Error;

/// Errors an adapter can surface to the orchestrator.
///
/// A malformed row fails the whole response: downstream postprocessors assume
/// required candidate fields are present, so we never hand over a partially
/// populated candidate.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Required field absent from a provider response
    #[error("{service}: missing field '{field}' in response")]
    MissingField { service: String, field: String },

    /// Field present but of the wrong type or unparsable
    #[error("{service}: invalid value for '{field}': {value}")]
    InvalidField {
        service: String,
        field: String,
        value: String,
    },

    /// Required setting (e.g. an API key) not configured
    #[error("Missing setting: {0}")]
    MissingSetting(String),

    /// Transport-level failure reported by a `JsonTransport`
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body is not valid JSON (see `transport::decode_json`)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ServiceError>;
