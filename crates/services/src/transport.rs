//! Boundary between adapters and the network.
//!
//! Adapters only build request parameters and map responses; fetching is
//! delegated to a `JsonTransport` supplied by the caller, which owns
//! sessions, timeouts and retries.

use crate::error::Result;
use serde_json::Value;

/// Query-string parameters in the order they were added.
pub type RequestParams = Vec<(String, String)>;

/// Performs a GET request and decodes the body as JSON.
pub trait JsonTransport: Send + Sync {
    fn get_json(&self, endpoint: &str, params: &RequestParams) -> Result<Value>;
}

/// Decode a response body for a `JsonTransport` implementation.
///
/// Malformed bodies surface as `ServiceError::Json`.
pub fn decode_json(body: &[u8]) -> Result<Value> {
    Ok(serde_json::from_slice(body)?)
}

/// Look up a parameter by name (first occurrence).
pub fn param<'a>(params: &'a RequestParams, name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}
