//! Typed access to raw provider JSON.

use crate::error::{Result, ServiceError};
use serde_json::Value;

/// Reads fields out of one provider response (or one row of it), turning
/// absent or mistyped required fields into `ServiceError`s tagged with the
/// service name and the full field path.
pub(crate) struct JsonReader<'a> {
    service: &'a str,
    value: &'a Value,
}

impl<'a> JsonReader<'a> {
    pub fn new(service: &'a str, value: &'a Value) -> Self {
        Self { service, value }
    }

    /// Walk `path`; numeric segments index into arrays.
    fn lookup(&self, path: &[&str]) -> Option<&'a Value> {
        path.iter().try_fold(self.value, |current, segment| match current {
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            Value::Object(map) => map.get(*segment),
            _ => None,
        })
    }

    fn missing(&self, path: &[&str]) -> ServiceError {
        ServiceError::MissingField {
            service: self.service.to_string(),
            field: path.join("."),
        }
    }

    fn invalid(&self, path: &[&str], value: &Value) -> ServiceError {
        ServiceError::InvalidField {
            service: self.service.to_string(),
            field: path.join("."),
            value: value.to_string(),
        }
    }

    pub fn value(&self, path: &[&str]) -> Result<&'a Value> {
        self.lookup(path).ok_or_else(|| self.missing(path))
    }

    pub fn array(&self, path: &[&str]) -> Result<&'a [Value]> {
        let value = self.value(path)?;
        value
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| self.invalid(path, value))
    }

    pub fn str(&self, path: &[&str]) -> Result<&'a str> {
        let value = self.value(path)?;
        value.as_str().ok_or_else(|| self.invalid(path, value))
    }

    /// A number, or a string holding one (some providers quote coordinates).
    pub fn f64(&self, path: &[&str]) -> Result<f64> {
        let value = self.value(path)?;
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| self.invalid(path, value))
    }

    /// Optional text field; absent, null, empty or non-string reads as `None`.
    pub fn opt_str(&self, path: &[&str]) -> Option<String> {
        self.lookup(path)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Optional scalar rendered as text (codes may be numbers or strings).
    pub fn opt_text(&self, path: &[&str]) -> Option<String> {
        match self.lookup(path)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
