//! Provider settings (API keys and the like).
//!
//! Settings are a flat string map injected into each adapter. They can come
//! from code, from environment variables (with `.env` support) or from a
//! table in a TOML file.

use crate::error::{Result, ServiceError};
use std::collections::HashMap;
use std::fmt;

/// Keys whose values are never printed.
const SECRET_KEYS: [&str; 3] = ["api_key", "key", "secret"];

#[derive(Clone, Default, PartialEq, Eq)]
pub struct ServiceSettings {
    values: HashMap<String, String>,
}

impl ServiceSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a setting (builder pattern).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Like `get`, but a missing or blank value is an error.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ServiceError::MissingSetting(key.to_string()))
    }

    /// Collect `PREFIX_*` environment variables, e.g. `BING_API_KEY` becomes
    /// `api_key` for prefix `BING`. A `.env` file is loaded first if present.
    pub fn from_env(prefix: &str) -> Self {
        dotenv::dotenv().ok();
        Self::from_vars(prefix, std::env::vars())
    }

    fn from_vars(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let prefix = format!("{}_", prefix.to_uppercase());
        let values = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(&prefix)
                    .filter(|rest| !rest.is_empty())
                    .map(|rest| (rest.to_lowercase(), value))
            })
            .collect();
        Self { values }
    }

    /// Read the `[section]` table of a TOML document. Non-string values are
    /// rendered with their TOML representation; a missing section yields
    /// empty settings.
    pub fn from_toml_str(content: &str, section: &str) -> Result<Self> {
        let document: toml::Table = toml::from_str(content)?;
        let values = match document.get(section) {
            Some(toml::Value::Table(table)) => table
                .iter()
                .map(|(key, value)| {
                    let value = match value {
                        toml::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (key.clone(), value)
                })
                .collect(),
            _ => HashMap::new(),
        };
        Ok(Self { values })
    }
}

impl fmt::Debug for ServiceSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.values {
            if SECRET_KEYS.contains(&key.as_str()) {
                map.entry(key, &"<redacted>");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_missing_and_blank() {
        let settings = ServiceSettings::new().with("api_key", "  ");
        assert!(matches!(
            settings.require("api_key"),
            Err(ServiceError::MissingSetting(key)) if key == "api_key"
        ));
        assert!(settings.require("endpoint").is_err());
        assert_eq!(settings.get("api_key"), Some("  "));
    }

    #[test]
    fn test_from_vars_strips_prefix() {
        let vars = vec![
            ("BING_API_KEY".to_string(), "abc".to_string()),
            ("BING_".to_string(), "ignored".to_string()),
            ("MAPQUEST_API_KEY".to_string(), "xyz".to_string()),
        ];
        let settings = ServiceSettings::from_vars("bing", vars);
        assert_eq!(settings.get("api_key"), Some("abc"));
        assert_eq!(settings.values.len(), 1);
    }

    #[test]
    fn test_from_toml_section() {
        let content = r#"
            [bing]
            api_key = "abc"
            timeout_seconds = 5

            [nominatim]
            email = "ops@example.org"
        "#;
        let settings = ServiceSettings::from_toml_str(content, "bing").unwrap();
        assert_eq!(settings.require("api_key").unwrap(), "abc");
        assert_eq!(settings.get("timeout_seconds"), Some("5"));
        assert!(settings.get("email").is_none());

        let empty = ServiceSettings::from_toml_str(content, "census").unwrap();
        assert!(empty.get("api_key").is_none());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(matches!(
            ServiceSettings::from_toml_str("not = [valid", "bing"),
            Err(ServiceError::Toml(_))
        ));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let settings = ServiceSettings::new().with("api_key", "super-secret").with("region", "us");
        let printed = format!("{:?}", settings);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("us"));
    }
}
