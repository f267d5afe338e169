//! Country handling for queries.
//!
//! `CountryPreProcessor` is the shared normalization step (caller mapping,
//! then ISO2/ISO3/name rewriting, then an optional allow-list);
//! `RequireCountry` guarantees a country is present at all.

use crate::traits::{CancelReason, Preprocessor, QueryOutcome};
use places::{CountryFormat, PlaceQuery, normalize_country};
use std::collections::HashMap;

/// Normalizes `query.country` and optionally restricts it to an allow-list.
///
/// ## Algorithm
/// 1. Replace the country using `country_map` (exact match after trimming)
/// 2. Rewrite recognized countries into `format`; unknown values pass through
/// 3. If `acceptable` is non-empty, cancel unless the country is in it
///    (compared case-insensitively, after normalizing the list the same way)
pub struct CountryPreProcessor {
    acceptable: Vec<String>,
    country_map: HashMap<String, String>,
    format: CountryFormat,
}

impl CountryPreProcessor {
    /// Normalize to ISO2 with no mapping and no allow-list.
    pub fn new() -> Self {
        Self {
            acceptable: Vec::new(),
            country_map: HashMap::new(),
            format: CountryFormat::Iso2,
        }
    }

    /// Only let these countries through (any representation is accepted).
    pub fn with_acceptable<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.acceptable = countries.into_iter().map(Into::into).collect();
        self
    }

    /// Caller-specific rewrites applied before normalization.
    pub fn with_country_map<I, K, V>(mut self, mapping: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.country_map = mapping
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    pub fn with_format(mut self, format: CountryFormat) -> Self {
        self.format = format;
        self
    }

    /// Run steps 1 and 2 on a single value.
    pub fn normalize(&self, country: &str) -> String {
        let trimmed = country.trim();
        let mapped = self
            .country_map
            .get(trimmed)
            .map(String::as_str)
            .unwrap_or(trimmed);
        normalize_country(mapped, self.format)
            .map(str::to_string)
            .unwrap_or_else(|| mapped.to_string())
    }

    fn is_acceptable(&self, country: &str) -> bool {
        self.acceptable
            .iter()
            .any(|allowed| self.normalize(allowed).eq_ignore_ascii_case(country))
    }
}

impl Default for CountryPreProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor for CountryPreProcessor {
    fn name(&self) -> &str {
        "CountryPreProcessor"
    }

    fn process(&self, mut query: PlaceQuery) -> QueryOutcome {
        query.country = self.normalize(&query.country);

        if self.acceptable.is_empty() || self.is_acceptable(&query.country) {
            return QueryOutcome::Continue(query);
        }

        QueryOutcome::Cancelled(CancelReason::new(
            self.name(),
            format!("country '{}' is not accepted", query.country),
        ))
    }
}

/// Cancels queries without a country, or fills in a default one.
pub struct RequireCountry {
    default_country: Option<String>,
}

impl RequireCountry {
    /// Cancel whenever the country is blank.
    pub fn new() -> Self {
        Self {
            default_country: None,
        }
    }

    /// Use `country` when the query has none.
    pub fn with_default(country: impl Into<String>) -> Self {
        let country = country.into();
        Self {
            default_country: (!country.trim().is_empty()).then_some(country),
        }
    }
}

impl Default for RequireCountry {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor for RequireCountry {
    fn name(&self) -> &str {
        "RequireCountry"
    }

    fn process(&self, mut query: PlaceQuery) -> QueryOutcome {
        if !query.country.trim().is_empty() {
            return QueryOutcome::Continue(query);
        }
        match &self.default_country {
            Some(country) => {
                query.country = country.clone();
                QueryOutcome::Continue(query)
            }
            None => QueryOutcome::Cancelled(CancelReason::new(self.name(), "no country set")),
        }
    }
}
