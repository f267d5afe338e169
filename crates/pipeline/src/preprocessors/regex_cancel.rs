//! Preprocessors that veto a query when a field matches a pattern.

use crate::traits::{CancelReason, Preprocessor, QueryOutcome};
use once_cell::sync::Lazy;
use places::{PlaceQuery, QueryField};
use regex::Regex;

static PO_BOX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:p\.?\s*o\.?\s*box|post\s+office\s+box|box\s*#)")
        .unwrap_or_else(|e| panic!("Failed to compile regex pattern: {e}"))
});

/// Cancels the query when any of the given fields matches `regex`.
pub struct CancelIfRegexInAttr {
    name: String,
    regex: Regex,
    fields: Vec<QueryField>,
}

impl CancelIfRegexInAttr {
    /// Compile `pattern` and check it against `fields`.
    pub fn new(
        pattern: &str,
        fields: impl IntoIterator<Item = QueryField>,
    ) -> Result<Self, regex::Error> {
        Ok(Self::from_regex(Regex::new(pattern)?, fields))
    }

    pub fn from_regex(regex: Regex, fields: impl IntoIterator<Item = QueryField>) -> Self {
        Self {
            name: "CancelIfRegexInAttr".to_string(),
            regex,
            fields: fields.into_iter().collect(),
        }
    }

    fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    fn first_match(&self, query: &PlaceQuery) -> Option<QueryField> {
        self.fields.iter().copied().find(|field| {
            let value = query.field(*field);
            !value.trim().is_empty() && self.regex.is_match(value)
        })
    }
}

impl Preprocessor for CancelIfRegexInAttr {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, query: PlaceQuery) -> QueryOutcome {
        match self.first_match(&query) {
            Some(field) => QueryOutcome::Cancelled(CancelReason::new(
                self.name.as_str(),
                format!("{:?} matches /{}/", field, self.regex.as_str()),
            )),
            None => QueryOutcome::Continue(query),
        }
    }
}

/// Cancels post-office-box addresses ("PO Box 12", "P.O. Box 45", "Box #7").
///
/// Checks the structured address and the free-form query.
pub struct CancelIfPoBox {
    inner: CancelIfRegexInAttr,
}

impl CancelIfPoBox {
    pub fn new() -> Self {
        Self {
            inner: CancelIfRegexInAttr::from_regex(
                PO_BOX_REGEX.clone(),
                [QueryField::Address, QueryField::Query],
            )
            .named("CancelIfPoBox"),
        }
    }
}

impl Default for CancelIfPoBox {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor for CancelIfPoBox {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn process(&self, query: PlaceQuery) -> QueryOutcome {
        self.inner.process(query)
    }
}
