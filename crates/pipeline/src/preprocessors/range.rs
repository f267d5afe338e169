//! Rewrites a leading address range to its first number.
//!
//! Many providers fail on "766-68 Any St." but resolve "766 Any St." fine.

use crate::traits::{Preprocessor, QueryOutcome};
use once_cell::sync::Lazy;
use places::{PlaceQuery, QueryField};
use regex::Regex;

static RANGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*)(\d+)\s*-\s*[0-9A-Za-z]+\b")
        .unwrap_or_else(|e| panic!("Failed to compile regex pattern: {e}"))
});

/// Replaces `<digits>-<digits-or-suffix>` at the start of the street address
/// (free-form query and structured address) with the first number.
pub struct ReplaceRangeWithNumber;

impl ReplaceRangeWithNumber {
    pub fn new() -> Self {
        Self
    }

    /// Apply the rewrite to one string. Ranges that are not the leading token
    /// are left alone.
    pub fn replace_range(text: &str) -> String {
        RANGE_REGEX.replace(text, "${1}${2}").into_owned()
    }
}

impl Default for ReplaceRangeWithNumber {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor for ReplaceRangeWithNumber {
    fn name(&self) -> &str {
        "ReplaceRangeWithNumber"
    }

    fn process(&self, mut query: PlaceQuery) -> QueryOutcome {
        for field in [QueryField::Query, QueryField::Address] {
            let value = query.field_mut(field);
            if !value.is_empty() {
                *value = Self::replace_range(value);
            }
        }
        QueryOutcome::Continue(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_range_replaced() {
        assert_eq!(ReplaceRangeWithNumber::replace_range("766-68 Any St."), "766 Any St.");
        assert_eq!(ReplaceRangeWithNumber::replace_range("12 - 14B Elm Rd"), "12 Elm Rd");
    }

    #[test]
    fn test_plain_address_unchanged() {
        assert_eq!(ReplaceRangeWithNumber::replace_range("766 Any St."), "766 Any St.");
    }

    #[test]
    fn test_embedded_range_untouched() {
        let text = "766 Any St., Philadelphia, PA 19107-1234";
        assert_eq!(ReplaceRangeWithNumber::replace_range(text), text);
        let text = "Unit 5, 10-12 Any St.";
        assert_eq!(ReplaceRangeWithNumber::replace_range(text), text);
    }

    #[test]
    fn test_process_rewrites_query_and_address() {
        let query = PlaceQuery::single_line("766-68 Any St., Springfield")
            .with_address("10-12 Main St");
        let query = ReplaceRangeWithNumber::new().process(query).into_query().unwrap();
        assert_eq!(query.query, "766 Any St., Springfield");
        assert_eq!(query.address, "10 Main St");
    }
}
