//! Conversions between the free-form and structured query representations.

use crate::traits::{Preprocessor, QueryOutcome};
use once_cell::sync::Lazy;
use places::{PlaceQuery, lookup_country};
use regex::Regex;

/// "PA 19107", "IL", "62701", "ON K1A 0B1"
static NA_REGION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<state>[A-Za-z][A-Za-z .]*?)?\s*(?P<postal>\d{5}(?:-\d{4})?|[A-Za-z]\d[A-Za-z]\s?\d[A-Za-z]\d)?$",
    )
    .unwrap_or_else(|e| panic!("Failed to compile regex pattern: {e}"))
});

/// "10115 Berlin", "1012 AB Amsterdam"
static EU_LOCALITY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<postal>\d{4,5}(?:\s?[A-Z]{2})?)\s+(?P<city>\D.*)$")
        .unwrap_or_else(|e| panic!("Failed to compile regex pattern: {e}"))
});

/// Delimiter conventions used to split a single-line address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressLocale {
    /// `street, city, STATE POSTAL[, country]`
    #[default]
    NorthAmerica,
    /// `street, POSTAL city[, country]`
    Europe,
}

#[derive(Debug, Default, PartialEq)]
struct ParsedAddress {
    address: String,
    city: String,
    state: String,
    postal: String,
    country: String,
}

/// Splits a free-form query into structured fields.
///
/// Only runs when the query is the sole representation of the address: if
/// any address component is already set, the query passes through
/// untouched. A country set by the caller is kept unless the text names one.
/// After a successful split the free-form text is cleared so adapters use
/// the structured fields.
pub struct ParseSingleLine {
    locale: AddressLocale,
}

impl ParseSingleLine {
    pub fn new(locale: AddressLocale) -> Self {
        Self { locale }
    }

    fn split(&self, text: &str) -> Option<ParsedAddress> {
        let mut parts: Vec<&str> = text
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        let mut country = String::new();
        if self.has_trailing_country(&parts)
            && let Some(last) = parts.pop()
        {
            country = last.to_string();
        }

        if parts.len() < 2 {
            return None;
        }

        let mut parsed = match self.locale {
            AddressLocale::NorthAmerica => Self::split_north_american(&parts)?,
            AddressLocale::Europe => Self::split_european(&parts),
        };
        parsed.country = country;
        Some(parsed)
    }

    /// Whether the last part names a country rather than a region.
    ///
    /// A bare ISO2 code in North America is usually a state ("..., DE" is
    /// Delaware), so it only counts when the part before it already carries
    /// the postal code. ISO3 codes and names are always taken.
    fn has_trailing_country(&self, parts: &[&str]) -> bool {
        let min_parts = match self.locale {
            AddressLocale::NorthAmerica => 4,
            AddressLocale::Europe => 3,
        };
        if parts.len() < min_parts {
            return false;
        }
        let Some((last, rest)) = parts.split_last() else {
            return false;
        };
        let Some(country) = lookup_country(last) else {
            return false;
        };

        match self.locale {
            AddressLocale::Europe => true,
            AddressLocale::NorthAmerica => {
                !last.eq_ignore_ascii_case(country.iso2)
                    || rest
                        .last()
                        .and_then(|prev| NA_REGION_REGEX.captures(prev))
                        .is_some_and(|caps| caps.name("postal").is_some())
            }
        }
    }

    fn split_north_american(parts: &[&str]) -> Option<ParsedAddress> {
        let last = parts[parts.len() - 1];
        let region = NA_REGION_REGEX
            .captures(last)
            .filter(|caps| caps.name("state").is_some() || caps.name("postal").is_some());

        if parts.len() == 2 {
            // "street, city" or "street, STATE POSTAL"
            return Some(match region.filter(|caps| caps.name("postal").is_some()) {
                Some(caps) => ParsedAddress {
                    address: parts[0].to_string(),
                    state: caps.name("state").map_or("", |m| m.as_str()).trim().to_string(),
                    postal: caps.name("postal").map_or("", |m| m.as_str()).to_string(),
                    ..ParsedAddress::default()
                },
                None => ParsedAddress {
                    address: parts[0].to_string(),
                    city: parts[1].to_string(),
                    ..ParsedAddress::default()
                },
            });
        }

        let caps = region?;
        Some(ParsedAddress {
            address: parts[..parts.len() - 2].join(", "),
            city: parts[parts.len() - 2].to_string(),
            state: caps.name("state").map_or("", |m| m.as_str()).trim().to_string(),
            postal: caps.name("postal").map_or("", |m| m.as_str()).to_string(),
            country: String::new(),
        })
    }

    fn split_european(parts: &[&str]) -> ParsedAddress {
        let last = parts[parts.len() - 1];
        let address = parts[..parts.len() - 1].join(", ");
        match EU_LOCALITY_REGEX.captures(last) {
            Some(caps) => ParsedAddress {
                address,
                city: caps["city"].trim().to_string(),
                postal: caps["postal"].to_string(),
                ..ParsedAddress::default()
            },
            None => ParsedAddress {
                address,
                city: last.to_string(),
                ..ParsedAddress::default()
            },
        }
    }
}

impl Default for ParseSingleLine {
    fn default() -> Self {
        Self::new(AddressLocale::default())
    }
}

impl Preprocessor for ParseSingleLine {
    fn name(&self) -> &str {
        "ParseSingleLine"
    }

    fn process(&self, mut query: PlaceQuery) -> QueryOutcome {
        if !query.uses_single_line() || query.has_structured_fields() {
            return QueryOutcome::Continue(query);
        }

        if let Some(parsed) = self.split(&query.query) {
            query.address = parsed.address;
            query.city = parsed.city;
            query.state = parsed.state;
            query.postal = parsed.postal;
            if !parsed.country.is_empty() {
                query.country = parsed.country;
            }
            query.query.clear();
        }
        QueryOutcome::Continue(query)
    }
}

/// Builds the free-form query from structured fields when it is blank.
///
/// Joins `address, city, STATE POSTAL, country`, skipping empty pieces.
pub struct ComposeSingleLine;

impl Preprocessor for ComposeSingleLine {
    fn name(&self) -> &str {
        "ComposeSingleLine"
    }

    fn process(&self, mut query: PlaceQuery) -> QueryOutcome {
        if query.uses_single_line() {
            return QueryOutcome::Continue(query);
        }

        let region = format!("{} {}", query.state.trim(), query.postal.trim());
        let pieces = [
            query.address.trim(),
            query.city.trim(),
            region.trim(),
            query.country.trim(),
        ];
        query.query = pieces
            .iter()
            .filter(|p| !p.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(", ");
        QueryOutcome::Continue(query)
    }
}
