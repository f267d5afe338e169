//! Normalized geocode results.
//!
//! Every provider adapter maps its raw rows into `Candidate`. The generic
//! postprocessors never touch fields directly; they go through
//! `Candidate::get` / `Candidate::set` keyed by `CandidateAttr`, so a filter or
//! sorter can be configured against any field of the schema.

use crate::error::PlacesError;
use crate::query::DEFAULT_WKID;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

// =============================================================================
// Attribute names
// =============================================================================

/// Closed set of candidate field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateAttr {
    MatchAddr,
    X,
    Y,
    Wkid,
    Score,
    Confidence,
    Locator,
    Entity,
    Geoservice,
    MatchCity,
    MatchRegion,
    MatchPostal,
    MatchSubregion,
    MatchCountry,
    MatchStreetaddr,
}

impl CandidateAttr {
    pub const ALL: [CandidateAttr; 15] = [
        CandidateAttr::MatchAddr,
        CandidateAttr::X,
        CandidateAttr::Y,
        CandidateAttr::Wkid,
        CandidateAttr::Score,
        CandidateAttr::Confidence,
        CandidateAttr::Locator,
        CandidateAttr::Entity,
        CandidateAttr::Geoservice,
        CandidateAttr::MatchCity,
        CandidateAttr::MatchRegion,
        CandidateAttr::MatchPostal,
        CandidateAttr::MatchSubregion,
        CandidateAttr::MatchCountry,
        CandidateAttr::MatchStreetaddr,
    ];

    /// Schema name of this attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateAttr::MatchAddr => "match_addr",
            CandidateAttr::X => "x",
            CandidateAttr::Y => "y",
            CandidateAttr::Wkid => "wkid",
            CandidateAttr::Score => "score",
            CandidateAttr::Confidence => "confidence",
            CandidateAttr::Locator => "locator",
            CandidateAttr::Entity => "entity",
            CandidateAttr::Geoservice => "geoservice",
            CandidateAttr::MatchCity => "match_city",
            CandidateAttr::MatchRegion => "match_region",
            CandidateAttr::MatchPostal => "match_postal",
            CandidateAttr::MatchSubregion => "match_subregion",
            CandidateAttr::MatchCountry => "match_country",
            CandidateAttr::MatchStreetaddr => "match_streetaddr",
        }
    }

    /// Numeric fields hold `AttrValue::Number`, the rest hold text.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            CandidateAttr::X | CandidateAttr::Y | CandidateAttr::Wkid | CandidateAttr::Score
        )
    }
}

impl fmt::Display for CandidateAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CandidateAttr {
    type Err = PlacesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CandidateAttr::ALL
            .iter()
            .copied()
            .find(|attr| attr.as_str() == s)
            .ok_or_else(|| PlacesError::UnknownAttribute(s.to_string()))
    }
}

// =============================================================================
// Attribute values
// =============================================================================

/// Value of a candidate attribute.
///
/// Numbers compare and hash by bit pattern (with `-0.0` folded into `0.0`) so
/// values can be used as grouping keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(f64),
    Text(String),
}

impl AttrValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            AttrValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            AttrValue::Text(_) => None,
        }
    }

    /// Prefix test used by non-exact filters. Numbers never prefix-match.
    pub fn starts_with(&self, prefix: &AttrValue) -> bool {
        match (self, prefix) {
            (AttrValue::Text(value), AttrValue::Text(prefix)) => value.starts_with(prefix.as_str()),
            (value, prefix) => value == prefix,
        }
    }

    fn number_bits(n: f64) -> u64 {
        if n == 0.0 { 0.0f64.to_bits() } else { n.to_bits() }
    }
}

impl PartialEq for AttrValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AttrValue::Number(a), AttrValue::Number(b)) => {
                Self::number_bits(*a) == Self::number_bits(*b)
            }
            (AttrValue::Text(a), AttrValue::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for AttrValue {}

impl Hash for AttrValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            AttrValue::Number(n) => {
                0u8.hash(state);
                Self::number_bits(*n).hash(state);
            }
            AttrValue::Text(s) => {
                1u8.hash(state);
                s.hash(state);
            }
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Number(n) => write!(f, "{}", n),
            AttrValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Number(n)
    }
}

impl From<i32> for AttrValue {
    fn from(n: i32) -> Self {
        AttrValue::Number(n as f64)
    }
}

impl From<u32> for AttrValue {
    fn from(n: u32) -> Self {
        AttrValue::Number(n as f64)
    }
}

// =============================================================================
// Candidate
// =============================================================================

/// One normalized geocode result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Formatted address of the match
    pub match_addr: String,
    /// Longitude (or easting) in `wkid`
    pub x: f64,
    /// Latitude (or northing) in `wkid`
    pub y: f64,
    pub wkid: u32,
    /// 0-100 once normalized
    pub score: f64,
    /// Provider-native confidence label, e.g. "High"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
    /// Match precision: rooftop, parcel, interpolation, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    /// Name of the provider that produced this candidate
    pub geoservice: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_postal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_subregion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_streetaddr: Option<String>,
}

impl Candidate {
    /// Create a candidate with the required fields; everything else is unset.
    pub fn new(match_addr: impl Into<String>, x: f64, y: f64, geoservice: impl Into<String>) -> Self {
        Self {
            match_addr: match_addr.into(),
            x,
            y,
            wkid: DEFAULT_WKID,
            score: 0.0,
            confidence: None,
            locator: None,
            entity: None,
            geoservice: geoservice.into(),
            match_city: None,
            match_region: None,
            match_postal: None,
            match_subregion: None,
            match_country: None,
            match_streetaddr: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    pub fn with_locator(mut self, locator: impl Into<String>) -> Self {
        self.locator = Some(locator.into());
        self
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_confidence(mut self, confidence: impl Into<String>) -> Self {
        self.confidence = Some(confidence.into());
        self
    }

    /// Read an attribute by name. Unset optional fields read as `None`.
    pub fn get(&self, attr: CandidateAttr) -> Option<AttrValue> {
        let text = |s: &Option<String>| s.as_ref().map(|v| AttrValue::Text(v.clone()));
        match attr {
            CandidateAttr::MatchAddr => Some(AttrValue::Text(self.match_addr.clone())),
            CandidateAttr::X => Some(AttrValue::Number(self.x)),
            CandidateAttr::Y => Some(AttrValue::Number(self.y)),
            CandidateAttr::Wkid => Some(AttrValue::Number(self.wkid as f64)),
            CandidateAttr::Score => Some(AttrValue::Number(self.score)),
            CandidateAttr::Confidence => text(&self.confidence),
            CandidateAttr::Locator => text(&self.locator),
            CandidateAttr::Entity => text(&self.entity),
            CandidateAttr::Geoservice => Some(AttrValue::Text(self.geoservice.clone())),
            CandidateAttr::MatchCity => text(&self.match_city),
            CandidateAttr::MatchRegion => text(&self.match_region),
            CandidateAttr::MatchPostal => text(&self.match_postal),
            CandidateAttr::MatchSubregion => text(&self.match_subregion),
            CandidateAttr::MatchCountry => text(&self.match_country),
            CandidateAttr::MatchStreetaddr => text(&self.match_streetaddr),
        }
    }

    /// Assign an attribute by name.
    ///
    /// Text written to a numeric field is parsed; numbers written to a text
    /// field are formatted. Returns `false`, leaving the candidate unchanged,
    /// when the value cannot be represented in the field.
    pub fn set(&mut self, attr: CandidateAttr, value: AttrValue) -> bool {
        if attr.is_numeric() {
            let number = match value {
                AttrValue::Number(n) => n,
                AttrValue::Text(s) => match s.trim().parse::<f64>() {
                    Ok(n) => n,
                    Err(_) => return false,
                },
            };
            match attr {
                CandidateAttr::X => self.x = number,
                CandidateAttr::Y => self.y = number,
                CandidateAttr::Score => self.score = number,
                CandidateAttr::Wkid => {
                    if number < 0.0 || number.fract() != 0.0 || number > u32::MAX as f64 {
                        return false;
                    }
                    self.wkid = number as u32;
                }
                _ => unreachable!("non-numeric attribute"),
            }
            return true;
        }

        let text = value.to_string();
        match attr {
            CandidateAttr::MatchAddr => self.match_addr = text,
            CandidateAttr::Geoservice => self.geoservice = text,
            CandidateAttr::Confidence => self.confidence = Some(text),
            CandidateAttr::Locator => self.locator = Some(text),
            CandidateAttr::Entity => self.entity = Some(text),
            CandidateAttr::MatchCity => self.match_city = Some(text),
            CandidateAttr::MatchRegion => self.match_region = Some(text),
            CandidateAttr::MatchPostal => self.match_postal = Some(text),
            CandidateAttr::MatchSubregion => self.match_subregion = Some(text),
            CandidateAttr::MatchCountry => self.match_country = Some(text),
            CandidateAttr::MatchStreetaddr => self.match_streetaddr = Some(text),
            _ => unreachable!("numeric attribute"),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sample() -> Candidate {
        Candidate::new("340 N 12th St, Philadelphia, PA 19107", -75.158, 39.958, "Bing")
            .with_score(85.0)
            .with_locator("rooftop")
    }

    #[test]
    fn test_attr_names_round_trip_through_from_str() {
        assert_eq!("match_addr".parse::<CandidateAttr>().unwrap(), CandidateAttr::MatchAddr);
        assert_eq!("x".parse::<CandidateAttr>().unwrap(), CandidateAttr::X);
        assert_eq!(CandidateAttr::MatchStreetaddr.to_string(), "match_streetaddr");
        assert!("latitude".parse::<CandidateAttr>().is_err());
    }

    #[test]
    fn test_get_returns_none_for_unset_optional_fields() {
        let c = sample();
        assert_eq!(c.get(CandidateAttr::Locator), Some(AttrValue::from("rooftop")));
        assert_eq!(c.get(CandidateAttr::Score), Some(AttrValue::Number(85.0)));
        assert_eq!(c.get(CandidateAttr::Entity), None);
        assert_eq!(c.get(CandidateAttr::MatchCity), None);
    }

    #[test]
    fn test_set_parses_text_into_numeric_fields() {
        let mut c = sample();
        assert!(c.set(CandidateAttr::Score, AttrValue::from("100")));
        assert_eq!(c.score, 100.0);

        assert!(!c.set(CandidateAttr::Score, AttrValue::from("High")));
        assert_eq!(c.score, 100.0);

        assert!(!c.set(CandidateAttr::Wkid, AttrValue::Number(-1.0)));
        assert_eq!(c.wkid, DEFAULT_WKID);
    }

    #[test]
    fn test_set_formats_numbers_into_text_fields() {
        let mut c = sample();
        assert!(c.set(CandidateAttr::Entity, AttrValue::Number(3.0)));
        assert_eq!(c.entity.as_deref(), Some("3"));
    }

    #[test]
    fn test_attr_value_hashing_folds_negative_zero() {
        let mut set = HashSet::new();
        set.insert(AttrValue::Number(0.0));
        set.insert(AttrValue::Number(-0.0));
        set.insert(AttrValue::from("0"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_prefix_match() {
        let entity = AttrValue::from("building.yes");
        assert!(entity.starts_with(&AttrValue::from("building.")));
        assert!(!entity.starts_with(&AttrValue::from("amenity.")));
        assert!(AttrValue::Number(5.0).starts_with(&AttrValue::Number(5.0)));
    }

    #[test]
    fn test_serialization_uses_schema_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["match_addr"], "340 N 12th St, Philadelphia, PA 19107");
        assert_eq!(json["locator"], "rooftop");
        assert_eq!(json["wkid"], 4326);
        assert!(json.get("entity").is_none());
    }
}
