//! Address search requests.
//!
//! A `PlaceQuery` is built once per geocode request. Preprocessors may rewrite
//! it before a provider sees it; provider adapters only read it.

use crate::error::{PlacesError, Result};
use serde::{Deserialize, Serialize};

/// Default spatial reference (WGS84).
pub const DEFAULT_WKID: u32 = 4326;

// =============================================================================
// Viewbox
// =============================================================================

/// Geographic bounding box used to bias or bound a search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewbox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub wkid: u32,
}

impl Viewbox {
    /// Create a WGS84 viewbox, rejecting inverted edges.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Result<Self> {
        if left > right || bottom > top {
            return Err(PlacesError::InvalidViewbox {
                left,
                right,
                bottom,
                top,
            });
        }
        Ok(Self {
            left,
            top,
            right,
            bottom,
            wkid: DEFAULT_WKID,
        })
    }

    /// Override the spatial reference (default: 4326)
    pub fn with_wkid(mut self, wkid: u32) -> Self {
        self.wkid = wkid;
        self
    }

    /// Bing `umv` format: south, west, north, east.
    pub fn to_bing_str(&self) -> String {
        format!("{},{},{},{}", self.bottom, self.left, self.top, self.right)
    }

    /// MapQuest / Nominatim format: left, top, right, bottom.
    pub fn to_mapquest_str(&self) -> String {
        format!("{},{},{},{}", self.left, self.top, self.right, self.bottom)
    }
}

// =============================================================================
// PlaceQuery
// =============================================================================

/// Structured query field that preprocessors can address by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryField {
    Query,
    Address,
    City,
    State,
    Postal,
    Country,
    Subregion,
}

impl QueryField {
    /// Fields that describe the address itself rather than constrain it.
    pub const ADDRESS_COMPONENTS: [QueryField; 4] = [
        QueryField::Address,
        QueryField::City,
        QueryField::State,
        QueryField::Postal,
    ];
}

/// An address search request, free-form or structured.
///
/// Text fields use the empty string for "not set"; the genuinely optional
/// hints are modelled as `Option` so adapters test presence directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceQuery {
    /// Single-line address ("340 N 12th St, Philadelphia, PA 19107")
    pub query: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal: String,
    pub country: String,
    /// County or equivalent
    pub subregion: String,
    pub viewbox: Option<Viewbox>,
    /// Restrict results to the viewbox rather than just biasing them
    pub bounded: bool,
    /// Locale hint such as "en-US"
    pub culture: Option<String>,
    pub user_ip: Option<String>,
    /// Caller position as (lat, lon)
    pub user_location: Option<(f64, f64)>,
}

impl PlaceQuery {
    /// Create a free-form query.
    pub fn single_line(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Create an empty structured query; fill it with the `with_*` setters.
    pub fn structured() -> Self {
        Self::default()
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    pub fn with_postal(mut self, postal: impl Into<String>) -> Self {
        self.postal = postal.into();
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    pub fn with_subregion(mut self, subregion: impl Into<String>) -> Self {
        self.subregion = subregion.into();
        self
    }

    pub fn with_viewbox(mut self, viewbox: Viewbox, bounded: bool) -> Self {
        self.viewbox = Some(viewbox);
        self.bounded = bounded;
        self
    }

    pub fn with_culture(mut self, culture: impl Into<String>) -> Self {
        self.culture = Some(culture.into());
        self
    }

    pub fn with_user_ip(mut self, ip: impl Into<String>) -> Self {
        self.user_ip = Some(ip.into());
        self
    }

    pub fn with_user_location(mut self, lat: f64, lon: f64) -> Self {
        self.user_location = Some((lat, lon));
        self
    }

    /// Whether adapters should send the free-form string.
    ///
    /// Free-form takes precedence whenever it is non-blank.
    pub fn uses_single_line(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// True when any of `QueryField::ADDRESS_COMPONENTS` is set.
    ///
    /// Country and subregion only constrain the search and do not count.
    pub fn has_structured_fields(&self) -> bool {
        QueryField::ADDRESS_COMPONENTS
            .iter()
            .any(|f| !self.field(*f).trim().is_empty())
    }

    pub fn field(&self, field: QueryField) -> &str {
        match field {
            QueryField::Query => &self.query,
            QueryField::Address => &self.address,
            QueryField::City => &self.city,
            QueryField::State => &self.state,
            QueryField::Postal => &self.postal,
            QueryField::Country => &self.country,
            QueryField::Subregion => &self.subregion,
        }
    }

    pub fn field_mut(&mut self, field: QueryField) -> &mut String {
        match field {
            QueryField::Query => &mut self.query,
            QueryField::Address => &mut self.address,
            QueryField::City => &mut self.city,
            QueryField::State => &mut self.state,
            QueryField::Postal => &mut self.postal,
            QueryField::Country => &mut self.country,
            QueryField::Subregion => &mut self.subregion,
        }
    }
}
