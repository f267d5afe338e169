//! Nominatim (OpenStreetMap) search adapter.
//!
//! Nominatim only takes a free-form `q`, so the default preprocessors compose
//! one from structured fields. Entities are reported as `class.type` and the
//! default postprocessors keep building-like ones.

use crate::error::Result;
use crate::json::JsonReader;
use crate::service::GeocodeService;
use crate::transport::{JsonTransport, RequestParams};
use pipeline::postprocessors::{AttrExclude, AttrFilter};
use pipeline::preprocessors::{ComposeSingleLine, ReplaceRangeWithNumber};
use pipeline::{Postprocessor, Preprocessor};
use places::{Candidate, CandidateAttr, DEFAULT_WKID, PlaceQuery};
use std::sync::Arc;

pub const NOMINATIM_ENDPOINT: &str = "http://open.mapquestapi.com/nominatim/v1/search";

/// Entity prefixes accepted by the default chain ("building." covers every
/// building type).
pub const ACCEPTED_ENTITY_PREFIXES: &[&str] = &[
    "building.",
    "historic.castle",
    "leisure.ice_rink",
    "leisure.miniature_golf",
    "leisure.sports_centre",
    "leisure.stadium",
    "leisure.track",
    "leisure.water_park",
    "man_made.lighthouse",
    "man_made.works",
    "military.barracks",
    "military.bunker",
    "office.",
    "place.house",
    "amenity.",
    "power.generator",
    "railway.station",
    "shop.",
    "tourism.",
];

/// Amenities that pass the prefix filter but are not addressable places.
pub const REJECTED_ENTITIES: &[&str] = &[
    "amenity.drinking_water",
    "amenity.bicycle_parking",
    "amenity.ev_charging",
    "amenity.grit_bin",
    "amenity.atm",
    "amenity.hunting_stand",
    "amenity.post_box",
];

pub struct Nominatim {
    transport: Arc<dyn JsonTransport>,
    endpoint: String,
}

impl Nominatim {
    pub fn new(transport: Arc<dyn JsonTransport>) -> Self {
        Self {
            transport,
            endpoint: NOMINATIM_ENDPOINT.to_string(),
        }
    }

    /// Point at another Nominatim deployment.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn build_params(pq: &PlaceQuery) -> RequestParams {
        let mut params: RequestParams = vec![
            ("q".to_string(), pq.query.clone()),
            // ISO-2 only
            ("countrycodes".to_string(), pq.country.clone()),
            ("format".to_string(), "json".to_string()),
        ];
        if let Some(viewbox) = &pq.viewbox {
            params.push(("viewbox".to_string(), viewbox.to_mapquest_str()));
            params.push(("bounded".to_string(), if pq.bounded { "1" } else { "0" }.to_string()));
        }
        params
    }

    fn candidate_from(&self, row: &JsonReader<'_>) -> Result<Candidate> {
        let entity = format!("{}.{}", row.str(&["class"])?, row.str(&["type"])?);
        let x = row.f64(&["lon"])?;
        let y = row.f64(&["lat"])?;

        // No precision is reported; parcel is the closest fit
        let mut candidate = Candidate::new(row.str(&["display_name"])?, x, y, self.name())
            .with_locator("parcel")
            .with_entity(entity);
        candidate.wkid = DEFAULT_WKID;
        Ok(candidate)
    }
}

impl GeocodeService for Nominatim {
    fn name(&self) -> &str {
        "Nominatim"
    }

    fn geocode(&self, query: &PlaceQuery) -> Result<Vec<Candidate>> {
        let params = Self::build_params(query);
        let response = self.transport.get_json(&self.endpoint, &params)?;
        let reader = JsonReader::new(self.name(), &response);

        reader
            .array(&[])?
            .iter()
            .map(|row| self.candidate_from(&JsonReader::new(self.name(), row)))
            .collect()
    }

    fn default_preprocessors(&self) -> Vec<Box<dyn Preprocessor>> {
        vec![
            Box::new(ReplaceRangeWithNumber::new()),
            Box::new(ComposeSingleLine),
        ]
    }

    fn default_postprocessors(&self) -> Vec<Box<dyn Postprocessor>> {
        vec![
            Box::new(
                AttrFilter::new(ACCEPTED_ENTITY_PREFIXES.iter().copied(), CandidateAttr::Entity)
                    .with_exact_match(false),
            ),
            Box::new(AttrExclude::new(
                REJECTED_ENTITIES.iter().copied(),
                CandidateAttr::Entity,
            )),
        ]
    }
}
