//! Bing Maps Locations API adapter.
//!
//! Free-form queries go out as `query`; otherwise the structured fields are
//! sent as `addressLine`, `locality`, `adminDistrict`, `postalCode` and
//! `countryRegion`. Bing reports confidence as High/Medium/Low, which the
//! default postprocessors migrate into `score`.

use crate::error::Result;
use crate::json::JsonReader;
use crate::service::GeocodeService;
use crate::settings::ServiceSettings;
use crate::transport::{JsonTransport, RequestParams};
use pipeline::postprocessors::{
    AttrFilter, AttrMigrator, AttrRename, AttrSorter, GroupBy, ScoreSorter, UseHighScoreIfAtLeast,
};
use pipeline::preprocessors::ReplaceRangeWithNumber;
use pipeline::{Postprocessor, Preprocessor};
use places::{Candidate, CandidateAttr, DEFAULT_WKID, PlaceQuery};
use std::sync::Arc;
use tracing::debug;

pub const BING_ENDPOINT: &str = "https://dev.virtualearth.net/REST/v1/Locations";

/// Bing entity types that count as an addressable place.
pub const ACCEPTED_ENTITIES: &[&str] = &[
    "Address",
    "AdministrativeBuilding",
    "AgriculturalStructure",
    "BusinessName",
    "BusinessStructure",
    "BusStation",
    "Camp",
    "Church",
    "CityHall",
    "CommunityCenter",
    "ConventionCenter",
    "Courthouse",
    "Factory",
    "FerryTerminal",
    "FishHatchery",
    "Fort",
    "Garden",
    "Geyser",
    "Heliport",
    "IndustrialStructure",
    "InformationCenter",
    "Junction",
    "LandmarkBuilding",
    "Library",
    "Lighthouse",
    "Marina",
    "MedicalStructure",
    "MetroStation",
    "Mine",
    "Mission",
    "Monument",
    "Mosque",
    "Museum",
    "NauticalStructure",
    "NavigationalStructure",
    "OfficeBuilding",
    "ParkAndRide",
    "PlayingField",
    "PoliceStation",
    "PostOffice",
    "PowerStation",
    "Prison",
    "RaceTrack",
    "ReligiousStructure",
    "RestArea",
    "Ruin",
    "ShoppingCenter",
    "Site",
    "SkiArea",
    "Spring",
    "Stadium",
    "Temple",
    "TouristStructure",
];

pub struct Bing {
    transport: Arc<dyn JsonTransport>,
    api_key: String,
}

impl Bing {
    /// Requires the `api_key` setting.
    pub fn new(transport: Arc<dyn JsonTransport>, settings: &ServiceSettings) -> Result<Self> {
        let api_key = settings.require("api_key")?.to_string();
        Ok(Self { transport, api_key })
    }

    fn build_params(&self, pq: &PlaceQuery) -> RequestParams {
        let mut params = RequestParams::new();
        if pq.uses_single_line() {
            params.push(("query".to_string(), pq.query.clone()));
        } else {
            let structured = [
                ("addressLine", &pq.address),
                ("locality", &pq.city),
                ("adminDistrict", &pq.state),
                ("postalCode", &pq.postal),
                ("countryRegion", &pq.country),
            ];
            params.extend(
                structured
                    .into_iter()
                    .filter(|(_, value)| !value.trim().is_empty())
                    .map(|(key, value)| (key.to_string(), value.clone())),
            );
        }

        if let Some(viewbox) = &pq.viewbox {
            params.push(("umv".to_string(), viewbox.to_bing_str()));
        }
        if let Some(culture) = &pq.culture {
            params.push(("c".to_string(), culture.clone()));
        }
        if let Some(ip) = &pq.user_ip {
            params.push(("uip".to_string(), ip.clone()));
        }
        if let Some((lat, lon)) = pq.user_location {
            params.push(("ul".to_string(), format!("{:.6},{:.6}", lat, lon)));
        }
        params.push(("key".to_string(), self.api_key.clone()));
        params
    }

    fn candidate_from(&self, row: &JsonReader<'_>) -> Result<Candidate> {
        // Bing returns [lat, lon]
        let y = row.f64(&["geocodePoints", "0", "coordinates", "0"])?;
        let x = row.f64(&["geocodePoints", "0", "coordinates", "1"])?;

        let mut candidate = Candidate::new(row.str(&["name"])?, x, y, self.name())
            .with_entity(row.str(&["entityType"])?)
            .with_locator(row.str(&["geocodePoints", "0", "calculationMethod"])?)
            .with_confidence(row.str(&["confidence"])?);
        candidate.wkid = DEFAULT_WKID;
        candidate.match_streetaddr = row.opt_str(&["address", "addressLine"]);
        candidate.match_city = row.opt_str(&["address", "locality"]);
        candidate.match_region = row.opt_str(&["address", "adminDistrict"]);
        candidate.match_subregion = row.opt_str(&["address", "adminDistrict2"]);
        candidate.match_postal = row.opt_str(&["address", "postalCode"]);
        candidate.match_country = row.opt_str(&["address", "countryRegion"]);
        Ok(candidate)
    }
}

impl GeocodeService for Bing {
    fn name(&self) -> &str {
        "Bing"
    }

    fn geocode(&self, query: &PlaceQuery) -> Result<Vec<Candidate>> {
        let params = self.build_params(query);
        let response = self.transport.get_json(BING_ENDPOINT, &params)?;
        let reader = JsonReader::new(self.name(), &response);

        let rows = reader.array(&["resourceSets", "0", "resources"])?;
        debug!("Bing returned {} resources", rows.len());
        rows.iter()
            .map(|row| self.candidate_from(&JsonReader::new(self.name(), row)))
            .collect()
    }

    fn default_preprocessors(&self) -> Vec<Box<dyn Preprocessor>> {
        vec![Box::new(ReplaceRangeWithNumber::new())]
    }

    fn default_postprocessors(&self) -> Vec<Box<dyn Postprocessor>> {
        vec![
            Box::new(AttrMigrator::new(
                CandidateAttr::Confidence,
                CandidateAttr::Score,
                [("High", 100), ("Medium", 85), ("Low", 50)],
            )),
            Box::new(UseHighScoreIfAtLeast::new(100.0)),
            Box::new(AttrFilter::new(
                ACCEPTED_ENTITIES.iter().copied(),
                CandidateAttr::Entity,
            )),
            Box::new(AttrRename::new(
                CandidateAttr::Locator,
                [
                    ("Rooftop", "rooftop"),
                    ("Parcel", "parcel"),
                    ("ParcelCentroid", "parcel"),
                    ("Interpolation", "interpolation"),
                    ("InterpolationOffset", "interpolation_offset"),
                ],
            )),
            Box::new(AttrSorter::new(
                ["rooftop", "parcel", "interpolation_offset", "interpolation"],
                CandidateAttr::Locator,
            )),
            Box::new(AttrSorter::new(["Address"], CandidateAttr::Entity)),
            Box::new(ScoreSorter),
            Box::new(GroupBy::composite([CandidateAttr::X, CandidateAttr::Y])),
            Box::new(GroupBy::new(CandidateAttr::MatchAddr)),
        ]
    }
}
