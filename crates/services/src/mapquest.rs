//! MapQuest geocoding adapter (licensed, SSL and open endpoints).
//!
//! The location is sent as a JSON document in the `json` parameter; blank
//! query fields are left out of it.

use crate::error::Result;
use crate::json::JsonReader;
use crate::service::GeocodeService;
use crate::settings::ServiceSettings;
use crate::transport::{JsonTransport, RequestParams};
use places::{Candidate, DEFAULT_WKID, PlaceQuery};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Response fields joined into `match_addr`, in order.
const MATCH_ADDR_FIELDS: [&str; 5] = [
    "street",
    "adminArea5",
    "adminArea3",
    "adminArea2",
    "postalCode",
];

/// Which MapQuest deployment to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapQuestEndpoint {
    #[default]
    Licensed,
    Ssl,
    Open,
}

impl MapQuestEndpoint {
    pub fn url(&self) -> &'static str {
        match self {
            MapQuestEndpoint::Licensed => "http://www.mapquestapi.com/geocoding/v1/address",
            MapQuestEndpoint::Ssl => "https://www.mapquestapi.com/geocoding/v1/address",
            MapQuestEndpoint::Open => "http://open.mapquestapi.com/geocoding/v1/address",
        }
    }

    fn service_name(&self) -> &'static str {
        match self {
            MapQuestEndpoint::Licensed => "MapQuest",
            MapQuestEndpoint::Ssl => "MapQuestSSL",
            MapQuestEndpoint::Open => "MapQuestOpen",
        }
    }
}

pub struct MapQuest {
    transport: Arc<dyn JsonTransport>,
    api_key: String,
    endpoint: MapQuestEndpoint,
}

impl MapQuest {
    /// Licensed endpoint. Requires the `api_key` setting.
    pub fn new(transport: Arc<dyn JsonTransport>, settings: &ServiceSettings) -> Result<Self> {
        Self::with_endpoint(transport, settings, MapQuestEndpoint::Licensed)
    }

    pub fn with_endpoint(
        transport: Arc<dyn JsonTransport>,
        settings: &ServiceSettings,
        endpoint: MapQuestEndpoint,
    ) -> Result<Self> {
        let api_key = settings.require("api_key")?.to_string();
        Ok(Self {
            transport,
            api_key,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> MapQuestEndpoint {
        self.endpoint
    }

    fn location(pq: &PlaceQuery) -> Map<String, Value> {
        let street = if pq.uses_single_line() { &pq.query } else { &pq.address };
        let fields = [
            ("street", street),
            ("city", &pq.city),
            ("county", &pq.subregion),
            ("state", &pq.state),
            ("postalCode", &pq.postal),
            ("country", &pq.country),
        ];
        fields
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.to_string(), Value::String(value.clone())))
            .collect()
    }

    fn build_params(&self, pq: &PlaceQuery) -> RequestParams {
        let mut location = Map::new();
        location.insert("location".to_string(), Value::Object(Self::location(pq)));
        let body = Value::Object(location).to_string();
        debug!("MapQuest location: {}", body);

        let mut params: RequestParams = vec![
            ("key".to_string(), self.api_key.clone()),
            ("json".to_string(), body),
        ];
        if let Some(viewbox) = &pq.viewbox {
            params.push(("viewbox".to_string(), viewbox.to_mapquest_str()));
        }
        params
    }

    fn candidate_from(&self, row: &JsonReader<'_>) -> Result<Candidate> {
        let match_addr = MATCH_ADDR_FIELDS
            .iter()
            .filter_map(|field| row.opt_str(&[*field]))
            .collect::<Vec<_>>()
            .join(", ");
        let x = row.f64(&["latLng", "lng"])?;
        let y = row.f64(&["latLng", "lat"])?;

        let mut candidate = Candidate::new(match_addr, x, y, self.name())
            .with_locator(row.str(&["geocodeQuality"])?)
            .with_confidence(row.str(&["geocodeQualityCode"])?);
        candidate.wkid = DEFAULT_WKID;
        Ok(candidate)
    }
}

impl GeocodeService for MapQuest {
    fn name(&self) -> &str {
        self.endpoint.service_name()
    }

    fn geocode(&self, query: &PlaceQuery) -> Result<Vec<Candidate>> {
        let params = self.build_params(query);
        let response = self.transport.get_json(self.endpoint.url(), &params)?;
        let reader = JsonReader::new(self.name(), &response);

        reader
            .array(&["results", "0", "locations"])?
            .iter()
            .map(|row| self.candidate_from(&JsonReader::new(self.name(), row)))
            .collect()
    }
}
