//! US Census Bureau geocoder adapter.
//!
//! US addresses only; no API key. Free-form queries use the
//! `onelineaddress` endpoint, structured ones the `address` endpoint.

use crate::error::Result;
use crate::json::JsonReader;
use crate::service::GeocodeService;
use crate::transport::{JsonTransport, RequestParams};
use places::{Candidate, PlaceQuery};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

pub const CENSUS_ENDPOINT_BASE: &str = "https://geocoding.geo.census.gov/geocoder/locations/";
pub const CENSUS_BENCHMARK: &str = "Public_AR_Current";

/// Street components in the order they are joined after the house number.
const STREET_FIELDS: [&str; 7] = [
    "preQualifier",
    "preDirection",
    "preType",
    "streetName",
    "suffixType",
    "suffixDirection",
    "suffixQualifier",
];

pub struct UsCensus {
    transport: Arc<dyn JsonTransport>,
}

impl UsCensus {
    pub fn new(transport: Arc<dyn JsonTransport>) -> Self {
        Self { transport }
    }

    fn build_request(pq: &PlaceQuery) -> (String, RequestParams) {
        let mut params: RequestParams = vec![
            ("format".to_string(), "json".to_string()),
            ("benchmark".to_string(), CENSUS_BENCHMARK.to_string()),
        ];
        let endpoint = if pq.uses_single_line() {
            params.push(("address".to_string(), pq.query.clone()));
            format!("{}onelineaddress", CENSUS_ENDPOINT_BASE)
        } else {
            for (key, value) in [
                ("street", &pq.address),
                ("city", &pq.city),
                ("state", &pq.state),
                ("zip", &pq.postal),
            ] {
                params.push((key.to_string(), value.clone()));
            }
            format!("{}address", CENSUS_ENDPOINT_BASE)
        };
        (endpoint, params)
    }

    /// House number plus street components, e.g. "1600 N Broad St".
    ///
    /// The response only carries the from/to range of the matched segment,
    /// so the number is taken from the start of `matchedAddress`. Without a
    /// leading number there is no street address.
    fn street_address(matched_addr: &str, components: Option<&Value>) -> Option<String> {
        let number: String = matched_addr
            .trim_start()
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        if number.is_empty() {
            return None;
        }

        let mut parts = vec![number];
        if let Some(components) = components {
            parts.extend(
                STREET_FIELDS
                    .iter()
                    .filter_map(|field| components.get(*field).and_then(Value::as_str))
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            );
        }
        Some(parts.join(" "))
    }

    fn candidate_from(&self, row: &JsonReader<'_>) -> Result<Candidate> {
        let matched = row.str(&["matchedAddress"])?;
        let x = row.f64(&["coordinates", "x"])?;
        let y = row.f64(&["coordinates", "y"])?;

        let mut candidate = Candidate::new(matched, x, y, self.name());
        candidate.match_city = row.opt_str(&["addressComponents", "city"]);
        candidate.match_region = row.opt_str(&["addressComponents", "state"]);
        candidate.match_postal = row.opt_text(&["addressComponents", "zip"]);
        // Census has no county and only US results
        candidate.match_subregion = None;
        candidate.match_country = Some("USA".to_string());
        candidate.match_streetaddr =
            Self::street_address(matched, row.value(&["addressComponents"]).ok());
        Ok(candidate)
    }
}

impl GeocodeService for UsCensus {
    fn name(&self) -> &str {
        "USCensus"
    }

    fn geocode(&self, query: &PlaceQuery) -> Result<Vec<Candidate>> {
        let (endpoint, params) = Self::build_request(query);
        debug!("Census request to {} with {} params", endpoint, params.len());
        let response = self.transport.get_json(&endpoint, &params)?;
        let reader = JsonReader::new(self.name(), &response);

        reader
            .array(&["result", "addressMatches"])?
            .iter()
            .map(|row| self.candidate_from(&JsonReader::new(self.name(), row)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::canned::CannedTransport;
    use crate::transport::param;
    use serde_json::json;

    fn response() -> Value {
        json!({
            "result": {
                "addressMatches": [{
                    "matchedAddress": "1600 N BROAD ST, PHILADELPHIA, PA, 19121",
                    "coordinates": {"x": -75.1597, "y": 39.9788},
                    "addressComponents": {
                        "preDirection": "N",
                        "streetName": "BROAD",
                        "suffixType": "ST",
                        "suffixDirection": "",
                        "city": "PHILADELPHIA",
                        "state": "PA",
                        "zip": "19121"
                    }
                }]
            }
        })
    }

    #[test]
    fn test_single_line_endpoint() {
        let transport = Arc::new(CannedTransport::new(response()));
        let census = UsCensus::new(transport.clone());
        census
            .geocode(&PlaceQuery::single_line("1600 N Broad St, Philadelphia, PA"))
            .unwrap();

        let (endpoint, params) = transport.last_request();
        assert!(endpoint.ends_with("/onelineaddress"));
        assert_eq!(param(&params, "address"), Some("1600 N Broad St, Philadelphia, PA"));
        assert_eq!(param(&params, "benchmark"), Some("Public_AR_Current"));
        assert_eq!(param(&params, "format"), Some("json"));
    }

    #[test]
    fn test_structured_endpoint() {
        let transport = Arc::new(CannedTransport::new(response()));
        let census = UsCensus::new(transport.clone());
        let pq = PlaceQuery::structured()
            .with_address("1600 N Broad St")
            .with_city("Philadelphia")
            .with_state("PA")
            .with_postal("19121");
        census.geocode(&pq).unwrap();

        let (endpoint, params) = transport.last_request();
        assert!(endpoint.ends_with("/address"));
        assert_eq!(param(&params, "street"), Some("1600 N Broad St"));
        assert_eq!(param(&params, "zip"), Some("19121"));
        assert_eq!(param(&params, "address"), None);
    }

    #[test]
    fn test_maps_matches() {
        let census = UsCensus::new(Arc::new(CannedTransport::new(response())));
        let candidates = census.geocode(&PlaceQuery::single_line("x")).unwrap();

        assert_eq!(candidates.len(), 1);
        let c = &candidates[0];
        assert_eq!(c.geoservice, "USCensus");
        assert_eq!(c.x, -75.1597);
        assert_eq!(c.match_city.as_deref(), Some("PHILADELPHIA"));
        assert_eq!(c.match_country.as_deref(), Some("USA"));
        assert_eq!(c.match_subregion, None);
        assert_eq!(c.match_streetaddr.as_deref(), Some("1600 N BROAD ST"));
    }

    #[test]
    fn test_street_address_needs_house_number() {
        let components = json!({"streetName": "BROAD"});
        assert_eq!(
            UsCensus::street_address("N BROAD ST, PHILADELPHIA", Some(&components)),
            None
        );
        assert_eq!(
            UsCensus::street_address("12 BROAD ST", None).as_deref(),
            Some("12")
        );
    }

    #[test]
    fn test_no_matches_is_empty() {
        let transport = Arc::new(CannedTransport::new(json!({"result": {"addressMatches": []}})));
        let census = UsCensus::new(transport);
        assert!(census.geocode(&PlaceQuery::single_line("nowhere")).unwrap().is_empty());
    }
}
