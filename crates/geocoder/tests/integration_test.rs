//! Integration tests for the geocoder orchestrator

use std::sync::{Arc, Mutex};

use geocoder::{FailurePolicy, Geocoder, ProviderStatus};
use places::PlaceQuery;
use serde_json::{Value, json};
use services::bing::BING_ENDPOINT;
use services::nominatim::NOMINATIM_ENDPOINT;
use services::{
    Bing, JsonTransport, Nominatim, RequestParams, ServiceError, ServicePipeline, ServiceSettings,
};

/// Answers Bing and Nominatim with fixed bodies and logs endpoints hit.
struct FixtureTransport {
    bing: Value,
    nominatim: Value,
    hits: Mutex<Vec<String>>,
}

impl FixtureTransport {
    fn new(bing: Value, nominatim: Value) -> Self {
        Self {
            bing,
            nominatim,
            hits: Mutex::new(Vec::new()),
        }
    }

    fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

impl JsonTransport for FixtureTransport {
    fn get_json(&self, endpoint: &str, _params: &RequestParams) -> services::Result<Value> {
        self.hits.lock().unwrap().push(endpoint.to_string());
        match endpoint {
            BING_ENDPOINT => Ok(self.bing.clone()),
            NOMINATIM_ENDPOINT => Ok(self.nominatim.clone()),
            other => Err(ServiceError::Transport(format!("unexpected endpoint {}", other))),
        }
    }
}

fn bing_body(confidence: &str) -> Value {
    json!({"resourceSets": [{"resources": [{
        "name": "340 N 12th St, Philadelphia, PA 19107",
        "entityType": "Address",
        "confidence": confidence,
        "geocodePoints": [{"calculationMethod": "Rooftop", "coordinates": [39.959, -75.158]}],
        "address": {"locality": "Philadelphia"}
    }]}]})
}

fn nominatim_body() -> Value {
    json!([{
        "display_name": "Wolf Building, 340, North 12th Street, Philadelphia",
        "class": "building",
        "type": "yes",
        "lat": "39.9590",
        "lon": "-75.1580"
    }])
}

fn build(transport: Arc<FixtureTransport>) -> Geocoder {
    let settings = ServiceSettings::new().with("api_key", "test");
    Geocoder::new(vec![
        ServicePipeline::new(Bing::new(transport.clone(), &settings).unwrap()),
        ServicePipeline::new(Nominatim::new(transport)),
    ])
}

#[test]
fn test_high_confidence_skips_fallback() {
    let transport = Arc::new(FixtureTransport::new(bing_body("High"), nominatim_body()));
    let geocoder = build(transport.clone());

    let result = geocoder
        .geocode(&PlaceQuery::single_line("340 N 12th St, Philadelphia, PA"))
        .unwrap();

    assert!(result.threshold_met());
    assert_eq!(result.candidates.len(), 1);
    assert_eq!(result.candidates[0].geoservice, "Bing");
    assert_eq!(result.providers[1].status, ProviderStatus::Skipped);
    assert_eq!(transport.hits(), vec![BING_ENDPOINT.to_string()]);
}

#[test]
fn test_low_confidence_falls_through() {
    let transport = Arc::new(FixtureTransport::new(bing_body("Medium"), nominatim_body()));
    let geocoder = build(transport.clone());

    let result = geocoder
        .geocode(&PlaceQuery::single_line("340 N 12th St, Philadelphia, PA"))
        .unwrap();

    assert!(!result.threshold_met());
    let origins: Vec<&str> = result.candidates.iter().map(|c| c.geoservice.as_str()).collect();
    assert_eq!(origins, vec!["Bing", "Nominatim"]);
    assert_eq!(result.candidates[0].score, 85.0);
    assert_eq!(transport.hits().len(), 2);
}

#[test]
fn test_malformed_response_under_both_policies() {
    let broken = json!({"resourceSets": []});
    let transport = Arc::new(FixtureTransport::new(broken, nominatim_body()));

    let result = build(transport.clone())
        .geocode(&PlaceQuery::single_line("340 N 12th St"))
        .unwrap();
    assert_eq!(result.failures().count(), 1);
    assert_eq!(result.candidates[0].geoservice, "Nominatim");

    let aborted = build(transport)
        .with_policy(FailurePolicy::Abort)
        .geocode(&PlaceQuery::single_line("340 N 12th St"));
    assert!(aborted.is_err());
}

#[tokio::test]
async fn test_batch_geocoding() {
    let transport = Arc::new(FixtureTransport::new(bing_body("High"), nominatim_body()));
    let geocoder = build(transport);

    let queries = vec![
        PlaceQuery::single_line("340 N 12th St, Philadelphia, PA"),
        PlaceQuery::structured()
            .with_address("340 N 12th St")
            .with_city("Philadelphia"),
    ];
    let results = geocoder.geocode_many(queries).await.unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.threshold_met()));
}
