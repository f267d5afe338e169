//! Integration tests for provider pipelines

use pipeline::postprocessors::{ScoreFilter, ScoreSorter};
use pipeline::preprocessors::CancelIfPoBox;
use pipeline::{PostprocessorChain, PreprocessorChain};
use places::PlaceQuery;
use serde_json::{Value, json};
use services::{
    Bing, JsonTransport, MapQuest, Nominatim, RequestParams, Result, ServiceError,
    ServiceOutcome, ServicePipeline, ServiceSettings, UsCensus, decode_json,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Serves a canned raw body per endpoint and counts requests.
#[derive(Default)]
struct RoutedTransport {
    routes: HashMap<String, Vec<u8>>,
    calls: Mutex<Vec<String>>,
}

impl RoutedTransport {
    fn route(self, endpoint: &str, body: Value) -> Self {
        self.route_raw(endpoint, &body.to_string())
    }

    fn route_raw(mut self, endpoint: &str, body: &str) -> Self {
        self.routes.insert(endpoint.to_string(), body.as_bytes().to_vec());
        self
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl JsonTransport for RoutedTransport {
    fn get_json(&self, endpoint: &str, _params: &RequestParams) -> Result<Value> {
        self.calls.lock().unwrap().push(endpoint.to_string());
        let body = self
            .routes
            .get(endpoint)
            .ok_or_else(|| ServiceError::Transport(format!("no route for {}", endpoint)))?;
        decode_json(body)
    }
}

fn bing_body() -> Value {
    let resource = |name: &str, method: &str, confidence: &str, lon: f64| {
        json!({
            "name": name,
            "entityType": "Address",
            "confidence": confidence,
            "geocodePoints": [{"calculationMethod": method, "coordinates": [39.95, lon]}],
            "address": {"locality": "Philadelphia", "adminDistrict": "PA"}
        })
    };
    json!({"resourceSets": [{"resources": [
        resource("340 N 12th St, Philadelphia, PA", "Interpolation", "Medium", -75.1),
        resource("340 N 12th St, Philadelphia, PA", "Rooftop", "High", -75.2),
        resource("12th St, Philadelphia, PA", "Interpolation", "Low", -75.3),
    ]}]})
}

#[test]
fn test_bing_pipeline_end_to_end() {
    let transport = Arc::new(
        RoutedTransport::default().route(services::bing::BING_ENDPOINT, bing_body()),
    );
    let settings = ServiceSettings::from_toml_str("[bing]\napi_key = \"k\"", "bing").unwrap();
    let pipeline = ServicePipeline::new(Bing::new(transport.clone(), &settings).unwrap());

    let outcome = pipeline
        .run(PlaceQuery::single_line("340-42 N 12th St, Philadelphia, PA"))
        .unwrap();

    assert!(outcome.threshold_met());
    let candidates = outcome.candidates();
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].score, 100.0);
    assert_eq!(candidates[0].locator.as_deref(), Some("rooftop"));
    assert_eq!(candidates[1].match_addr, "12th St, Philadelphia, PA");
    assert_eq!(transport.call_count(), 1);
}

#[test]
fn test_overridden_postprocessors() {
    let transport = Arc::new(
        RoutedTransport::default().route(services::bing::BING_ENDPOINT, bing_body()),
    );
    let settings = ServiceSettings::new().with("api_key", "k");
    let post = PostprocessorChain::new().add(ScoreSorter).add(ScoreFilter::new(1.0));
    let pipeline =
        ServicePipeline::new(Bing::new(transport, &settings).unwrap()).with_postprocessors(post);

    // Without the confidence migration every score stays at zero
    let outcome = pipeline.run(PlaceQuery::single_line("340 N 12th St")).unwrap();
    assert!(outcome.candidates().is_empty());
    assert!(!outcome.threshold_met());
}

#[test]
fn test_transport_failure_surfaces() {
    let transport = Arc::new(RoutedTransport::default());
    let pipeline = ServicePipeline::new(UsCensus::new(transport));
    let result = pipeline.run(PlaceQuery::single_line("1600 N Broad St"));
    assert!(matches!(result, Err(ServiceError::Transport(_))));
}

#[test]
fn test_non_json_body_surfaces() {
    let transport = Arc::new(
        RoutedTransport::default().route_raw(services::bing::BING_ENDPOINT, "<html>502</html>"),
    );
    let settings = ServiceSettings::new().with("api_key", "k");
    let bing = ServicePipeline::new(Bing::new(transport.clone(), &settings).unwrap());

    let result = bing.run(PlaceQuery::single_line("340 N 12th St"));
    assert!(matches!(result, Err(ServiceError::Json(_))));
    assert_eq!(transport.call_count(), 1);
}

#[test]
fn test_census_structured_route() {
    let endpoint = format!("{}address", services::census::CENSUS_ENDPOINT_BASE);
    let body = json!({"result": {"addressMatches": [{
        "matchedAddress": "1600 N BROAD ST, PHILADELPHIA, PA, 19121",
        "coordinates": {"x": -75.16, "y": 39.98},
        "addressComponents": {"streetName": "BROAD", "suffixType": "ST", "zip": "19121"}
    }]}});
    let transport = Arc::new(RoutedTransport::default().route(&endpoint, body));
    let pipeline = ServicePipeline::new(UsCensus::new(transport));

    let pq = PlaceQuery::structured()
        .with_address("1600 N Broad St")
        .with_postal("19121");
    let candidates = pipeline.run(pq).unwrap().into_candidates();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].match_streetaddr.as_deref(), Some("1600 BROAD ST"));
    assert_eq!(candidates[0].match_postal.as_deref(), Some("19121"));
}

#[test]
fn test_mapquest_missing_key_is_rejected() {
    let transport = Arc::new(RoutedTransport::default());
    let result = MapQuest::new(transport, &ServiceSettings::new());
    assert!(matches!(result, Err(ServiceError::MissingSetting(key)) if key == "api_key"));
}

#[test]
fn test_nominatim_cancelled_query_makes_no_request() {
    let transport = Arc::new(RoutedTransport::default());
    let nominatim = ServicePipeline::new(Nominatim::new(transport.clone()))
        .with_preprocessors(PreprocessorChain::new().add(CancelIfPoBox::new()));

    let outcome = nominatim.run(PlaceQuery::single_line("P.O. Box 7")).unwrap();
    assert!(matches!(outcome, ServiceOutcome::Cancelled(_)));
    assert_eq!(transport.call_count(), 0);
}
