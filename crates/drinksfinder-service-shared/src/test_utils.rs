//! Test utilities for handler testing.
//!
//! Builds application state whose backend and geocoding provider point at
//! caller-supplied base URLs, typically `httpmock` servers.

use std::time::Duration;

use reqwest::Url;
use serde_json::{json, Value};

use crate::config::ServiceConfig;
use crate::state::AppState;

/// Geocoding key used by [`state_with_geocoder`].
pub const TEST_API_KEY: &str = "test-key";

/// Path of the geocoding endpoint on the mock provider.
pub const GEOCODE_PATH: &str = "/geocode/json";

/// Configuration for a backend at `backend_base`, without geocoding.
pub fn test_config(backend_base: &str) -> ServiceConfig {
    let url = Url::parse(backend_base)
        .unwrap_or_else(|e| panic!("invalid backend url {backend_base:?}: {e}"));
    let mut config = ServiceConfig::new(url);
    config.backend_timeout = Duration::from_secs(2);
    config.geocoding_timeout = Duration::from_secs(2);
    config
}

/// State for a backend at `backend_base` with postcode search switched off.
pub fn state_without_geocoder(backend_base: &str) -> AppState {
    AppState::from_config(&test_config(backend_base))
        .unwrap_or_else(|e| panic!("failed to build test state: {e}"))
}

/// State for a backend at `backend_base` and a geocoder rooted at `geocoder_base`.
pub fn state_with_geocoder(backend_base: &str, geocoder_base: &str) -> AppState {
    let config = test_config(backend_base)
        .with_geocoding_api_key(TEST_API_KEY)
        .with_geocoding_url(format!("{}{}", geocoder_base.trim_end_matches('/'), GEOCODE_PATH));
    AppState::from_config(&config).unwrap_or_else(|e| panic!("failed to build test state: {e}"))
}

/// Ten pub records in backend order, named "Pub 1" to "Pub 10".
pub fn sample_pubs() -> Value {
    Value::Array(
        (1..=10)
            .map(|n| {
                json!({
                    "name": format!("Pub {n}"),
                    "stars_beer": "4.5",
                    "tags": "food,garden",
                    "lat": "53.80",
                    "lng": "-1.55"
                })
            })
            .collect(),
    )
}

/// A successful geocoding response for one location.
pub fn geocode_response(lat: f64, lng: f64) -> Value {
    json!({
        "status": "OK",
        "results": [{"geometry": {"location": {"lat": lat, "lng": lng}}}]
    })
}
