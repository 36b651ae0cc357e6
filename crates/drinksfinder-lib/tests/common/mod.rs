//! Shared helpers for integration tests against mocked upstream services.

use std::time::Duration;

use drinksfinder_lib::{BackendClient, GeocodingClient};
use httpmock::MockServer;
use reqwest::Url;

#[allow(dead_code)]
pub const TEST_API_KEY: &str = "test-key";

/// Backend client pointed at the root of `server`.
pub fn backend_client(server: &MockServer) -> BackendClient {
    backend_client_with_timeout(server, Duration::from_secs(5))
}

#[allow(dead_code)]
pub fn backend_client_with_timeout(server: &MockServer, timeout: Duration) -> BackendClient {
    let url = Url::parse(&server.url("/")).expect("mock server url");
    BackendClient::new(url, timeout).expect("backend client")
}

/// Geocoding client pointed at `/geocode/json` on `server`.
#[allow(dead_code)]
pub fn geocoding_client(server: &MockServer) -> GeocodingClient {
    geocoding_client_with_timeout(server, Duration::from_secs(5))
}

#[allow(dead_code)]
pub fn geocoding_client_with_timeout(server: &MockServer, timeout: Duration) -> GeocodingClient {
    GeocodingClient::new(server.url("/geocode/json"), TEST_API_KEY, timeout)
        .expect("geocoding client")
}
