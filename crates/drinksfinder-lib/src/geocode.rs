//! Postcode to coordinate resolution through the Google Geocoding API.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::postcode::Postcode;
use crate::query::Coordinates;

/// Public endpoint of the Google Geocoding API.
pub const GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

const STATUS_OK: &str = "OK";

/// Client for the external geocoding provider.
#[derive(Clone)]
pub struct GeocodingClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl std::fmt::Debug for GeocodingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl GeocodingClient {
    /// Build a client for `endpoint` that authenticates with `api_key`.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    /// Resolve a postcode to the provider's first-ranked coordinate pair.
    ///
    /// Transport errors, non-`OK` statuses, empty result lists and results
    /// missing their location all fail with [`Error::GeocodeLookupFailed`].
    pub async fn resolve(&self, postcode: &Postcode) -> Result<Coordinates> {
        debug!(postcode = %postcode, "resolving postcode");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("address", postcode.as_str()), ("key", self.api_key.as_str())])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            // The URL carries the API key; keep it out of error messages.
            .map_err(|e| lookup_failed(format!("request failed: {}", e.without_url())))?;

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| lookup_failed(format!("unreadable response: {}", e.without_url())))?;

        body.first_location()
    }
}

fn lookup_failed(reason: impl Into<String>) -> Error {
    Error::GeocodeLookupFailed {
        reason: reason.into(),
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: Option<f64>,
    lng: Option<f64>,
}

impl GeocodeResponse {
    fn first_location(&self) -> Result<Coordinates> {
        match self.status.as_deref() {
            Some(STATUS_OK) => {}
            Some(status) => return Err(lookup_failed(format!("provider status {status}"))),
            None => return Err(lookup_failed("provider status missing")),
        }

        let first = self
            .results
            .first()
            .ok_or_else(|| lookup_failed("no results"))?;

        let location = first
            .geometry
            .as_ref()
            .and_then(|g| g.location.as_ref())
            .ok_or_else(|| lookup_failed("first result has no location"))?;

        match (location.lng, location.lat) {
            (Some(lng), Some(lat)) => Ok(Coordinates::new(lng, lat)),
            _ => Err(lookup_failed("first result has incomplete coordinates")),
        }
    }
}
