//! Drinksfinder library entry points.
//!
//! This crate holds the search gateway's core: validating inbound search
//! requests, geocoding postcodes, querying the data-access backend, windowing
//! the results and fingerprinting response bodies. It also owns the backend
//! availability monitor. HTTP serving lives in `drinksfinder-service-shared`.

pub mod backend;
pub mod error;
pub mod etag;
pub mod geocode;
pub mod monitor;
pub mod pagination;
pub mod postcode;
pub mod query;
pub mod search;

pub use backend::{BackendClient, BackendRecord};
pub use error::{Error, ErrorKind, Result};
pub use geocode::{GeocodingClient, GOOGLE_GEOCODE_URL};
pub use monitor::{AvailabilityMonitor, HealthState, ProbeObserver, DEFAULT_PROBE_INTERVAL};
pub use pagination::{Page, Pagination};
pub use postcode::Postcode;
pub use query::{
    BackendQuery, Coordinates, OrderBy, SearchMode, SearchRequest, OFFICE_LOCATION, ORDER_FIELDS,
};
pub use search::{ResultEnvelope, SearchService};
