//! HTTP layer of the drinksfinder search gateway.
//!
//! This crate provides everything the service binary wires together:
//!
//! - [`AppState`]: The search service and the backend health flag
//! - [`router`]: The axum router with search, probe and metrics routes
//! - [`ServiceConfig`]: Configuration from the environment
//! - [`ApiError`]: Mapping of library errors to status codes
//! - [`CachedJson`]: JSON bodies with content-hash ETags
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: Structured JSON logging setup
//! - [`middleware`]: Request tracking and metrics middleware
//!
//! # Architecture
//!
//! Handlers stay thin; validation, geocoding, backend access and pagination
//! live in `drinksfinder-lib`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum handler                                               │
//! │  - Split path and query string                              │
//! │  - Call drinksfinder-lib SearchService                      │
//! │  - Map errors to status codes                               │
//! │  - Serialize, fingerprint, answer 200 or 304                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module builds state against mock upstream servers.
//! Enable the `test-utils` feature to access it from dependent crates.

mod api_error;
pub mod config;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod response;
mod routes;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use api_error::{from_lib_error, ApiError, ErrorBody};
pub use config::{ConfigError, ServiceConfig};
pub use health::{health_live, health_ready};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{init_metrics, metrics_handler, MetricsConfig, MetricsError};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId};
pub use response::CachedJson;
pub use routes::{router, search_handler, API_BASE_PATH};
pub use state::AppState;
