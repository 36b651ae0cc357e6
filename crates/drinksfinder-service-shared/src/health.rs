//! Liveness and readiness probes.
//!
//! `/live` answers `OK` for as long as the process serves requests.
//! `/ready` answers `OK` while the availability monitor last saw the backend
//! as healthy, and an empty 503 otherwise.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::AppState;

/// Liveness probe handler.
pub async fn health_live() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness probe handler.
pub async fn health_ready(State(state): State<AppState>) -> Response {
    if state.health().is_healthy() {
        (StatusCode::OK, "OK").into_response()
    } else {
        StatusCode::SERVICE_UNAVAILABLE.into_response()
    }
}
