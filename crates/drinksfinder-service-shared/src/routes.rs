//! Router and search handler.
//!
//! # Endpoints
//!
//! - `GET /api/drinksfinder/v1/pubs` - List pubs, optionally ordered
//! - `GET /api/drinksfinder/v1/pubs/near` - Pubs nearest the office
//! - `GET /api/drinksfinder/v1/pubs/near/postcode/{postcode}` - Pubs nearest a postcode
//! - `GET /live` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics (when enabled)
//!
//! Search endpoints accept `order_by`, repeated `tag`, `start` and `limit`
//! query parameters and honour `If-None-Match`.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use tower_http::trace::TraceLayer;

use drinksfinder_lib::{Error as LibError, SearchRequest};

use crate::api_error::{from_lib_error, ApiError};
use crate::health::{health_live, health_ready};
use crate::metrics::{metrics_handler, record_search_completed, record_search_failed, MetricsConfig};
use crate::middleware::MetricsLayer;
use crate::response::CachedJson;
use crate::AppState;

/// Base path of the search API.
pub const API_BASE_PATH: &str = "/api/drinksfinder/v1";

/// Build the service router.
pub fn router(state: AppState, metrics: &MetricsConfig) -> Router {
    let mut router = Router::new()
        .route(&format!("{API_BASE_PATH}/{{*path}}"), get(search_handler))
        .route("/live", get(health_live))
        .route("/ready", get(health_ready));

    if metrics.enabled {
        router = router.route(&metrics.path, get(metrics_handler));
    }

    router
        .fallback(not_found)
        .layer(MetricsLayer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle every search endpoint below [`API_BASE_PATH`].
///
/// The path is taken from the raw URI so the postcode segment reaches the
/// translator still percent-encoded.
pub async fn search_handler(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let path = uri.path().strip_prefix(API_BASE_PATH).unwrap_or(uri.path());

    match run_search(&state, path, uri.query()).await {
        Ok(cached) => cached.respond_to(&headers),
        Err(error) => error.into_response(),
    }
}

async fn run_search(
    state: &AppState,
    path: &str,
    query: Option<&str>,
) -> Result<CachedJson, ApiError> {
    let request = SearchRequest::parse(path, query).map_err(|e| search_failed(&e))?;

    let page = state
        .search()
        .search(&request)
        .await
        .map_err(|e| search_failed(&e))?;

    record_search_completed(request.mode.label(), page.count);
    CachedJson::new(&page)
}

fn search_failed(error: &LibError) -> ApiError {
    record_search_failed(error.reason());
    from_lib_error(error)
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
