//! Drinksfinder pub search HTTP gateway.
//!
//! Accepts public search requests, translates them into backend queries,
//! geocodes postcodes when a key is configured and answers with paginated,
//! ETag-validated JSON.
//!
//! # Endpoints
//!
//! - `GET /api/drinksfinder/v1/pubs`
//! - `GET /api/drinksfinder/v1/pubs/near`
//! - `GET /api/drinksfinder/v1/pubs/near/postcode/{postcode}`
//! - `GET /live` - Liveness probe
//! - `GET /ready` - Readiness probe, follows backend availability
//! - `GET /metrics` - Prometheus metrics endpoint
//!
//! # Configuration
//!
//! - `DATA_ACCESS_URL` - Base URL of the data-access backend (required)
//! - `GOOGLE_API_KEY_FILE` - Geocoding key file (default: /settings/google_api_key)
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//!
//! See `drinksfinder_service_shared::config` for the remaining variables.

use std::net::SocketAddr;

use tracing::{error, info};

use drinksfinder_service_shared::{
    init_logging, init_metrics, router, AppState, LoggingConfig, MetricsConfig, ServiceConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env().with_service("drinksfinder");
    init_logging(&logging_config);

    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        // Metrics are optional
        tracing::warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let config = ServiceConfig::from_env().map_err(|e| {
        error!(error = %e, "invalid configuration");
        e
    })?;

    info!(
        service = logging_config.service.as_deref().unwrap_or("drinksfinder"),
        data_access_url = %config.data_access_url,
        postcode_search = config.geocoding_api_key.is_some(),
        port = config.port,
        "starting search service"
    );

    let state = AppState::from_config(&config)?;

    let _monitor = state
        .availability_monitor()
        .with_interval(config.probe_interval)
        .spawn();

    let app = router(state, &metrics_config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
