//! Prometheus metrics for the drinksfinder service.
//!
//! This module provides:
//! - [`MetricsConfig`]: Configuration for the metrics system
//! - [`init_metrics`]: Initialize the Prometheus metrics recorder
//! - [`metrics_handler`]: Axum handler for `/metrics` endpoint
//! - Business metric helpers for searches and backend availability

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// Global Prometheus handle for rendering metrics.
static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Configuration for the metrics system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Path for the metrics endpoint (e.g., "/metrics").
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// `METRICS_ENABLED` ("false" switches metrics off) and `METRICS_PATH`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let enabled = lookup("METRICS_ENABLED")
            .map(|v| !v.trim().eq_ignore_ascii_case("false"))
            .unwrap_or(true);
        let path = lookup("METRICS_PATH")
            .filter(|p| p.starts_with('/'))
            .unwrap_or_else(|| "/metrics".to_string());

        Self { enabled, path }
    }
}

/// Initialize the Prometheus metrics recorder.
///
/// Must be called once at startup, before any metrics are recorded.
///
/// # Errors
///
/// Fails when metrics are disabled, when a recorder is already installed, or
/// when the Prometheus builder cannot install its recorder.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)?;

    describe_search_metrics();
    Ok(())
}

fn describe_search_metrics() {
    metrics::describe_counter!(
        "drinksfinder_searches_total",
        "Searches answered with a result envelope"
    );
    metrics::describe_histogram!(
        "drinksfinder_results_returned",
        "Records in the returned pagination window"
    );
    metrics::describe_counter!(
        "drinksfinder_searches_failed_total",
        "Searches rejected or failed, by reason"
    );
    metrics::describe_counter!(
        "drinksfinder_not_modified_total",
        "Conditional searches answered with 304"
    );
    metrics::describe_gauge!(
        "drinksfinder_backend_available",
        "1 while the data-access backend passes its readiness probe"
    );
}

/// Axum handler for the metrics endpoint, in Prometheus exposition format.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

/// Errors that can occur during metrics initialization.
#[derive(Debug, Clone)]
pub enum MetricsError {
    Disabled,
    AlreadyInitialized,
    InstallFailed(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::Disabled => write!(f, "metrics are disabled"),
            MetricsError::AlreadyInitialized => write!(f, "metrics recorder already initialized"),
            MetricsError::InstallFailed(e) => {
                write!(f, "failed to install metrics recorder: {}", e)
            }
        }
    }
}

impl std::error::Error for MetricsError {}

// =============================================================================
// Business Metrics Helpers
// =============================================================================

/// Record a successful search.
///
/// Increments `drinksfinder_searches_total` and records the window size in
/// the `drinksfinder_results_returned` histogram.
///
/// # Arguments
///
/// * `mode` - The search mode ("list", "near_office", "near_postcode")
/// * `count` - Number of results in the returned window
pub fn record_search_completed(mode: &str, count: usize) {
    metrics::counter!(
        "drinksfinder_searches_total",
        "mode" => mode.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "drinksfinder_results_returned",
        "mode" => mode.to_string()
    )
    .record(count as f64);
}

/// Record a failed search.
///
/// # Arguments
///
/// * `reason` - Failure label from [`drinksfinder_lib::Error::reason`]
pub fn record_search_failed(reason: &str) {
    metrics::counter!(
        "drinksfinder_searches_failed_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}

/// Record a conditional request answered with 304 Not Modified.
pub fn record_not_modified() {
    metrics::counter!("drinksfinder_not_modified_total").increment(1);
}

/// Publish the latest backend availability as a 0/1 gauge.
pub fn record_backend_available(available: bool) {
    metrics::gauge!("drinksfinder_backend_available").set(if available { 1.0 } else { 0.0 });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_config_default() {
        let config = MetricsConfig::default();
        assert!(config.enabled);
        assert_eq!(config.path, "/metrics");
    }

    #[test]
    fn test_metrics_config_from_lookup() {
        let config = MetricsConfig::from_lookup(|name| match name {
            "METRICS_ENABLED" => Some("FALSE".to_string()),
            "METRICS_PATH" => Some("/internal/metrics".to_string()),
            _ => None,
        });
        assert!(!config.enabled);
        assert_eq!(config.path, "/internal/metrics");

        let config = MetricsConfig::from_lookup(|name| match name {
            "METRICS_PATH" => Some("metrics".to_string()),
            _ => None,
        });
        assert!(config.enabled);
        assert_eq!(config.path, "/metrics");
    }

    #[tokio::test]
    async fn test_metrics_handler_without_recorder() {
        let output = metrics_handler().await;
        assert!(output.starts_with('#'));
    }

    #[test]
    fn test_business_metrics_do_not_panic_without_recorder() {
        record_search_completed("list", 10);
        record_search_completed("near_postcode", 0);
        record_search_failed("invalid_order_by");
        record_not_modified();
        record_backend_available(false);
    }

    #[test]
    fn test_metrics_error_display() {
        assert_eq!(MetricsError::Disabled.to_string(), "metrics are disabled");
        assert_eq!(
            MetricsError::AlreadyInitialized.to_string(),
            "metrics recorder already initialized"
        );
        assert!(MetricsError::InstallFailed("test error".to_string())
            .to_string()
            .contains("test error"));
    }
}
