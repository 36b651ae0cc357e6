//! Application state shared by the axum handlers.

use std::sync::Arc;

use drinksfinder_lib::{AvailabilityMonitor, HealthState, SearchService};

use crate::config::{ConfigError, ServiceConfig};
use crate::metrics::record_backend_available;

/// Shared application state for all axum handlers.
///
/// Cheap to clone. The search service is stateless; the health flag is the
/// only value that changes after startup and is written only by the
/// availability monitor.
#[derive(Clone, Debug)]
pub struct AppState {
    search: Arc<SearchService>,
    health: HealthState,
}

impl AppState {
    pub fn new(search: SearchService, health: HealthState) -> Self {
        Self {
            search: Arc::new(search),
            health,
        }
    }

    /// Build the state from configuration, starting out healthy.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.search_service()?, HealthState::default()))
    }

    pub fn search(&self) -> &SearchService {
        &self.search
    }

    pub fn health(&self) -> &HealthState {
        &self.health
    }

    /// A monitor that probes this state's backend, updates its health flag and
    /// publishes every probe result as the backend availability gauge.
    pub fn availability_monitor(&self) -> AvailabilityMonitor {
        AvailabilityMonitor::new(self.search.backend().clone(), self.health.clone())
            .with_observer(record_backend_available)
    }
}
