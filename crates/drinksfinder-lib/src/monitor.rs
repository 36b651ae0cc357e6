//! Background availability monitoring of the data-access backend.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::backend::BackendClient;

/// Interval between two readiness probes of the backend.
pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(5);

/// Process-wide backend availability flag.
///
/// Starts healthy. Clones share the same flag.
#[derive(Debug, Clone)]
pub struct HealthState {
    healthy: Arc<AtomicBool>,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new(true)
    }
}

impl HealthState {
    pub fn new(healthy: bool) -> Self {
        Self {
            healthy: Arc::new(AtomicBool::new(healthy)),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Acquire)
    }

    /// Store a new value, returning the previous one.
    pub fn set(&self, healthy: bool) -> bool {
        self.healthy.swap(healthy, Ordering::AcqRel)
    }
}

/// Callback told the outcome of every probe.
pub type ProbeObserver = Arc<dyn Fn(bool) + Send + Sync>;

/// Periodically probes the backend and records the outcome in a [`HealthState`].
///
/// Probes start on a fixed schedule and each one is bounded by the interval,
/// so a hung backend is reported unhealthy within one interval.
pub struct AvailabilityMonitor {
    backend: BackendClient,
    health: HealthState,
    interval: Duration,
    observer: Option<ProbeObserver>,
}

impl fmt::Debug for AvailabilityMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvailabilityMonitor")
            .field("backend", &self.backend)
            .field("health", &self.health)
            .field("interval", &self.interval)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl AvailabilityMonitor {
    pub fn new(backend: BackendClient, health: HealthState) -> Self {
        Self {
            backend,
            health,
            interval: DEFAULT_PROBE_INTERVAL,
            observer: None,
        }
    }

    /// A zero interval is raised to one millisecond.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Call `observer` with the result of every probe, after the flag is written.
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Run a single probe and record the result.
    pub async fn probe_once(&self) -> bool {
        let available = self.backend.is_available(self.interval).await;
        let previous = self.health.set(available);
        if previous != available {
            if available {
                info!(url = %self.backend.ready_url(), "backend became available");
            } else {
                warn!(url = %self.backend.ready_url(), "backend became unavailable");
            }
        }
        if let Some(observer) = &self.observer {
            observer(available);
        }
        available
    }

    /// Probe forever, one probe per interval tick.
    pub async fn run(self) {
        info!(
            url = %self.backend.ready_url(),
            interval_ms = self.interval.as_millis() as u64,
            "starting backend availability monitor"
        );
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.probe_once().await;
        }
    }

    /// Spawn [`run`](Self::run) on the current tokio runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_starts_healthy() {
        assert!(HealthState::default().is_healthy());
    }

    #[test]
    fn clones_share_flag() {
        let health = HealthState::default();
        let reader = health.clone();
        assert!(health.set(false));
        assert!(!reader.is_healthy());
        assert!(!health.set(true));
        assert!(reader.is_healthy());
    }
}
