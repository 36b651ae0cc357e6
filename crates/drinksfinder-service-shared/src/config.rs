//! Service configuration from the environment.
//!
//! # Environment Variables
//!
//! - `DATA_ACCESS_URL`: Base URL of the data-access backend (required)
//! - `GOOGLE_API_KEY_FILE`: File holding the geocoding API key
//!   (default: `/settings/google_api_key`). A missing or blank file disables
//!   postcode search.
//! - `GEOCODING_API_URL`: Geocoding endpoint (default: Google's public API)
//! - `SERVICE_PORT`: HTTP port (default: 8080)
//! - `BACKEND_TIMEOUT_SECS`: Timeout for backend calls (default: 10)
//! - `GEOCODING_TIMEOUT_SECS`: Timeout for geocoding calls (default: 10)
//! - `HEALTH_PROBE_INTERVAL_SECS`: Backend probe interval (default: 5)

use std::path::{Path, PathBuf};
use std::time::Duration;

use drinksfinder_lib::{
    BackendClient, GeocodingClient, SearchService, DEFAULT_PROBE_INTERVAL, GOOGLE_GEOCODE_URL,
};
use reqwest::Url;

/// Default location of the geocoding API key file.
pub const DEFAULT_API_KEY_FILE: &str = "/settings/google_api_key";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error while reading service configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// A required variable is not set.
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    Invalid { name: &'static str, value: String },

    /// An HTTP client could not be built from the configuration.
    Client(drinksfinder_lib::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(name) => write!(f, "{} is not set", name),
            Self::Invalid { name, value } => write!(f, "invalid value for {}: {:?}", name, value),
            Self::Client(e) => write!(f, "failed to build HTTP client: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Client(e) => Some(e),
            _ => None,
        }
    }
}

impl From<drinksfinder_lib::Error> for ConfigError {
    fn from(err: drinksfinder_lib::Error) -> Self {
        Self::Client(err)
    }
}

/// Runtime configuration of the search service.
#[derive(Clone)]
pub struct ServiceConfig {
    pub data_access_url: Url,
    /// Geocoding credential; `None` switches postcode search off.
    pub geocoding_api_key: Option<String>,
    pub geocoding_url: String,
    pub port: u16,
    pub backend_timeout: Duration,
    pub geocoding_timeout: Duration,
    pub probe_interval: Duration,
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("data_access_url", &self.data_access_url.as_str())
            .field("geocoding_configured", &self.geocoding_api_key.is_some())
            .field("geocoding_url", &self.geocoding_url)
            .field("port", &self.port)
            .field("backend_timeout", &self.backend_timeout)
            .field("geocoding_timeout", &self.geocoding_timeout)
            .field("probe_interval", &self.probe_interval)
            .finish()
    }
}

impl ServiceConfig {
    /// Defaults for everything but the backend URL.
    pub fn new(data_access_url: Url) -> Self {
        Self {
            data_access_url,
            geocoding_api_key: None,
            geocoding_url: GOOGLE_GEOCODE_URL.to_string(),
            port: DEFAULT_PORT,
            backend_timeout: DEFAULT_TIMEOUT,
            geocoding_timeout: DEFAULT_TIMEOUT,
            probe_interval: DEFAULT_PROBE_INTERVAL,
        }
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, which maps variable names to values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup("DATA_ACCESS_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATA_ACCESS_URL"))?;
        let data_access_url = Url::parse(raw_url.trim()).map_err(|_| ConfigError::Invalid {
            name: "DATA_ACCESS_URL",
            value: raw_url.clone(),
        })?;

        let key_file = lookup("GOOGLE_API_KEY_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_API_KEY_FILE));

        let mut config = Self::new(data_access_url);
        config.geocoding_api_key = read_api_key(&key_file);
        if let Some(url) = lookup("GEOCODING_API_URL").filter(|v| !v.trim().is_empty()) {
            config.geocoding_url = url;
        }
        if let Some(port) = parse_var(&lookup, "SERVICE_PORT")? {
            config.port = port;
        }
        if let Some(secs) = parse_secs(&lookup, "BACKEND_TIMEOUT_SECS")? {
            config.backend_timeout = secs;
        }
        if let Some(secs) = parse_secs(&lookup, "GEOCODING_TIMEOUT_SECS")? {
            config.geocoding_timeout = secs;
        }
        if let Some(secs) = parse_secs(&lookup, "HEALTH_PROBE_INTERVAL_SECS")? {
            config.probe_interval = secs;
        }

        Ok(config)
    }

    pub fn with_geocoding_api_key(mut self, key: impl Into<String>) -> Self {
        self.geocoding_api_key = Some(key.into());
        self
    }

    pub fn with_geocoding_url(mut self, url: impl Into<String>) -> Self {
        self.geocoding_url = url.into();
        self
    }

    /// Build the backend client described by this configuration.
    pub fn backend_client(&self) -> Result<BackendClient, ConfigError> {
        Ok(BackendClient::new(
            self.data_access_url.clone(),
            self.backend_timeout,
        )?)
    }

    /// Build the search service, with geocoding only when a key is configured.
    pub fn search_service(&self) -> Result<SearchService, ConfigError> {
        let geocoder = match &self.geocoding_api_key {
            Some(key) => Some(GeocodingClient::new(
                self.geocoding_url.clone(),
                key.clone(),
                self.geocoding_timeout,
            )?),
            None => None,
        };
        Ok(SearchService::new(self.backend_client()?, geocoder))
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

/// A duration in whole seconds; zero is rejected.
fn parse_secs<F>(lookup: &F, name: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match parse_var::<F, u64>(lookup, name)? {
        Some(0) => Err(ConfigError::Invalid {
            name,
            value: lookup(name).unwrap_or_default(),
        }),
        secs => Ok(secs.map(Duration::from_secs)),
    }
}

/// Read the geocoding key, treating an unreadable or blank file as "no key".
fn read_api_key(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let key = contents.trim();
            if key.is_empty() {
                tracing::info!(
                    path = %path.display(),
                    "geocoding key file is empty, postcode search disabled"
                );
                None
            } else {
                Some(key.to_string())
            }
        }
        Err(e) => {
            tracing::info!(
                path = %path.display(),
                error = %e,
                "geocoding key not readable, postcode search disabled"
            );
            None
        }
    }
}
