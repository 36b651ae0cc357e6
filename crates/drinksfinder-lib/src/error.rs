use reqwest::StatusCode;
use thiserror::Error;

use crate::query::ORDER_FIELDS;

/// Convenient result alias for the drinksfinder library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Only validation variants carry text that is safe to show to API callers.
/// Everything else is logged and surfaced as a bare status code.
#[derive(Debug, Error)]
pub enum Error {
    /// The request path does not select any search mode.
    #[error("no search mode for path {path}")]
    UnknownPath { path: String },

    /// `order_by` named a field outside the allowed set.
    #[error("Unexpected value '{value}' for \"order_by\": expected one of [{}]", ORDER_FIELDS.join(" "))]
    InvalidOrderBy { value: String },

    /// The postcode could not be unescaped or does not have a UK postcode shape.
    #[error("Invalid postcode '{postcode}'")]
    InvalidPostcode { postcode: String },

    /// Postcode search needs a geocoding credential and none is configured.
    #[error("Postcode search not available")]
    GeocodingUnavailable,

    /// The geocoding provider could not turn the postcode into coordinates.
    #[error("postcode lookup failed: {reason}")]
    GeocodeLookupFailed { reason: String },

    /// The backend query could not be serialized.
    #[error("failed to encode backend query: {0}")]
    BackendEncode(#[source] serde_json::Error),

    /// The backend could not be reached or did not answer in time.
    #[error("backend request failed: {0}")]
    BackendTransport(#[source] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned status {status}")]
    BackendStatus { status: StatusCode },

    /// The backend response body could not be read.
    #[error("failed to read backend response: {0}")]
    BackendRead(#[source] reqwest::Error),

    /// The backend response body was not an array of records.
    #[error("failed to decode backend response: {0}")]
    BackendDecode(#[source] serde_json::Error),

    /// Wrapper for HTTP client construction errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Coarse classification of [`Error`] used to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller sent something invalid; the message may be shown.
    Validation,
    /// Nothing lives at the requested path.
    NotFound,
    /// The requested feature is switched off by configuration.
    FeatureUnavailable,
    /// The data-access backend is unreachable or unhealthy.
    UpstreamUnavailable,
    /// Anything else, including geocoding failures.
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownPath { .. } => ErrorKind::NotFound,
            Error::InvalidOrderBy { .. } | Error::InvalidPostcode { .. } => ErrorKind::Validation,
            Error::GeocodingUnavailable => ErrorKind::FeatureUnavailable,
            Error::BackendTransport(_) | Error::BackendStatus { .. } => {
                ErrorKind::UpstreamUnavailable
            }
            Error::GeocodeLookupFailed { .. }
            | Error::BackendEncode(_)
            | Error::BackendRead(_)
            | Error::BackendDecode(_)
            | Error::Http(_) => ErrorKind::Internal,
        }
    }

    /// Short machine-friendly label, used for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Error::UnknownPath { .. } => "unknown_path",
            Error::InvalidOrderBy { .. } => "invalid_order_by",
            Error::InvalidPostcode { .. } => "invalid_postcode",
            Error::GeocodingUnavailable => "geocoding_unavailable",
            Error::GeocodeLookupFailed { .. } => "geocode_failed",
            Error::BackendEncode(_) => "backend_encode",
            Error::BackendTransport(_) => "backend_unavailable",
            Error::BackendStatus { .. } => "backend_status",
            Error::BackendRead(_) => "backend_read",
            Error::BackendDecode(_) => "backend_decode",
            Error::Http(_) => "http_client",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_by_message_names_value_and_allowed_set() {
        let err = Error::InvalidOrderBy {
            value: "price".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unexpected value 'price' for \"order_by\": expected one of [beer atmosphere amenities value]"
        );
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn geocoding_failures_are_internal() {
        let err = Error::GeocodeLookupFailed {
            reason: "ZERO_RESULTS".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.reason(), "geocode_failed");
    }

    #[test]
    fn backend_status_is_upstream_unavailable() {
        let err = Error::BackendStatus {
            status: StatusCode::BAD_GATEWAY,
        };
        assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn unknown_path_is_not_found() {
        let err = Error::UnknownPath {
            path: "/unknown".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
