//! Mapping of library errors to HTTP responses.
//!
//! Only validation failures and the "feature unavailable" case carry a body,
//! `{"error": "<message>"}`. Every other failure is a bare status code so no
//! backend or provider detail ever reaches the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use drinksfinder_lib::{Error as LibError, ErrorKind};

/// JSON body of client-visible errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// An error response: a status and an optional message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: Some(message.into()),
        }
    }

    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_IMPLEMENTED,
            message: Some(message.into()),
        }
    }

    /// A status with no body.
    pub fn bare(status: StatusCode) -> Self {
        Self {
            status,
            message: None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.status, message),
            None => write!(f, "{}", self.status),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.message {
            Some(error) => (self.status, Json(ErrorBody { error })).into_response(),
            None => self.status.into_response(),
        }
    }
}

/// Convert a library error, logging the detail that is withheld from the caller.
pub fn from_lib_error(error: &LibError) -> ApiError {
    match error.kind() {
        ErrorKind::Validation => {
            tracing::debug!(error = %error, "rejected search request");
            ApiError::bad_request(error.to_string())
        }
        ErrorKind::NotFound => ApiError::bare(StatusCode::NOT_FOUND),
        ErrorKind::FeatureUnavailable => ApiError::not_implemented(error.to_string()),
        ErrorKind::UpstreamUnavailable => {
            tracing::warn!(error = %error, "backend unavailable");
            ApiError::bare(StatusCode::SERVICE_UNAVAILABLE)
        }
        ErrorKind::Internal => {
            tracing::error!(error = %error, reason = error.reason(), "search failed");
            ApiError::bare(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

impl From<LibError> for ApiError {
    fn from(error: LibError) -> Self {
        from_lib_error(&error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drinksfinder_lib::Error;

    #[test]
    fn test_validation_errors_keep_message() {
        let api = from_lib_error(&Error::InvalidPostcode {
            postcode: "1234".to_string(),
        });
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.message.as_deref(), Some("Invalid postcode '1234'"));
    }

    #[test]
    fn test_unknown_path_is_bare_404() {
        let api = from_lib_error(&Error::UnknownPath {
            path: "/unknown".to_string(),
        });
        assert_eq!(api, ApiError::bare(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_geocoding_unavailable_is_501() {
        let api = from_lib_error(&Error::GeocodingUnavailable);
        assert_eq!(api.status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(api.message.as_deref(), Some("Postcode search not available"));
    }

    #[test]
    fn test_internal_errors_hide_detail() {
        let api = from_lib_error(&Error::GeocodeLookupFailed {
            reason: "provider status REQUEST_DENIED".to_string(),
        });
        assert_eq!(api, ApiError::bare(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn test_backend_status_is_503() {
        let api = from_lib_error(&Error::BackendStatus {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        });
        assert_eq!(api, ApiError::bare(StatusCode::SERVICE_UNAVAILABLE));
    }

    #[test]
    fn test_error_body_serialization() {
        let json = serde_json::to_string(&ErrorBody {
            error: "Invalid postcode 'x'".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"error":"Invalid postcode 'x'"}"#);
    }
}
