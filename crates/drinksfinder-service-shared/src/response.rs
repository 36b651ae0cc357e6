//! JSON responses with content-hash ETags.

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use drinksfinder_lib::etag;

use crate::api_error::ApiError;

/// A serialized JSON body and its fingerprint.
///
/// The ETag is computed over the exact bytes that are sent, so any change to
/// the payload yields a different validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedJson {
    body: Vec<u8>,
    etag: String,
}

impl CachedJson {
    /// Serialize `payload`. Serialization failures become a bare 500.
    pub fn new<T: Serialize>(payload: &T) -> Result<Self, ApiError> {
        let body = serde_json::to_vec(payload).map_err(|e| {
            tracing::error!(error = %e, "failed to serialize response");
            ApiError::bare(StatusCode::INTERNAL_SERVER_ERROR)
        })?;
        let etag = etag::fingerprint(&body);
        Ok(Self { body, etag })
    }

    pub fn etag(&self) -> &str {
        &self.etag
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// `304 Not Modified` when the request's `If-None-Match` matches, else `200`.
    pub fn respond_to(self, request_headers: &HeaderMap) -> Response {
        let not_modified = request_headers
            .get(header::IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| etag::if_none_match(v, &self.etag));

        if not_modified {
            crate::metrics::record_not_modified();
            return (
                StatusCode::NOT_MODIFIED,
                [(header::ETAG, self.etag_header())],
            )
                .into_response();
        }

        self.into_response()
    }

    fn etag_header(&self) -> HeaderValue {
        // Hex digits are always a valid header value.
        HeaderValue::from_str(&self.etag).unwrap_or_else(|_| HeaderValue::from_static(""))
    }
}

impl IntoResponse for CachedJson {
    fn into_response(self) -> Response {
        let etag = self.etag_header();
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
                (header::ETAG, etag),
            ],
            Body::from(self.body),
        )
            .into_response()
    }
}
