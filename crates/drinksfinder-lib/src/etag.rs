//! Content fingerprints for conditional responses.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the exact response bytes.
pub fn fingerprint(body: &[u8]) -> String {
    hex::encode(Sha256::digest(body))
}

/// Whether an `If-None-Match` header value matches `etag`.
///
/// Accepts the bare digest, the quoted form, weak validators, comma-separated
/// lists and `*`.
pub fn if_none_match(header: &str, etag: &str) -> bool {
    header.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || {
            let candidate = candidate.strip_prefix("W/").unwrap_or(candidate);
            let candidate = candidate
                .strip_prefix('"')
                .and_then(|c| c.strip_suffix('"'))
                .unwrap_or(candidate);
            candidate == etag
        }
    })
}
