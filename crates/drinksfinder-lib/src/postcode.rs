//! UK postcode validation.

use std::fmt;

use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::error::{Error, Result};

/// Outward code (1-2 letters, 1-2 digits), optional space, inward code
/// (1 digit, 2 letters).
static POSTCODE_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z]{1,2}[0-9]{1,2}\s?[0-9][a-zA-Z]{2}$").expect("postcode pattern is valid")
});

/// A postcode that has been unescaped, trimmed and shape-checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Postcode(String);

impl Postcode {
    /// Validate a raw, percent-encoded URL path segment.
    pub fn from_path_segment(segment: &str) -> Result<Self> {
        let decoded = percent_decode_str(segment)
            .decode_utf8()
            .map_err(|_| Error::InvalidPostcode {
                postcode: segment.to_string(),
            })?;
        Self::parse(&decoded)
    }

    /// Validate an already unescaped postcode.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if !POSTCODE_SHAPE.is_match(trimmed) {
            return Err(Error::InvalidPostcode {
                postcode: trimmed.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
