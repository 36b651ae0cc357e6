//! Translation of inbound search requests into backend queries.
//!
//! A request is identified by its path below the API base path and its query
//! string. [`SearchRequest::parse`] selects the search mode and validates the
//! parameters that do not need any outbound call; the postcode itself is only
//! validated once the service knows geocoding is available (see
//! [`crate::search::SearchService::translate`]).

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::pagination::Pagination;

/// Fields the backend can order pub listings by.
pub const ORDER_FIELDS: [&str; 4] = ["beer", "atmosphere", "amenities", "value"];

/// Topic requested from the backend in list mode.
pub const PUBS_TOPIC: &str = "pubs";

const LIST_PATH: &str = "/pubs";
const NEAR_PATH: &str = "/pubs/near";
const POSTCODE_PREFIX: &str = "/pubs/near/postcode/";

/// Longitude/latitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

/// Location of the Leeds office used by the `/pubs/near` search.
pub const OFFICE_LOCATION: Coordinates = Coordinates::new(-1.556016, 53.801181);

/// Rating a pub listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    Beer,
    Atmosphere,
    Amenities,
    Value,
}

impl OrderBy {
    /// Parse an `order_by` value. Anything outside [`ORDER_FIELDS`] is rejected.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "beer" => Ok(OrderBy::Beer),
            "atmosphere" => Ok(OrderBy::Atmosphere),
            "amenities" => Ok(OrderBy::Amenities),
            "value" => Ok(OrderBy::Value),
            other => Err(Error::InvalidOrderBy {
                value: other.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBy::Beer => "beer",
            OrderBy::Atmosphere => "atmosphere",
            OrderBy::Amenities => "amenities",
            OrderBy::Value => "value",
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search mode selected by the request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMode {
    /// `/pubs`: every pub, optionally ordered.
    List,
    /// `/pubs/near`: pubs nearest the office.
    NearOffice,
    /// `/pubs/near/postcode/<segment>`: pubs nearest a postcode. The segment is
    /// kept exactly as it appeared in the URL, still percent-encoded.
    NearPostcode(String),
}

impl SearchMode {
    /// Select the mode for a path relative to the API base path.
    pub fn from_path(path: &str) -> Result<Self> {
        match path {
            LIST_PATH => Ok(SearchMode::List),
            NEAR_PATH => Ok(SearchMode::NearOffice),
            _ => path
                .strip_prefix(POSTCODE_PREFIX)
                .map(|segment| SearchMode::NearPostcode(segment.to_string()))
                .ok_or_else(|| Error::UnknownPath {
                    path: path.to_string(),
                }),
        }
    }

    /// Label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            SearchMode::List => "list",
            SearchMode::NearOffice => "near_office",
            SearchMode::NearPostcode(_) => "near_postcode",
        }
    }
}

/// A validated search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub mode: SearchMode,
    pub order_by: Option<OrderBy>,
    pub tags: Vec<String>,
    pub pagination: Pagination,
}

impl SearchRequest {
    /// Build a request from the path below the base path and the raw query
    /// string (without the leading `?`).
    ///
    /// The path is dispatched first so unknown paths are reported as such
    /// whatever their parameters. For repeated `order_by`, `start` and `limit`
    /// parameters the first occurrence wins; every `tag` is kept in order.
    pub fn parse(path: &str, query: Option<&str>) -> Result<Self> {
        let mode = SearchMode::from_path(path)?;

        let mut order_by = None;
        let mut start = None;
        let mut limit = None;
        let mut tags = Vec::new();

        for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                "order_by" if order_by.is_none() => order_by = Some(value.into_owned()),
                "start" if start.is_none() => start = Some(value.into_owned()),
                "limit" if limit.is_none() => limit = Some(value.into_owned()),
                "tag" => tags.push(value.into_owned()),
                _ => {}
            }
        }

        let order_by = match order_by.as_deref() {
            None | Some("") => None,
            Some(value) => Some(OrderBy::parse(value)?),
        };

        Ok(Self {
            mode,
            order_by,
            tags,
            pagination: Pagination::from_params(start.as_deref(), limit.as_deref()),
        })
    }
}

/// Query sent to the data-access backend.
///
/// Serializes to `{"topic": "pubs", "order"?: ..., "tags"?: [...]}` or
/// `{"longlat": [lon, lat], "tags"?: [...]}`. Empty tag lists are left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BackendQuery {
    List {
        #[serde(serialize_with = "serialize_pubs_topic")]
        topic: (),
        #[serde(skip_serializing_if = "Option::is_none")]
        order: Option<OrderBy>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        tags: Vec<String>,
    },
    Proximity {
        #[serde(rename = "longlat", serialize_with = "serialize_longlat")]
        location: Coordinates,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        tags: Vec<String>,
    },
}

impl BackendQuery {
    pub fn list(order: Option<OrderBy>, tags: Vec<String>) -> Self {
        BackendQuery::List {
            topic: (),
            order,
            tags,
        }
    }

    pub fn proximity(location: Coordinates, tags: Vec<String>) -> Self {
        BackendQuery::Proximity { location, tags }
    }
}

fn serialize_pubs_topic<S: Serializer>(
    _: &(),
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(PUBS_TOPIC)
}

fn serialize_longlat<S: Serializer>(
    location: &Coordinates,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    [location.longitude, location.latitude].serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dispatches_paths_to_modes() {
        assert_eq!(SearchMode::from_path("/pubs").unwrap(), SearchMode::List);
        assert_eq!(SearchMode::from_path("/pubs/near").unwrap(), SearchMode::NearOffice);
        assert_eq!(
            SearchMode::from_path("/pubs/near/postcode/LS1%204AP").unwrap(),
            SearchMode::NearPostcode("LS1%204AP".to_string())
        );
        assert_eq!(
            SearchMode::from_path("/pubs/near/postcode/").unwrap(),
            SearchMode::NearPostcode(String::new())
        );
    }

    #[test]
    fn unknown_paths_are_rejected() {
        for path in ["/unknown", "/pubs/", "/pubs/near/", "/pubs/near/postcode", ""] {
            let err = SearchMode::from_path(path).unwrap_err();
            assert!(matches!(err, Error::UnknownPath { .. }), "path {path:?}");
        }
    }

    #[test]
    fn unknown_path_wins_over_bad_parameters() {
        let err = SearchRequest::parse("/unknown", Some("order_by=price")).unwrap_err();
        assert!(matches!(err, Error::UnknownPath { .. }));
    }

    #[test]
    fn parses_order_tags_and_pagination() {
        let req = SearchRequest::parse(
            "/pubs",
            Some("order_by=beer&tag=food&tag=real%20ale&start=3&limit=4"),
        )
        .unwrap();
        assert_eq!(req.mode, SearchMode::List);
        assert_eq!(req.order_by, Some(OrderBy::Beer));
        assert_eq!(req.tags, vec!["food".to_string(), "real ale".to_string()]);
        assert_eq!(req.pagination.start, Some(3));
        assert_eq!(req.pagination.limit, Some(4));
    }

    #[test]
    fn empty_order_by_is_ignored() {
        let req = SearchRequest::parse("/pubs", Some("order_by=")).unwrap();
        assert!(req.order_by.is_none());
    }

    #[test]
    fn first_order_by_wins() {
        let req = SearchRequest::parse("/pubs", Some("order_by=value&order_by=nonsense")).unwrap();
        assert_eq!(req.order_by, Some(OrderBy::Value));
    }

    #[test]
    fn rejects_orders_outside_allowed_set() {
        for value in ["price", "Beer", "beer ", "distance"] {
            let query = format!("order_by={}", value.replace(' ', "+"));
            let err = SearchRequest::parse("/pubs/near", Some(&query)).unwrap_err();
            assert!(err.to_string().contains(&format!("'{value}'")), "value {value:?}");
            assert!(err.to_string().contains("beer atmosphere amenities value"));
        }
    }

    #[test]
    fn list_query_wire_shape() {
        let query = BackendQuery::list(Some(OrderBy::Atmosphere), vec!["garden".to_string()]);
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({"topic": "pubs", "order": "atmosphere", "tags": ["garden"]})
        );

        let bare = BackendQuery::list(None, Vec::new());
        assert_eq!(serde_json::to_value(&bare).unwrap(), json!({"topic": "pubs"}));
    }

    #[test]
    fn proximity_query_wire_shape() {
        let query = BackendQuery::proximity(OFFICE_LOCATION, Vec::new());
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({"longlat": [-1.556016, 53.801181]})
        );

        let tagged = BackendQuery::proximity(Coordinates::new(1.5, 2.5), vec!["quiz".to_string()]);
        assert_eq!(
            serde_json::to_value(&tagged).unwrap(),
            json!({"longlat": [1.5, 2.5], "tags": ["quiz"]})
        );
    }
}
