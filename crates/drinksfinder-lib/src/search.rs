//! The search pipeline: translate, resolve, query, paginate.

use tracing::{debug, info};

use crate::backend::{BackendClient, BackendRecord};
use crate::error::{Error, Result};
use crate::geocode::GeocodingClient;
use crate::pagination::Page;
use crate::postcode::Postcode;
use crate::query::{BackendQuery, SearchMode, SearchRequest, OFFICE_LOCATION};

/// Result envelope returned to API callers.
pub type ResultEnvelope = Page<BackendRecord>;

/// Runs searches against the backend, geocoding postcodes when configured.
///
/// Holds no per-request state; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct SearchService {
    backend: BackendClient,
    geocoder: Option<GeocodingClient>,
}

impl SearchService {
    /// `geocoder` is `None` when no geocoding credential is configured, which
    /// switches postcode search off.
    pub fn new(backend: BackendClient, geocoder: Option<GeocodingClient>) -> Self {
        Self { backend, geocoder }
    }

    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    pub fn postcode_search_available(&self) -> bool {
        self.geocoder.is_some()
    }

    /// Turn a validated request into a backend query, geocoding the postcode
    /// for postcode searches.
    pub async fn translate(&self, request: &SearchRequest) -> Result<BackendQuery> {
        let tags = request.tags.clone();
        match &request.mode {
            SearchMode::List => Ok(BackendQuery::list(request.order_by, tags)),
            SearchMode::NearOffice => Ok(BackendQuery::proximity(OFFICE_LOCATION, tags)),
            SearchMode::NearPostcode(segment) => {
                let geocoder = self.geocoder.as_ref().ok_or(Error::GeocodingUnavailable)?;
                let postcode = Postcode::from_path_segment(segment)?;
                let location = geocoder.resolve(&postcode).await?;
                debug!(
                    postcode = %postcode,
                    longitude = location.longitude,
                    latitude = location.latitude,
                    "postcode resolved"
                );
                Ok(BackendQuery::proximity(location, tags))
            }
        }
    }

    /// Run the whole pipeline for one request.
    pub async fn search(&self, request: &SearchRequest) -> Result<ResultEnvelope> {
        let query = self.translate(request).await?;
        let records = self.backend.send(&query).await?;
        let page = request.pagination.apply(records);

        info!(
            mode = request.mode.label(),
            total = page.total,
            count = page.count,
            "search completed"
        );
        Ok(page)
    }
}
