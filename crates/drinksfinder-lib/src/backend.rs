//! Client for the data-access backend.
//!
//! The backend takes one structured query per search as the JSON body of a
//! `PUT` to its base URL and answers with a JSON array of records. It also
//! exposes `<base>/ready` for availability probes.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::query::BackendQuery;

/// A record returned by the backend. Its fields are passed through untouched.
pub type BackendRecord = Map<String, Value>;

const READY_PATH: &str = "ready";

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    query_url: Url,
    ready_url: Url,
}

impl BackendClient {
    /// Build a client for the backend rooted at `base_url`.
    ///
    /// Every call is bounded by `timeout`; a timed-out call fails like any
    /// other transport error.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let ready_url = ready_url(&base_url);
        Ok(Self {
            client,
            query_url: base_url,
            ready_url,
        })
    }

    pub fn query_url(&self) -> &Url {
        &self.query_url
    }

    pub fn ready_url(&self) -> &Url {
        &self.ready_url
    }

    /// Run a query and return the records in backend order.
    pub async fn send(&self, query: &BackendQuery) -> Result<Vec<BackendRecord>> {
        let body = serde_json::to_vec(query).map_err(Error::BackendEncode)?;
        debug!(url = %self.query_url, bytes = body.len(), "querying backend");

        let response = self
            .client
            .put(self.query_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(Error::BackendTransport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::BackendStatus { status });
        }

        let bytes = response.bytes().await.map_err(Error::BackendRead)?;
        serde_json::from_slice(&bytes).map_err(Error::BackendDecode)
    }

    /// Probe the backend's readiness endpoint. Any failure counts as unavailable,
    /// including no answer within `timeout`.
    pub async fn is_available(&self, timeout: Duration) -> bool {
        let probe = self.client.get(self.ready_url.clone()).timeout(timeout);
        match probe.send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                debug!(status = %response.status(), "backend reported not ready");
                false
            }
            Err(e) => {
                debug!(error = %e, "backend readiness probe failed");
                false
            }
        }
    }
}

/// `<base>/ready`, whether or not the base URL ends with a slash.
fn ready_url(base_url: &Url) -> Url {
    let mut url = base_url.clone();
    url.set_query(None);
    url.set_fragment(None);
    let path = format!("{}/{}", url.path().trim_end_matches('/'), READY_PATH);
    url.set_path(&path);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn ready_url_appends_segment() {
        assert_eq!(ready_url(&url("http://dal:5000/")).as_str(), "http://dal:5000/ready");
        assert_eq!(ready_url(&url("http://dal:5000")).as_str(), "http://dal:5000/ready");
        assert_eq!(
            ready_url(&url("http://dal:5000/data/")).as_str(),
            "http://dal:5000/data/ready"
        );
        assert_eq!(
            ready_url(&url("http://dal:5000/data?x=1")).as_str(),
            "http://dal:5000/data/ready"
        );
    }

    #[test]
    fn client_keeps_base_as_query_url() {
        let client = BackendClient::new(url("http://dal:5000/"), Duration::from_secs(1)).unwrap();
        assert_eq!(client.query_url().as_str(), "http://dal:5000/");
        assert_eq!(client.ready_url().as_str(), "http://dal:5000/ready");
    }
}
