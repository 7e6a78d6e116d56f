//! Request builder and transport for the CARL.X search endpoints.
//!
//! Each call composes `{base}{endpoint}?_={token}`, POSTs the JSON search
//! payload with the headers the catalog's own web UI sends, and decodes the
//! JSON response into the caller's target type.

use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, REFERER};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::CatalogError;
use super::cache_buster::CacheBuster;
use super::http_client::{HttpTimeouts, build_catalog_http_client};

/// Maximum number of publications the catalog returns per page.
pub const MAX_HITS_PER_PAGE: u32 = 30;

const SORT_CRITERIA: &str = "NewlyAdded";
const YEAR_FACET: &str = "Year";
const FORMAT_FACET: &str = "Format";

/// A catalog endpoint under the base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `search/count`: number of matches for a filter set.
    Count,
    /// `search`: one page of matching resources.
    Search,
}

impl Endpoint {
    /// Path relative to the catalog base URL.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Count => "search/count",
            Self::Search => "search",
        }
    }
}

/// One named search constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetFilter {
    pub facet_name: String,
    pub facet_value: String,
    pub facet_display: String,
}

impl FacetFilter {
    fn new(name: &str, value: &str) -> Self {
        Self {
            facet_name: name.to_string(),
            facet_value: value.to_string(),
            facet_display: value.to_string(),
        }
    }

    /// Builds the two-facet filter set: publication year, then format.
    #[must_use]
    pub fn year_and_format(year: &str, media: &str) -> Vec<Self> {
        vec![Self::new(YEAR_FACET, year), Self::new(FORMAT_FACET, media)]
    }
}

/// JSON body of every search POST.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequestPayload {
    pub add_to_history: bool,
    pub db_codes: Vec<String>,
    pub hits_per_page: u32,
    pub sort_criteria: String,
    /// Always 0; the catalog advances its own paging state between calls.
    pub start_index: u32,
    pub target_audience: String,
    pub facet_filters: Vec<FacetFilter>,
    pub search_term: String,
}

impl SearchRequestPayload {
    /// Builds the fixed-shape payload for an author search.
    #[must_use]
    pub fn new(author: &str, facet_filters: Vec<FacetFilter>) -> Self {
        Self {
            add_to_history: true,
            db_codes: Vec::new(),
            hits_per_page: MAX_HITS_PER_PAGE,
            sort_criteria: SORT_CRITERIA.to_string(),
            start_index: 0,
            target_audience: String::new(),
            facet_filters,
            search_term: author.to_string(),
        }
    }
}

/// Issues catalog POSTs and decodes their JSON responses.
#[derive(Debug)]
pub struct CatalogClient {
    client: Client,
    cache_buster: CacheBuster,
    timeouts: HttpTimeouts,
}

impl CatalogClient {
    /// Creates a client with the given timeouts and a fresh token generator.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ClientBuild`] if HTTP client construction fails.
    pub fn new(timeouts: HttpTimeouts) -> Result<Self, CatalogError> {
        Ok(Self {
            client: build_catalog_http_client(timeouts)?,
            cache_buster: CacheBuster::new(),
            timeouts,
        })
    }

    /// Composes `{base_url}{endpoint}?_={token}` with a fresh token.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidUrl`] if the result is not a valid URL.
    pub fn endpoint_url(&self, base_url: &str, endpoint: Endpoint) -> Result<Url, CatalogError> {
        let base = normalize_base_url(base_url);
        let raw = format!("{base}{}", endpoint.path());
        let mut url = Url::parse(&raw).map_err(|source| CatalogError::InvalidUrl {
            url: raw.clone(),
            source,
        })?;
        url.query_pairs_mut()
            .append_pair("_", &self.cache_buster.next_token());
        Ok(url)
    }

    /// POSTs `payload` to `endpoint` and decodes the response as `T`.
    ///
    /// `target` names the response shape in decode errors.
    ///
    /// # Errors
    ///
    /// Returns a transport error on connection failure, timeout or non-success
    /// status, and [`CatalogError::Decode`] when the body is not valid JSON for `T`.
    #[tracing::instrument(skip(self, payload), fields(path = endpoint.path()))]
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        base_url: &str,
        endpoint: Endpoint,
        payload: &SearchRequestPayload,
        target: &'static str,
    ) -> Result<T, CatalogError> {
        let url = self.endpoint_url(base_url, endpoint)?;
        let url_str = url.to_string();
        debug!(url = %url_str, "Issuing catalog POST");

        let response = self
            .client
            .post(url)
            .header("X-Requested-With", "XMLHttpRequest")
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .header(ACCEPT, "application/json, text/javascript, */*; q=0.01")
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.8")
            .header("Ls2pac-config-type", "pac")
            .header("Ls2pac-config-name", "default - Go Live load")
            .header(REFERER, normalize_base_url(base_url))
            .json(payload)
            .send()
            .await
            .map_err(|e| CatalogError::from_reqwest(&url_str, e, self.timeouts.request_secs))?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "Catalog returned error status");
            return Err(CatalogError::HttpStatus {
                url: url_str,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::from_reqwest(&url_str, e, self.timeouts.request_secs))?;

        serde_json::from_str(&body).map_err(|source| CatalogError::Decode {
            target,
            url: url_str,
            source,
        })
    }
}

fn normalize_base_url(base_url: &str) -> String {
    if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    }
}
