//! Catalog search coordinator.
//!
//! A search for one (author, media type) pair runs two year buckets in order,
//! `unknown` then the current year. Each bucket asks `search/count` how many
//! publications to expect, then calls `search` until that many raw resources
//! have arrived. The catalog pages server-side: every call carries the same
//! payload and a fresh cache-bust token, and the catalog returns the next page.
//!
//! The catalog's author search matches substrings, so each page is re-filtered
//! locally on an exact author match.
//!
//! # Example
//!
//! ```no_run
//! use booklist::catalog::{CatalogSearcher, Query};
//!
//! # async fn example() -> Result<(), booklist::catalog::CatalogError> {
//! let searcher = CatalogSearcher::new()?;
//! let query = Query::new("https://catalog.library.loudoun.gov/", "Grafton, Sue", "Book");
//! for publication in searcher.search(&query).await? {
//!     println!("[{}] {}", publication.media, publication.title);
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::LazyLock;

use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

mod cache_buster;
mod error;
mod http_client;
mod request;

pub use cache_buster::CacheBuster;
pub use error::{CatalogError, ErrorKind};
pub use http_client::{
    CONNECT_TIMEOUT_SECS, HttpTimeouts, REQUEST_TIMEOUT_SECS, build_catalog_http_client,
};
pub use request::{
    CatalogClient, Endpoint, FacetFilter, MAX_HITS_PER_PAGE, SearchRequestPayload,
};

/// Facet value the catalog uses for publications without a release year.
pub const UNKNOWN_YEAR: &str = "unknown";

/// Placeholder for a missing format or title.
pub const UNKNOWN_FIELD: &str = "Unknown";

/// Current UTC year, computed once per process.
static CURRENT_YEAR: LazyLock<String> = LazyLock::new(|| Utc::now().format("%Y").to_string());

/// The parameters of one author search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Catalog base URL, e.g. `https://catalog.library.loudoun.gov/`.
    pub catalog_url: String,
    /// Author as the catalog displays it, e.g. `Grafton, Sue`.
    pub author: String,
    /// Canonical catalog media type, e.g. `Book`.
    pub media: String,
}

impl Query {
    /// Creates a query.
    pub fn new(
        catalog_url: impl Into<String>,
        author: impl Into<String>,
        media: impl Into<String>,
    ) -> Self {
        Self {
            catalog_url: catalog_url.into(),
            author: author.into(),
            media: media.into(),
        }
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.catalog_url.is_empty() {
            return Err(CatalogError::missing_field("catalog_url"));
        }
        if self.author.is_empty() {
            return Err(CatalogError::missing_field("author"));
        }
        if self.media.is_empty() {
            return Err(CatalogError::missing_field("media"));
        }
        Ok(())
    }
}

/// A publication that passed the local filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationInfo {
    /// Catalog format, or `Unknown`.
    pub media: String,
    /// Short title, or `Unknown`.
    pub title: String,
}

/// Publication-date partition searched per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearBucket {
    /// Publications without a known release year.
    Unknown,
    /// Publications released this calendar year.
    Current,
}

impl YearBucket {
    /// Buckets in search order.
    pub const SEARCH_ORDER: [Self; 2] = [Self::Unknown, Self::Current];
}

/// One publication record as returned by the catalog, with no fixed schema.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RawResource(Map<String, Value>);

impl RawResource {
    /// Returns the field as a string, or `None` if absent or not a string.
    #[must_use]
    pub fn string_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for RawResource {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    #[serde(default)]
    success: bool,
    #[serde(rename = "totalHits", default)]
    total_hits: u64,
}

/// A `null` page or `null` entry decodes rather than failing the search.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    resources: Option<Vec<Option<RawResource>>>,
}

/// Applies the local filter to one raw resource.
///
/// Drops resources without a string `shortAuthor` and resources whose author
/// is not exactly `author`. Missing format or title become `Unknown`.
#[must_use]
pub fn filter_resource(resource: &RawResource, author: &str) -> Option<PublicationInfo> {
    let resource_author = resource.string_field("shortAuthor")?;
    if resource_author != author {
        return None;
    }
    Some(PublicationInfo {
        media: resource
            .string_field("format")
            .unwrap_or(UNKNOWN_FIELD)
            .to_string(),
        title: resource
            .string_field("shortTitle")
            .unwrap_or(UNKNOWN_FIELD)
            .to_string(),
    })
}

/// Runs author searches against a CARL.X catalog.
#[derive(Debug)]
pub struct CatalogSearcher {
    client: CatalogClient,
    current_year: String,
}

impl CatalogSearcher {
    /// Creates a searcher with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ClientBuild`] if HTTP client construction fails.
    pub fn new() -> Result<Self, CatalogError> {
        Self::with_timeouts(HttpTimeouts::default())
    }

    /// Creates a searcher with the given timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ClientBuild`] if HTTP client construction fails.
    pub fn with_timeouts(timeouts: HttpTimeouts) -> Result<Self, CatalogError> {
        Ok(Self {
            client: CatalogClient::new(timeouts)?,
            current_year: CURRENT_YEAR.clone(),
        })
    }

    /// Overrides the year used for the current-year bucket.
    #[must_use]
    pub fn with_current_year(mut self, year: impl Into<String>) -> Self {
        self.current_year = year.into();
        self
    }

    /// The year searched for the current-year bucket.
    #[must_use]
    pub fn current_year(&self) -> &str {
        &self.current_year
    }

    fn bucket_value(&self, bucket: YearBucket) -> &str {
        match bucket {
            YearBucket::Unknown => UNKNOWN_YEAR,
            YearBucket::Current => &self.current_year,
        }
    }

    /// Returns this year's and unknown-year publications for the query's author.
    ///
    /// Unknown-year results come first, each bucket in page-arrival order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on an empty query field (before any request),
    /// any transport or decode failure, a failed count, or a retrieved count
    /// that disagrees with the announced one. No partial results are returned.
    #[tracing::instrument(skip(self), fields(author = %query.author, media = %query.media))]
    pub async fn search(&self, query: &Query) -> Result<Vec<PublicationInfo>, CatalogError> {
        query.validate()?;

        let mut publications = Vec::new();
        for bucket in YearBucket::SEARCH_ORDER {
            let year = self.bucket_value(bucket);
            let payload = SearchRequestPayload::new(
                &query.author,
                FacetFilter::year_and_format(year, &query.media),
            );

            let expected = self.count(query, &payload, year).await?;
            if expected == 0 {
                continue;
            }

            let mut retrieved: u64 = 0;
            while retrieved < expected {
                let page = self.fetch_page(query, &payload).await?;
                if page.is_empty() {
                    return Err(CatalogError::StalledPaging {
                        year: year.to_string(),
                        expected,
                        retrieved,
                    });
                }
                retrieved += page.len() as u64;
                debug!(year, retrieved, expected, "Page received");

                // Null entries count toward `retrieved` but never match.
                publications.extend(page.iter().flatten().filter_map(|resource| {
                    let kept = filter_resource(resource, &query.author)?;
                    debug!(media = %kept.media, title = %kept.title, "Matched publication");
                    Some(kept)
                }));
            }

            if retrieved > expected {
                return Err(CatalogError::CountMismatch {
                    year: year.to_string(),
                    expected,
                    retrieved,
                });
            }
        }

        Ok(publications)
    }

    async fn count(
        &self,
        query: &Query,
        payload: &SearchRequestPayload,
        year: &str,
    ) -> Result<u64, CatalogError> {
        let response: CountResponse = self
            .client
            .post_json(&query.catalog_url, Endpoint::Count, payload, "CountResponse")
            .await?;
        if !response.success {
            return Err(CatalogError::CountUnavailable {
                author: query.author.clone(),
                media: query.media.clone(),
                year: year.to_string(),
            });
        }
        debug!(year, expected = response.total_hits, "Expected number of matches");
        Ok(response.total_hits)
    }

    async fn fetch_page(
        &self,
        query: &Query,
        payload: &SearchRequestPayload,
    ) -> Result<Vec<Option<RawResource>>, CatalogError> {
        let response: SearchResponse = self
            .client
            .post_json(&query.catalog_url, Endpoint::Search, payload, "SearchResponse")
            .await?;
        let resources = response.resources.unwrap_or_default();
        debug!(resources = resources.len(), "Number of resources found");
        Ok(resources)
    }
}
