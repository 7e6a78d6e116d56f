//! Error types for catalog searches.
//!
//! Every variant aborts the whole search for one author. Messages follow the
//! What/Why/Fix pattern used across the project.

use thiserror::Error;

/// Coarse classification of a [`CatalogError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required query field was empty; no request was sent.
    Validation,
    /// The request could not be sent or the catalog answered with a failure status.
    Transport,
    /// The response body was not the JSON shape we expected.
    Decode,
    /// The catalog's answers contradict each other or our paging assumptions.
    Protocol,
}

/// Errors that can occur while searching the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A required query field is empty.
    #[error("missing required search field '{field}'\n  Suggestion: {suggestion}")]
    MissingField {
        /// Name of the empty field.
        field: &'static str,
        /// How to fix the issue.
        suggestion: &'static str,
    },

    /// The catalog URL could not be combined with the endpoint path.
    #[error("invalid catalog URL '{url}': {source}")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client construction failed: {reason}")]
    ClientBuild {
        /// Why construction failed.
        reason: String,
    },

    /// Network-level failure (DNS, connection refused, TLS, body read).
    #[error("POST request '{url}' failed: {source}\n  Suggestion: Check your network connection and the catalog URL")]
    Network {
        /// The request URL.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The request exceeded its timeout.
    #[error("POST request '{url}' timed out after {timeout_secs}s\n  Suggestion: Try again later or raise --timeout")]
    Timeout {
        /// The request URL.
        url: String,
        /// The round-trip timeout that was exceeded.
        timeout_secs: u64,
    },

    /// The catalog answered with a non-success status.
    #[error("POST request '{url}' failed: HTTP {status}")]
    HttpStatus {
        /// The request URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("unable to decode response from '{url}' into {target}: {source}")]
    Decode {
        /// Name of the expected response shape.
        target: &'static str,
        /// The request URL.
        url: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The count endpoint reported failure.
    #[error(
        "failed to retrieve total number of matches for author '{author}', media '{media}', year '{year}'\n  Suggestion: Check that the media type is offered by this catalog"
    )]
    CountUnavailable {
        /// Author searched for.
        author: String,
        /// Media type searched for.
        media: String,
        /// Year bucket searched.
        year: String,
    },

    /// More publications were received than the count endpoint announced.
    #[error(
        "received more publications than expected for year '{year}': expected {expected}, currently have {retrieved}"
    )]
    CountMismatch {
        /// Year bucket searched.
        year: String,
        /// Total announced by the count endpoint.
        expected: u64,
        /// Total received from the fetch endpoint.
        retrieved: u64,
    },

    /// The fetch endpoint returned an empty page before the expected total was reached.
    #[error(
        "catalog stopped returning publications for year '{year}': expected {expected}, received {retrieved}"
    )]
    StalledPaging {
        /// Year bucket searched.
        year: String,
        /// Total announced by the count endpoint.
        expected: u64,
        /// Total received before the empty page.
        retrieved: u64,
    },
}

impl CatalogError {
    /// Creates a `MissingField` error for an empty query field.
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField {
            field,
            suggestion: "Provide a non-empty value for every search field",
        }
    }

    /// Creates a `Network` or `Timeout` error from a reqwest error.
    #[must_use]
    pub fn from_reqwest(url: impl Into<String>, source: reqwest::Error, timeout_secs: u64) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url, timeout_secs }
        } else {
            Self::Network { url, source }
        }
    }

    /// Returns the taxonomy bucket this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingField { .. } => ErrorKind::Validation,
            Self::InvalidUrl { .. }
            | Self::ClientBuild { .. }
            | Self::Network { .. }
            | Self::Timeout { .. }
            | Self::HttpStatus { .. } => ErrorKind::Transport,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::CountUnavailable { .. }
            | Self::CountMismatch { .. }
            | Self::StalledPaging { .. } => ErrorKind::Protocol,
        }
    }
}
