//! HTTP client construction policy for catalog requests.
//!
//! Every catalog request goes through one client with the same timeouts,
//! user agent and gzip support.

use std::time::Duration;

use reqwest::Client;

use crate::user_agent;

use super::CatalogError;

/// Default connect timeout for catalog requests.
pub const CONNECT_TIMEOUT_SECS: u64 = 5;
/// Default full round-trip timeout for catalog requests.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Timeouts applied to every catalog request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// Connect timeout in seconds.
    pub connect_secs: u64,
    /// Round-trip timeout in seconds, covering connect, send and body read.
    pub request_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect_secs: CONNECT_TIMEOUT_SECS,
            request_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

impl HttpTimeouts {
    /// Returns default timeouts with the given round-trip timeout.
    ///
    /// The connect timeout never exceeds the round-trip timeout.
    #[must_use]
    pub fn with_request_secs(request_secs: u64) -> Self {
        Self {
            connect_secs: CONNECT_TIMEOUT_SECS.min(request_secs),
            request_secs,
        }
    }
}

/// Builds the catalog HTTP client.
///
/// # Errors
///
/// Returns [`CatalogError::ClientBuild`] when client construction fails.
pub fn build_catalog_http_client(timeouts: HttpTimeouts) -> Result<Client, CatalogError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .timeout(Duration::from_secs(timeouts.request_secs))
        .user_agent(user_agent::default_user_agent())
        .gzip(true)
        .build()
        .map_err(|error| CatalogError::ClientBuild {
            reason: error.to_string(),
        })
}
