//! Booklist Library
//!
//! Searches a CARL.X library catalog for this year's publications (and those
//! with no known publication year) by a configured list of authors.
//!
//! # Architecture
//!
//! - [`catalog`] - Search coordinator, request builder and transport
//! - [`config`] - YAML configuration loading and validation
//! - [`output`] - Console formatting of results

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod output;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use catalog::{
    CatalogError, CatalogSearcher, ErrorKind, HttpTimeouts, PublicationInfo, Query,
    REQUEST_TIMEOUT_SECS,
};
pub use config::{Config, ConfigError, DEFAULT_MEDIA_TYPE};
pub use output::{author_header, format_results};
