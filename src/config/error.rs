//! Error types for configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or validating the YAML config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Read {
        /// The config path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The path exists but is not a regular file.
    #[error("{path} is a directory; must be a file")]
    NotAFile {
        /// The config path.
        path: PathBuf,
    },

    /// The file has no content.
    #[error("configuration content is empty")]
    Empty,

    /// The content is not YAML of the expected shape.
    #[error("unable to parse YAML config: {source}")]
    Parse {
        /// The underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A field failed validation.
    #[error("invalid config value for '{field}': {reason}\n  Suggestion: {suggestion}")]
    Invalid {
        /// Path of the offending field, e.g. `authors[1].media-type`.
        field: String,
        /// Why the value was rejected.
        reason: String,
        /// How to fix the issue.
        suggestion: String,
    },
}

impl ConfigError {
    /// Creates an `Invalid` error.
    #[must_use]
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>, suggestion: &str) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
            suggestion: suggestion.to_string(),
        }
    }
}
