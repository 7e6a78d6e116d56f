//! YAML configuration: catalog URL, default media type and author list.
//!
//! ```yaml
//! catalog-url: https://catalog.library.loudoun.gov/
//! media-type: Book
//! authors:
//!     - firstname: James
//!       lastname: Patterson
//!       media-type: book on cd
//!     - firstname: Alexander
//!       lastname: McCall Smith
//! ```
//!
//! Media-type names are case-insensitive and are converted to the names the
//! catalog expects in its `Format` facet. Some types are supersets of others:
//! `book` includes `large print`, `electronic resource` includes `ebook`.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::catalog::Query;

mod error;

pub use error::ConfigError;

/// Media type used when neither the author nor the file sets one.
pub const DEFAULT_MEDIA_TYPE: &str = "Book";

/// Config name (lower case) to catalog `Format` facet value.
pub const MEDIA_TYPES: &[(&str, &str)] = &[
    ("book", "Book"),
    ("electronic resource", "Electronic Resource"),
    ("ebook", "eBook"),
    ("eaudiobook", "eAudioBook"),
    ("book on cd", "Book on CD"),
    ("large print", "Large Print"),
    ("music cd", "Music CD"),
    ("dvd", "DVD"),
    ("blu-ray", "Blu-Ray"),
];

/// Looks up the catalog name for a media type, ignoring case.
#[must_use]
pub fn canonical_media_type(name: &str) -> Option<&'static str> {
    let lower = name.trim().to_lowercase();
    MEDIA_TYPES
        .iter()
        .find(|(key, _)| *key == lower)
        .map(|(_, canonical)| *canonical)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(rename = "catalog-url")]
    catalog_url: Option<String>,
    #[serde(rename = "media-type")]
    media_type: Option<String>,
    authors: Option<Vec<RawAuthor>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAuthor {
    firstname: Option<String>,
    lastname: Option<String>,
    #[serde(rename = "media-type")]
    media_type: Option<String>,
}

/// One configured author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorEntry {
    pub first_name: String,
    pub last_name: String,
    /// Canonical media type override for this author.
    pub media: Option<String>,
}

impl AuthorEntry {
    /// The author as the catalog displays it: `Last, First`.
    #[must_use]
    pub fn catalog_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

/// Validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Absolute http(s) catalog URL ending in `/`.
    pub catalog_url: String,
    /// Canonical media type for authors without an override.
    pub default_media: String,
    /// Authors in file order.
    pub authors: Vec<AuthorEntry>,
}

impl Config {
    /// Reads and validates the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the path is missing, is a directory, or its
    /// content fails parsing or validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if metadata.is_dir() {
            return Err(ConfigError::NotAFile {
                path: path.to_path_buf(),
            });
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = raw.len(), "Read config file");
        Self::from_yaml_str(&raw)
    }

    /// Parses and validates YAML config content.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the content is empty, is not valid YAML of
    /// the expected shape, or fails validation.
    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Err(ConfigError::Empty);
        }
        let parsed: RawConfig =
            serde_yaml::from_str(raw).map_err(|source| ConfigError::Parse { source })?;
        Self::validate(parsed)
    }

    fn validate(raw: RawConfig) -> Result<Self, ConfigError> {
        let catalog_url = validate_catalog_url(raw.catalog_url)?;

        let default_media = match raw.media_type.as_deref() {
            None | Some("") => DEFAULT_MEDIA_TYPE.to_string(),
            Some(name) => validate_media("media-type", name)?,
        };

        let raw_authors = raw.authors.unwrap_or_default();
        if raw_authors.is_empty() {
            return Err(ConfigError::invalid(
                "authors",
                "at least one author is required",
                "Add an `authors` list with firstname and lastname entries",
            ));
        }

        let authors = raw_authors
            .into_iter()
            .enumerate()
            .map(|(index, author)| validate_author(index, author))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            catalog_url,
            default_media,
            authors,
        })
    }

    /// One search query per author, in file order.
    #[must_use]
    pub fn queries(&self) -> Vec<Query> {
        self.authors
            .iter()
            .map(|author| {
                let media = author
                    .media
                    .clone()
                    .unwrap_or_else(|| self.default_media.clone());
                Query::new(self.catalog_url.clone(), author.catalog_name(), media)
            })
            .collect()
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.catalog_url)?;
        writeln!(f, "{}", self.default_media)?;
        for author in &self.authors {
            match &author.media {
                Some(media) => writeln!(f, "   {} {}; {media}", author.first_name, author.last_name)?,
                None => writeln!(f, "   {} {}", author.first_name, author.last_name)?,
            }
        }
        Ok(())
    }
}

fn validate_catalog_url(value: Option<String>) -> Result<String, ConfigError> {
    const SUGGESTION: &str = "Set `catalog-url` to the catalog's absolute http(s) address";

    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Err(ConfigError::invalid(
            "catalog-url",
            "catalog-url is required",
            SUGGESTION,
        ));
    };
    let value = value.trim();
    let parsed = Url::parse(value)
        .map_err(|e| ConfigError::invalid("catalog-url", format!("'{value}': {e}"), SUGGESTION))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::invalid(
            "catalog-url",
            format!("unsupported scheme '{}'", parsed.scheme()),
            SUGGESTION,
        ));
    }

    let mut normalized = value.to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Ok(normalized)
}

fn validate_media(field: &str, name: &str) -> Result<String, ConfigError> {
    canonical_media_type(name)
        .map(str::to_string)
        .ok_or_else(|| {
            let allowed: Vec<&str> = MEDIA_TYPES.iter().map(|(key, _)| *key).collect();
            ConfigError::invalid(
                field,
                format!("unknown media type '{name}'"),
                &format!("Use one of: {}", allowed.join(", ")),
            )
        })
}

fn validate_author(index: usize, raw: RawAuthor) -> Result<AuthorEntry, ConfigError> {
    let first_name = required_name(index, "firstname", raw.firstname)?;
    let last_name = required_name(index, "lastname", raw.lastname)?;
    let media = match raw.media_type.as_deref() {
        None | Some("") => None,
        Some(name) => Some(validate_media(
            &format!("authors[{index}].media-type"),
            name,
        )?),
    };
    Ok(AuthorEntry {
        first_name,
        last_name,
        media,
    })
}

fn required_name(index: usize, key: &str, value: Option<String>) -> Result<String, ConfigError> {
    match value {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(ConfigError::invalid(
            format!("authors[{index}].{key}"),
            format!("{key} is required and must be non-empty"),
            "Give every author both a firstname and a lastname",
        )),
    }
}
