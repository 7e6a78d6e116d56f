//! Console formatting for search results.
//!
//! Some media types are supersets of others, so each title is shown with the
//! format the catalog reported for it.

use std::fmt::Write as _;

use crate::catalog::PublicationInfo;

/// Header line printed before an author's results.
#[must_use]
pub fn author_header(author: &str, media: &str) -> String {
    format!("{author} -- {media}s:")
}

/// Formats results as `  [media]  title` lines, media padded to the widest entry.
#[must_use]
pub fn format_results(results: &[PublicationInfo]) -> String {
    let width = results
        .iter()
        .map(|info| info.media.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for info in results {
        let _ = writeln!(out, "  [{:<width$}]  {}", info.media, info.title);
    }
    out
}
