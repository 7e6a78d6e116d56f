//! User-Agent string for catalog requests.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/kbalk/booklist";

/// Default User-Agent for catalog requests (identifies the tool and version).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("booklist/{version} (catalog-poller; +{PROJECT_UA_URL})")
}
