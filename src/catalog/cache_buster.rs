//! Cache-bust tokens for the `_` query parameter.
//!
//! CARL.X pages use a 13-digit millisecond timestamp in `_` so repeated
//! identical POSTs are not answered from a cache. Millisecond precision alone
//! collides for back-to-back requests, so a counter is added on top.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Generates unique cache-bust tokens.
///
/// The counter is never reset. Each generator is independent, so two
/// searchers never share state.
#[derive(Debug, Default)]
pub struct CacheBuster {
    increment: AtomicU64,
}

impl CacheBuster {
    /// Creates a generator whose first token adds 1 to the timestamp.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next token for the current UTC time.
    #[must_use]
    pub fn next_token(&self) -> String {
        let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        self.token_at(millis)
    }

    fn token_at(&self, millis: u64) -> String {
        let increment = self.increment.fetch_add(1, Ordering::Relaxed) + 1;
        millis.saturating_add(increment).to_string()
    }
}
