//! Engine configuration.

use chrono::Duration;

/// Server-side harvest parameters.
///
/// `store_timeout` bounds the single suspension point (the range query)
/// and must stay well below `token_ttl`: a token should never expire while
/// the page it resumes is still being produced.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Records per page when the first request does not choose a size.
    pub default_page_size: u32,

    /// How long an issued token remains valid. This bounds how long the
    /// server must keep a watermark meaningful in the presence of record
    /// deletion and compaction.
    pub token_ttl: Duration,

    /// Upper bound on one range query against the record store.
    pub store_timeout: std::time::Duration,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            default_page_size: 50,
            token_ttl: Duration::hours(24),
            store_timeout: std::time::Duration::from_secs(10),
        }
    }
}

impl HarvestConfig {
    /// Set the default page size (clamped to at least 1).
    pub fn with_default_page_size(mut self, page_size: u32) -> Self {
        self.default_page_size = page_size.max(1);
        self
    }

    /// Set the token time-to-live.
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Set the store query timeout.
    pub fn with_store_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.store_timeout = timeout;
        self
    }
}
