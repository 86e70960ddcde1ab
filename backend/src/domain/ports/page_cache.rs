//! Port interface for caching rendered pages.
use std::time::Duration;

use async_trait::async_trait;

use super::{PageCacheKey, define_port_error};

define_port_error! {
    /// Errors surfaced by page cache adapters.
    pub enum PageCacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "page cache backend failure: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageCache: Send + Sync {
    /// Read a cached page that has not yet expired.
    async fn get(&self, key: &PageCacheKey) -> Result<Option<Vec<u8>>, PageCacheError>;

    /// Store a page that expires after `ttl`.
    async fn put(
        &self,
        key: &PageCacheKey,
        body: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), PageCacheError>;

    /// Drop every entry whose key starts with `prefix`.
    async fn invalidate_prefix(&self, prefix: &str) -> Result<(), PageCacheError>;
}
