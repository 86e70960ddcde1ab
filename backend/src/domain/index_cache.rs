//! Short-lived cache of rendered global feed pages.
//!
//! Pages are cached whole, keyed by the page number actually served, so
//! requests past the last page never add entries of their own. Within the
//! TTL every reader sees the same bytes, even if posts were created
//! meanwhile; [`IndexPageCache::invalidate`] drops every cached page at once.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use pagination::PageNumber;
use tracing::{debug, warn};

use crate::domain::Error;
use crate::domain::ports::{PageCache, PageCacheKey};

/// Default lifetime of a cached index page.
pub const DEFAULT_INDEX_TTL: Duration = Duration::from_secs(20);

/// A rendered index page and the page it holds once clamped to the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Page actually served.
    pub number: PageNumber,
    /// Response body.
    pub body: Vec<u8>,
}

/// Read-through cache for the global feed.
#[derive(Clone)]
pub struct IndexPageCache {
    cache: Arc<dyn PageCache>,
    ttl: Duration,
}

impl IndexPageCache {
    /// Wrap `cache`, storing pages for `ttl`.
    pub fn new(cache: Arc<dyn PageCache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Lifetime of cached pages.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached bytes for `page`, rendering and storing them on a
    /// miss.
    ///
    /// The rendered page is stored under the number it actually holds.
    /// Cache failures are logged and the page is rendered uncached; only
    /// render failures propagate.
    pub async fn get_or_render<F, Fut>(&self, page: PageNumber, render: F) -> Result<Vec<u8>, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RenderedPage, Error>>,
    {
        let key = PageCacheKey::index_page(page);
        match self.cache.get(&key).await {
            Ok(Some(body)) => {
                debug!(%key, "index page served from cache");
                return Ok(body);
            }
            Ok(None) => {}
            Err(err) => warn!(%key, error = %err, "index cache read failed"),
        }

        let RenderedPage { number, body } = render().await?;
        let key = PageCacheKey::index_page(number);
        if let Err(err) = self.cache.put(&key, body.clone(), self.ttl).await {
            warn!(%key, error = %err, "index cache write failed");
        }
        Ok(body)
    }

    /// Drop every cached index page.
    pub async fn invalidate(&self) -> Result<(), Error> {
        self.cache
            .invalidate_prefix(PageCacheKey::INDEX_PREFIX)
            .await
            .map_err(|err| Error::service_unavailable(err.to_string()))?;
        debug!("index cache cleared");
        Ok(())
    }
}
