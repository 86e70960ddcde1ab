//! In-process page cache.
//!
//! Entries live in a mutex-guarded map and expire against an injected clock,
//! so tests can step past the TTL without sleeping. Expired entries are
//! dropped when read and swept on every write.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{PageCache, PageCacheError, PageCacheKey};

struct Entry {
    body: Vec<u8>,
    expires_at: DateTime<Utc>,
}

/// Page cache held in process memory.
pub struct InMemoryPageCache {
    entries: Mutex<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryPageCache {
    /// Create an empty cache reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Entry>>, PageCacheError> {
        self.entries
            .lock()
            .map_err(|_| PageCacheError::backend("page cache lock poisoned"))
    }
}

#[async_trait]
impl PageCache for InMemoryPageCache {
    async fn get(&self, key: &PageCacheKey) -> Result<Option<Vec<u8>>, PageCacheError> {
        let now = self.clock.utc();
        let mut entries = self.lock()?;
        match entries.get(key.as_str()) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.body.clone())),
            Some(_) => {
                entries.remove(key.as_str());
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(
        &self,
        key: &PageCacheKey,
        body: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), PageCacheError> {
        let ttl = TimeDelta::from_std(ttl)
            .map_err(|err| PageCacheError::backend(format!("invalid ttl: {err}")))?;
        let now = self.clock.utc();
        let mut entries = self.lock()?;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.as_str().to_owned(),
            Entry {
                body,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn invalidate_prefix(&self, prefix: &str) -> Result<(), PageCacheError> {
        self.lock()?.retain(|key, _| !key.starts_with(prefix));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MutableClock;
    use pagination::PageNumber;
    use rstest::{fixture, rstest};

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        Arc::new(MutableClock::new(Utc::now()))
    }

    fn key(page: u32) -> PageCacheKey {
        PageCacheKey::index_page(PageNumber::new(page).expect("valid page"))
    }

    #[rstest]
    #[tokio::test]
    async fn entries_expire_after_their_ttl(clock: Arc<MutableClock>) {
        let cache = InMemoryPageCache::new(clock.clone());
        cache
            .put(&key(1), b"page".to_vec(), Duration::from_secs(20))
            .await
            .expect("put");

        clock.advance_seconds(19);
        assert_eq!(
            cache.get(&key(1)).await.expect("get"),
            Some(b"page".to_vec())
        );

        clock.advance_seconds(1);
        assert_eq!(cache.get(&key(1)).await.expect("get"), None);
    }

    #[rstest]
    #[tokio::test]
    async fn writes_sweep_expired_entries(clock: Arc<MutableClock>) {
        let cache = InMemoryPageCache::new(clock.clone());
        for page in 1..=3 {
            cache
                .put(&key(page), b"old".to_vec(), Duration::from_secs(5))
                .await
                .expect("put");
        }

        clock.advance_seconds(6);
        cache
            .put(&key(4), b"new".to_vec(), Duration::from_secs(5))
            .await
            .expect("put");

        let stored: Vec<String> = cache
            .entries
            .lock()
            .expect("lock")
            .keys()
            .cloned()
            .collect();
        assert_eq!(stored, vec![key(4).as_str().to_owned()]);
    }

    #[rstest]
    #[tokio::test]
    async fn invalidation_only_drops_matching_prefixes(clock: Arc<MutableClock>) {
        let cache = InMemoryPageCache::new(clock);
        let other = PageCacheKey::new("profile:leo").expect("valid key");
        for cache_key in [key(1), key(2), other.clone()] {
            cache
                .put(&cache_key, b"x".to_vec(), Duration::from_secs(60))
                .await
                .expect("put");
        }

        cache
            .invalidate_prefix(PageCacheKey::INDEX_PREFIX)
            .await
            .expect("invalidate");

        assert_eq!(cache.get(&key(1)).await.expect("get"), None);
        assert_eq!(cache.get(&key(2)).await.expect("get"), None);
        assert!(cache.get(&other).await.expect("get").is_some());
    }
}
