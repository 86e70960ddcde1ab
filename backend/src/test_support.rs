//! Test utilities for the backend crate.
//!
//! Shared by unit tests in `src/` and integration tests in `tests/` through
//! the `test-support` feature.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::{DEFAULT_INDEX_TTL, IndexPageCache};
use crate::inbound::http::state::HttpState;
use crate::outbound::cache::InMemoryPageCache;
use crate::outbound::memory::InMemoryStore;

/// Clock that only moves when told to.
///
/// # Examples
/// ```
/// use blog_backend::test_support::MutableClock;
/// use chrono::Utc;
/// use mockable::Clock;
///
/// let start = Utc::now();
/// let clock = MutableClock::new(start);
/// clock.advance_seconds(30);
/// assert_eq!((clock.utc() - start).num_seconds(), 30);
/// ```
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Start the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let delta = match TimeDelta::from_std(delta) {
            Ok(delta) => delta,
            Err(error) => {
                panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}")
            }
        };
        *self.lock_clock() += delta;
    }

    /// Move the clock forward by whole seconds.
    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// In-memory store, page cache and handler state sharing one [`MutableClock`].
///
/// # Examples
/// ```
/// use blog_backend::test_support::MemoryBackend;
///
/// let backend = MemoryBackend::new();
/// backend.store.register_user("leo", "secret").expect("registered");
/// assert_eq!(backend.store.post_count(), 0);
/// ```
pub struct MemoryBackend {
    /// Clock stamping posts and expiring cached pages.
    pub clock: Arc<MutableClock>,
    /// Backing store for every repository port.
    pub store: Arc<InMemoryStore>,
    /// Handler state wired over `store`.
    pub state: HttpState,
}

impl MemoryBackend {
    /// Backend caching index pages for the default TTL.
    pub fn new() -> Self {
        Self::with_index_ttl(DEFAULT_INDEX_TTL)
    }

    /// Backend caching index pages for `ttl`.
    pub fn with_index_ttl(ttl: Duration) -> Self {
        let clock = Arc::new(MutableClock::new(Utc::now()));
        let shared: Arc<dyn Clock> = clock.clone();
        let store = Arc::new(InMemoryStore::new(shared.clone()));
        let cache = IndexPageCache::new(Arc::new(InMemoryPageCache::new(shared)), ttl);
        let state = match HttpState::from_repositories(&store.repositories(), cache) {
            Ok(state) => state,
            Err(error) => panic!("failed to wire in-memory handler state: {error}"),
        };
        Self {
            clock,
            store,
            state,
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}
