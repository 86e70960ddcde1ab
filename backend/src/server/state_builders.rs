//! Builds handler state from the configured storage.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::warn;

use blog_backend::domain::{Error, IndexPageCache};
use blog_backend::inbound::http::state::HttpState;
use blog_backend::outbound::cache::InMemoryPageCache;
use blog_backend::outbound::memory::InMemoryStore;
use blog_backend::outbound::persistence::diesel_repositories;

use super::ServerConfig;

/// Wire every driving port over PostgreSQL when a pool is configured, or
/// over a fresh in-memory store otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> Result<HttpState, Error> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let repositories = match &config.db_pool {
        Some(pool) => diesel_repositories(pool),
        None => {
            warn!("no database configured; data lives in memory and is lost on exit");
            Arc::new(InMemoryStore::new(clock.clone())).repositories()
        }
    };
    let index_cache = IndexPageCache::new(
        Arc::new(InMemoryPageCache::new(clock)),
        config.index_cache_ttl,
    );
    HttpState::from_repositories(&repositories, index_cache)
}
