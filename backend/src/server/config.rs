//! HTTP server configuration object.

use std::net::SocketAddr;
use std::time::Duration;

use blog_backend::domain::DEFAULT_INDEX_TTL;
use blog_backend::inbound::http::session_config::SessionSettings;
use blog_backend::outbound::persistence::DbPool;

/// Everything needed to build and bind the server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) index_cache_ttl: Duration,
}

impl ServerConfig {
    /// Configuration with the in-memory store and the default index TTL.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            db_pool: None,
            index_cache_ttl: DEFAULT_INDEX_TTL,
        }
    }

    /// Serve from PostgreSQL through `pool`.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Keep rendered index pages for `ttl`.
    #[must_use]
    pub fn with_index_cache_ttl(mut self, ttl: Duration) -> Self {
        self.index_cache_ttl = ttl;
        self
    }
}
