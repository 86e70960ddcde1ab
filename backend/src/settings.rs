//! Server settings loaded via OrthoConfig.
//!
//! Values come from `BLOG_*` environment variables, the command line, or a
//! config file. Session cookie settings are read separately by
//! [`crate::inbound::http::session_config`].

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::DEFAULT_INDEX_TTL;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Process-wide server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BLOG")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the in-memory store is used.
    pub database_url: Option<String>,
    /// Apply pending migrations at startup.
    #[ortho_config(default = false)]
    pub run_migrations: bool,
    /// Lifetime of cached global feed pages, in seconds.
    pub index_cache_ttl_secs: Option<u64>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
}

impl ServerSettings {
    /// Configured bind address, or all interfaces on port 8080.
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Configured index cache lifetime, or twenty seconds.
    pub fn index_cache_ttl(&self) -> Duration {
        self.index_cache_ttl_secs
            .map_or(DEFAULT_INDEX_TTL, Duration::from_secs)
    }

    /// Configured pool size, or ten.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }
}
