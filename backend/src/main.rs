//! Backend entry-point: loads settings, prepares storage and serves the blog.

mod server;

use std::net::SocketAddr;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use blog_backend::inbound::http::health::HealthState;
use blog_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use blog_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use blog_backend::settings::ServerSettings;

use server::{ServerConfig, create_server};

fn other(err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(err.to_string())
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().map_err(other)?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(other)?;
    let bind_addr: SocketAddr = settings.bind_addr().parse().map_err(other)?;

    let mut config =
        ServerConfig::new(session, bind_addr).with_index_cache_ttl(settings.index_cache_ttl());
    if let Some(url) = settings.database_url.as_deref() {
        if settings.run_migrations {
            run_migrations(url).await.map_err(other)?;
        }
        let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.pool_max_size()))
            .await
            .map_err(other)?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "listening");
    server.await
}
