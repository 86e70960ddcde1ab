//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories translate between Diesel rows (`models.rs`, `schema.rs`) and
//! domain types; neither rows nor schema leave this module. Connections come
//! from a `bb8` pool driven by `diesel-async`, and every database failure is
//! mapped onto the owning port's connection or query error.
//!
//! ```ignore
//! use blog_backend::outbound::persistence::{DbPool, PoolConfig, diesel_repositories};
//!
//! run_migrations("postgres://localhost/blog").await?;
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/blog")).await?;
//! let repos = diesel_repositories(&pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_comment_repository;
mod diesel_follow_repository;
mod diesel_group_repository;
mod diesel_post_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

use std::sync::Arc;

use crate::domain::ports::Repositories;

pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_follow_repository::DieselFollowRepository;
pub use diesel_group_repository::DieselGroupRepository;
pub use diesel_post_repository::DieselPostRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

/// Every repository port backed by `pool`.
pub fn diesel_repositories(pool: &DbPool) -> Repositories {
    Repositories {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        groups: Arc::new(DieselGroupRepository::new(pool.clone())),
        posts: Arc::new(DieselPostRepository::new(pool.clone())),
        comments: Arc::new(DieselCommentRepository::new(pool.clone())),
        follows: Arc::new(DieselFollowRepository::new(pool.clone())),
    }
}
