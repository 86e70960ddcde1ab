//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they stay testable without I/O.

use std::sync::Arc;

use pagination::Paginator;

use crate::domain::ports::{FeedQuery, FollowCommand, LoginService, PostWriter, Repositories};
use crate::domain::{
    Error, FeedService, FollowService, IndexPageCache, POSTS_PER_PAGE, PasswordLoginService,
    PostService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub feeds: Arc<dyn FeedQuery>,
    pub posts: Arc<dyn PostWriter>,
    pub follows: Arc<dyn FollowCommand>,
    pub index_cache: IndexPageCache,
}

impl HttpState {
    /// Build the domain services over `repos`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// use blog_backend::domain::IndexPageCache;
    /// use blog_backend::inbound::http::state::HttpState;
    /// use blog_backend::outbound::cache::InMemoryPageCache;
    /// use blog_backend::outbound::memory::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::new(Arc::new(mockable::DefaultClock)));
    /// let cache = InMemoryPageCache::new(Arc::new(mockable::DefaultClock));
    /// let state = HttpState::from_repositories(
    ///     &store.repositories(),
    ///     IndexPageCache::new(Arc::new(cache), Duration::from_secs(20)),
    /// );
    /// assert!(state.is_ok());
    /// ```
    pub fn from_repositories(repos: &Repositories, index_cache: IndexPageCache) -> Result<Self, Error> {
        let paginator = Paginator::new(POSTS_PER_PAGE)
            .map_err(|err| Error::internal(format!("feed paginator: {err}")))?;
        Ok(Self {
            login: Arc::new(PasswordLoginService::new(repos.users.clone())),
            feeds: Arc::new(FeedService::new(
                repos.posts.clone(),
                repos.groups.clone(),
                repos.users.clone(),
                repos.comments.clone(),
                repos.follows.clone(),
                paginator,
            )),
            posts: Arc::new(PostService::new(
                repos.posts.clone(),
                repos.groups.clone(),
                repos.comments.clone(),
            )),
            follows: Arc::new(FollowService::new(
                repos.users.clone(),
                repos.follows.clone(),
            )),
            index_cache,
        })
    }
}
