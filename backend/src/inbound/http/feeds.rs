//! Read-only page routes: the feeds and the post detail page.
//!
//! ```text
//! GET /                      global feed, cached per page
//! GET /group/{slug}/         group feed
//! GET /profile/{username}/   author feed and follow state
//! GET /follow/               posts by followed authors (login required)
//! GET /posts/{id}/           post with comments
//! ```

use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, get, web};
use pagination::PageNumber;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::domain::ports::{AuthorFeed, FeedPage, GroupFeed, PostDetail};
use crate::domain::{Error, PostId, RenderedPage};

use super::error::PageResult;
use super::links::PageLinks;
use super::session::Viewer;
use super::state::HttpState;
use super::ApiResult;

/// `page` query parameter shared by every feed.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(default)]
pub struct PageQuery {
    /// 1-indexed page; invalid values mean the first page.
    pub page: Option<String>,
}

impl PageQuery {
    fn number(&self) -> PageNumber {
        PageNumber::from_query(self.page.as_deref())
    }
}

/// A feed body with pagination links.
#[derive(Debug, Serialize)]
pub struct Paged<T> {
    #[serde(flatten)]
    pub body: T,
    pub links: PageLinks,
}

/// Plain list of posts.
#[derive(Debug, Serialize)]
pub struct PostList {
    pub posts: FeedPage,
}

pub(crate) fn post_id(raw: i64) -> Result<PostId, Error> {
    PostId::new(raw).map_err(|_| Error::not_found(format!("post {raw} not found")))
}

/// Global feed. Rendered pages are cached, so new posts appear once the
/// cached page expires or the cache is cleared.
#[utoipa::path(
    get,
    path = "/",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of every post"),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["feeds"],
    operation_id = "globalFeed"
)]
#[get("/")]
pub async fn index(
    state: web::Data<HttpState>,
    req: HttpRequest,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let number = query.number();
    let (feeds, req) = (&state.feeds, &req);
    let body = state
        .index_cache
        .get_or_render(number, move || async move {
            let posts = feeds.global_feed(number).await?;
            let served = posts.number();
            let links = PageLinks::canonical(req, &posts);
            let body = serde_json::to_vec(&Paged {
                body: PostList { posts },
                links,
            })
            .map_err(|err| Error::internal(format!("render index page: {err}")))?;
            Ok(RenderedPage {
                number: served,
                body,
            })
        })
        .await?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(body))
}

/// Posts in one group.
#[utoipa::path(
    get,
    path = "/group/{slug}/",
    params(("slug" = String, Path, description = "Group slug"), PageQuery),
    responses(
        (status = 200, description = "Group and one page of its posts"),
        (status = 404, description = "Unknown group", body = Error)
    ),
    tags = ["feeds"],
    operation_id = "groupFeed"
)]
#[get("/group/{slug}/")]
pub async fn group_feed(
    state: web::Data<HttpState>,
    req: HttpRequest,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paged<GroupFeed>>> {
    let feed = state.feeds.group_feed(&slug, query.number()).await?;
    let links = PageLinks::for_request(&req, &feed.posts);
    Ok(web::Json(Paged { body: feed, links }))
}

/// An author's profile.
#[utoipa::path(
    get,
    path = "/profile/{username}/",
    params(("username" = String, Path, description = "Author username"), PageQuery),
    responses(
        (status = 200, description = "Author, post count, follow state and one page of posts"),
        (status = 404, description = "Unknown author", body = Error)
    ),
    tags = ["feeds"],
    operation_id = "authorFeed"
)]
#[get("/profile/{username}/")]
pub async fn profile(
    state: web::Data<HttpState>,
    req: HttpRequest,
    viewer: Viewer,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paged<AuthorFeed>>> {
    let feed = state
        .feeds
        .author_feed(viewer.user_id(), &username, query.number())
        .await?;
    let links = PageLinks::for_request(&req, &feed.posts);
    Ok(web::Json(Paged { body: feed, links }))
}

/// Posts by authors the viewer follows.
#[utoipa::path(
    get,
    path = "/follow/",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of followed authors' posts"),
        (status = 302, description = "Login required; redirect to the login page")
    ),
    tags = ["feeds"],
    operation_id = "followingFeed"
)]
#[get("/follow/")]
pub async fn following_feed(
    state: web::Data<HttpState>,
    req: HttpRequest,
    viewer: Viewer,
    query: web::Query<PageQuery>,
) -> PageResult<web::Json<Paged<PostList>>> {
    let posts = state
        .feeds
        .following_feed(viewer.user_id(), query.number())
        .await
        .map_err(|err| viewer.reject(err))?;
    let links = PageLinks::for_request(&req, &posts);
    Ok(web::Json(Paged {
        body: PostList { posts },
        links,
    }))
}

/// A single post with its comments.
#[utoipa::path(
    get,
    path = "/posts/{id}/",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post, author post count and comments"),
        (status = 404, description = "Unknown post", body = Error)
    ),
    tags = ["feeds"],
    operation_id = "postDetail"
)]
#[get("/posts/{id}/")]
pub async fn post_detail(
    state: web::Data<HttpState>,
    id: web::Path<i64>,
) -> ApiResult<web::Json<PostDetail>> {
    let id = post_id(id.into_inner())?;
    Ok(web::Json(state.feeds.post_detail(id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockFeedQuery;
    use crate::inbound::http::test_utils::test_session_middleware;
    use crate::test_support::MemoryBackend;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test as actix_test};
    use pagination::Paginator;
    use rstest::rstest;
    use std::sync::Arc;

    fn empty_page() -> FeedPage {
        Paginator::new(10)
            .expect("page size")
            .window(PageNumber::FIRST, 0)
            .into_page(Vec::new())
    }

    #[rstest]
    #[case(None, 1)]
    #[case(Some("3"), 3)]
    #[case(Some("zero"), 1)]
    #[case(Some("-2"), 1)]
    fn page_query_falls_back_to_the_first_page(#[case] raw: Option<&str>, #[case] expected: u32) {
        let query = PageQuery {
            page: raw.map(str::to_owned),
        };
        assert_eq!(query.number().get(), expected);
    }

    #[actix_web::test]
    async fn index_pages_are_rendered_once_per_ttl() {
        let backend = MemoryBackend::new();
        let mut feeds = MockFeedQuery::new();
        feeds
            .expect_global_feed()
            .times(1)
            .returning(|_| Ok(empty_page()));
        let mut state = backend.state.clone();
        state.feeds = Arc::new(feeds);
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(index),
        )
        .await;

        for _ in 0..2 {
            let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/").to_request()).await;
            assert_eq!(res.status(), StatusCode::OK);
            assert_eq!(
                res.headers()
                    .get(header::CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok()),
                Some("application/json")
            );
        }
    }

    #[actix_web::test]
    async fn anonymous_following_feed_redirects_to_login() {
        let backend = MemoryBackend::new();
        let app = actix_test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data(web::Data::new(backend.state.clone()))
                .service(following_feed),
        )
        .await;
        let res =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/follow/").to_request()).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some("/auth/login/?next=/follow/")
        );
    }

    #[rstest]
    #[case("/group/nope/")]
    #[case("/profile/nobody/")]
    #[case("/posts/41/")]
    #[case("/posts/0/")]
    #[actix_web::test]
    async fn unknown_resources_are_not_found(#[case] uri: &str) {
        let backend = MemoryBackend::new();
        let app = actix_test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data(web::Data::new(backend.state.clone()))
                .service(group_feed)
                .service(profile)
                .service(post_detail),
        )
        .await;
        let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], "not_found");
    }
}
