//! Follow and unfollow routes.
//!
//! Both are plain links on the profile page, so they are `GET` requests that
//! redirect to the following feed whatever the outcome.

use actix_web::http::header;
use actix_web::{HttpResponse, get, web};
use tracing::debug;

use super::error::PageResult;
use super::links::FOLLOW_INDEX_PATH;
use super::session::Viewer;
use super::state::HttpState;

fn to_follow_index() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, FOLLOW_INDEX_PATH))
        .finish()
}

/// Follow an author.
#[utoipa::path(
    get,
    path = "/profile/{username}/follow/",
    params(("username" = String, Path, description = "Author to follow")),
    responses(
        (status = 302, description = "Redirect to the following feed, or to the login page"),
        (status = 404, description = "Unknown author", body = crate::domain::Error)
    ),
    tags = ["follows"],
    operation_id = "followAuthor"
)]
#[get("/profile/{username}/follow/")]
pub async fn follow(
    state: web::Data<HttpState>,
    viewer: Viewer,
    username: web::Path<String>,
) -> PageResult<HttpResponse> {
    let outcome = state
        .follows
        .follow(viewer.user_id(), &username)
        .await
        .map_err(|err| viewer.reject(err))?;
    debug!(author = %username, ?outcome, "follow");
    Ok(to_follow_index())
}

/// Stop following an author.
#[utoipa::path(
    get,
    path = "/profile/{username}/unfollow/",
    params(("username" = String, Path, description = "Author to unfollow")),
    responses(
        (status = 302, description = "Redirect to the following feed, or to the login page"),
        (status = 404, description = "Unknown author", body = crate::domain::Error)
    ),
    tags = ["follows"],
    operation_id = "unfollowAuthor"
)]
#[get("/profile/{username}/unfollow/")]
pub async fn unfollow(
    state: web::Data<HttpState>,
    viewer: Viewer,
    username: web::Path<String>,
) -> PageResult<HttpResponse> {
    let outcome = state
        .follows
        .unfollow(viewer.user_id(), &username)
        .await
        .map_err(|err| viewer.reject(err))?;
    debug!(author = %username, ?outcome, "unfollow");
    Ok(to_follow_index())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockFollowCommand;
    use crate::domain::{Error, FollowOutcome, UnfollowOutcome};
    use crate::inbound::http::test_utils::test_session_middleware;
    use crate::test_support::MemoryBackend;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use std::sync::Arc;

    fn location(res: &actix_web::dev::ServiceResponse) -> Option<String> {
        res.headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    }

    #[rstest]
    #[case("/profile/leo/follow/")]
    #[case("/profile/leo/unfollow/")]
    #[actix_web::test]
    async fn anonymous_viewers_are_sent_to_login(#[case] uri: &str) {
        let backend = MemoryBackend::new();
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data(web::Data::new(backend.state.clone()))
                .service(follow)
                .service(unfollow),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(location(&res), Some(format!("/auth/login/?next={uri}")));
    }

    #[actix_web::test]
    async fn every_outcome_lands_on_the_following_feed() {
        let backend = MemoryBackend::new();
        let mut follows = MockFollowCommand::new();
        follows
            .expect_follow()
            .returning(|_, _| Ok(FollowOutcome::SelfFollowIgnored));
        follows
            .expect_unfollow()
            .returning(|_, _| Ok(UnfollowOutcome::NotFollowing));
        let mut state = backend.state.clone();
        state.follows = Arc::new(follows);
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data(web::Data::new(state))
                .service(follow)
                .service(unfollow),
        )
        .await;

        for uri in ["/profile/leo/follow/", "/profile/leo/unfollow/"] {
            let res =
                test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(res.status(), StatusCode::FOUND);
            assert_eq!(location(&res).as_deref(), Some(FOLLOW_INDEX_PATH));
        }
    }

    #[actix_web::test]
    async fn unknown_authors_are_not_found() {
        let backend = MemoryBackend::new();
        let mut follows = MockFollowCommand::new();
        follows
            .expect_follow()
            .returning(|_, name| Err(Error::not_found(format!("user {name} not found"))));
        let mut state = backend.state.clone();
        state.follows = Arc::new(follows);
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data(web::Data::new(state))
                .service(follow),
        )
        .await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/profile/ghost/follow/")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
