//! OpenAPI document for the blog's HTTP surface.
//!
//! Registers every page route, the health probes, and the domain types that
//! appear in responses. Swagger UI serves it in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Comment, Error, ErrorCode, FollowOutcome, Group, Post, UnfollowOutcome, User,
};
use crate::inbound::http::auth::{LoginForm, LoginPage};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /auth/login/.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Blog backend",
        description = "Posts, groups, comments and author follows behind session login."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    paths(
        crate::inbound::http::feeds::index,
        crate::inbound::http::feeds::group_feed,
        crate::inbound::http::feeds::profile,
        crate::inbound::http::feeds::following_feed,
        crate::inbound::http::feeds::post_detail,
        crate::inbound::http::posts::create_form,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::edit_form,
        crate::inbound::http::posts::edit_post,
        crate::inbound::http::posts::add_comment,
        crate::inbound::http::follows::follow,
        crate::inbound::http::follows::unfollow,
        crate::inbound::http::auth::login_page,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        Group,
        Post,
        Comment,
        FollowOutcome,
        UnfollowOutcome,
        LoginForm,
        LoginPage,
    )),
    tags(
        (name = "feeds", description = "Paginated post listings and post detail"),
        (name = "posts", description = "Writing posts and comments"),
        (name = "follows", description = "Following authors"),
        (name = "auth", description = "Session login"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;
