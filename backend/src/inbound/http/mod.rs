//! HTTP inbound adapter.
//!
//! Page routes keep the blog's trailing-slash paths and answer with JSON
//! page contexts or redirects. Routes that need a logged-in user send
//! anonymous visitors to the login page.

pub mod auth;
pub mod error;
pub mod feeds;
pub mod follows;
pub mod health;
pub mod links;
pub mod posts;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

use actix_web::{HttpRequest, HttpResponse, ResponseError, web};

use crate::domain::Error;

pub use error::ApiResult;

/// Register every page route on `cfg`.
///
/// The caller supplies the [`state::HttpState`] as app data and wraps the
/// routes in the session middleware. Malformed path segments render as
/// not-found errors and malformed forms as invalid requests.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| Error::not_found(err.to_string()).into()),
    )
    .app_data(
        web::FormConfig::default()
            .error_handler(|err, _req| Error::invalid_request(err.to_string()).into()),
    )
    .service(feeds::index)
    .service(feeds::group_feed)
    .service(follows::follow)
    .service(follows::unfollow)
    .service(feeds::profile)
    .service(feeds::following_feed)
    .service(posts::create_form)
    .service(posts::create_post)
    .service(posts::edit_form)
    .service(posts::edit_post)
    .service(posts::add_comment)
    .service(feeds::post_detail)
    .service(auth::login_page)
    .service(auth::login)
    .service(auth::logout);
}

/// Fallback for unmatched paths: the JSON not-found error.
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    Error::not_found(format!("no page at {}", req.path())).error_response()
}
