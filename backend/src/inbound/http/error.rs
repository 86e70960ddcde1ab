//! HTTP mapping for domain errors.
//!
//! API-style failures render as the JSON error payload. Page routes wrap
//! failures in [`PageError`] so a missing login becomes a redirect to the
//! login page that remembers where the visitor was going.

use std::fmt;

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError};
use tracing::error;
use url::form_urlencoded::byte_serialize;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

pub use crate::domain::ApiResult;

/// Path of the session login page.
pub const LOGIN_PATH: &str = "/auth/login/";

/// Query parameter naming the page to return to after login.
pub const NEXT_QUERY_PARAM: &str = "next";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    let redacted = Error::internal("Internal server error");
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id),
        None => redacted,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if self.code() == ErrorCode::InternalError {
            error!(message = %self.message(), trace_id = ?self.trace_id(), "request failed");
        }
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Self::internal("Internal server error")
    }
}

/// Build the login page location for a visitor heading to `next`.
///
/// Path separators stay literal; every other reserved byte is
/// percent-encoded.
///
/// # Examples
/// ```
/// use blog_backend::inbound::http::error::login_redirect;
///
/// assert_eq!(login_redirect("/create/"), "/auth/login/?next=/create/");
/// assert_eq!(
///     login_redirect("/follow/?page=2"),
///     "/auth/login/?next=/follow/%3Fpage%3D2",
/// );
/// ```
#[must_use]
pub fn login_redirect(next: &str) -> String {
    let encoded: Vec<String> = next
        .split('/')
        .map(|segment| byte_serialize(segment.as_bytes()).collect())
        .collect();
    format!("{LOGIN_PATH}?{NEXT_QUERY_PARAM}={}", encoded.join("/"))
}

/// Failure of a page route.
///
/// Missing authentication redirects to the login page with `next` set to the
/// requested path; every other error renders like [`Error`].
#[derive(Debug)]
pub struct PageError {
    error: Error,
    next: String,
}

impl PageError {
    /// Wrap `error` raised while serving the page at `next`.
    pub fn new(error: Error, next: impl Into<String>) -> Self {
        Self {
            error,
            next: next.into(),
        }
    }

    /// Underlying domain error.
    pub fn error(&self) -> &Error {
        &self.error
    }

    fn is_login_redirect(&self) -> bool {
        self.error.code() == ErrorCode::Unauthorized
    }
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl ResponseError for PageError {
    fn status_code(&self) -> StatusCode {
        if self.is_login_redirect() {
            StatusCode::FOUND
        } else {
            self.error.status_code()
        }
    }

    fn error_response(&self) -> HttpResponse {
        if !self.is_login_redirect() {
            return self.error.error_response();
        }
        let mut builder = HttpResponse::Found();
        builder.insert_header((header::LOCATION, login_redirect(&self.next)));
        if let Some(id) = self.error.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.finish()
    }
}

/// Result alias for page handlers.
pub type PageResult<T> = Result<T, PageError>;

#[cfg(test)]
mod tests;
