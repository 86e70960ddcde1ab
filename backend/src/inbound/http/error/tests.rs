//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn internal_error() -> Error {
    Error::internal("database password is hunter2")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "secret": "x" }))
}

async fn body_json(response: HttpResponse) -> Value {
    let bytes = to_bytes(response.into_body()).await.expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(internal_error: Error) {
    let response = ResponseError::error_response(&internal_error);
    assert_eq!(
        response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some(TRACE_ID)
    );
    let body = body_json(response).await;
    assert_eq!(body["message"], "Internal server error");
    assert_eq!(body["traceId"], TRACE_ID);
    assert!(body.get("details").is_none());
}

#[rstest]
#[actix_web::test]
async fn validation_details_are_kept() {
    let error = Error::invalid_request("submitted form is invalid")
        .with_details(json!({ "fields": { "text": ["this field is required"] } }));
    let body = body_json(ResponseError::error_response(&error)).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["fields"]["text"][0], "this field is required");
}

#[rstest]
#[case("/create/", "/auth/login/?next=/create/")]
#[case("/posts/7/comment/", "/auth/login/?next=/posts/7/comment/")]
#[case("/profile/anna maria/follow/", "/auth/login/?next=/profile/anna+maria/follow/")]
#[case("/follow/?page=2", "/auth/login/?next=/follow/%3Fpage%3D2")]
fn login_redirect_keeps_slashes_literal(#[case] next: &str, #[case] expected: &str) {
    assert_eq!(login_redirect(next), expected);
}

#[given("an anonymous visitor on a protected page")]
fn an_anonymous_visitor_on_a_protected_page() -> PageError {
    PageError::new(Error::unauthorized("login required"), "/create/")
}

#[when("the page error is rendered")]
fn the_page_error_is_rendered(error: &PageError) -> HttpResponse {
    ResponseError::error_response(error)
}

#[then("the visitor is sent to the login page")]
fn the_visitor_is_sent_to_the_login_page(response: &HttpResponse) {
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some("/auth/login/?next=/create/")
    );
}

#[rstest]
fn missing_login_redirects() {
    let error = an_anonymous_visitor_on_a_protected_page();
    let response = the_page_error_is_rendered(&error);
    the_visitor_is_sent_to_the_login_page(&response);
}

#[rstest]
#[case(Error::forbidden("not your post"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("no such post"), StatusCode::NOT_FOUND)]
fn other_page_errors_render_as_json(#[case] error: Error, #[case] status: StatusCode) {
    let page_error = PageError::new(error, "/posts/1/edit/");
    assert_eq!(ResponseError::status_code(&page_error), status);
    let response = ResponseError::error_response(&page_error);
    assert_eq!(response.status(), status);
    assert!(response.headers().get(header::LOCATION).is_none());
}
