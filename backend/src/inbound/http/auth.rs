//! Session login and logout.
//!
//! ```text
//! GET  /auth/login/?next=/create/
//! POST /auth/login/   username=leo&password=...&next=/create/
//! POST /auth/logout/
//! ```
//!
//! Only existing accounts can log in; account management lives elsewhere.

use actix_web::http::header;
use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, LoginCredentials, LoginValidationError};

use super::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;

/// Optional return path supplied on the query string.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(default)]
pub struct NextQuery {
    /// Path to continue to after logging in.
    pub next: Option<String>,
}

/// Login form body.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    /// Overrides the query string `next` when present.
    pub next: Option<String>,
}

/// Context for rendering the login page.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPage {
    /// Where a successful login will redirect.
    pub next: String,
    /// Whether the session already belongs to a user.
    pub authenticated: bool,
}

/// Accept only same-site absolute paths as redirect targets.
fn safe_next(candidate: Option<&str>) -> String {
    match candidate {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_owned()
        }
        _ => "/".to_owned(),
    }
}

fn map_login_validation_error(err: &LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyUsername => "username",
        LoginValidationError::EmptyPassword => "password",
    };
    Error::invalid_request(err.to_string())
        .with_details(json!({ "fields": { field: ["this field is required"] } }))
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.to_owned()))
        .finish()
}

/// Login page context.
#[utoipa::path(
    get,
    path = "/auth/login/",
    params(NextQuery),
    responses((status = 200, description = "Login page context", body = LoginPage)),
    tags = ["auth"],
    operation_id = "loginPage"
)]
#[get("/auth/login/")]
pub async fn login_page(
    session: SessionContext,
    query: web::Query<NextQuery>,
) -> ApiResult<web::Json<LoginPage>> {
    Ok(web::Json(LoginPage {
        next: safe_next(query.next.as_deref()),
        authenticated: session.user_id()?.is_some(),
    }))
}

/// Verify credentials and store the user in the session.
#[utoipa::path(
    post,
    path = "/auth/login/",
    params(NextQuery),
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Logged in; redirect to `next`"),
        (status = 400, description = "Missing username or password", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/auth/login/")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<NextQuery>,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    let credentials = LoginCredentials::try_from_parts(&form.username, &form.password)
        .map_err(|err| map_login_validation_error(&err))?;
    let user = state.login.authenticate(&credentials).await?;
    session.persist_user(user.id())?;
    info!(user = %user.username(), "session established");
    let next = safe_next(form.next.as_deref().or(query.next.as_deref()));
    Ok(redirect(&next))
}

/// End the session.
#[utoipa::path(
    post,
    path = "/auth/logout/",
    responses((status = 302, description = "Logged out; redirect to the index")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout/")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    redirect("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::test_session_middleware;
    use crate::test_support::MemoryBackend;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;

    #[rstest]
    #[case(None, "/")]
    #[case(Some("/create/"), "/create/")]
    #[case(Some("//evil.example/"), "/")]
    #[case(Some("https://evil.example/"), "/")]
    #[case(Some("/\\evil"), "/")]
    fn only_local_paths_are_followed(#[case] candidate: Option<&str>, #[case] expected: &str) {
        assert_eq!(safe_next(candidate), expected);
    }

    async fn post_login(body: &str, uri: &str) -> actix_web::dev::ServiceResponse {
        let backend = MemoryBackend::new();
        backend
            .store
            .register_user("leo", "war and peace")
            .expect("registered");
        let app = actix_test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data(web::Data::new(backend.state.clone()))
                .service(login),
        )
        .await;
        actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(uri)
                .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
                .set_payload(body.to_owned())
                .to_request(),
        )
        .await
    }

    #[actix_web::test]
    async fn valid_credentials_redirect_to_next() {
        let res = post_login(
            "username=leo&password=war+and+peace",
            "/auth/login/?next=%2Fcreate%2F",
        )
        .await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some("/create/")
        );
        assert!(res.response().cookies().any(|cookie| cookie.name() == "session"));
    }

    #[actix_web::test]
    async fn wrong_passwords_are_unauthorised() {
        let res = post_login("username=leo&password=nope", "/auth/login/").await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn blank_usernames_are_invalid() {
        let res = post_login("username=&password=nope", "/auth/login/").await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["fields"]["username"][0], "this field is required");
    }

    #[actix_web::test]
    async fn logout_redirects_home() {
        let app = actix_test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .service(logout),
        )
        .await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post().uri("/auth/logout/").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some("/")
        );
    }
}
