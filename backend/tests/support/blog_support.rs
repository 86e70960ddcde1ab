//! Full-application harness over the in-memory backend.

use actix_http::Request;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::test;
use serde_json::Value;

/// Build the page routes exactly as the server mounts them, over `$state`.
macro_rules! blog_app {
    ($state:expr) => {{
        use actix_session::{SessionMiddleware, storage::CookieSessionStore};
        use actix_web::cookie::Key;
        use actix_web::{App, web};
        use blog_backend::Trace;
        use blog_backend::inbound::http::{configure_routes, not_found};

        let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
            .cookie_name("session".to_owned())
            .cookie_secure(false)
            .build();
        actix_web::test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .wrap(session)
                .wrap(Trace)
                .configure(configure_routes)
                .default_service(web::to(not_found)),
        )
        .await
    }};
}

/// Log in through the form and return the session cookie.
pub async fn login<S>(app: &S, username: &str, password: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/auth/login/")
            .set_form([("username", username), ("password", password)])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND, "login should redirect");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("login should set the session cookie")
}

/// Submit a urlencoded form, optionally as a logged-in user.
pub async fn post_form<S>(
    app: &S,
    uri: &str,
    form: &[(&str, &str)],
    cookie: Option<&Cookie<'static>>,
) -> ServiceResponse
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let mut req = test::TestRequest::post().uri(uri).set_form(form);
    if let Some(cookie) = cookie {
        req = req.cookie(cookie.clone());
    }
    test::call_service(app, req.to_request()).await
}

/// Issue a `GET`, optionally as a logged-in user.
pub async fn get<S>(app: &S, uri: &str, cookie: Option<&Cookie<'static>>) -> ServiceResponse
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let mut req = test::TestRequest::get().uri(uri);
    if let Some(cookie) = cookie {
        req = req.cookie(cookie.clone());
    }
    test::call_service(app, req.to_request()).await
}

/// `GET` a page that must succeed and decode its JSON body.
pub async fn get_json<S>(app: &S, uri: &str, cookie: Option<&Cookie<'static>>) -> Value
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = get(app, uri, cookie).await;
    assert_eq!(res.status(), StatusCode::OK, "GET {uri}");
    test::read_body_json(res).await
}

/// `Location` header of a redirect.
pub fn location(res: &ServiceResponse) -> Option<String> {
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Texts of the posts on a feed page body.
pub fn post_texts(feed: &Value) -> Vec<String> {
    feed["posts"]["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|post| post["text"].as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}
