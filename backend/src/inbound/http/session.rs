//! Session helpers keeping handlers free of framework-specific logic.
//!
//! [`SessionContext`] wraps the Actix cookie session. [`Viewer`] is the
//! extractor page handlers use: it resolves the logged-in user, if any, and
//! remembers the requested path so authentication failures can redirect to
//! the login page and back.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, UserId};

use super::error::PageError;

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id in the session cookie.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current user id from the session, if present.
    ///
    /// A malformed value is treated as an anonymous session.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let raw = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|raw| match UserId::new(&raw) {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(%error, "invalid user id in session cookie");
                None
            }
        }))
    }

    /// Drop every value in the session and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(Self::new) })
    }
}

/// The caller of a page route.
#[derive(Debug, Clone)]
pub struct Viewer {
    user_id: Option<UserId>,
    path: String,
}

impl Viewer {
    /// Build a viewer directly; handlers normally extract one.
    pub fn new(user_id: Option<UserId>, path: impl Into<String>) -> Self {
        Self {
            user_id,
            path: path.into(),
        }
    }

    /// Logged-in user, if any.
    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    /// Requested path including its query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Attach the requested path to `error` for rendering.
    pub fn reject(&self, error: Error) -> PageError {
        PageError::new(error, self.path.as_str())
    }
}

impl FromRequest for Viewer {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let path = req
            .uri()
            .path_and_query()
            .map_or_else(|| req.path().to_owned(), |pq| pq.as_str().to_owned());
        let fut = SessionContext::from_request(req, payload);
        Box::pin(async move {
            let session = fut.await?;
            let user_id = session.user_id()?;
            Ok(Self::new(user_id, path))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::test_session_middleware;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    const USER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    async fn login(session: SessionContext) -> Result<HttpResponse, Error> {
        let id = UserId::new(USER).map_err(|err| Error::internal(err.to_string()))?;
        session.persist_user(&id)?;
        Ok(HttpResponse::Ok().finish())
    }

    async fn whoami(viewer: Viewer) -> HttpResponse {
        let user = viewer
            .user_id()
            .map_or_else(|| "anonymous".to_owned(), |id| id.to_string());
        HttpResponse::Ok().body(format!("{user} at {}", viewer.path()))
    }

    async fn logout(session: SessionContext) -> HttpResponse {
        session.purge();
        HttpResponse::Ok().finish()
    }

    fn app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(test_session_middleware())
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/whoami", web::get().to(whoami))
            .route(
                "/tamper",
                web::post().to(|session: Session| async move {
                    session
                        .insert(USER_ID_KEY, "not-a-uuid")
                        .expect("insert raw value");
                    HttpResponse::Ok().finish()
                }),
            )
    }

    async fn body_of(res: actix_web::dev::ServiceResponse) -> String {
        String::from_utf8(test::read_body(res).await.to_vec()).expect("utf8 body")
    }

    #[actix_web::test]
    async fn viewers_are_anonymous_without_a_session() {
        let app = test::init_service(app()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/whoami?page=2").to_request(),
        )
        .await;
        assert_eq!(body_of(res).await, "anonymous at /whoami?page=2");
    }

    #[actix_web::test]
    async fn persisted_users_are_seen_by_viewers() {
        let app = test::init_service(app()).await;
        let res = test::call_service(&app, test::TestRequest::post().uri("/login").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let cookie = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(body_of(res).await, format!("{USER} at /whoami"));
    }

    #[actix_web::test]
    async fn tampered_ids_read_as_anonymous() {
        let app = test::init_service(app()).await;
        let res = test::call_service(&app, test::TestRequest::post().uri("/tamper").to_request()).await;
        let cookie = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(body_of(res).await, "anonymous at /whoami");
    }

    #[actix_web::test]
    async fn purge_expires_the_cookie() {
        let app = test::init_service(app()).await;
        let res = test::call_service(&app, test::TestRequest::post().uri("/login").to_request()).await;
        let cookie = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let removal = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("removal cookie");
        assert_eq!(removal.value(), "");
    }
}
