//! Post and comment write routes. All require a logged-in user.
//!
//! ```text
//! GET  /create/               empty form context
//! POST /create/               publish, then go to the author's profile
//! GET  /posts/{id}/edit/      form context with current values (author only)
//! POST /posts/{id}/edit/      save, then go to the post
//! POST /posts/{id}/comment/   comment, then go to the post
//! ```
//!
//! Forms are `application/x-www-form-urlencoded` with fields `text`, `group`
//! and `image`.

use actix_web::http::header;
use actix_web::{HttpResponse, get, post, web};
use tracing::info;

use crate::domain::ports::PostForm;
use crate::domain::{CommentSubmission, Error, PostSubmission};

use super::error::PageResult;
use super::feeds::post_id;
use super::links::{post_path, profile_path};
use super::session::Viewer;
use super::state::HttpState;

fn redirect_to(location: String) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Unwrap a submitted form once the viewer is known to be logged in.
///
/// Anonymous visitors are refused before the body is looked at, so a missing
/// or malformed form still sends them to the login page.
fn submitted<T>(
    viewer: &Viewer,
    form: Result<web::Form<T>, actix_web::Error>,
) -> Result<T, Error> {
    if viewer.user_id().is_none() {
        return Err(Error::unauthorized("login required"));
    }
    form.map(web::Form::into_inner).map_err(|err| {
        err.as_error::<Error>()
            .cloned()
            .unwrap_or_else(|| Error::invalid_request(err.to_string()))
    })
}

/// Form context for a new post.
#[utoipa::path(
    get,
    path = "/create/",
    responses(
        (status = 200, description = "Groups available for the new post"),
        (status = 302, description = "Login required; redirect to the login page")
    ),
    tags = ["posts"],
    operation_id = "createForm"
)]
#[get("/create/")]
pub async fn create_form(
    state: web::Data<HttpState>,
    viewer: Viewer,
) -> PageResult<web::Json<PostForm>> {
    let form = state
        .posts
        .create_form(viewer.user_id())
        .await
        .map_err(|err| viewer.reject(err))?;
    Ok(web::Json(form))
}

/// Publish a post as the logged-in user.
#[utoipa::path(
    post,
    path = "/create/",
    request_body(content_type = "application/x-www-form-urlencoded", description = "Fields `text`, `group`, `image`"),
    responses(
        (status = 302, description = "Created; redirect to the author's profile, or to the login page"),
        (status = 400, description = "Invalid form", body = Error)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/create/")]
pub async fn create_post(
    state: web::Data<HttpState>,
    viewer: Viewer,
    form: Result<web::Form<PostSubmission>, actix_web::Error>,
) -> PageResult<HttpResponse> {
    let post = async {
        let submission = submitted(&viewer, form)?;
        state.posts.create_post(viewer.user_id(), submission).await
    }
    .await
    .map_err(|err| viewer.reject(err))?;
    info!(post = post.id().get(), author = %post.author().username(), "post created");
    Ok(redirect_to(profile_path(post.author().username())))
}

/// Form context for editing a post.
#[utoipa::path(
    get,
    path = "/posts/{id}/edit/",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 200, description = "Groups and the post's current values"),
        (status = 302, description = "Login required; redirect to the login page"),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "Unknown post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "editForm"
)]
#[get("/posts/{id}/edit/")]
pub async fn edit_form(
    state: web::Data<HttpState>,
    viewer: Viewer,
    id: web::Path<i64>,
) -> PageResult<web::Json<PostForm>> {
    let form = async {
        let id = post_id(id.into_inner())?;
        state.posts.edit_form(viewer.user_id(), id).await
    }
    .await
    .map_err(|err| viewer.reject(err))?;
    Ok(web::Json(form))
}

/// Save changes to a post. Only its author may do this.
#[utoipa::path(
    post,
    path = "/posts/{id}/edit/",
    params(("id" = i64, Path, description = "Post id")),
    request_body(content_type = "application/x-www-form-urlencoded", description = "Fields `text`, `group`, `image`"),
    responses(
        (status = 302, description = "Saved; redirect to the post, or to the login page"),
        (status = 400, description = "Invalid form", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "Unknown post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "editPost"
)]
#[post("/posts/{id}/edit/")]
pub async fn edit_post(
    state: web::Data<HttpState>,
    viewer: Viewer,
    id: web::Path<i64>,
    form: Result<web::Form<PostSubmission>, actix_web::Error>,
) -> PageResult<HttpResponse> {
    let post = async {
        let submission = submitted(&viewer, form)?;
        let id = post_id(id.into_inner())?;
        state
            .posts
            .edit_post(viewer.user_id(), id, submission)
            .await
    }
    .await
    .map_err(|err| viewer.reject(err))?;
    info!(post = post.id().get(), "post edited");
    Ok(redirect_to(post_path(post.id())))
}

/// Comment on a post.
#[utoipa::path(
    post,
    path = "/posts/{id}/comment/",
    params(("id" = i64, Path, description = "Post id")),
    request_body(content_type = "application/x-www-form-urlencoded", description = "Field `text`"),
    responses(
        (status = 302, description = "Commented; redirect to the post, or to the login page"),
        (status = 400, description = "Blank comment", body = Error),
        (status = 404, description = "Unknown post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "addComment"
)]
#[post("/posts/{id}/comment/")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    viewer: Viewer,
    id: web::Path<i64>,
    form: Result<web::Form<CommentSubmission>, actix_web::Error>,
) -> PageResult<HttpResponse> {
    let comment = async {
        let submission = submitted(&viewer, form)?;
        let id = post_id(id.into_inner())?;
        state
            .posts
            .add_comment(viewer.user_id(), id, submission)
            .await
    }
    .await
    .map_err(|err| viewer.reject(err))?;
    Ok(redirect_to(post_path(comment.post_id())))
}
