//! Paths of page routes and pagination links.

use actix_web::HttpRequest;
use pagination::Page;
use serde::Serialize;
use url::{Position, Url};
use url::form_urlencoded::byte_serialize;

use crate::domain::{PostId, Username};

/// Following feed path; follow and unfollow land here.
pub const FOLLOW_INDEX_PATH: &str = "/follow/";

/// Percent-encode one path segment.
fn segment(raw: &str) -> String {
    // Literal plus signs are already %2B, so any remaining '+' was a space.
    byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Profile page of `username`.
///
/// # Examples
/// ```
/// use blog_backend::domain::Username;
/// use blog_backend::inbound::http::links::profile_path;
///
/// let name = Username::new("anna maria").expect("valid username");
/// assert_eq!(profile_path(&name), "/profile/anna%20maria/");
/// ```
#[must_use]
pub fn profile_path(username: &Username) -> String {
    format!("/profile/{}/", segment(username.as_str()))
}

/// Detail page of the post `id`.
#[must_use]
pub fn post_path(id: PostId) -> String {
    format!("/posts/{}/", id.get())
}

/// Relative links to the neighbouring pages of a feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl PageLinks {
    /// Links for `page` as served at the request URL.
    pub fn for_request<T>(req: &HttpRequest, page: &Page<T>) -> Self {
        Self::from_base(&req.full_url(), page)
    }

    /// Links for `page` carrying only the `page` parameter.
    ///
    /// Used for responses shared between readers, which must not echo one
    /// reader's query string to another.
    pub fn canonical<T>(req: &HttpRequest, page: &Page<T>) -> Self {
        let mut base = req.full_url();
        base.set_query(None);
        Self::from_base(&base, page)
    }

    fn from_base<T>(base: &Url, page: &Page<T>) -> Self {
        let relative = |url: Url| url[Position::BeforePath..].to_owned();
        Self {
            next: page.next_link(base).map(relative),
            previous: page.previous_link(base).map(relative),
        }
    }
}
