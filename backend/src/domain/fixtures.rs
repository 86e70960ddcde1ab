//! Builders for domain values shared by service tests.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::domain::{
    Comment, CommentId, CommentText, Group, GroupId, GroupSlug, Post, PostId, PostText, User,
    UserId, Username,
};

pub(crate) fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(crate) fn user(name: &str) -> User {
    User::new(UserId::random(), Username::new(name).expect("valid username"))
}

pub(crate) fn group(id: i64, slug: &str) -> Group {
    Group::from_parts(
        GroupId::new(id).expect("valid group id"),
        format!("Group {slug}"),
        GroupSlug::new(slug).expect("valid slug"),
        String::new(),
    )
}

pub(crate) fn post(id: i64, author: &User, group: Option<&Group>) -> Post {
    Post::from_parts(
        PostId::new(id).expect("valid post id"),
        PostText::new(format!("post number {id}")).expect("valid text"),
        epoch() + Duration::minutes(id),
        author.clone(),
        group.cloned(),
        None,
    )
}

pub(crate) fn posts(range: std::ops::RangeInclusive<i64>, author: &User) -> Vec<Post> {
    range.rev().map(|id| post(id, author, None)).collect()
}

pub(crate) fn comment(id: i64, post_id: PostId, author: &User) -> Comment {
    Comment::from_parts(
        CommentId::new(id).expect("valid comment id"),
        post_id,
        author.clone(),
        CommentText::new(format!("comment {id}")).expect("valid text"),
        epoch() + Duration::hours(id),
    )
}
