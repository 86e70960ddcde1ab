//! Follow edges between readers and authors.

use serde::Serialize;
use utoipa::ToSchema;

/// Result of a follow request. Every variant is a success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FollowOutcome {
    /// A new edge was stored.
    Created,
    /// The edge already existed; nothing changed.
    AlreadyFollowing,
    /// The reader asked to follow themself; nothing changed.
    SelfFollowIgnored,
}

/// Result of an unfollow request. Every variant is a success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UnfollowOutcome {
    /// The edge was deleted.
    Removed,
    /// There was no edge to delete.
    NotFollowing,
}
