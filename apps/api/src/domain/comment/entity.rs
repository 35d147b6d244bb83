use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// No legitimate identifier or comment predates this instant
/// (2025-05-27 23:53:20 UTC), in seconds since the Unix epoch.
pub const REFERENCE_UNIX_SECONDS: i64 = 1_748_390_000;

/// A comment accepted for a listing.
///
/// Built once per accepted submission (by the validation pipeline) or per
/// storage row (by the row converter) and never mutated afterwards.
/// `comment_id` and `user_id` are time-ordered identifiers whose embedded time
/// is not older than [`REFERENCE_UNIX_SECONDS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub listing_id: String,
    pub comment_id: Uuid,
    pub user_ip: String,
    pub user_id: String,
    pub username: String,
    pub comment_text: String,
    /// Whole seconds since the Unix epoch.
    pub timestamp: i64,
}

/// The only view of a comment ever returned to a client: no network address,
/// no submitter identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PublicComment {
    pub listing_id: String,
    pub comment_id: Uuid,
    pub username: String,
    pub comment_text: String,
    pub timestamp: i64,
}

impl Comment {
    pub fn to_public(&self) -> PublicComment {
        PublicComment {
            listing_id: self.listing_id.clone(),
            comment_id: self.comment_id,
            username: self.username.clone(),
            comment_text: self.comment_text.clone(),
            timestamp: self.timestamp,
        }
    }
}

impl From<Comment> for PublicComment {
    fn from(comment: Comment) -> Self {
        Self {
            listing_id: comment.listing_id,
            comment_id: comment.comment_id,
            username: comment.username,
            comment_text: comment.comment_text,
            timestamp: comment.timestamp,
        }
    }
}

impl PublicComment {
    pub fn from_comments(comments: Vec<Comment>) -> Vec<Self> {
        comments.into_iter().map(Self::from).collect()
    }
}

/// Raw field set of a submission before any validation.
///
/// `comment_id` is minted server-side and `user_ip` is derived from the
/// connection; every other field is client-supplied and untrusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentSubmission {
    pub comment_id: Uuid,
    pub listing_id: String,
    pub user_ip: String,
    pub user_id: String,
    pub username: String,
    pub comment_text: String,
}
