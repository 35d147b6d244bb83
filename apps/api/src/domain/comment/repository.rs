use super::{
    errors::DomainError,
    rows::{CommentListRow, PostCommentRow},
};
use async_trait::async_trait;

/// Durable storage for accepted comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Stores one accepted comment and returns the row as persisted.
    async fn insert_comment(&self, row: PostCommentRow) -> Result<PostCommentRow, DomainError>;

    /// Comments for a listing, newest first. Unknown listings yield an empty list.
    async fn comments_for_listing(
        &self,
        listing_id: &str,
    ) -> Result<Vec<CommentListRow>, DomainError>;

    async fn ping(&self) -> Result<(), DomainError>;
}
