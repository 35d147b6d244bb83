use crate::domain::comment::{
    errors::DomainError,
    repository::CommentRepository,
    rows::{CommentListRow, PostCommentRow},
};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Comment store kept in process memory, keyed by listing reference.
///
/// Owned by whoever constructs it and injected like any other repository.
/// Used by the integration tests and for running the API without Postgres.
#[derive(Default)]
pub struct InMemoryCommentRepository {
    listings: RwLock<HashMap<String, Vec<CommentListRow>>>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn insert_comment(&self, row: PostCommentRow) -> Result<PostCommentRow, DomainError> {
        let comment_id = row
            .comment_id
            .get()
            .ok_or_else(|| DomainError::ValidationError("comment_id is null".to_string()))?;
        if !row.extract.valid {
            return Err(DomainError::ValidationError("timestamp is null".to_string()));
        }

        let mut listings = self.listings.write().await;
        let duplicate = listings
            .values()
            .flatten()
            .any(|stored| stored.comment_id == comment_id.into_bytes());
        if duplicate {
            return Err(DomainError::InfrastructureError(format!(
                "comment {comment_id} already exists"
            )));
        }

        listings
            .entry(row.listing_id.clone())
            .or_default()
            .push(CommentListRow {
                comment_id: comment_id.into_bytes(),
                listing_id: row.listing_id.clone(),
                user_ip: row.user_ip.clone(),
                user_id: row.user_id.clone(),
                username: row.username.clone(),
                comment_text: row.comment_text.clone(),
                extract: row.extract,
            });
        Ok(row)
    }

    async fn comments_for_listing(
        &self,
        listing_id: &str,
    ) -> Result<Vec<CommentListRow>, DomainError> {
        let listings = self.listings.read().await;
        let mut rows: Vec<CommentListRow> = listings
            .get(listing_id)
            .map(|rows| rows.iter().rev().cloned().collect())
            .unwrap_or_default();
        // Stable sort: equal timestamps stay latest-inserted first.
        rows.sort_by(|a, b| b.extract.value.cmp(&a.extract.value));
        Ok(rows)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
