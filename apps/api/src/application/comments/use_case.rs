use super::dto::PostCommentRequest;
use crate::domain::comment::{
    convert::RowConverter,
    entity::{CommentSubmission, PublicComment},
    errors::DomainError,
    repository::CommentRepository,
    rows::PostCommentRow,
};
use crate::infrastructure::security::{
    PipelineRejection, ValidationConfig, ValidationPipeline,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CommentsError {
    #[error(transparent)]
    Rejected(#[from] PipelineRejection),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub struct CommentsUseCase {
    repository: Arc<dyn CommentRepository>,
    pipeline: ValidationPipeline,
    converter: RowConverter,
}

impl CommentsUseCase {
    pub fn new(repository: Arc<dyn CommentRepository>, config: ValidationConfig) -> Self {
        Self {
            repository,
            converter: RowConverter::new(config.reference_unix_seconds),
            pipeline: ValidationPipeline::new(config),
        }
    }

    /// Runs a submission through the pipeline, stores it and returns the
    /// listing's public comments, newest first.
    #[instrument(skip_all, fields(listing_id = %request.listing_id))]
    pub async fn post_comment(
        &self,
        request: PostCommentRequest,
        user_ip: &str,
    ) -> Result<Vec<PublicComment>, CommentsError> {
        let submission = CommentSubmission {
            comment_id: Uuid::now_v7(),
            listing_id: request.listing_id,
            user_ip: user_ip.to_string(),
            user_id: request.user_id,
            username: request.username,
            comment_text: request.comment_text,
        };

        let comment = self.pipeline.run(submission)?;
        let row: PostCommentRow = self.converter.to_row(&comment);
        let stored = self.repository.insert_comment(row).await?;
        let stored = self.converter.to_comment(&stored).map_err(DomainError::from)?;

        info!(
            comment_id = %stored.comment_id,
            listing_id = %stored.listing_id,
            "Comment accepted"
        );
        self.list_comments(&stored.listing_id).await
    }

    /// Public comments of a listing, newest first. A listing reference that
    /// could never have been stored yields an empty list without a query.
    pub async fn list_comments(
        &self,
        listing_id: &str,
    ) -> Result<Vec<PublicComment>, CommentsError> {
        if self
            .pipeline
            .validator()
            .check_listing_id(listing_id)
            .is_err()
        {
            debug!(listing_id, "Listing reference cannot exist, returning no comments");
            return Ok(Vec::new());
        }

        let rows = self.repository.comments_for_listing(listing_id).await?;
        let comments = self
            .converter
            .to_comments(&rows)
            .map_err(DomainError::from)?;
        Ok(PublicComment::from_comments(comments))
    }

    /// A fresh submitter identifier for a client that has none yet.
    pub fn mint_user_id(&self) -> Uuid {
        Uuid::now_v7()
    }

    pub async fn check_storage(&self) -> Result<(), CommentsError> {
        self.repository.ping().await.map_err(CommentsError::from)
    }
}
