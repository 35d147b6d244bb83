use crate::domain::comment::{
    errors::DomainError,
    repository::CommentRepository,
    rows::{CommentListRow, PostCommentRow},
};
use async_trait::async_trait;
use sqlx::PgPool;

pub struct SqlxCommentRepository {
    pub pool: PgPool,
}

impl SqlxCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn insert_comment(&self, row: PostCommentRow) -> Result<PostCommentRow, DomainError> {
        let comment_id = row
            .comment_id
            .get()
            .ok_or_else(|| DomainError::ValidationError("comment_id is null".to_string()))?;
        let timestamp = row
            .extract
            .get()
            .ok_or_else(|| DomainError::ValidationError("timestamp is null".to_string()))?;

        sqlx::query_as::<_, PostCommentRow>(
            r#"INSERT INTO comments (
                comment_id, listing_id, user_ip, user_id, username, comment_text, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, to_timestamp($7::bigint))
            RETURNING comment_id, listing_id, user_ip, user_id, username, comment_text,
                EXTRACT(EPOCH FROM created_at)::bigint AS extract"#,
        )
        .bind(comment_id)
        .bind(&row.listing_id)
        .bind(&row.user_ip)
        .bind(&row.user_id)
        .bind(&row.username)
        .bind(&row.comment_text)
        .bind(timestamp)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))
    }

    async fn comments_for_listing(
        &self,
        listing_id: &str,
    ) -> Result<Vec<CommentListRow>, DomainError> {
        sqlx::query_as::<_, CommentListRow>(
            r#"SELECT comment_id, listing_id, user_ip, user_id, username, comment_text,
                EXTRACT(EPOCH FROM created_at)::bigint AS extract
            FROM comments
            WHERE listing_id = $1
            ORDER BY created_at DESC, comment_id DESC"#,
        )
        .bind(listing_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))
    }
}
