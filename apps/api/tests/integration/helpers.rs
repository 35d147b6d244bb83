use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use listing_comments_api::{
    domain::comment::{
        errors::DomainError,
        repository::CommentRepository,
        rows::{CommentListRow, PostCommentRow},
    },
    infrastructure::{
        repositories::in_memory_comment_repository::InMemoryCommentRepository,
        security::ValidationConfig,
    },
    presentation::http::{routes::create_router, state::AppState},
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

/// Storage that is always down.
pub struct UnreachableRepository;

#[async_trait]
impl CommentRepository for UnreachableRepository {
    async fn insert_comment(&self, _row: PostCommentRow) -> Result<PostCommentRow, DomainError> {
        Err(DomainError::InfrastructureError("connection refused".to_string()))
    }

    async fn comments_for_listing(
        &self,
        _listing_id: &str,
    ) -> Result<Vec<CommentListRow>, DomainError> {
        Err(DomainError::InfrastructureError("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Err(DomainError::InfrastructureError("connection refused".to_string()))
    }
}

pub fn spawn_app() -> Router {
    spawn_app_with(Arc::new(InMemoryCommentRepository::new()))
}

pub fn spawn_app_with(repository: Arc<dyn CommentRepository>) -> Router {
    create_router(AppState::new(repository, ValidationConfig::default()))
}

pub fn user_id() -> String {
    Uuid::now_v7().to_string()
}

pub fn form_request(fields: &[(&str, &str)]) -> Request<Body> {
    form_request_from(fields, "198.51.100.23")
}

pub fn form_request_from(fields: &[(&str, &str)], forwarded_for: &str) -> Request<Body> {
    let body = serde_urlencoded::to_string(fields).expect("failed to encode form");
    Request::builder()
        .method("POST")
        .uri("/api/v1/comments")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header("x-forwarded-for", forwarded_for)
        .body(Body::from(body))
        .expect("failed to build form request")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

pub async fn send(app: &Router, req: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(req).await.expect("request failed")
}

pub async fn read_json<T: DeserializeOwned>(res: axum::response::Response) -> T {
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("failed to parse json")
}

pub async fn read_text(res: axum::response::Response) -> String {
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    String::from_utf8(bytes.to_vec()).expect("invalid utf8")
}

pub async fn expect_status(
    res: axum::response::Response,
    expected: StatusCode,
) -> axum::response::Response {
    let actual = res.status();
    if actual == expected {
        return res;
    }

    let body = read_text(res).await;
    panic!(
        "HTTP status mismatch. Expected {}, got {}. Response body: {}",
        expected, actual, body
    );
}
