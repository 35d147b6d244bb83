use crate::{
    application::comments::use_case::CommentsUseCase,
    domain::comment::repository::CommentRepository,
    infrastructure::security::ValidationConfig,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub comments: Arc<CommentsUseCase>,
}

impl AppState {
    pub fn new(repository: Arc<dyn CommentRepository>, validation: ValidationConfig) -> Self {
        Self {
            comments: Arc::new(CommentsUseCase::new(repository, validation)),
        }
    }
}
