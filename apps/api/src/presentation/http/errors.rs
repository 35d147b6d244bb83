//! HTTP error handling and response conversion.
//!
//! Errors are mapped to status codes and JSON bodies here. Rejected
//! submissions carry one `{field, reason}` entry per violated constraint;
//! every other error body is a single user-safe message.

use crate::application::comments::use_case::CommentsError;
use crate::domain::comment::errors::DomainError;
use crate::infrastructure::security::{PipelineRejection, PipelineStage};
use axum::{
    Json,
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use std::fmt;

/// Application-level errors returned from handlers.
#[derive(Debug)]
pub enum AppError {
    /// Body could not be decoded as a form (400).
    BadRequest(String),

    /// Submission failed validation (400).
    Rejected(PipelineRejection),

    /// Storage operation failed (500).
    Database(String),

    /// Unclassified internal error (500).
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ViolationBody {
    field: &'static str,
    reason: String,
}

#[derive(Debug, Serialize)]
struct RejectionBody {
    error: &'static str,
    stage: PipelineStage,
    violations: Vec<ViolationBody>,
}

impl From<&PipelineRejection> for RejectionBody {
    fn from(rejection: &PipelineRejection) -> Self {
        Self {
            error: "Invalid input data",
            stage: rejection.stage,
            violations: rejection
                .violations
                .iter()
                .map(|violation| ViolationBody {
                    field: violation.field().as_str(),
                    reason: violation.to_string(),
                })
                .collect(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Rejected(rejection) => write!(f, "Rejected: {}", rejection),
            Self::Database(msg) => write!(f, "Database error: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Rejected(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-safe message, without implementation details.
    fn user_message(&self) -> String {
        match self {
            Self::BadRequest(msg) => msg.clone(),
            Self::Rejected(_) => "Invalid input data".into(),
            Self::Database(_) => "Database operation failed".into(),
            Self::Internal(_) => "Internal server error".into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match status {
            StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("error={}", self);
            }
            _ => {
                tracing::warn!("error={}", self);
            }
        }

        match &self {
            Self::Rejected(rejection) => {
                (status, Json(RejectionBody::from(rejection))).into_response()
            }
            _ => (status, Json(json!({ "error": self.user_message() }))).into_response(),
        }
    }
}

// === Domain Error Conversion ===

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ValidationError(msg) => AppError::Internal(msg),
            DomainError::Conversion(e) => {
                tracing::error!(conversion_error = %e, "Stored comment row is unusable");
                AppError::Internal(e.to_string())
            }
            DomainError::InfrastructureError(msg) => {
                tracing::error!(infrastructure_error = %msg);
                AppError::Database(msg)
            }
        }
    }
}

impl From<CommentsError> for AppError {
    fn from(err: CommentsError) -> Self {
        match err {
            CommentsError::Rejected(rejection) => AppError::Rejected(rejection),
            CommentsError::Domain(e) => e.into(),
        }
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
