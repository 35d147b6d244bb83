use super::{
    redaction::redact_contact_details,
    sanitizer::sanitize_text,
    validation::{FieldViolation, ValidationConfig, ValidationService},
};
use crate::domain::comment::entity::{Comment, CommentSubmission};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// The validation pass a submission failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Field rules applied to the raw submission.
    SyntaxValidation,
    /// Field rules re-applied after sanitization and redaction.
    ContentValidation,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SyntaxValidation => f.write_str("syntax validation"),
            Self::ContentValidation => f.write_str("content validation"),
        }
    }
}

/// Why a submission was discarded. `violations` is never empty.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("submission rejected during {stage} ({} violation(s))", .violations.len())]
pub struct PipelineRejection {
    pub stage: PipelineStage,
    pub violations: Vec<FieldViolation>,
}

/// Where a submission currently is. `Accepted` and `Rejected` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Received(CommentSubmission),
    SyntaxValidated(CommentSubmission),
    Sanitized(CommentSubmission),
    ContentValidated(CommentSubmission),
    Accepted(Comment),
    Rejected(PipelineRejection),
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted(_) | Self::Rejected(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Received(_) => "received",
            Self::SyntaxValidated(_) => "syntax_validated",
            Self::Sanitized(_) => "sanitized",
            Self::ContentValidated(_) => "content_validated",
            Self::Accepted(_) => "accepted",
            Self::Rejected(_) => "rejected",
        }
    }
}

/// Validate, sanitize, redact, validate again.
///
/// The second pass is the real boundary: sanitization can empty a field or
/// grow it past its limit through entity escaping, and either outcome must
/// reject the whole submission. Nothing is partially applied.
pub struct ValidationPipeline {
    validator: ValidationService,
}

impl Default for ValidationPipeline {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

impl ValidationPipeline {
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            validator: ValidationService::new(config),
        }
    }

    pub fn validator(&self) -> &ValidationService {
        &self.validator
    }

    pub fn run(&self, submission: CommentSubmission) -> Result<Comment, PipelineRejection> {
        self.run_at(submission, Utc::now())
    }

    /// Drives a submission to a terminal state. `now` is both the clock the
    /// identifier window is checked against and the accepted comment's
    /// timestamp.
    #[instrument(skip_all, fields(comment_id = %submission.comment_id))]
    pub fn run_at(
        &self,
        submission: CommentSubmission,
        now: DateTime<Utc>,
    ) -> Result<Comment, PipelineRejection> {
        let mut state = PipelineState::Received(submission);
        while !state.is_terminal() {
            state = self.step(state, now);
            debug!(state = state.name(), "Pipeline transition");
        }

        match state {
            PipelineState::Accepted(comment) => Ok(comment),
            PipelineState::Rejected(rejection) => {
                warn!(
                    stage = %rejection.stage,
                    violations = rejection.violations.len(),
                    "Comment submission rejected"
                );
                Err(rejection)
            }
            _ => unreachable!("loop exits on terminal states only"),
        }
    }

    /// Performs exactly one transition. Terminal states are returned as is.
    pub fn step(&self, state: PipelineState, now: DateTime<Utc>) -> PipelineState {
        match state {
            PipelineState::Received(submission) => self
                .validate(submission, now, PipelineStage::SyntaxValidation)
                .map_or_else(PipelineState::Rejected, PipelineState::SyntaxValidated),
            PipelineState::SyntaxValidated(submission) => {
                PipelineState::Sanitized(sanitize_submission(submission))
            }
            PipelineState::Sanitized(submission) => self
                .validate(submission, now, PipelineStage::ContentValidation)
                .map_or_else(PipelineState::Rejected, PipelineState::ContentValidated),
            PipelineState::ContentValidated(submission) => {
                PipelineState::Accepted(accept(submission, now))
            }
            terminal => terminal,
        }
    }

    fn validate(
        &self,
        submission: CommentSubmission,
        now: DateTime<Utc>,
        stage: PipelineStage,
    ) -> Result<CommentSubmission, PipelineRejection> {
        self.validator
            .validate_submission(submission, now)
            .into_result()
            .map_err(|violations| PipelineRejection { stage, violations })
    }
}

// The network address is server-derived and only ever format-checked.
fn sanitize_submission(submission: CommentSubmission) -> CommentSubmission {
    CommentSubmission {
        listing_id: sanitize_text(&submission.listing_id),
        user_id: sanitize_text(&submission.user_id),
        username: sanitize_text(&submission.username),
        comment_text: redact_contact_details(&sanitize_text(&submission.comment_text)),
        ..submission
    }
}

fn accept(submission: CommentSubmission, now: DateTime<Utc>) -> Comment {
    Comment {
        listing_id: submission.listing_id,
        comment_id: submission.comment_id,
        user_ip: submission.user_ip,
        user_id: submission.user_id,
        username: submission.username,
        comment_text: submission.comment_text,
        timestamp: now.timestamp(),
    }
}
