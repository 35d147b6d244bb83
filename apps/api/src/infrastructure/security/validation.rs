use super::identifier::{DEFAULT_SKEW_SECONDS, IdentifierError, IdentifierValidator, check_generic};
use crate::domain::comment::{
    entity::{CommentSubmission, REFERENCE_UNIX_SECONDS},
    value_objects::{CommentText, ListingId, UserIp, Username},
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{instrument, warn};
use validator::{ValidationError, ValidationErrors};

/// Fields of a comment submission, named as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentField {
    CommentId,
    ListingId,
    UserIp,
    UserId,
    Username,
    CommentText,
}

impl CommentField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CommentId => "comment_id",
            Self::ListingId => "listing_id",
            Self::UserIp => "user_ip",
            Self::UserId => "user_id",
            Self::Username => "username",
            Self::CommentText => "comment_text",
        }
    }
}

impl fmt::Display for CommentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single violated field constraint.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldViolation {
    #[error("{field} is required")]
    MissingField { field: CommentField },

    #[error("{field} must be {min} to {max} characters long, got {actual}")]
    OutOfRangeLength {
        field: CommentField,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("{field} contains characters outside its allowed set")]
    InvalidCharset { field: CommentField },

    #[error("{field} must contain digits only")]
    InvalidNumericFormat { field: CommentField },

    #[error("{field} is not a valid IPv4 or IPv6 address")]
    InvalidNetworkAddress { field: CommentField },

    #[error("{field} is not an acceptable identifier: {source}")]
    InvalidIdentifier {
        field: CommentField,
        #[source]
        source: IdentifierError,
    },
}

impl FieldViolation {
    pub fn field(&self) -> CommentField {
        match self {
            Self::MissingField { field }
            | Self::OutOfRangeLength { field, .. }
            | Self::InvalidCharset { field }
            | Self::InvalidNumericFormat { field }
            | Self::InvalidNetworkAddress { field }
            | Self::InvalidIdentifier { field, .. } => *field,
        }
    }
}

/// Identifier window for comment submissions. Field length and charset
/// rules live on the value objects in `domain::comment::value_objects`.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    pub reference_unix_seconds: i64,
    pub identifier_skew: Duration,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            reference_unix_seconds: REFERENCE_UNIX_SECONDS,
            identifier_skew: Duration::seconds(DEFAULT_SKEW_SECONDS),
        }
    }
}

/// Outcome of validating a value: either the value or every violation found.
#[derive(Debug, Clone)]
pub struct ValidationResult<T> {
    pub is_valid: bool,
    pub value: Option<T>,
    pub errors: Vec<FieldViolation>,
}

impl<T> ValidationResult<T> {
    fn from_errors(value: T, errors: Vec<FieldViolation>) -> Self {
        let is_valid = errors.is_empty();
        Self {
            is_valid,
            value: is_valid.then_some(value),
            errors,
        }
    }

    pub fn into_result(self) -> Result<T, Vec<FieldViolation>> {
        match self.value {
            Some(value) if self.is_valid => Ok(value),
            _ => Err(self.errors),
        }
    }
}

/// Shape rules for every field of a comment submission. Side-effect free
/// apart from reading the clock for the identifier window.
pub struct ValidationService {
    config: ValidationConfig,
    identifiers: IdentifierValidator,
}

impl ValidationService {
    pub fn new(config: ValidationConfig) -> Self {
        let identifiers =
            IdentifierValidator::new(config.reference_unix_seconds, config.identifier_skew);
        Self {
            config,
            identifiers,
        }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Checks every field and aggregates all violations.
    #[instrument(skip(self, submission), fields(listing_id = %submission.listing_id))]
    pub fn validate_submission(
        &self,
        submission: CommentSubmission,
        now: DateTime<Utc>,
    ) -> ValidationResult<CommentSubmission> {
        let mut errors = Vec::new();

        if let Err(source) = check_generic(&submission.comment_id) {
            errors.push(FieldViolation::InvalidIdentifier {
                field: CommentField::CommentId,
                source,
            });
        }
        errors.extend(self.check_listing_id(&submission.listing_id).err());
        errors.extend(self.check_user_ip(&submission.user_ip).err());
        errors.extend(self.check_user_id(&submission.user_id, now).err());
        errors.extend(self.check_username(&submission.username).err());
        errors.extend(self.check_comment_text(&submission.comment_text).err());

        if !errors.is_empty() {
            warn!(
                violated = ?errors.iter().map(FieldViolation::field).collect::<Vec<_>>(),
                "Comment submission failed field validation"
            );
        }

        ValidationResult::from_errors(submission, errors)
    }

    pub fn check_listing_id(&self, value: &str) -> Result<(), FieldViolation> {
        ListingId::new(value.to_string())
            .map(|_| ())
            .map_err(|errors| violation_from(CommentField::ListingId, value, &errors))
    }

    pub fn check_user_ip(&self, value: &str) -> Result<(), FieldViolation> {
        UserIp::new(value.to_string())
            .map(|_| ())
            .map_err(|errors| violation_from(CommentField::UserIp, value, &errors))
    }

    pub fn check_user_id(&self, value: &str, now: DateTime<Utc>) -> Result<(), FieldViolation> {
        let field = CommentField::UserId;
        if value.is_empty() {
            return Err(FieldViolation::MissingField { field });
        }
        self.identifiers
            .validate_at(value, now)
            .map(|_| ())
            .map_err(|source| FieldViolation::InvalidIdentifier { field, source })
    }

    pub fn check_username(&self, value: &str) -> Result<(), FieldViolation> {
        Username::new(value.to_string())
            .map(|_| ())
            .map_err(|errors| violation_from(CommentField::Username, value, &errors))
    }

    pub fn check_comment_text(&self, value: &str) -> Result<(), FieldViolation> {
        CommentText::new(value.to_string())
            .map(|_| ())
            .map_err(|errors| violation_from(CommentField::CommentText, value, &errors))
    }
}

impl Default for ValidationService {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

/// Collapses a value object's errors into the one violation reported for
/// its field. Emptiness wins over length, length over format.
fn violation_from(field: CommentField, value: &str, errors: &ValidationErrors) -> FieldViolation {
    if value.is_empty() {
        return FieldViolation::MissingField { field };
    }

    let failures: Vec<&ValidationError> = errors
        .field_errors()
        .into_values()
        .flat_map(|errs| errs.iter())
        .collect();

    if let Some(length) = failures.iter().find(|e| e.code == "length") {
        return FieldViolation::OutOfRangeLength {
            field,
            min: bound(length, "min"),
            max: bound(length, "max"),
            actual: value.chars().count(),
        };
    }

    match failures.first().map(|e| e.code.as_ref()) {
        Some("ip") => FieldViolation::InvalidNetworkAddress { field },
        Some("regex") if field == CommentField::ListingId => {
            FieldViolation::InvalidNumericFormat { field }
        }
        _ => FieldViolation::InvalidCharset { field },
    }
}

fn bound(error: &ValidationError, name: &str) -> usize {
    error
        .params
        .get(name)
        .and_then(serde_json::Value::as_u64)
        .unwrap_or_default() as usize
}
