use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Row conversion failed: {0}")]
    Conversion(#[from] ConversionError),
    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
}

/// Failures turning a storage row into a [`Comment`](super::entity::Comment).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("{shape} value is not a record")]
    UnsupportedShape { shape: &'static str },

    #[error("row is missing the {field} column")]
    MissingField { field: &'static str },

    #[error("column {field} is not {expected}-typed")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },

    #[error("column {field} holds an invalid identifier")]
    InvalidIdentifier { field: &'static str },

    #[error("timestamp column is null or out of range")]
    InvalidTimestamp,

    #[error("timestamp {timestamp} predates the reference instant {reference}")]
    StaleTimestamp { timestamp: i64, reference: i64 },
}
