use crate::domain::comment::entity::REFERENCE_UNIX_SECONDS;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::{Uuid, Variant};

/// Default tolerance for client clocks running ahead of the server.
pub const DEFAULT_SKEW_SECONDS: i64 = 3_600;

const TIME_ORDERED_VERSION: usize = 7;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentifierError {
    #[error("identifier is not a well-formed UUID")]
    MalformedIdentifier,

    #[error("identifier is version {found}, expected a version 7 UUID")]
    WrongVersion { found: usize },

    #[error("identifier was minted at {timestamp_ms} ms, before the reference instant {reference_ms} ms")]
    TimestampTooOld { timestamp_ms: i64, reference_ms: i64 },

    #[error("identifier was minted at {timestamp_ms} ms, later than the allowed {limit_ms} ms")]
    TimestampTooNew { timestamp_ms: i64, limit_ms: i64 },
}

/// An identifier that passed the time-window check, with its embedded instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedIdentifier {
    pub id: Uuid,
    pub minted_at: DateTime<Utc>,
}

/// Milliseconds since the Unix epoch stored in the first 48 bits of `id`.
pub fn embedded_timestamp_millis(id: &Uuid) -> i64 {
    let b = id.as_bytes();
    i64::from_be_bytes([0, 0, b[0], b[1], b[2], b[3], b[4], b[5]])
}

/// Accepts only version 7 identifiers minted between a fixed reference
/// instant and `now + skew`.
#[derive(Debug, Clone, Copy)]
pub struct IdentifierValidator {
    reference_ms: i64,
    skew: Duration,
}

impl Default for IdentifierValidator {
    fn default() -> Self {
        Self::new(REFERENCE_UNIX_SECONDS, Duration::seconds(DEFAULT_SKEW_SECONDS))
    }
}

impl IdentifierValidator {
    pub fn new(reference_unix_seconds: i64, skew: Duration) -> Self {
        Self {
            reference_ms: reference_unix_seconds.saturating_mul(1_000),
            skew,
        }
    }

    pub fn validate(&self, candidate: &str) -> Result<ValidatedIdentifier, IdentifierError> {
        self.validate_at(candidate, Utc::now())
    }

    pub fn validate_at(
        &self,
        candidate: &str,
        now: DateTime<Utc>,
    ) -> Result<ValidatedIdentifier, IdentifierError> {
        let id = Uuid::parse_str(candidate).map_err(|_| IdentifierError::MalformedIdentifier)?;
        self.check_at(id, now)
    }

    pub fn check_at(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ValidatedIdentifier, IdentifierError> {
        let version = id.get_version_num();
        if version != TIME_ORDERED_VERSION {
            return Err(IdentifierError::WrongVersion { found: version });
        }

        let timestamp_ms = embedded_timestamp_millis(&id);
        if timestamp_ms < self.reference_ms {
            return Err(IdentifierError::TimestampTooOld {
                timestamp_ms,
                reference_ms: self.reference_ms,
            });
        }

        let limit_ms = now
            .checked_add_signed(self.skew)
            .map_or(i64::MAX, |limit| limit.timestamp_millis());
        if timestamp_ms > limit_ms {
            return Err(IdentifierError::TimestampTooNew {
                timestamp_ms,
                limit_ms,
            });
        }

        let minted_at = DateTime::from_timestamp_millis(timestamp_ms)
            .ok_or(IdentifierError::MalformedIdentifier)?;
        Ok(ValidatedIdentifier { id, minted_at })
    }
}

/// Plain UUID validity for server-minted identifiers: non-nil, RFC 4122
/// variant and a defined version. No time window.
pub fn check_generic(id: &Uuid) -> Result<(), IdentifierError> {
    if id.is_nil() || id.get_variant() != Variant::RFC4122 {
        return Err(IdentifierError::MalformedIdentifier);
    }
    match id.get_version_num() {
        1..=8 => Ok(()),
        found => Err(IdentifierError::WrongVersion { found }),
    }
}
