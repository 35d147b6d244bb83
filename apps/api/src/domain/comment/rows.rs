//! Storage-side shapes of a comment.
//!
//! Different queries hand back structurally similar records whose identifier
//! and timestamp columns are not typed the same way. Each shape exposes its
//! columns by name through [`RowShape`] so one converter handles all of them.

use serde_json::Value;
use sqlx::{FromRow, Row, postgres::PgRow};
use uuid::Uuid;

pub const COMMENT_ID: &str = "comment_id";
pub const LISTING_ID: &str = "listing_id";
pub const USER_IP: &str = "user_ip";
pub const USER_ID: &str = "user_id";
pub const USERNAME: &str = "username";
pub const COMMENT_TEXT: &str = "comment_text";
/// Postgres names an un-aliased `EXTRACT(EPOCH FROM ...)` column `extract`.
pub const EXTRACT: &str = "extract";

/// Nullable UUID cell: 16 raw bytes plus a validity flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UuidCell {
    pub bytes: [u8; 16],
    pub valid: bool,
}

impl From<Option<Uuid>> for UuidCell {
    fn from(value: Option<Uuid>) -> Self {
        match value {
            Some(id) => Self {
                bytes: id.into_bytes(),
                valid: true,
            },
            None => Self::default(),
        }
    }
}

impl From<Uuid> for UuidCell {
    fn from(id: Uuid) -> Self {
        Some(id).into()
    }
}

impl UuidCell {
    pub fn get(&self) -> Option<Uuid> {
        self.valid.then(|| Uuid::from_bytes(self.bytes))
    }
}

/// Nullable numeric cell holding whole seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NumericCell {
    pub value: i64,
    pub valid: bool,
}

impl From<Option<i64>> for NumericCell {
    fn from(value: Option<i64>) -> Self {
        match value {
            Some(value) => Self { value, valid: true },
            None => Self::default(),
        }
    }
}

impl NumericCell {
    pub fn get(&self) -> Option<i64> {
        self.valid.then_some(self.value)
    }
}

/// A single column value as seen by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column<'a> {
    Uuid(UuidCell),
    Bytes([u8; 16]),
    Numeric(NumericCell),
    Text(&'a str),
    Null,
    Unsupported,
}

impl Column<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Uuid(_) | Self::Bytes(_) => "identifier",
            Self::Numeric(_) => "numeric",
            Self::Text(_) => "text",
            Self::Null => "null",
            Self::Unsupported => "unsupported",
        }
    }
}

/// Named-column access to a row.
pub trait RowShape {
    fn shape_name(&self) -> &'static str;

    /// Whether the value has named columns at all.
    fn is_record(&self) -> bool {
        true
    }

    fn column(&self, name: &str) -> Option<Column<'_>>;
}

/// Result of `INSERT ... RETURNING`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCommentRow {
    pub comment_id: UuidCell,
    pub listing_id: String,
    pub user_ip: String,
    pub user_id: String,
    pub username: String,
    pub comment_text: String,
    pub extract: NumericCell,
}

/// One row of the per-listing comment query. The identifier column is
/// `NOT NULL` there, so it arrives as plain bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentListRow {
    pub comment_id: [u8; 16],
    pub listing_id: String,
    pub user_ip: String,
    pub user_id: String,
    pub username: String,
    pub comment_text: String,
    pub extract: NumericCell,
}

impl RowShape for PostCommentRow {
    fn shape_name(&self) -> &'static str {
        "PostCommentRow"
    }

    fn column(&self, name: &str) -> Option<Column<'_>> {
        let column = match name {
            COMMENT_ID => Column::Uuid(self.comment_id),
            LISTING_ID => Column::Text(&self.listing_id),
            USER_IP => Column::Text(&self.user_ip),
            USER_ID => Column::Text(&self.user_id),
            USERNAME => Column::Text(&self.username),
            COMMENT_TEXT => Column::Text(&self.comment_text),
            EXTRACT => Column::Numeric(self.extract),
            _ => return None,
        };
        Some(column)
    }
}

impl RowShape for CommentListRow {
    fn shape_name(&self) -> &'static str {
        "CommentListRow"
    }

    fn column(&self, name: &str) -> Option<Column<'_>> {
        let column = match name {
            COMMENT_ID => Column::Bytes(self.comment_id),
            LISTING_ID => Column::Text(&self.listing_id),
            USER_IP => Column::Text(&self.user_ip),
            USER_ID => Column::Text(&self.user_id),
            USERNAME => Column::Text(&self.username),
            COMMENT_TEXT => Column::Text(&self.comment_text),
            EXTRACT => Column::Numeric(self.extract),
            _ => return None,
        };
        Some(column)
    }
}

/// Loosely typed rows, e.g. from a JSON export. Identifiers are 16-element
/// byte arrays; a string in the identifier column is a type mismatch.
impl RowShape for Value {
    fn shape_name(&self) -> &'static str {
        "json"
    }

    fn is_record(&self) -> bool {
        self.is_object()
    }

    fn column(&self, name: &str) -> Option<Column<'_>> {
        let value = self.as_object()?.get(name)?;
        let column = match value {
            Value::Null => Column::Null,
            Value::String(text) => Column::Text(text),
            Value::Number(number) => match number.as_i64() {
                Some(value) => Column::Numeric(NumericCell { value, valid: true }),
                None => Column::Numeric(NumericCell::default()),
            },
            Value::Array(items) => json_bytes(items).map_or(Column::Unsupported, Column::Bytes),
            Value::Bool(_) | Value::Object(_) => Column::Unsupported,
        };
        Some(column)
    }
}

fn json_bytes(items: &[Value]) -> Option<[u8; 16]> {
    if items.len() != 16 {
        return None;
    }
    let mut bytes = [0u8; 16];
    for (slot, item) in bytes.iter_mut().zip(items) {
        *slot = u8::try_from(item.as_u64()?).ok()?;
    }
    Some(bytes)
}

impl<'r> FromRow<'r, PgRow> for PostCommentRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            comment_id: row.try_get::<Option<Uuid>, _>(COMMENT_ID)?.into(),
            listing_id: row.try_get(LISTING_ID)?,
            user_ip: row.try_get(USER_IP)?,
            user_id: row.try_get(USER_ID)?,
            username: row.try_get(USERNAME)?,
            comment_text: row.try_get(COMMENT_TEXT)?,
            extract: row.try_get::<Option<i64>, _>(EXTRACT)?.into(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CommentListRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            comment_id: row.try_get::<Uuid, _>(COMMENT_ID)?.into_bytes(),
            listing_id: row.try_get(LISTING_ID)?,
            user_ip: row.try_get(USER_IP)?,
            user_id: row.try_get(USER_ID)?,
            username: row.try_get(USERNAME)?,
            comment_text: row.try_get(COMMENT_TEXT)?,
            extract: row.try_get::<Option<i64>, _>(EXTRACT)?.into(),
        })
    }
}
