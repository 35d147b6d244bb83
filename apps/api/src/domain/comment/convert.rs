use super::{
    entity::{Comment, REFERENCE_UNIX_SECONDS},
    errors::ConversionError,
    rows::{
        COMMENT_ID, COMMENT_TEXT, Column, CommentListRow, EXTRACT, LISTING_ID, NumericCell,
        PostCommentRow, RowShape, USER_ID, USER_IP, USERNAME, UuidCell,
    },
};
use serde_json::{Value, json};
use uuid::Uuid;

/// A row shape that can be written from a [`Comment`].
pub trait FromComment: Sized {
    fn from_comment(comment: &Comment) -> Self;
}

/// Maps storage rows to [`Comment`]s and back.
///
/// Inbound conversion rejects rows whose timestamp predates the reference
/// instant, the same rule the identifier validator applies to identifiers.
#[derive(Debug, Clone, Copy)]
pub struct RowConverter {
    reference_unix_seconds: i64,
}

impl Default for RowConverter {
    fn default() -> Self {
        Self::new(REFERENCE_UNIX_SECONDS)
    }
}

impl RowConverter {
    pub fn new(reference_unix_seconds: i64) -> Self {
        Self {
            reference_unix_seconds,
        }
    }

    pub fn to_comment<R: RowShape + ?Sized>(&self, row: &R) -> Result<Comment, ConversionError> {
        if !row.is_record() {
            return Err(ConversionError::UnsupportedShape {
                shape: row.shape_name(),
            });
        }

        let comment_id = match required(row, COMMENT_ID)? {
            Column::Uuid(UuidCell { bytes, valid: true }) | Column::Bytes(bytes) => {
                Uuid::from_bytes(bytes)
            }
            Column::Uuid(_) | Column::Null => {
                return Err(ConversionError::InvalidIdentifier { field: COMMENT_ID });
            }
            _ => {
                return Err(ConversionError::TypeMismatch {
                    field: COMMENT_ID,
                    expected: "identifier",
                });
            }
        };

        let listing_id = text(row, LISTING_ID)?;
        let user_ip = text(row, USER_IP)?;
        let user_id = text(row, USER_ID)?;
        let username = text(row, USERNAME)?;
        let comment_text = text(row, COMMENT_TEXT)?;

        let timestamp = match required(row, EXTRACT)? {
            Column::Numeric(NumericCell { value, valid: true }) => value,
            Column::Numeric(_) | Column::Null => return Err(ConversionError::InvalidTimestamp),
            _ => {
                return Err(ConversionError::TypeMismatch {
                    field: EXTRACT,
                    expected: "numeric",
                });
            }
        };
        if timestamp < self.reference_unix_seconds {
            return Err(ConversionError::StaleTimestamp {
                timestamp,
                reference: self.reference_unix_seconds,
            });
        }

        Ok(Comment {
            listing_id,
            comment_id,
            user_ip,
            user_id,
            username,
            comment_text,
            timestamp,
        })
    }

    /// Converts every row or fails on the first bad one.
    pub fn to_comments<R: RowShape>(&self, rows: &[R]) -> Result<Vec<Comment>, ConversionError> {
        rows.iter().map(|row| self.to_comment(row)).collect()
    }

    pub fn to_row<R: FromComment>(&self, comment: &Comment) -> R {
        R::from_comment(comment)
    }

    pub fn to_rows<R: FromComment>(&self, comments: &[Comment]) -> Vec<R> {
        comments.iter().map(R::from_comment).collect()
    }
}

fn required<'r, R: RowShape + ?Sized>(
    row: &'r R,
    field: &'static str,
) -> Result<Column<'r>, ConversionError> {
    row.column(field)
        .ok_or(ConversionError::MissingField { field })
}

fn text<R: RowShape + ?Sized>(row: &R, field: &'static str) -> Result<String, ConversionError> {
    match required(row, field)? {
        Column::Text(value) => Ok(value.to_owned()),
        _ => Err(ConversionError::TypeMismatch {
            field,
            expected: "text",
        }),
    }
}

impl FromComment for PostCommentRow {
    fn from_comment(comment: &Comment) -> Self {
        Self {
            comment_id: UuidCell::from(comment.comment_id),
            listing_id: comment.listing_id.clone(),
            user_ip: comment.user_ip.clone(),
            user_id: comment.user_id.clone(),
            username: comment.username.clone(),
            comment_text: comment.comment_text.clone(),
            extract: NumericCell::from(Some(comment.timestamp)),
        }
    }
}

impl FromComment for CommentListRow {
    fn from_comment(comment: &Comment) -> Self {
        Self {
            comment_id: comment.comment_id.into_bytes(),
            listing_id: comment.listing_id.clone(),
            user_ip: comment.user_ip.clone(),
            user_id: comment.user_id.clone(),
            username: comment.username.clone(),
            comment_text: comment.comment_text.clone(),
            extract: NumericCell::from(Some(comment.timestamp)),
        }
    }
}

impl FromComment for Value {
    fn from_comment(comment: &Comment) -> Self {
        json!({
            COMMENT_ID: comment.comment_id.as_bytes().to_vec(),
            LISTING_ID: comment.listing_id,
            USER_IP: comment.user_ip,
            USER_ID: comment.user_id,
            USERNAME: comment.username,
            COMMENT_TEXT: comment.comment_text,
            EXTRACT: comment.timestamp,
        })
    }
}
