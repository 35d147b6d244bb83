use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Form body of `POST /api/v1/comments`. Absent fields arrive empty and are
/// reported by validation like any other violation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct PostCommentRequest {
    pub listing_id: String,
    pub user_id: String,
    pub username: String,
    pub comment_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserIdResponse {
    pub user_id: Uuid,
}
