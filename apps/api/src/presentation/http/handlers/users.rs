use crate::application::comments::dto::UserIdResponse;
use crate::presentation::http::state::AppState;
use axum::{Json, extract::State};

/// Mints a submitter identifier for a client that has not stored one yet.
pub async fn new_user_id(State(state): State<AppState>) -> Json<UserIdResponse> {
    Json(UserIdResponse {
        user_id: state.comments.mint_user_id(),
    })
}
