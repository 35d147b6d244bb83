use crate::application::comments::dto::PostCommentRequest;
use crate::domain::comment::entity::PublicComment;
use crate::presentation::http::{errors::AppError, extractors::ClientIp, state::AppState};
use axum::{
    Form, Json,
    extract::{Path, State, rejection::FormRejection},
    http::StatusCode,
};

pub async fn list_comments(
    State(state): State<AppState>,
    Path(listing_id): Path<String>,
) -> Result<Json<Vec<PublicComment>>, AppError> {
    let comments = state.comments.list_comments(&listing_id).await?;
    Ok(Json(comments))
}

pub async fn post_comment(
    State(state): State<AppState>,
    ClientIp(user_ip): ClientIp,
    form: Result<Form<PostCommentRequest>, FormRejection>,
) -> Result<(StatusCode, Json<Vec<PublicComment>>), AppError> {
    let Form(request) = form?;
    let comments = state.comments.post_comment(request, &user_ip).await?;
    Ok((StatusCode::CREATED, Json(comments)))
}
