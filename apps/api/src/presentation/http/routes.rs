use super::{
    handlers::{comments, health, users},
    middleware::{logging::logging_middleware, request_id::request_id_middleware},
    state::AppState,
};
use axum::{Router, middleware, routing::get, routing::post};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Comments
        .route("/api/v1/comments", post(comments::post_comment))
        .route(
            "/api/v1/comments/{listing_id}",
            get(comments::list_comments),
        )
        // Submitter identifiers
        .route("/api/v1/user/user_id", get(users::new_user_id))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
