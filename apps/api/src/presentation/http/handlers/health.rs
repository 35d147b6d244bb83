use crate::presentation::http::state::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    storage: &'static str,
    version: &'static str,
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let storage = match state.comments.check_storage().await {
        Ok(()) => "up",
        Err(e) => {
            tracing::error!("Health check failed: storage unreachable: {}", e);
            "down"
        }
    };

    let (code, status) = if storage == "up" {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        code,
        Json(HealthResponse {
            status,
            storage,
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}
