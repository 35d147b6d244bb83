use super::helpers::{
    UnreachableRepository, expect_status, form_request, get, read_json, send, spawn_app,
    spawn_app_with,
};
use axum::http::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
async fn health_reports_reachable_storage() {
    let app = spawn_app();
    let res = expect_status(send(&app, get("/health")).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "up");
}

#[tokio::test]
async fn health_reports_unreachable_storage() {
    let app = spawn_app_with(Arc::new(UnreachableRepository));
    let res = expect_status(
        send(&app, get("/health")).await,
        StatusCode::SERVICE_UNAVAILABLE,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["storage"], "down");
}

#[tokio::test]
async fn storage_failure_is_an_opaque_server_error() {
    let app = spawn_app_with(Arc::new(UnreachableRepository));
    let user_id = Uuid::now_v7().to_string();
    let form = [
        ("listing_id", "32707340"),
        ("user_id", user_id.as_str()),
        ("username", "TestUser"),
        ("comment_text", "hello"),
    ];
    let res = expect_status(
        send(&app, form_request(&form)).await,
        StatusCode::INTERNAL_SERVER_ERROR,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["error"], "Database operation failed");
}

#[tokio::test]
async fn minted_user_id_can_post_a_comment() {
    let app = spawn_app();
    let res = expect_status(send(&app, get("/api/v1/user/user_id")).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    let minted = body["user_id"].as_str().expect("user_id string").to_string();
    assert_eq!(
        Uuid::parse_str(&minted).expect("valid uuid").get_version_num(),
        7
    );

    let form = [
        ("listing_id", "32707340"),
        ("user_id", minted.as_str()),
        ("username", "NewNeighbor"),
        ("comment_text", "Hello there"),
    ];
    expect_status(send(&app, form_request(&form)).await, StatusCode::CREATED).await;
}

#[tokio::test]
async fn every_response_carries_a_request_id() {
    let app = spawn_app();
    let res = send(&app, get("/api/v1/comments/1")).await;
    let request_id = res
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .expect("x-request-id header");
    assert!(Uuid::parse_str(request_id).is_ok());
}
