use super::helpers::{
    expect_status, form_request, form_request_from, get, read_json, send, spawn_app, user_id,
};
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::Value;

const LISTING: &str = "32707340";

fn fields<'a>(user_id: &'a str, username: &'a str, text: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("listing_id", LISTING),
        ("user_id", user_id),
        ("username", username),
        ("comment_text", text),
    ]
}

fn violated_fields(body: &Value) -> Vec<&str> {
    body["violations"]
        .as_array()
        .expect("violations array")
        .iter()
        .filter_map(|v| v["field"].as_str())
        .collect()
}

#[tokio::test]
async fn posted_comment_is_listed_in_public_form() {
    let app = spawn_app();
    let submitter = user_id();

    let res = expect_status(
        send(&app, form_request(&fields(&submitter, "TestUser", "Great location!"))).await,
        StatusCode::CREATED,
    )
    .await;
    let posted: Vec<Value> = read_json(res).await;
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0]["listing_id"], LISTING);
    assert_eq!(posted[0]["username"], "TestUser");
    assert_eq!(posted[0]["comment_text"], "Great location!");
    assert!(posted[0].get("user_ip").is_none());
    assert!(posted[0].get("user_id").is_none());

    let timestamp = posted[0]["timestamp"].as_i64().expect("numeric timestamp");
    assert!((Utc::now().timestamp() - timestamp).abs() <= 5);

    let res = expect_status(
        send(&app, get(&format!("/api/v1/comments/{LISTING}"))).await,
        StatusCode::OK,
    )
    .await;
    let listed: Vec<Value> = read_json(res).await;
    assert_eq!(listed, posted);
}

#[tokio::test]
async fn unknown_listing_lists_nothing() {
    let app = spawn_app();
    for uri in ["/api/v1/comments/99999999", "/api/v1/comments/not-a-listing"] {
        let res = expect_status(send(&app, get(uri)).await, StatusCode::OK).await;
        let listed: Vec<Value> = read_json(res).await;
        assert!(listed.is_empty(), "{uri}");
    }
}

#[tokio::test]
async fn newest_comment_is_listed_first() {
    let app = spawn_app();
    let submitter = user_id();

    for text in ["first", "second"] {
        expect_status(
            send(&app, form_request(&fields(&submitter, "TestUser", text))).await,
            StatusCode::CREATED,
        )
        .await;
    }

    let res = send(&app, get(&format!("/api/v1/comments/{LISTING}"))).await;
    let listed: Vec<Value> = read_json(res).await;
    let texts: Vec<_> = listed.iter().map(|c| c["comment_text"].clone()).collect();
    assert_eq!(texts, vec!["second", "first"]);
}

#[tokio::test]
async fn markup_in_listing_reference_is_rejected_before_sanitizing() {
    let app = spawn_app();
    let submitter = user_id();
    let form = vec![
        ("listing_id", "<b>123456</b>"),
        ("user_id", submitter.as_str()),
        ("username", "TestUser"),
        ("comment_text", "hello"),
    ];

    let res = expect_status(send(&app, form_request(&form)).await, StatusCode::BAD_REQUEST).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["error"], "Invalid input data");
    assert_eq!(body["stage"], "syntax_validation");
    assert_eq!(violated_fields(&body), vec!["listing_id"]);
    assert_eq!(
        body["violations"][0]["reason"],
        "listing_id must contain digits only"
    );
}

#[tokio::test]
async fn missing_fields_are_all_reported() {
    let app = spawn_app();
    let res = expect_status(
        send(&app, form_request(&[("listing_id", LISTING)])).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(
        violated_fields(&body),
        vec!["user_id", "username", "comment_text"]
    );
}

#[tokio::test]
async fn scripts_are_stripped_and_contacts_redacted() {
    let app = spawn_app();
    let submitter = user_id();
    let text = "<script>alert('xss')</script>Call 555-123-4567 or mail me@home.com, see www.site.com.";

    let res = expect_status(
        send(&app, form_request(&fields(&submitter, "TestUser", text))).await,
        StatusCode::CREATED,
    )
    .await;
    let posted: Vec<Value> = read_json(res).await;
    assert_eq!(
        posted[0]["comment_text"],
        "Call [phone number removed] or mail [email removed], see [link removed]."
    );
}

#[tokio::test]
async fn body_emptied_by_sanitizing_fails_second_pass() {
    let app = spawn_app();
    let submitter = user_id();

    let res = expect_status(
        send(
            &app,
            form_request(&fields(&submitter, "TestUser", "<script>alert(1)</script>")),
        )
        .await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["stage"], "content_validation");
    assert_eq!(violated_fields(&body), vec!["comment_text"]);

    let res = send(&app, get(&format!("/api/v1/comments/{LISTING}"))).await;
    let listed: Vec<Value> = read_json(res).await;
    assert!(listed.is_empty());
}

#[tokio::test]
async fn control_characters_and_overlong_text_are_rejected() {
    let app = spawn_app();
    let submitter = user_id();
    let overlong = "a".repeat(301);

    for text in ["bell\u{7}", overlong.as_str()] {
        let res = expect_status(
            send(&app, form_request(&fields(&submitter, "TestUser", text))).await,
            StatusCode::BAD_REQUEST,
        )
        .await;
        let body: Value = read_json(res).await;
        assert_eq!(violated_fields(&body), vec!["comment_text"]);
    }
}

#[tokio::test]
async fn submitter_identifier_from_the_future_is_rejected() {
    let app = spawn_app();
    let ahead = (Utc::now() + Duration::hours(11)).timestamp_millis() as u64;
    let future_id = uuid::Builder::from_unix_timestamp_millis(ahead, &[7; 10])
        .into_uuid()
        .to_string();

    let res = expect_status(
        send(&app, form_request(&fields(&future_id, "TestUser", "hello"))).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(violated_fields(&body), vec!["user_id"]);
}

#[tokio::test]
async fn random_v4_submitter_identifier_is_rejected() {
    let app = spawn_app();
    let v4 = uuid::Uuid::new_v4().to_string();

    let res = expect_status(
        send(&app, form_request(&fields(&v4, "TestUser", "hello"))).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(violated_fields(&body), vec!["user_id"]);
}

#[tokio::test]
async fn unparseable_client_address_is_rejected() {
    let app = spawn_app();
    let submitter = user_id();

    let res = expect_status(
        send(
            &app,
            form_request_from(&fields(&submitter, "TestUser", "hello"), "not-an-ip"),
        )
        .await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(violated_fields(&body), vec!["user_ip"]);
}

#[tokio::test]
async fn non_form_body_is_a_bad_request() {
    let app = spawn_app();
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/api/v1/comments")
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(r#"{"listing_id":"1"}"#))
        .expect("failed to build request");

    let res = expect_status(send(&app, req).await, StatusCode::BAD_REQUEST).await;
    let body: Value = read_json(res).await;
    assert!(body["error"].is_string());
}
