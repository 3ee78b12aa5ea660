mod common;

use axum::http::{Method, StatusCode};
use base64::Engine;
use common::{MockUpstream, admin_token, app, base_config, send_json, storage_config};
use serde_json::json;

fn png_base64() -> String {
    base64::engine::general_purpose::STANDARD.encode(b"\x89PNG\r\n\x1a\nfake-image")
}

#[tokio::test]
async fn test_upload_requires_admin_session() {
    let app = app(&base_config());
    let (status, body) = send_json(
        app,
        Method::POST,
        "/api/upload-image",
        None,
        json!({ "filename": "a.png", "fileData": png_base64() }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_missing_filename_rejected_before_store() {
    let r2 = MockUpstream::start(StatusCode::OK, "").await;
    let mut config = base_config();
    config.storage = storage_config(&r2.url());
    let token = admin_token();

    let (status, body) = send_json(
        app(&config),
        Method::POST,
        "/api/upload-image",
        Some(&token),
        json!({ "brand": "ping", "fileData": png_base64() }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("filename"));

    let (status, body) = send_json(
        app(&config),
        Method::POST,
        "/api/upload-image",
        Some(&token),
        json!({ "brand": "ping", "filename": "g430.png" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("fileData"));

    assert_eq!(r2.hits(), 0);
}

#[tokio::test]
async fn test_invalid_base64_rejected_before_store() {
    let r2 = MockUpstream::start(StatusCode::OK, "").await;
    let mut config = base_config();
    config.storage = storage_config(&r2.url());

    let (status, _) = send_json(
        app(&config),
        Method::POST,
        "/api/upload-image",
        Some(&admin_token()),
        json!({ "filename": "g430.png", "fileData": "%%%not-base64%%%" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(r2.hits(), 0);
}

#[tokio::test]
async fn test_dot_segments_never_reach_store() {
    let r2 = MockUpstream::start(StatusCode::OK, "").await;
    let mut config = base_config();
    config.storage = storage_config(&r2.url());
    let token = admin_token();

    let (status, body) = send_json(
        app(&config),
        Method::POST,
        "/api/upload-image",
        Some(&token),
        json!({ "brand": "ping", "filename": "..", "fileData": png_base64() }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7001);
    assert_eq!(r2.hits(), 0);

    let (status, body) = send_json(
        app(&config),
        Method::POST,
        "/api/upload-image",
        Some(&token),
        json!({ "brand": "..", "filename": "g430.png", "fileData": png_base64() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["key"], "product-images/general/g430.png");

    let requests = r2.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/proshop-images/product-images/general/g430.png");
}

#[tokio::test]
async fn test_upload_puts_signed_object_and_returns_url() {
    let r2 = MockUpstream::start(StatusCode::OK, "").await;
    let mut config = base_config();
    config.storage = storage_config(&r2.url());

    let (status, body) = send_json(
        app(&config),
        Method::POST,
        "/api/upload-image",
        Some(&admin_token()),
        json!({
            "brand": "ping",
            "filename": "g430.png",
            "fileData": format!("data:image/png;base64,{}", png_base64()),
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(
        body["url"],
        "https://images.example-proshop.com/product-images/ping/g430.png"
    );
    assert_eq!(body["key"], "product-images/ping/g430.png");

    let requests = r2.requests().await;
    assert_eq!(requests.len(), 1);
    let put = &requests[0];
    assert_eq!(put.method, Method::PUT);
    assert_eq!(put.path, "/proshop-images/product-images/ping/g430.png");
    assert_eq!(put.body, b"\x89PNG\r\n\x1a\nfake-image");
    assert_eq!(put.headers["content-type"], "image/png");

    let auth = put.headers["authorization"].to_str().unwrap();
    assert!(auth.starts_with("AWS4-HMAC-SHA256 Credential=AKIDTEST/"));
    assert!(auth.contains("/auto/s3/aws4_request"));
    assert!(auth.contains(
        "SignedHeaders=content-length;content-type;host;x-amz-content-sha256;x-amz-date"
    ));
    assert_eq!(
        put.headers["x-amz-content-sha256"].to_str().unwrap(),
        proshop_server::storage::sigv4::payload_hash(b"\x89PNG\r\n\x1a\nfake-image")
    );
}

#[tokio::test]
async fn test_store_rejection_surfaces_status_and_body() {
    let r2 = MockUpstream::start(StatusCode::FORBIDDEN, "<Error><Code>AccessDenied</Code></Error>").await;
    let mut config = base_config();
    config.storage = storage_config(&r2.url());

    let (status, body) = send_json(
        app(&config),
        Method::POST,
        "/api/upload-image",
        Some(&admin_token()),
        json!({ "filename": "g430.png", "fileData": png_base64() }),
    )
    .await;

    assert!(status.is_server_error());
    assert_eq!(body["success"], false);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("403"), "{error}");
    assert!(error.contains("AccessDenied"), "{error}");
    // Not retried
    assert_eq!(r2.hits(), 1);
}

#[tokio::test]
async fn test_missing_credentials_skip_network() {
    let r2 = MockUpstream::start(StatusCode::OK, "").await;
    let mut config = base_config();
    config.storage = storage_config(&r2.url());
    config.storage.secret_access_key = None;

    let (status, body) = send_json(
        app(&config),
        Method::POST,
        "/api/upload-image",
        Some(&admin_token()),
        json!({ "filename": "g430.png", "fileData": png_base64() }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(r2.hits(), 0);
}
