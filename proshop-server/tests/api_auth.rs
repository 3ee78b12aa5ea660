mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{ADMIN_PASSWORD, ADMIN_USERNAME, JWT_SECRET, app, base_config, send_json};
use proshop_server::auth::admin_auth::verify_token;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_login_issues_verifiable_token() {
    let (status, body) = send_json(
        app(&base_config()),
        Method::POST,
        "/api/admin/login",
        None,
        json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["username"], ADMIN_USERNAME);

    let claims = verify_token(body["token"].as_str().unwrap(), JWT_SECRET).unwrap();
    assert_eq!(claims.sub, ADMIN_USERNAME);
    assert_eq!(claims.exp as i64, body["expires_at"].as_i64().unwrap());
}

#[tokio::test]
async fn test_login_rejects_wrong_password_and_unknown_user() {
    let app = app(&base_config());
    for (username, password) in [(ADMIN_USERNAME, "bogey"), ("caddie", ADMIN_PASSWORD)] {
        let (status, body) = send_json(
            app.clone(),
            Method::POST,
            "/api/admin/login",
            None,
            json!({ "username": username, "password": password }),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert!(body.get("token").is_none());
    }
}

#[tokio::test]
async fn test_login_is_rate_limited() {
    let app = app(&base_config());
    let mut statuses = Vec::new();
    for _ in 0..6 {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/admin/login")
            .header("content-type", "application/json")
            .header("x-forwarded-for", "203.0.113.9")
            .body(Body::from(
                json!({ "username": ADMIN_USERNAME, "password": "wrong" }).to_string(),
            ))
            .unwrap();
        statuses.push(app.clone().oneshot(request).await.unwrap().status());
    }

    assert!(statuses[..5].iter().all(|s| *s == StatusCode::UNAUTHORIZED));
    assert_eq!(statuses[5], StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_admin_route_rejects_forged_token() {
    let forged = proshop_server::auth::admin_auth::create_token(ADMIN_USERNAME, "other-secret")
        .unwrap()
        .0;
    let (status, body) = send_json(
        app(&base_config()),
        Method::DELETE,
        "/api/categories/1",
        Some(&forged),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_health_and_unknown_route() {
    let (status, body) = send_json(app(&base_config()), Method::GET, "/health", None, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "ok");

    let (status, body) =
        send_json(app(&base_config()), Method::GET, "/api/nowhere", None, json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_cors_preflight_allowed() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/offers")
        .header("origin", "https://shop.example.com")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();
    let response = app(&base_config()).oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_malformed_json_is_enveloped() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app(&base_config()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
}
