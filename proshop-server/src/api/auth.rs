//! Admin login

use axum::{Router, extract::State, middleware, routing::post};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use super::{ApiJson, ApiResult, ok};
use crate::auth::admin_auth::{create_token, verify_password};
use crate::auth::rate_limit::login_rate_limit;
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/admin/login", post(login))
        .route_layer(middleware::from_fn_with_state(state.clone(), login_rate_limit))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Expiry (Unix seconds)
    pub expires_at: i64,
    pub username: String,
}

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let username = shared::util::non_empty(req.username.as_deref())
        .ok_or_else(|| AppError::required("username"))?;
    let password = req
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::required("password"))?;

    // Hash check runs for unknown usernames too
    let password_ok = verify_password(password, &state.admin.password_hash);
    if username != state.admin.username || !password_ok {
        tracing::warn!(username = %username, "Admin login failed");
        return Err(AppError::invalid_credentials());
    }

    let (token, expires_at) = create_token(username, &state.admin.jwt_secret).map_err(|e| {
        tracing::error!("JWT creation failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    tracing::info!(username = %username, "Admin logged in");
    ok(LoginResponse {
        token,
        expires_at,
        username: username.to_string(),
    })
}
