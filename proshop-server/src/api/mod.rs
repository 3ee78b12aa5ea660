//! HTTP API
//!
//! Every endpoint answers with the `{ success, ... }` envelope. Read routes
//! are public; anything that changes the catalogue sits behind the admin
//! session middleware.

pub mod assistant;
pub mod auth;
pub mod brands;
pub mod categories;
pub mod extract;
pub mod health;
pub mod import;
pub mod inventory;
pub mod offers;
pub mod products;
pub mod search;
pub mod upload;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use http::HeaderName;
use shared::error::{AppError, ErrorCode};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::auth::admin_auth_middleware;
use crate::state::AppState;

pub use extract::{ApiJson, ApiQuery};

/// Handler result: success payload flattened into the envelope
pub type ApiResult<T> = Result<shared::error::ApiResponse<T>, AppError>;

/// Base64 image bodies: 10 MB of file is ~13.4 MB of base64 plus JSON
const BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Wrap a payload in the success envelope
pub(crate) fn ok<T>(payload: T) -> ApiResult<T> {
    Ok(shared::error::ApiResponse::success(payload))
}

/// Admin-only routes: guarded by the session middleware
fn admin_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(upload::router())
        .merge(categories::admin_router())
        .merge(brands::admin_router())
        .merge(products::admin_router())
        .merge(import::router())
        .merge(offers::admin_router())
        .merge(inventory::router())
        .merge(assistant::admin_router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ))
}

/// Routes open to the storefront
fn public_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router(state))
        .merge(categories::router())
        .merge(brands::router())
        .merge(products::router())
        .merge(offers::router())
        .merge(search::router())
        .merge(assistant::router())
}

/// Build the complete application with middleware and state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(public_router(&state))
        .merge(admin_router(&state))
        .fallback(|| async { AppError::new(ErrorCode::NotFound) })
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            MakeRequestUuid,
        ))
        .with_state(state)
}
