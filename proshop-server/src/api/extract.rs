//! Request extractors that reject with the `{ success: false }` envelope
//!
//! axum's own `Json`/`Query` rejections render as plain text; these
//! wrappers turn them into an [`AppError`] instead.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use shared::error::{AppError, ErrorCode};

/// JSON body extractor
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::with_message(
                ErrorCode::InvalidFormat,
                format!("Invalid JSON body: {}", rejection.body_text()),
            )),
        }
    }
}

/// Query string extractor
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::with_message(
                ErrorCode::InvalidRequest,
                format!("Invalid query string: {}", rejection.body_text()),
            )),
        }
    }
}
