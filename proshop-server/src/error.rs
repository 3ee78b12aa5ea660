//! Service-layer error type
//!
//! `ServiceError` bridges DB-layer errors (`sqlx::Error`, `BoxError`) and
//! the API-layer `AppError`, so db functions can use `?` and still return
//! business errors such as a category cycle.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::storage::StorageError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// - `Db`: database/infrastructure errors (logged, mapped to InternalError)
/// - `App`: business-rule errors (passed through to the client)
#[derive(Debug)]
pub enum ServiceError {
    Db(BoxError),
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::MissingCredentials(name) => {
                tracing::warn!(missing = name, "Upload attempted without storage credentials");
                AppError::new(ErrorCode::StorageNotConfigured).with_detail("missing", name)
            }
            StorageError::Upstream { status, body } => AppError::with_message(
                ErrorCode::StorageUploadFailed,
                format!("Upload failed ({status}): {body}"),
            )
            .with_detail("upstream_status", status)
            .with_detail("upstream_body", body),
            StorageError::Transport(msg) => {
                tracing::error!(error = %msg, "Object store unreachable");
                AppError::with_message(ErrorCode::NetworkError, msg)
            }
        }
    }
}

/// Log and hide an infrastructure error
pub fn internal(e: impl std::fmt::Display) -> AppError {
    tracing::error!("Query error: {e}");
    AppError::new(ErrorCode::InternalError)
}

/// True when a sqlx error is a unique-constraint violation
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_passes_through() {
        let err: AppError = ServiceError::App(AppError::new(ErrorCode::CategoryCycle)).into();
        assert_eq!(err.code, ErrorCode::CategoryCycle);
    }

    #[test]
    fn test_db_error_is_hidden() {
        let err: AppError = ServiceError::Db("connection refused".into()).into();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.message, "Internal server error");
    }

    #[test]
    fn test_upstream_storage_error_keeps_status_and_body() {
        let err: AppError = StorageError::Upstream {
            status: 403,
            body: "<Error><Code>SignatureDoesNotMatch</Code></Error>".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::StorageUploadFailed);
        assert!(err.message.contains("403"));
        assert!(err.message.contains("SignatureDoesNotMatch"));
        let details = err.details.unwrap();
        assert_eq!(details["upstream_status"], 403);
    }

    #[test]
    fn test_missing_credentials_maps_to_not_configured() {
        let err: AppError = StorageError::MissingCredentials("R2_BUCKET_NAME").into();
        assert_eq!(err.code, ErrorCode::StorageNotConfigured);
        assert!(err.http_status().is_server_error());
    }
}
