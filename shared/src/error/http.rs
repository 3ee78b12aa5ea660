//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::ProductNotFound
            | Self::BrandNotFound
            | Self::CategoryNotFound
            | Self::OfferNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::SkuExists
            | Self::BrandNameExists
            | Self::CategoryNameExists => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied => StatusCode::FORBIDDEN,

            // 413 Payload Too Large
            Self::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            // 429 Too Many Requests
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,

            // 502 Bad Gateway (upstream rejected the request)
            Self::StorageUploadFailed => StatusCode::BAD_GATEWAY,

            // 503 Service Unavailable
            Self::NetworkError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::StorageNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
    }

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::CategoryNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ErrorCode::OfferNotFound.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(ErrorCode::SkuExists.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::BrandNameExists.http_status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_client_errors_are_4xx() {
        for code in [
            ErrorCode::NoFilename,
            ErrorCode::NoFileProvided,
            ErrorCode::EmptyFile,
            ErrorCode::InvalidFileEncoding,
            ErrorCode::InvalidDiscount,
            ErrorCode::InvalidOfferTarget,
            ErrorCode::InsufficientStock,
            ErrorCode::CategoryCycle,
            ErrorCode::RequiredField,
        ] {
            assert!(code.http_status().is_client_error(), "{code:?}");
        }
    }

    #[test]
    fn test_upstream_errors_are_5xx() {
        assert_eq!(
            ErrorCode::StorageUploadFailed.http_status(),
            StatusCode::BAD_GATEWAY
        );
        assert!(ErrorCode::StorageNotConfigured.http_status().is_server_error());
        assert!(ErrorCode::DatabaseError.http_status().is_server_error());
    }

    #[test]
    fn test_auth_status() {
        assert_eq!(
            ErrorCode::TokenInvalid.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::TooManyRequests.http_status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }
}
