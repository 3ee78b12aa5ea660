//! Unified error system for the pro-shop API
//!
//! This module provides the error handling used by every handler:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: The `{ success, ... }` envelope every endpoint returns
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Catalogue errors (products, brands)
//! - 4xxx: Category errors
//! - 5xxx: Special offer errors
//! - 6xxx: Inventory errors
//! - 7xxx: Upload / object storage errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! // Create a simple error
//! let err = AppError::new(ErrorCode::CategoryNotFound);
//!
//! // Create an error with details
//! let err = AppError::validation("name is required")
//!     .with_detail("field", "name");
//!
//! // Convert to the failure envelope
//! let response = ApiResponse::<()>::error(&err);
//! assert!(!response.success);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
