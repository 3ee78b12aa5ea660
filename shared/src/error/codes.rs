//! Unified error codes for the pro-shop API
//!
//! Error codes are shared by the storefront, the admin dashboard and the
//! server, and are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Catalogue errors
//! - 4xxx: Category errors
//! - 5xxx: Special offer errors
//! - 6xxx: Inventory errors
//! - 7xxx: Upload / storage errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the browser side can
/// switch on them without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// Caller is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Too many attempts from the same client
    TooManyRequests = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,

    // ==================== 3xxx: Catalogue ====================
    /// Product not found
    ProductNotFound = 3001,
    /// Another product already uses this SKU
    SkuExists = 3002,
    /// Product has invalid price
    ProductInvalidPrice = 3003,
    /// Brand not found
    BrandNotFound = 3101,
    /// Brand name already exists
    BrandNameExists = 3102,

    // ==================== 4xxx: Category ====================
    /// Category not found
    CategoryNotFound = 4001,
    /// Category name already exists under the same parent
    CategoryNameExists = 4002,
    /// Parent assignment would create a cycle
    CategoryCycle = 4003,

    // ==================== 5xxx: Special offer ====================
    /// Special offer not found
    OfferNotFound = 5001,
    /// Discount outside (0, 100]
    InvalidDiscount = 5002,
    /// Offer target type or value invalid
    InvalidOfferTarget = 5003,

    // ==================== 6xxx: Inventory ====================
    /// Stock adjustment would leave negative stock
    InsufficientStock = 6001,

    // ==================== 7xxx: Upload / storage ====================
    /// No filename provided
    NoFilename = 7001,
    /// No file data provided
    NoFileProvided = 7002,
    /// Empty file provided
    EmptyFile = 7003,
    /// File too large
    FileTooLarge = 7004,
    /// File data is not valid base64
    InvalidFileEncoding = 7005,
    /// Object store credentials missing
    StorageNotConfigured = 7101,
    /// Object store rejected the upload
    StorageUploadFailed = 7102,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9101,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Session has expired",
            ErrorCode::TokenInvalid => "Invalid session token",
            ErrorCode::TooManyRequests => "Too many requests, try again later",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",

            // Catalogue
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::SkuExists => "A product with this SKU already exists",
            ErrorCode::ProductInvalidPrice => "Product price must not be negative",
            ErrorCode::BrandNotFound => "Brand not found",
            ErrorCode::BrandNameExists => "Brand name already exists",

            // Category
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryNameExists => "Category name already exists",
            ErrorCode::CategoryCycle => "Category cannot be nested under itself",

            // Offer
            ErrorCode::OfferNotFound => "Special offer not found",
            ErrorCode::InvalidDiscount => "Discount must be greater than 0 and at most 100",
            ErrorCode::InvalidOfferTarget => "Offer target is invalid",

            // Inventory
            ErrorCode::InsufficientStock => "Not enough stock for this adjustment",

            // Storage
            ErrorCode::NoFilename => "filename is required",
            ErrorCode::NoFileProvided => "fileData is required",
            ErrorCode::EmptyFile => "File is empty",
            ErrorCode::FileTooLarge => "File is too large",
            ErrorCode::InvalidFileEncoding => "fileData is not valid base64",
            ErrorCode::StorageNotConfigured => "Image storage is not configured",
            ErrorCode::StorageUploadFailed => "Image upload failed",

            // Assistant

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::TooManyRequests),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),

            // Catalogue
            3001 => Ok(ErrorCode::ProductNotFound),
            3002 => Ok(ErrorCode::SkuExists),
            3003 => Ok(ErrorCode::ProductInvalidPrice),
            3101 => Ok(ErrorCode::BrandNotFound),
            3102 => Ok(ErrorCode::BrandNameExists),

            // Category
            4001 => Ok(ErrorCode::CategoryNotFound),
            4002 => Ok(ErrorCode::CategoryNameExists),
            4003 => Ok(ErrorCode::CategoryCycle),

            // Offer
            5001 => Ok(ErrorCode::OfferNotFound),
            5002 => Ok(ErrorCode::InvalidDiscount),
            5003 => Ok(ErrorCode::InvalidOfferTarget),

            // Inventory
            6001 => Ok(ErrorCode::InsufficientStock),

            // Storage
            7001 => Ok(ErrorCode::NoFilename),
            7002 => Ok(ErrorCode::NoFileProvided),
            7003 => Ok(ErrorCode::EmptyFile),
            7004 => Ok(ErrorCode::FileTooLarge),
            7005 => Ok(ErrorCode::InvalidFileEncoding),
            7101 => Ok(ErrorCode::StorageNotConfigured),
            7102 => Ok(ErrorCode::StorageUploadFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9101 => Ok(ErrorCode::NetworkError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
