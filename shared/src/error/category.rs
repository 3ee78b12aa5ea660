//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 2xxx: Permission errors
/// - 3xxx: Catalogue errors
/// - 4xxx: Category errors
/// - 5xxx: Special offer errors
/// - 6xxx: Inventory errors
/// - 7xxx: Upload / storage errors
/// - 8xxx and up: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// Catalogue errors (3xxx)
    Catalog,
    /// Category errors (4xxx)
    Category,
    /// Special offer errors (5xxx)
    Offer,
    /// Inventory errors (6xxx)
    Inventory,
    /// Upload and object storage errors (7xxx)
    Storage,
    /// System errors (8xxx and up)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Catalog,
            4000..5000 => Self::Category,
            5000..6000 => Self::Offer,
            6000..7000 => Self::Inventory,
            7000..8000 => Self::Storage,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Catalog => "catalog",
            Self::Category => "category",
            Self::Offer => "offer",
            Self::Inventory => "inventory",
            Self::Storage => "storage",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
