//! Brand Model

use serde::{Deserialize, Serialize};

/// Brand entity (manufacturer, e.g. Titleist, Ping)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Brand {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub logo_url: Option<String>,
    #[serde(default)]
    pub product_count: i64,
    pub created_at: i64,
}

/// Create brand payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandCreate {
    pub name: Option<String>,
    pub logo_url: Option<String>,
}

/// Update brand payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandUpdate {
    pub name: Option<String>,
    pub logo_url: Option<String>,
}
