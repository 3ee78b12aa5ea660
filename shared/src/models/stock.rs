//! Inventory / stock history Model

use serde::{Deserialize, Serialize};

/// One stock movement for a product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StockEntry {
    pub id: i64,
    pub product_id: i64,
    /// Signed quantity change (+ received, - sold/damaged)
    pub change: i32,
    /// Stock level after the change was applied
    pub stock_after: i32,
    pub reason: Option<String>,
    pub created_at: i64,
}

/// Stock adjustment payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockAdjust {
    pub delta: Option<i32>,
    pub reason: Option<String>,
}
