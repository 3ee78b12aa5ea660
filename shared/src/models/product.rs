//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product entity
///
/// One row per sellable variant (size/colour). Variants of the same base
/// item share a `style_number`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub sku: String,
    pub style_number: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub brand_id: Option<i64>,
    pub brand_name: Option<String>,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    /// List price before any special offer
    #[serde(with = "rust_decimal::serde::float")]
    pub base_price: Decimal,
    /// Price shown to customers; rewritten when a special offer is applied
    #[serde(with = "rust_decimal::serde::float")]
    pub final_price: Decimal,
    pub size: Option<String>,
    pub colour: Option<String>,
    pub image_url: Option<String>,
    pub stock: i32,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Product {
    /// Whether a special offer currently lowers the displayed price
    pub fn on_sale(&self) -> bool {
        self.final_price < self.base_price
    }
}

/// Update product payload
///
/// When `base_price` changes without an explicit `final_price`, the final
/// price is reset to the new base price.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub sku: Option<String>,
    pub style_number: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub brand_id: Option<i64>,
    pub category_id: Option<i64>,
    pub base_price: Option<Decimal>,
    pub final_price: Option<Decimal>,
    pub size: Option<String>,
    pub colour: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

/// One row of a bulk product import
///
/// Brands and categories are referenced by name and created on demand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportRow {
    pub sku: Option<String>,
    pub style_number: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub base_price: Option<Decimal>,
    pub size: Option<String>,
    pub colour: Option<String>,
    pub image_url: Option<String>,
    pub stock: Option<i32>,
}
