//! Bulk product import
//!
//! Rows are upserted one at a time by SKU. A bad row is reported back with
//! its index and does not stop the rest of the batch.

use axum::{Router, extract::State, routing::post};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::AppError;
use shared::models::product::ImportRow;
use shared::util::{non_empty, now_millis};

use super::{ApiJson, ApiResult, ok};
use crate::db::products::{self, ImportProduct};
use crate::error::ServiceError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/products/import", post(import_products))
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub products: Option<Vec<ImportRow>>,
}

#[derive(Debug, Serialize)]
pub struct FailedRow {
    /// Zero-based position in the submitted list
    pub row: usize,
    pub sku: Option<String>,
    pub error: String,
}

#[derive(Debug, Default, Serialize)]
pub struct ImportSummary {
    pub inserted: usize,
    pub updated: usize,
    pub failed: Vec<FailedRow>,
}

fn owned(value: Option<&str>) -> Option<String> {
    non_empty(value).map(str::to_string)
}

/// Check one row and normalise its strings
pub fn validate_row(row: &ImportRow) -> Result<ImportProduct, String> {
    let sku = non_empty(row.sku.as_deref()).ok_or("sku is required")?;
    let name = non_empty(row.name.as_deref()).ok_or("name is required")?;
    let base_price = row.base_price.ok_or("base_price is required")?;
    if base_price < Decimal::ZERO {
        return Err("base_price must not be negative".to_string());
    }
    if row.stock.is_some_and(|s| s < 0) {
        return Err("stock must not be negative".to_string());
    }

    Ok(ImportProduct {
        sku: sku.to_string(),
        style_number: owned(row.style_number.as_deref()),
        name: name.to_string(),
        description: owned(row.description.as_deref()),
        brand: owned(row.brand.as_deref()),
        category: owned(row.category.as_deref()),
        base_price,
        size: owned(row.size.as_deref()),
        colour: owned(row.colour.as_deref()),
        image_url: owned(row.image_url.as_deref()),
        stock: row.stock,
    })
}

/// POST /api/products/import
pub async fn import_products(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ImportRequest>,
) -> ApiResult<ImportSummary> {
    let rows = req.products.ok_or_else(|| AppError::required("products"))?;
    let now = now_millis();
    let mut summary = ImportSummary::default();

    for (index, row) in rows.iter().enumerate() {
        let product = match validate_row(row) {
            Ok(product) => product,
            Err(error) => {
                summary.failed.push(FailedRow {
                    row: index,
                    sku: owned(row.sku.as_deref()),
                    error,
                });
                continue;
            }
        };

        match products::upsert_import(&state.pool, &product, now).await {
            Ok(true) => summary.inserted += 1,
            Ok(false) => summary.updated += 1,
            Err(e) => {
                let error = match e {
                    ServiceError::App(app) => app.message,
                    ServiceError::Db(db) => {
                        tracing::warn!(row = index, sku = %product.sku, error = %db, "Import row failed");
                        db.to_string()
                    }
                };
                summary.failed.push(FailedRow {
                    row: index,
                    sku: Some(product.sku),
                    error,
                });
            }
        }
    }

    tracing::info!(
        inserted = summary.inserted,
        updated = summary.updated,
        failed = summary.failed.len(),
        "Product import finished"
    );
    ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn row(sku: Option<&str>, name: Option<&str>, price: Option<Decimal>) -> ImportRow {
        ImportRow {
            sku: sku.map(Into::into),
            name: name.map(Into::into),
            base_price: price,
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_row_trims_and_drops_blanks() {
        let mut input = row(Some(" TM-STEALTH-2 "), Some("Stealth 2 Driver"), Some(dec!(429.00)));
        input.brand = Some("  TaylorMade ".into());
        input.category = Some("   ".into());

        let product = validate_row(&input).unwrap();
        assert_eq!(product.sku, "TM-STEALTH-2");
        assert_eq!(product.brand.as_deref(), Some("TaylorMade"));
        assert!(product.category.is_none());
        assert_eq!(product.base_price, dec!(429.00));
    }

    #[test]
    fn test_validate_row_required_fields() {
        assert_eq!(
            validate_row(&row(None, Some("Glove"), Some(dec!(19.99)))).unwrap_err(),
            "sku is required"
        );
        assert_eq!(
            validate_row(&row(Some("FJ-GLV-M"), Some(" "), Some(dec!(19.99)))).unwrap_err(),
            "name is required"
        );
        assert_eq!(
            validate_row(&row(Some("FJ-GLV-M"), Some("Glove"), None)).unwrap_err(),
            "base_price is required"
        );
    }

    #[test]
    fn test_validate_row_negative_values() {
        assert!(validate_row(&row(Some("A"), Some("B"), Some(dec!(-0.01)))).is_err());

        let mut input = row(Some("A"), Some("B"), Some(dec!(0)));
        input.stock = Some(-2);
        assert_eq!(validate_row(&input).unwrap_err(), "stock must not be negative");
    }
}
