//! Product API
//!
//! Products are created through the bulk import; this module covers
//! browsing plus admin edits.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, put},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::product::{Product, ProductUpdate};
use shared::response::{Page, PageQuery};
use shared::util::{non_empty, now_millis};

use super::{ApiJson, ApiQuery, ApiResult, ok};
use crate::db::products::{self, ProductFilter};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list))
        .route("/api/products/{id}", get(get_product))
        .route("/api/products/{id}/variants", get(variants))
}

pub fn admin_router() -> Router<AppState> {
    Router::new().route("/api/products/{id}", put(update).delete(delete))
}

/// `?limit&offset&category_id&brand_id&style_number`
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub category_id: Option<i64>,
    pub brand_id: Option<i64>,
    pub style_number: Option<String>,
}

#[derive(Serialize)]
pub struct ProductPayload {
    pub product: Product,
}

#[derive(Serialize)]
pub struct VariantList {
    pub variants: Vec<Product>,
}

#[derive(Serialize)]
pub struct ProductDeleted {
    pub id: i64,
}

/// GET /api/products
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProductListQuery>,
) -> ApiResult<Page<Product>> {
    let page = PageQuery {
        limit: query.limit,
        offset: query.offset,
    };
    let filter = ProductFilter {
        category_id: query.category_id,
        brand_id: query.brand_id,
        style_number: non_empty(query.style_number.as_deref()).map(str::to_string),
        limit: page.limit(),
        offset: page.offset(),
    };
    let (items, total) = products::list(&state.pool, &filter).await?;
    ok(Page::new(items, total, page))
}

/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ProductPayload> {
    let product = products::find(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    ok(ProductPayload { product })
}

/// GET /api/products/{id}/variants
pub async fn variants(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<VariantList> {
    let variants = products::variants(&state.pool, id).await?;
    ok(VariantList { variants })
}

fn check_price(field: &str, price: Option<Decimal>) -> Result<(), AppError> {
    match price {
        Some(p) if p < Decimal::ZERO => {
            Err(AppError::new(ErrorCode::ProductInvalidPrice).with_detail("field", field))
        }
        _ => Ok(()),
    }
}

/// Reject negative prices and blank required strings
pub fn validate_update(req: &ProductUpdate) -> Result<(), AppError> {
    check_price("base_price", req.base_price)?;
    check_price("final_price", req.final_price)?;
    if req.sku.as_deref().is_some_and(|s| s.trim().is_empty()) {
        return Err(AppError::validation("sku must not be blank").with_detail("field", "sku"));
    }
    if req.name.as_deref().is_some_and(|s| s.trim().is_empty()) {
        return Err(AppError::validation("name must not be blank").with_detail("field", "name"));
    }
    Ok(())
}

/// PUT /api/products/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(req): ApiJson<ProductUpdate>,
) -> ApiResult<ProductPayload> {
    validate_update(&req)?;
    let product = products::update(&state.pool, id, &req, now_millis()).await?;
    tracing::info!(product_id = id, sku = %product.sku, "Product updated");
    ok(ProductPayload { product })
}

/// DELETE /api/products/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ProductDeleted> {
    products::delete(&state.pool, id).await?;
    tracing::info!(product_id = id, "Product deleted");
    ok(ProductDeleted { id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_validate_update_prices() {
        let ok_update = ProductUpdate {
            base_price: Some(dec!(89.99)),
            final_price: Some(Decimal::ZERO),
            ..Default::default()
        };
        assert!(validate_update(&ok_update).is_ok());

        let negative = ProductUpdate {
            final_price: Some(dec!(-1.00)),
            ..Default::default()
        };
        let err = validate_update(&negative).unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductInvalidPrice);
    }

    #[test]
    fn test_validate_update_blank_fields() {
        let blank = ProductUpdate {
            sku: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(
            validate_update(&blank).unwrap_err().code,
            ErrorCode::ValidationFailed
        );
        assert!(validate_update(&ProductUpdate::default()).is_ok());
    }
}
