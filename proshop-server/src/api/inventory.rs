//! Stock adjustments and history (admin)

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::product::Product;
use shared::models::stock::{StockAdjust, StockEntry};
use shared::util::{non_empty, now_millis};

use super::{ApiJson, ApiQuery, ApiResult, ok};
use crate::db::inventory::{self, DEFAULT_LOW_STOCK_THRESHOLD};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/inventory/low-stock", get(low_stock))
        .route("/api/inventory/{product_id}/adjust", post(adjust))
        .route("/api/inventory/{product_id}/history", get(history))
}

#[derive(Serialize)]
pub struct AdjustResponse {
    pub entry: StockEntry,
    pub stock: i32,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub product_id: i64,
    pub history: Vec<StockEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LowStockQuery {
    pub threshold: Option<i32>,
}

#[derive(Serialize)]
pub struct LowStockResponse {
    pub threshold: i32,
    pub products: Vec<Product>,
}

/// POST /api/inventory/{product_id}/adjust
pub async fn adjust(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    ApiJson(req): ApiJson<StockAdjust>,
) -> ApiResult<AdjustResponse> {
    let delta = req.delta.ok_or_else(|| AppError::required("delta"))?;
    if delta == 0 {
        return Err(AppError::validation("delta must not be zero").with_detail("field", "delta"));
    }

    let reason = non_empty(req.reason.as_deref());
    let entry = inventory::adjust(&state.pool, product_id, delta, reason, now_millis()).await?;
    tracing::info!(
        product_id,
        delta,
        stock = entry.stock_after,
        reason = reason.unwrap_or_default(),
        "Stock adjusted"
    );

    ok(AdjustResponse {
        stock: entry.stock_after,
        entry,
    })
}

/// GET /api/inventory/{product_id}/history
pub async fn history(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> ApiResult<HistoryResponse> {
    let history = inventory::history(&state.pool, product_id).await?;
    ok(HistoryResponse {
        product_id,
        history,
    })
}

/// GET /api/inventory/low-stock?threshold=
pub async fn low_stock(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LowStockQuery>,
) -> ApiResult<LowStockResponse> {
    let threshold = query.threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
    if threshold < 0 {
        return Err(AppError::new(ErrorCode::ValueOutOfRange).with_detail("threshold", threshold));
    }
    let products = inventory::low_stock(&state.pool, threshold).await?;
    ok(LowStockResponse {
        threshold,
        products,
    })
}
