//! Stock levels and stock history

use shared::error::{AppError, ErrorCode};
use shared::models::product::Product;
use shared::models::stock::StockEntry;
use sqlx::PgPool;

use super::products::PRODUCT_SELECT;
use crate::error::ServiceResult;

pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 5;
const HISTORY_LIMIT: i64 = 200;

/// Add `delta` to the product's stock and record the movement.
///
/// The row is locked for the duration, so concurrent adjustments serialize
/// and stock never drops below zero.
pub async fn adjust(
    pool: &PgPool,
    product_id: i64,
    delta: i32,
    reason: Option<&str>,
    now: i64,
) -> ServiceResult<StockEntry> {
    let mut tx = pool.begin().await?;

    let current: Option<(i32,)> = sqlx::query_as("SELECT stock FROM products WHERE id = $1 FOR UPDATE")
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some((stock,)) = current else {
        return Err(AppError::new(ErrorCode::ProductNotFound).into());
    };

    let stock_after = i64::from(stock) + i64::from(delta);
    if stock_after < 0 {
        return Err(AppError::new(ErrorCode::InsufficientStock)
            .with_detail("stock", stock)
            .with_detail("delta", delta)
            .into());
    }
    let stock_after = i32::try_from(stock_after).map_err(|_| {
        AppError::with_message(ErrorCode::ValueOutOfRange, "Stock level is out of range")
    })?;

    sqlx::query("UPDATE products SET stock = $2, updated_at = $3 WHERE id = $1")
        .bind(product_id)
        .bind(stock_after)
        .bind(now)
        .execute(&mut *tx)
        .await?;

    let entry: StockEntry = sqlx::query_as(
        r#"
        INSERT INTO stock_history (product_id, change, stock_after, reason, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, product_id, change, stock_after, reason, created_at
        "#,
    )
    .bind(product_id)
    .bind(delta)
    .bind(stock_after)
    .bind(reason)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(entry)
}

/// Movements for one product, newest first
pub async fn history(pool: &PgPool, product_id: i64) -> ServiceResult<Vec<StockEntry>> {
    let (found,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
        .bind(product_id)
        .fetch_one(pool)
        .await?;
    if !found {
        return Err(AppError::new(ErrorCode::ProductNotFound).into());
    }

    let rows: Vec<StockEntry> = sqlx::query_as(
        r#"
        SELECT id, product_id, change, stock_after, reason, created_at
        FROM stock_history
        WHERE product_id = $1
        ORDER BY created_at DESC, id DESC
        LIMIT $2
        "#,
    )
    .bind(product_id)
    .bind(HISTORY_LIMIT)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Active products at or below the threshold, emptiest first
pub async fn low_stock(pool: &PgPool, threshold: i32) -> ServiceResult<Vec<Product>> {
    let sql = format!(
        "{PRODUCT_SELECT} WHERE p.is_active AND p.stock <= $1 ORDER BY p.stock, p.name"
    );
    let rows: Vec<Product> = sqlx::query_as(&sql).bind(threshold).fetch_all(pool).await?;
    Ok(rows)
}
