//! Product database operations

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::product::{Product, ProductUpdate};
use sqlx::PgPool;

use crate::error::{ServiceError, ServiceResult, is_unique_violation};

/// Product columns plus joined brand/category names
pub(crate) const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.sku, p.style_number, p.name, p.description,
           p.brand_id, b.name AS brand_name,
           p.category_id, c.name AS category_name,
           p.base_price, p.final_price, p.size, p.colour, p.image_url,
           p.stock, p.is_active, p.created_at, p.updated_at
    FROM products p
    LEFT JOIN brands b ON b.id = p.brand_id
    LEFT JOIN categories c ON c.id = p.category_id
"#;

/// Listing filters (all optional)
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category_id: Option<i64>,
    pub brand_id: Option<i64>,
    pub style_number: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

/// Validated import row
#[derive(Debug, Clone)]
pub struct ImportProduct {
    pub sku: String,
    pub style_number: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub base_price: Decimal,
    pub size: Option<String>,
    pub colour: Option<String>,
    pub image_url: Option<String>,
    pub stock: Option<i32>,
}

/// Map constraint violations on `products` to client errors
fn write_error(e: sqlx::Error) -> ServiceError {
    if is_unique_violation(&e) {
        return AppError::new(ErrorCode::SkuExists).into();
    }
    if let sqlx::Error::Database(db) = &e
        && db.is_foreign_key_violation()
    {
        let code = match db.constraint() {
            Some(c) if c.contains("brand") => ErrorCode::BrandNotFound,
            _ => ErrorCode::CategoryNotFound,
        };
        return AppError::new(code).into();
    }
    e.into()
}

pub async fn list(pool: &PgPool, filter: &ProductFilter) -> ServiceResult<(Vec<Product>, i64)> {
    const WHERE: &str = r#"
        WHERE ($1::BIGINT IS NULL OR p.category_id = $1)
          AND ($2::BIGINT IS NULL OR p.brand_id = $2)
          AND ($3::TEXT IS NULL OR p.style_number = $3)
    "#;

    let sql = format!("{PRODUCT_SELECT} {WHERE} ORDER BY p.name, p.id LIMIT $4 OFFSET $5");
    let rows: Vec<Product> = sqlx::query_as(&sql)
        .bind(filter.category_id)
        .bind(filter.brand_id)
        .bind(filter.style_number.as_deref())
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(pool)
        .await?;

    let count_sql = format!("SELECT COUNT(*) FROM products p {WHERE}");
    let (total,): (i64,) = sqlx::query_as(&count_sql)
        .bind(filter.category_id)
        .bind(filter.brand_id)
        .bind(filter.style_number.as_deref())
        .fetch_one(pool)
        .await?;

    Ok((rows, total))
}

pub async fn find(pool: &PgPool, id: i64) -> ServiceResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE p.id = $1");
    let row: Option<Product> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row)
}

async fn require(pool: &PgPool, id: i64) -> ServiceResult<Product> {
    find(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound).into())
}

/// All variants sharing the product's style number (the product included)
pub async fn variants(pool: &PgPool, id: i64) -> ServiceResult<Vec<Product>> {
    let product = require(pool, id).await?;
    let Some(style) = product.style_number.clone() else {
        return Ok(vec![product]);
    };

    let sql = format!("{PRODUCT_SELECT} WHERE p.style_number = $1 ORDER BY p.size, p.colour, p.id");
    let rows: Vec<Product> = sqlx::query_as(&sql).bind(style).fetch_all(pool).await?;
    Ok(rows)
}

/// Partial update. A new `base_price` without an explicit `final_price`
/// resets the final price to the new base.
pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &ProductUpdate,
    now: i64,
) -> ServiceResult<Product> {
    let result = sqlx::query(
        r#"
        UPDATE products SET
            sku = COALESCE($2, sku),
            style_number = COALESCE($3, style_number),
            name = COALESCE($4, name),
            description = COALESCE($5, description),
            brand_id = COALESCE($6, brand_id),
            category_id = COALESCE($7, category_id),
            base_price = COALESCE($8, base_price),
            final_price = COALESCE($9, $8, final_price),
            size = COALESCE($10, size),
            colour = COALESCE($11, colour),
            image_url = COALESCE($12, image_url),
            is_active = COALESCE($13, is_active),
            updated_at = $14
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(shared::util::non_empty(data.sku.as_deref()))
    .bind(data.style_number.as_deref())
    .bind(shared::util::non_empty(data.name.as_deref()))
    .bind(data.description.as_deref())
    .bind(data.brand_id)
    .bind(data.category_id)
    .bind(data.base_price)
    .bind(data.final_price)
    .bind(data.size.as_deref())
    .bind(data.colour.as_deref())
    .bind(data.image_url.as_deref())
    .bind(data.is_active)
    .bind(now)
    .execute(pool)
    .await
    .map_err(write_error)?;

    if result.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::ProductNotFound).into());
    }
    require(pool, id).await
}

pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::ProductNotFound).into());
    }
    Ok(())
}

/// Insert or update one import row by SKU, creating its brand and category
/// by name. Returns `true` when a new product was inserted.
pub async fn upsert_import(pool: &PgPool, row: &ImportProduct, now: i64) -> ServiceResult<bool> {
    let mut tx = pool.begin().await?;

    let brand_id = match row.brand.as_deref() {
        Some(name) => Some(super::brands::find_or_create_by_name(&mut *tx, name, now).await?),
        None => None,
    };
    let category_id = match row.category.as_deref() {
        Some(name) => Some(super::categories::find_or_create_by_name(&mut *tx, name, now).await?),
        None => None,
    };

    // xmax = 0 only for freshly inserted tuples
    let (inserted,): (bool,) = sqlx::query_as(
        r#"
        INSERT INTO products (
            sku, style_number, name, description, brand_id, category_id,
            base_price, final_price, size, colour, image_url, stock,
            is_active, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7, $8, $9, $10, COALESCE($11, 0), TRUE, $12, $12)
        ON CONFLICT (sku) DO UPDATE SET
            style_number = COALESCE(EXCLUDED.style_number, products.style_number),
            name = EXCLUDED.name,
            description = COALESCE(EXCLUDED.description, products.description),
            brand_id = COALESCE(EXCLUDED.brand_id, products.brand_id),
            category_id = COALESCE(EXCLUDED.category_id, products.category_id),
            final_price = CASE
                WHEN products.base_price = EXCLUDED.base_price THEN products.final_price
                ELSE EXCLUDED.base_price
            END,
            base_price = EXCLUDED.base_price,
            size = COALESCE(EXCLUDED.size, products.size),
            colour = COALESCE(EXCLUDED.colour, products.colour),
            image_url = COALESCE(EXCLUDED.image_url, products.image_url),
            stock = COALESCE($11, products.stock),
            updated_at = EXCLUDED.updated_at
        RETURNING (xmax = 0)
        "#,
    )
    .bind(&row.sku)
    .bind(row.style_number.as_deref())
    .bind(&row.name)
    .bind(row.description.as_deref())
    .bind(brand_id)
    .bind(category_id)
    .bind(row.base_price)
    .bind(row.size.as_deref())
    .bind(row.colour.as_deref())
    .bind(row.image_url.as_deref())
    .bind(row.stock)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(inserted)
}
