//! Brand database operations

use shared::error::{AppError, ErrorCode};
use shared::models::brand::Brand;
use sqlx::PgPool;

use crate::error::{ServiceError, ServiceResult, is_unique_violation};

const BRAND_SELECT: &str = r#"
    SELECT b.id, b.name, b.slug, b.logo_url, COUNT(p.id) AS product_count, b.created_at
    FROM brands b
    LEFT JOIN products p ON p.brand_id = b.id
"#;

fn name_conflict(e: sqlx::Error, name: &str) -> ServiceError {
    if is_unique_violation(&e) {
        AppError::new(ErrorCode::BrandNameExists)
            .with_detail("name", name)
            .into()
    } else {
        e.into()
    }
}

pub async fn list(pool: &PgPool) -> ServiceResult<Vec<Brand>> {
    let sql = format!("{BRAND_SELECT} GROUP BY b.id ORDER BY b.name");
    let rows: Vec<Brand> = sqlx::query_as(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find(pool: &PgPool, id: i64) -> ServiceResult<Option<Brand>> {
    let sql = format!("{BRAND_SELECT} WHERE b.id = $1 GROUP BY b.id");
    let row: Option<Brand> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row)
}

pub async fn create(
    pool: &PgPool,
    name: &str,
    logo_url: Option<&str>,
    now: i64,
) -> ServiceResult<Brand> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO brands (name, slug, logo_url, created_at) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(name)
    .bind(shared::util::slugify(name))
    .bind(logo_url)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| name_conflict(e, name))?;

    find(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::BrandNotFound).into())
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    name: Option<&str>,
    logo_url: Option<&str>,
) -> ServiceResult<Brand> {
    let result = sqlx::query(
        r#"
        UPDATE brands SET
            name = COALESCE($2, name),
            slug = COALESCE($3, slug),
            logo_url = COALESCE($4, logo_url)
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(name.map(shared::util::slugify))
    .bind(logo_url)
    .execute(pool)
    .await
    .map_err(|e| name_conflict(e, name.unwrap_or_default()))?;

    if result.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::BrandNotFound).into());
    }

    find(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::BrandNotFound).into())
}

/// Detach products, then remove the brand. Returns the number of products
/// that lost their brand.
pub async fn delete(pool: &PgPool, id: i64, now: i64) -> ServiceResult<u64> {
    let mut tx = pool.begin().await?;

    let detached = sqlx::query(
        "UPDATE products SET brand_id = NULL, updated_at = $2 WHERE brand_id = $1",
    )
    .bind(id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let deleted = sqlx::query("DELETE FROM brands WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::BrandNotFound).into());
    }

    tx.commit().await?;
    Ok(detached.rows_affected())
}

/// Brand id by case-insensitive name, created when missing
pub(crate) async fn find_or_create_by_name(
    conn: &mut sqlx::PgConnection,
    name: &str,
    now: i64,
) -> Result<i64, sqlx::Error> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO brands (name, slug, created_at)
        VALUES ($1, $2, $3)
        ON CONFLICT ((LOWER(name))) DO UPDATE SET name = brands.name
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(shared::util::slugify(name))
    .bind(now)
    .fetch_one(conn)
    .await?;
    Ok(id)
}
