//! Category database operations

use shared::error::{AppError, ErrorCode};
use shared::models::category::{Category, CategoryUpdate};
use sqlx::PgPool;

use crate::error::{ServiceError, ServiceResult, is_unique_violation};

const CATEGORY_SELECT: &str = r#"
    SELECT c.id, c.name, c.slug, c.description, c.parent_id, c.sort_order,
           COUNT(p.id) AS product_count, c.created_at
    FROM categories c
    LEFT JOIN products p ON p.category_id = c.id
"#;

/// New category, already validated by the handler
pub struct NewCategory<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub description: Option<&'a str>,
    pub parent_id: Option<i64>,
    pub sort_order: i32,
}

/// Rows touched by a category delete
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct DeleteSummary {
    pub children_detached: u64,
    pub products_detached: u64,
}

fn name_conflict(e: sqlx::Error, name: &str) -> ServiceError {
    if is_unique_violation(&e) {
        AppError::new(ErrorCode::CategoryNameExists)
            .with_detail("name", name)
            .into()
    } else {
        e.into()
    }
}

pub async fn list(pool: &PgPool) -> ServiceResult<Vec<Category>> {
    let sql = format!("{CATEGORY_SELECT} GROUP BY c.id ORDER BY c.sort_order, c.name");
    let rows: Vec<Category> = sqlx::query_as(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find(pool: &PgPool, id: i64) -> ServiceResult<Option<Category>> {
    let sql = format!("{CATEGORY_SELECT} WHERE c.id = $1 GROUP BY c.id");
    let row: Option<Category> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row)
}

async fn exists(pool: &PgPool, id: i64) -> ServiceResult<bool> {
    let (found,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
    Ok(found)
}

fn parent_not_found(parent_id: i64) -> ServiceError {
    AppError::with_message(
        ErrorCode::CategoryNotFound,
        format!("Parent category {parent_id} not found"),
    )
    .with_detail("parent_id", parent_id)
    .into()
}

pub async fn create(pool: &PgPool, data: NewCategory<'_>, now: i64) -> ServiceResult<Category> {
    if let Some(parent_id) = data.parent_id
        && !exists(pool, parent_id).await?
    {
        return Err(parent_not_found(parent_id));
    }

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO categories (name, slug, description, parent_id, sort_order, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(data.name)
    .bind(data.slug)
    .bind(data.description)
    .bind(data.parent_id)
    .bind(data.sort_order)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| name_conflict(e, data.name))?;

    find(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound).into())
}

/// Whether `ancestor` appears on the parent chain starting at `start`
/// (inclusive).
async fn is_in_chain(pool: &PgPool, start: i64, ancestor: i64) -> ServiceResult<bool> {
    let (found,): (bool,) = sqlx::query_as(
        r#"
        WITH RECURSIVE chain(id, parent_id) AS (
            SELECT id, parent_id FROM categories WHERE id = $1
            UNION
            SELECT c.id, c.parent_id FROM categories c JOIN chain ON c.id = chain.parent_id
        )
        SELECT EXISTS(SELECT 1 FROM chain WHERE id = $2)
        "#,
    )
    .bind(start)
    .bind(ancestor)
    .fetch_one(pool)
    .await?;
    Ok(found)
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &CategoryUpdate,
    slug: Option<&str>,
) -> ServiceResult<Category> {
    if !exists(pool, id).await? {
        return Err(AppError::new(ErrorCode::CategoryNotFound).into());
    }

    if let Some(Some(parent_id)) = data.parent_id {
        if !exists(pool, parent_id).await? {
            return Err(parent_not_found(parent_id));
        }
        // Moving under itself or one of its own descendants would close a loop
        if is_in_chain(pool, parent_id, id).await? {
            return Err(AppError::new(ErrorCode::CategoryCycle)
                .with_detail("parent_id", parent_id)
                .into());
        }
    }

    let name = shared::util::non_empty(data.name.as_deref());
    sqlx::query(
        r#"
        UPDATE categories SET
            name = COALESCE($2, name),
            slug = COALESCE($3, slug),
            description = COALESCE($4, description),
            parent_id = CASE WHEN $5 THEN $6 ELSE parent_id END,
            sort_order = COALESCE($7, sort_order)
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(slug)
    .bind(data.description.as_deref())
    .bind(data.parent_id.is_some())
    .bind(data.parent_id.flatten())
    .bind(data.sort_order)
    .execute(pool)
    .await
    .map_err(|e| name_conflict(e, name.unwrap_or_default()))?;

    find(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound).into())
}

/// Detach children and products, then remove the row. One transaction.
pub async fn delete(pool: &PgPool, id: i64, now: i64) -> ServiceResult<DeleteSummary> {
    let mut tx = pool.begin().await?;

    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM categories WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if row.is_none() {
        return Err(AppError::new(ErrorCode::CategoryNotFound).into());
    }

    let children = sqlx::query("UPDATE categories SET parent_id = NULL WHERE parent_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let products = sqlx::query(
        "UPDATE products SET category_id = NULL, updated_at = $2 WHERE category_id = $1",
    )
    .bind(id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(DeleteSummary {
        children_detached: children.rows_affected(),
        products_detached: products.rows_affected(),
    })
}

/// Category id by case-insensitive name, created when missing
pub(crate) async fn find_or_create_by_name(
    conn: &mut sqlx::PgConnection,
    name: &str,
    now: i64,
) -> Result<i64, sqlx::Error> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO categories (name, slug, sort_order, created_at)
        VALUES ($1, $2, 0, $3)
        ON CONFLICT ((LOWER(name))) DO UPDATE SET name = categories.name
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
