//! Special offer database operations
//!
//! Applying an offer rewrites `final_price` on every matching product from
//! its `base_price`; discounts never stack. Where live offers overlap, the
//! most recently applied one (latest `updated_at`) sets the price. Releasing
//! an offer hands its products back to the remaining live offers, or to
//! their base price when none covers them.

use std::collections::HashMap;

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::special_offer::{OfferTarget, OfferTargetType, SpecialOffer};
use shared::pricing::discounted_price;
use sqlx::{PgConnection, PgPool};

use crate::error::{ServiceError, ServiceResult};

const OFFER_COLUMNS: &str = r#"
    id, name, description, discount_percent, target_type, target_value,
    starts_at, ends_at, is_active, products_affected, created_at, updated_at
"#;

#[derive(sqlx::FromRow)]
struct OfferRow {
    id: i64,
    name: String,
    description: Option<String>,
    discount_percent: Decimal,
    target_type: String,
    target_value: String,
    starts_at: Option<i64>,
    ends_at: Option<i64>,
    is_active: bool,
    products_affected: i32,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<OfferRow> for SpecialOffer {
    type Error = String;

    fn try_from(row: OfferRow) -> Result<Self, Self::Error> {
        Ok(SpecialOffer {
            id: row.id,
            name: row.name,
            description: row.description,
            discount_percent: row.discount_percent,
            target_type: row.target_type.parse::<OfferTargetType>()?,
            target_value: row.target_value,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            is_active: row.is_active,
            products_affected: row.products_affected,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn to_offer(row: OfferRow) -> ServiceResult<SpecialOffer> {
    SpecialOffer::try_from(row).map_err(|e| ServiceError::Db(e.into()))
}

/// Validated offer fields
#[derive(Debug, Clone)]
pub struct OfferFields {
    pub name: String,
    pub description: Option<String>,
    pub discount_percent: Decimal,
    pub target: OfferTarget,
    pub starts_at: Option<i64>,
    pub ends_at: Option<i64>,
    pub is_active: bool,
}

/// Product predicate for a target; `$1` is the target value
fn target_predicate(target_type: OfferTargetType) -> &'static str {
    match target_type {
        OfferTargetType::Sku => "p.sku = $1",
        OfferTargetType::Style => "p.style_number = $1",
        OfferTargetType::Category => {
            "p.category_id IN (SELECT id FROM categories WHERE LOWER(name) = LOWER($1))"
        }
        OfferTargetType::Brand => {
            "p.brand_id IN (SELECT id FROM brands WHERE LOWER(name) = LOWER($1))"
        }
    }
}

pub async fn list(pool: &PgPool) -> ServiceResult<Vec<SpecialOffer>> {
    let sql = format!("SELECT {OFFER_COLUMNS} FROM special_offers ORDER BY created_at DESC, id DESC");
    let rows: Vec<OfferRow> = sqlx::query_as(&sql).fetch_all(pool).await?;
    rows.into_iter().map(to_offer).collect()
}

pub async fn find(pool: &PgPool, id: i64) -> ServiceResult<Option<SpecialOffer>> {
    let sql = format!("SELECT {OFFER_COLUMNS} FROM special_offers WHERE id = $1");
    let row: Option<OfferRow> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    row.map(to_offer).transpose()
}

pub async fn require(pool: &PgPool, id: i64) -> ServiceResult<SpecialOffer> {
    find(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OfferNotFound).into())
}

pub async fn create(pool: &PgPool, fields: &OfferFields, now: i64) -> ServiceResult<SpecialOffer> {
    let sql = format!(
        r#"
        INSERT INTO special_offers (
            name, description, discount_percent, target_type, target_value,
            starts_at, ends_at, is_active, products_affected, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 0, $9, $9)
        RETURNING {OFFER_COLUMNS}
        "#
    );
    let row: OfferRow = sqlx::query_as(&sql)
        .bind(&fields.name)
        .bind(fields.description.as_deref())
        .bind(fields.discount_percent)
        .bind(fields.target.target_type.as_str())
        .bind(&fields.target.value)
        .bind(fields.starts_at)
        .bind(fields.ends_at)
        .bind(fields.is_active)
        .bind(now)
        .fetch_one(pool)
        .await?;
    to_offer(row)
}

/// Overwrite every field of an existing offer
pub async fn update(
    pool: &PgPool,
    id: i64,
    fields: &OfferFields,
    now: i64,
) -> ServiceResult<SpecialOffer> {
    let sql = format!(
        r#"
        UPDATE special_offers SET
            name = $2, description = $3, discount_percent = $4,
            target_type = $5, target_value = $6,
            starts_at = $7, ends_at = $8, is_active = $9, updated_at = $10
        WHERE id = $1
        RETURNING {OFFER_COLUMNS}
        "#
    );
    let row: Option<OfferRow> = sqlx::query_as(&sql)
        .bind(id)
        .bind(&fields.name)
        .bind(fields.description.as_deref())
        .bind(fields.discount_percent)
        .bind(fields.target.target_type.as_str())
        .bind(&fields.target.value)
        .bind(fields.starts_at)
        .bind(fields.ends_at)
        .bind(fields.is_active)
        .bind(now)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => to_offer(row),
        None => Err(AppError::new(ErrorCode::OfferNotFound).into()),
    }
}

pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let result = sqlx::query("DELETE FROM special_offers WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::OfferNotFound).into());
    }
    Ok(())
}

#[derive(sqlx::FromRow)]
struct ProductPrice {
    id: i64,
    base_price: Decimal,
    final_price: Decimal,
}

/// Prices of every product the target matches
async fn matching_products(
    conn: &mut PgConnection,
    target: &OfferTarget,
) -> Result<Vec<ProductPrice>, sqlx::Error> {
    let sql = format!(
        "SELECT p.id, p.base_price, p.final_price FROM products p WHERE {} ORDER BY p.id",
        target_predicate(target.target_type)
    );
    sqlx::query_as(&sql)
        .bind(&target.value)
        .fetch_all(conn)
        .await
}

/// Bulk-write final prices with a single UNNEST update
async fn write_prices(
    conn: &mut PgConnection,
    ids: &[i64],
    prices: &[Decimal],
    now: i64,
) -> Result<u64, sqlx::Error> {
    if ids.is_empty() {
        return Ok(0);
    }
    let result = sqlx::query(
        r#"
        UPDATE products AS p
        SET final_price = u.final_price, updated_at = $3
        FROM (SELECT * FROM UNNEST($1::bigint[], $2::numeric[])) AS u(id, final_price)
        WHERE p.id = u.id
        "#,
    )
    .bind(ids)
    .bind(prices)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

/// Reprice every matching product from its base price and record how many
/// rows were touched on the offer. Bumps `updated_at` so the offer now wins
/// over older overlapping ones.
pub async fn apply(pool: &PgPool, offer: &SpecialOffer, now: i64) -> ServiceResult<u64> {
    let mut tx = pool.begin().await?;

    let matches = matching_products(&mut *tx, &offer.target()).await?;
    let ids: Vec<i64> = matches.iter().map(|p| p.id).collect();
    let prices: Vec<Decimal> = matches
        .iter()
        .map(|p| discounted_price(p.base_price, offer.discount_percent))
        .collect();

    let updated = write_prices(&mut *tx, &ids, &prices, now).await?;

    sqlx::query("UPDATE special_offers SET products_affected = $2, updated_at = $3 WHERE id = $1")
        .bind(offer.id)
        .bind(updated as i32)
        .bind(now)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        offer_id = offer.id,
        target = %offer.target_type,
        value = %offer.target_value,
        discount = %offer.discount_percent,
        products = updated,
        "Special offer applied"
    );
    Ok(updated)
}

/// Reprice the products `target` matches as if offer `released` did not
/// exist: each one takes the price of the latest live offer still covering
/// it, or its base price. Returns the number of rows whose price changed.
pub async fn release(
    pool: &PgPool,
    target: &OfferTarget,
    released: i64,
    now: i64,
) -> ServiceResult<u64> {
    let mut tx = pool.begin().await?;

    let products = matching_products(&mut *tx, target).await?;
    if products.is_empty() {
        return Ok(0);
    }
    let mut prices: HashMap<i64, Decimal> =
        products.iter().map(|p| (p.id, p.base_price)).collect();

    let sql = format!(
        "SELECT {OFFER_COLUMNS} FROM special_offers WHERE is_active AND id <> $1 ORDER BY updated_at, id"
    );
    let rows: Vec<OfferRow> = sqlx::query_as(&sql).bind(released).fetch_all(&mut *tx).await?;
    for row in rows {
        let offer = to_offer(row)?;
        if !offer.is_live(now) {
            continue;
        }
        for covered in matching_products(&mut *tx, &offer.target()).await? {
            if let Some(price) = prices.get_mut(&covered.id) {
                *price = discounted_price(covered.base_price, offer.discount_percent);
            }
        }
    }

    let (ids, changed): (Vec<i64>, Vec<Decimal>) = products
        .iter()
        .filter_map(|p| {
            prices
                .get(&p.id)
                .copied()
                .filter(|price| *price != p.final_price)
                .map(|price| (p.id, price))
        })
        .unzip();

    let updated = write_prices(&mut *tx, &ids, &changed, now).await?;
    tx.commit().await?;

    tracing::info!(
        offer_id = released,
        target = %target.target_type,
        value = %target.value,
        products = updated,
        "Special offer released"
    );
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates_bind_value_once() {
        for target_type in [
            OfferTargetType::Sku,
            OfferTargetType::Style,
            OfferTargetType::Category,
            OfferTargetType::Brand,
        ] {
            let predicate = target_predicate(target_type);
            assert!(predicate.contains("$1"), "{target_type}");
            assert!(!predicate.contains("$2"), "{target_type}");
        }
    }

    #[test]
    fn test_name_targets_match_case_insensitively() {
        assert!(target_predicate(OfferTargetType::Brand).contains("LOWER($1)"));
        assert!(target_predicate(OfferTargetType::Category).contains("LOWER($1)"));
    }
}
