//! Storefront product search

use rust_decimal::Decimal;
use serde::Deserialize;
use shared::models::product::Product;
use sqlx::PgPool;

use super::products::PRODUCT_SELECT;
use crate::error::ServiceResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchSort {
    /// Exact SKU, then name prefix, then name substring, then the rest
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    Name,
    Newest,
}

impl SearchSort {
    fn order_by(self) -> &'static str {
        match self {
            Self::Relevance => {
                r#"CASE
                    WHEN LOWER(p.sku) = $9 THEN 0
                    WHEN STRPOS(LOWER(p.name), $9) = 1 THEN 1
                    WHEN STRPOS(LOWER(p.name), $9) > 0 THEN 2
                    ELSE 3
                END, p.name, p.id"#
            }
            Self::PriceAsc => "p.final_price ASC, p.name, p.id",
            Self::PriceDesc => "p.final_price DESC, p.name, p.id",
            Self::Name => "p.name, p.id",
            Self::Newest => "p.created_at DESC, p.id DESC",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub q: Option<String>,
    pub category_id: Option<i64>,
    pub brand_id: Option<i64>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub on_sale: Option<bool>,
    pub sort: SearchSort,
    pub limit: i64,
    pub offset: i64,
}

const SEARCH_WHERE: &str = r#"
    WHERE p.is_active
      AND ($1::TEXT IS NULL
           OR p.name ILIKE $1 ESCAPE '\'
           OR p.sku ILIKE $1 ESCAPE '\'
           OR p.style_number ILIKE $1 ESCAPE '\'
           OR b.name ILIKE $1 ESCAPE '\')
      AND ($2::BIGINT IS NULL OR p.category_id = $2)
      AND ($3::BIGINT IS NULL OR p.brand_id = $3)
      AND ($4::NUMERIC IS NULL OR p.final_price >= $4)
      AND ($5::NUMERIC IS NULL OR p.final_price <= $5)
      AND ($6::BOOLEAN IS NULL OR (p.final_price < p.base_price) = $6)
"#;

/// Matching products for one page plus the total match count
pub async fn search(pool: &PgPool, filter: &SearchFilter) -> ServiceResult<(Vec<Product>, i64)> {
    let term = shared::util::non_empty(filter.q.as_deref());
    let pattern = term.map(super::like_pattern);

    let sql = format!(
        "{PRODUCT_SELECT} {SEARCH_WHERE} ORDER BY {} LIMIT $7 OFFSET $8",
        filter.sort.order_by()
    );
    let mut query = sqlx::query_as::<_, Product>(&sql)
        .bind(pattern.as_deref())
        .bind(filter.category_id)
        .bind(filter.brand_id)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .bind(filter.on_sale)
        .bind(filter.limit)
        .bind(filter.offset);
    if filter.sort == SearchSort::Relevance {
        query = query.bind(term.map(str::to_lowercase));
    }
    let rows = query.fetch_all(pool).await?;

    let count_sql = format!(
        "SELECT COUNT(*) FROM products p LEFT JOIN brands b ON b.id = p.brand_id {SEARCH_WHERE}"
    );
    let (total,): (i64,) = sqlx::query_as(&count_sql)
        .bind(pattern.as_deref())
        .bind(filter.category_id)
        .bind(filter.brand_id)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .bind(filter.on_sale)
        .fetch_one(pool)
        .await?;

    Ok((rows, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parses_snake_case() {
        let sort: SearchSort = serde_json::from_str("\"price_desc\"").unwrap();
        assert_eq!(sort, SearchSort::PriceDesc);
        assert!(serde_json::from_str::<SearchSort>("\"cheapest\"").is_err());
        assert_eq!(SearchSort::default(), SearchSort::Relevance);
    }

    #[test]
    fn test_only_relevance_uses_term_param() {
        assert!(SearchSort::Relevance.order_by().contains("$9"));
        for sort in [
            SearchSort::PriceAsc,
            SearchSort::PriceDesc,
            SearchSort::Name,
            SearchSort::Newest,
        ] {
            assert!(!sort.order_by().contains('$'));
        }
    }
}
