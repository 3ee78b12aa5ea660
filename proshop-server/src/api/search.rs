//! Storefront search
//!
//! GET /api/search?q&category_id&brand_id&min_price&max_price&on_sale&sort&limit&offset

use axum::{Router, extract::State, routing::get};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::AppError;
use shared::models::product::Product;
use shared::response::PageQuery;

use super::{ApiQuery, ApiResult, ok};
use crate::db::search::{self, SearchFilter, SearchSort};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/search", get(search_products))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub category_id: Option<i64>,
    pub brand_id: Option<i64>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub on_sale: Option<bool>,
    #[serde(default)]
    pub sort: SearchSort,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub products: Vec<Product>,
    pub total: i64,
}

impl TryFrom<SearchQuery> for SearchFilter {
    type Error = AppError;

    fn try_from(query: SearchQuery) -> Result<Self, Self::Error> {
        if let (Some(min), Some(max)) = (query.min_price, query.max_price)
            && min > max
        {
            return Err(AppError::validation("min_price must not exceed max_price")
                .with_detail("field", "min_price"));
        }

        let page = PageQuery {
            limit: query.limit,
            offset: query.offset,
        };
        Ok(SearchFilter {
            q: shared::util::non_empty(query.q.as_deref()).map(str::to_string),
            category_id: query.category_id,
            brand_id: query.brand_id,
            min_price: query.min_price,
            max_price: query.max_price,
            on_sale: query.on_sale,
            sort: query.sort,
            limit: page.limit(),
            offset: page.offset(),
        })
    }
}

/// GET /api/search
pub async fn search_products(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<SearchResponse> {
    let filter = SearchFilter::try_from(query)?;
    let (products, total) = search::search(&state.pool, &filter).await?;
    tracing::debug!(q = ?filter.q, total, "Search");
    ok(SearchResponse { products, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;
    use shared::response::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

    #[test]
    fn test_filter_defaults() {
        let filter = SearchFilter::try_from(SearchQuery {
            q: Some("  ".into()),
            ..Default::default()
        })
        .unwrap();
        assert!(filter.q.is_none());
        assert_eq!(filter.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(filter.offset, 0);
        assert_eq!(filter.sort, SearchSort::Relevance);
    }

    #[test]
    fn test_filter_clamps_limit() {
        let filter = SearchFilter::try_from(SearchQuery {
            limit: Some(1_000),
            offset: Some(-5),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(filter.limit, MAX_PAGE_SIZE);
        assert_eq!(filter.offset, 0);
    }

    #[test]
    fn test_filter_rejects_inverted_price_range() {
        let result = SearchFilter::try_from(SearchQuery {
            min_price: Some(dec!(200)),
            max_price: Some(dec!(100)),
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
