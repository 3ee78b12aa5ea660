//! Response payload helpers
//!
//! Payloads are flattened into the `{ success, ... }` envelope from
//! [`crate::error::ApiResponse`], so every helper here serializes as an object.

use serde::{Deserialize, Serialize};

/// Default page size for listing endpoints
pub const DEFAULT_PAGE_SIZE: i64 = 24;
/// Largest page size a client may request
pub const MAX_PAGE_SIZE: i64 = 100;

/// Pagination query parameters (`?limit=&offset=`)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageQuery {
    /// Clamp to `1..=MAX_PAGE_SIZE`, defaulting to `DEFAULT_PAGE_SIZE`
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Paginated list payload
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, query: PageQuery) -> Self {
        Self {
            items,
            total,
            limit: query.limit(),
            offset: query.offset(),
        }
    }
}

/// Payload for operations that only confirm success
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_clamps() {
        let q = PageQuery {
            limit: Some(500),
            offset: Some(-3),
        };
        assert_eq!(q.limit(), MAX_PAGE_SIZE);
        assert_eq!(q.offset(), 0);

        let q = PageQuery::default();
        assert_eq!(q.limit(), DEFAULT_PAGE_SIZE);

        let q = PageQuery {
            limit: Some(0),
            offset: None,
        };
        assert_eq!(q.limit(), 1);
    }

    #[test]
    fn test_page_in_envelope() {
        let page = Page::new(vec![1, 2], 10, PageQuery::default());
        let json = serde_json::to_value(crate::error::ApiResponse::success(page)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["total"], 10);
        assert_eq!(json["items"], serde_json::json!([1, 2]));
    }
}
