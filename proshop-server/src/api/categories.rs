//! Category API
//!
//! Reads are public (navigation menus), writes need an admin session.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::category::{
    Category, CategoryCreate, CategoryNode, CategoryUpdate, build_tree,
};
use shared::util::{non_empty, now_millis, slugify};

use super::{ApiJson, ApiResult, ok};
use crate::db::categories::{self, DeleteSummary, NewCategory};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list))
        .route("/api/categories/tree", get(tree))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/api/categories", post(create))
        .route("/api/categories/{id}", put(update).delete(delete))
}

#[derive(Serialize)]
pub struct CategoryList {
    pub categories: Vec<Category>,
}

#[derive(Serialize)]
pub struct CategoryTree {
    pub categories: Vec<CategoryNode>,
}

#[derive(Serialize)]
pub struct CategoryPayload {
    pub category: Category,
}

#[derive(Serialize)]
pub struct CategoryDeleted {
    pub id: i64,
    #[serde(flatten)]
    pub summary: DeleteSummary,
}

/// GET /api/categories
pub async fn list(State(state): State<AppState>) -> ApiResult<CategoryList> {
    let categories = categories::list(&state.pool).await?;
    ok(CategoryList { categories })
}

/// GET /api/categories/tree
pub async fn tree(State(state): State<AppState>) -> ApiResult<CategoryTree> {
    let categories = categories::list(&state.pool).await?;
    ok(CategoryTree {
        categories: build_tree(categories),
    })
}

/// Explicit slug if it still has something left after slugifying, else the name's
fn resolve_slug(slug: Option<&str>, name: &str) -> String {
    non_empty(slug)
        .map(slugify)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| slugify(name))
}

/// POST /api/categories
pub async fn create(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CategoryCreate>,
) -> ApiResult<CategoryPayload> {
    let name = non_empty(req.name.as_deref()).ok_or_else(|| AppError::required("name"))?;
    let slug = resolve_slug(req.slug.as_deref(), name);
    if slug.is_empty() {
        return Err(AppError::validation("name must contain letters or digits")
            .with_detail("field", "name"));
    }

    let category = categories::create(
        &state.pool,
        NewCategory {
            name,
            slug: &slug,
            description: req.description.as_deref(),
            parent_id: req.parent_id,
            sort_order: req.sort_order.unwrap_or(0),
        },
        now_millis(),
    )
    .await?;

    tracing::info!(category_id = category.id, name = %category.name, "Category created");
    ok(CategoryPayload { category })
}

/// PUT /api/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(req): ApiJson<CategoryUpdate>,
) -> ApiResult<CategoryPayload> {
    if req.parent_id == Some(Some(id)) {
        return Err(AppError::new(ErrorCode::CategoryCycle)
            .with_detail("parent_id", id));
    }

    // A rename without an explicit slug re-derives it
    let slug = match (non_empty(req.slug.as_deref()), non_empty(req.name.as_deref())) {
        (Some(slug), _) => Some(slugify(slug)),
        (None, Some(name)) => Some(slugify(name)),
        (None, None) => None,
    }
    .filter(|s| !s.is_empty());

    let category = categories::update(&state.pool, id, &req, slug.as_deref()).await?;
    tracing::info!(category_id = id, "Category updated");
    ok(CategoryPayload { category })
}

/// DELETE /api/categories/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<CategoryDeleted> {
    let summary = categories::delete(&state.pool, id, now_millis()).await?;
    tracing::info!(
        category_id = id,
        children_detached = summary.children_detached,
        products_detached = summary.products_detached,
        "Category deleted"
    );
    ok(CategoryDeleted { id, summary })
}
