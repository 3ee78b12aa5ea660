//! Brand API

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use serde::Serialize;
use shared::error::AppError;
use shared::models::brand::{Brand, BrandCreate, BrandUpdate};
use shared::util::{non_empty, now_millis};

use super::{ApiJson, ApiResult, ok};
use crate::db::brands;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/brands", get(list))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/api/brands", post(create))
        .route("/api/brands/{id}", put(update).delete(delete))
}

#[derive(Serialize)]
pub struct BrandList {
    pub brands: Vec<Brand>,
}

#[derive(Serialize)]
pub struct BrandPayload {
    pub brand: Brand,
}

#[derive(Serialize)]
pub struct BrandDeleted {
    pub id: i64,
    pub products_detached: u64,
}

pub async fn list(State(state): State<AppState>) -> ApiResult<BrandList> {
    let brands = brands::list(&state.pool).await?;
    ok(BrandList { brands })
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<BrandCreate>,
) -> ApiResult<BrandPayload> {
    let name = non_empty(req.name.as_deref()).ok_or_else(|| AppError::required("name"))?;
    let brand = brands::create(
        &state.pool,
        name,
        non_empty(req.logo_url.as_deref()),
        now_millis(),
    )
    .await?;

    tracing::info!(brand_id = brand.id, name = %brand.name, "Brand created");
    ok(BrandPayload { brand })
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(req): ApiJson<BrandUpdate>,
) -> ApiResult<BrandPayload> {
    let brand = brands::update(
        &state.pool,
        id,
        non_empty(req.name.as_deref()),
        non_empty(req.logo_url.as_deref()),
    )
    .await?;
    ok(BrandPayload { brand })
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<BrandDeleted> {
    let products_detached = brands::delete(&state.pool, id, now_millis()).await?;
    tracing::info!(brand_id = id, products_detached, "Brand deleted");
    ok(BrandDeleted {
        id,
        products_detached,
    })
}
