//! Special offer API
//!
//! Saving a live offer (active and inside its window) reprices its products
//! straight away. Prices are always computed from `base_price`, so the latest
//! applied offer wins.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::special_offer::{
    OfferTarget, SpecialOffer, SpecialOfferCreate, SpecialOfferUpdate,
};
use shared::pricing::is_valid_discount;
use shared::util::{non_empty, now_millis};

use super::{ApiJson, ApiResult, ok};
use crate::db::offers::{self, OfferFields};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/offers", get(list))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/api/offers", post(create))
        .route("/api/offers/{id}", put(update).delete(delete))
        .route("/api/offers/{id}/apply", post(apply))
}

#[derive(Serialize)]
pub struct OfferList {
    pub offers: Vec<SpecialOffer>,
}

#[derive(Serialize)]
pub struct OfferPayload {
    pub offer: SpecialOffer,
    /// Products whose final price was rewritten by this request
    pub products_updated: u64,
}

#[derive(Serialize)]
pub struct OfferDeleted {
    pub id: i64,
    /// Products repriced after the offer was removed
    pub products_updated: u64,
}

/// Raw offer fields before validation. Create and update both end up here.
struct OfferDraft<'a> {
    name: Option<&'a str>,
    description: Option<&'a str>,
    discount_percent: Option<Decimal>,
    target_type: Option<&'a str>,
    target_value: Option<&'a str>,
    starts_at: Option<i64>,
    ends_at: Option<i64>,
    is_active: bool,
}

fn validate(draft: OfferDraft<'_>) -> Result<OfferFields, AppError> {
    let name = non_empty(draft.name).ok_or_else(|| AppError::required("name"))?;

    let discount_percent = draft
        .discount_percent
        .ok_or_else(|| AppError::required("discount_percent"))?;
    if !is_valid_discount(discount_percent) {
        return Err(AppError::new(ErrorCode::InvalidDiscount)
            .with_detail("discount_percent", discount_percent.to_string()));
    }

    let target_type = non_empty(draft.target_type).ok_or_else(|| AppError::required("target_type"))?;
    let target_value =
        non_empty(draft.target_value).ok_or_else(|| AppError::required("target_value"))?;
    let target = OfferTarget::parse(target_type, target_value)
        .map_err(|msg| AppError::with_message(ErrorCode::InvalidOfferTarget, msg))?;

    if let (Some(starts), Some(ends)) = (draft.starts_at, draft.ends_at)
        && ends < starts
    {
        return Err(AppError::validation("ends_at must not be before starts_at")
            .with_detail("field", "ends_at"));
    }

    Ok(OfferFields {
        name: name.to_string(),
        description: non_empty(draft.description).map(str::to_string),
        discount_percent,
        target,
        starts_at: draft.starts_at,
        ends_at: draft.ends_at,
        is_active: draft.is_active,
    })
}

/// GET /api/offers
pub async fn list(State(state): State<AppState>) -> ApiResult<OfferList> {
    let offers = offers::list(&state.pool).await?;
    ok(OfferList { offers })
}

/// POST /api/offers
pub async fn create(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SpecialOfferCreate>,
) -> ApiResult<OfferPayload> {
    let fields = validate(OfferDraft {
        name: req.name.as_deref(),
        description: req.description.as_deref(),
        discount_percent: req.discount_percent,
        target_type: req.target_type.as_deref(),
        target_value: req.target_value.as_deref(),
        starts_at: req.starts_at,
        ends_at: req.ends_at,
        is_active: req.is_active.unwrap_or(true),
    })?;

    let now = now_millis();
    let offer = offers::create(&state.pool, &fields, now).await?;
    tracing::info!(offer_id = offer.id, name = %offer.name, "Special offer created");

    let products_updated = if offer.is_live(now) {
        offers::apply(&state.pool, &offer, now).await?
    } else {
        0
    };
    let offer = offers::require(&state.pool, offer.id).await?;
    ok(OfferPayload {
        offer,
        products_updated,
    })
}

/// PUT /api/offers/{id}
///
/// Omitted fields keep their stored values. When the target changes or the
/// offer stops being live, the previously matched products are released to
/// the other live offers (or their base price) before anything is reapplied.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(req): ApiJson<SpecialOfferUpdate>,
) -> ApiResult<OfferPayload> {
    let existing = offers::require(&state.pool, id).await?;
    let fields = validate(OfferDraft {
        name: req.name.as_deref().or(Some(existing.name.as_str())),
        description: req
            .description
            .as_deref()
            .or(existing.description.as_deref()),
        discount_percent: req.discount_percent.or(Some(existing.discount_percent)),
        target_type: req
            .target_type
            .as_deref()
            .or(Some(existing.target_type.as_str())),
        target_value: req
            .target_value
            .as_deref()
            .or(Some(existing.target_value.as_str())),
        starts_at: req.starts_at.or(existing.starts_at),
        ends_at: req.ends_at.or(existing.ends_at),
        is_active: req.is_active.unwrap_or(existing.is_active),
    })?;

    let now = now_millis();
    let previous = existing.target();
    let offer = offers::update(&state.pool, id, &fields, now).await?;

    if existing.is_active && (previous != fields.target || !offer.is_live(now)) {
        offers::release(&state.pool, &previous, id, now).await?;
    }

    let products_updated = if offer.is_live(now) {
        offers::apply(&state.pool, &offer, now).await?
    } else {
        0
    };
    let offer = offers::require(&state.pool, id).await?;
    ok(OfferPayload {
        offer,
        products_updated,
    })
}

/// POST /api/offers/{id}/apply
pub async fn apply(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<OfferPayload> {
    let offer = offers::require(&state.pool, id).await?;
    let now = now_millis();
    if !offer.is_live(now) {
        return Err(
            AppError::invalid_request("Offer is not active or outside its schedule")
                .with_detail("offer_id", id),
        );
    }

    let products_updated = offers::apply(&state.pool, &offer, now).await?;
    let offer = offers::require(&state.pool, id).await?;
    ok(OfferPayload {
        offer,
        products_updated,
    })
}

/// DELETE /api/offers/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<OfferDeleted> {
    let offer = offers::require(&state.pool, id).await?;
    offers::delete(&state.pool, id).await?;
    let products_updated = offers::release(&state.pool, &offer.target(), id, now_millis()).await?;

    tracing::info!(offer_id = id, products = products_updated, "Special offer deleted");
    ok(OfferDeleted {
        id,
        products_updated,
    })
}
