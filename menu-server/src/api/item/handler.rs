//! Item API Handlers

use axum::extract::{Path, State};
use serde::Deserialize;
use shared::ApiResponse;
use shared::models::{DisplayOrderUpdate, Item, ItemCreate, ItemFilter, ItemUpdate, PriceUpdate};

use crate::api::{ApiJson, ApiQuery, ApiResult, parse_id};
use crate::services::item as service;
use crate::state::AppState;

const RESOURCE: &str = "item";

/// `?q=&limit=` for search
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<i64>,
}

/// `?limit=` for featured items
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

/// GET /api/v1/items
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ItemFilter>,
) -> ApiResult<Vec<Item>> {
    let (rows, pagination) = service::list(&state, &filter).await?;
    let response = ApiResponse::paginated(rows, pagination);
    Ok(match filter.include_count {
        Some(true) => response.with_total(pagination.total),
        _ => response,
    })
}

/// GET /api/v1/items/search?q=
pub async fn search(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<Vec<Item>> {
    let items = service::search(&state, query.q.as_deref(), query.limit).await?;
    let total = items.len() as i64;
    Ok(ApiResponse::success(items).with_total(total))
}

/// GET /api/v1/items/featured
pub async fn featured(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> ApiResult<Vec<Item>> {
    let items = service::featured(&state, query.limit).await?;
    Ok(ApiResponse::success(items))
}

/// GET /api/v1/items/{id}
pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Item> {
    let id = parse_id(&id, RESOURCE)?;
    Ok(ApiResponse::success(service::get(&state, id).await?))
}

/// POST /api/v1/items
pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ItemCreate>,
) -> ApiResult<Item> {
    let item = service::create(&state, payload).await?;
    Ok(ApiResponse::created(item))
}

/// PUT /api/v1/items/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<ItemUpdate>,
) -> ApiResult<Item> {
    let id = parse_id(&id, RESOURCE)?;
    Ok(ApiResponse::success(service::update(&state, id, payload).await?))
}

/// DELETE /api/v1/items/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let id = parse_id(&id, RESOURCE)?;
    service::delete(&state, id).await?;
    Ok(ApiResponse::no_content())
}

/// PATCH /api/v1/items/{id}/toggle
pub async fn toggle(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Item> {
    let id = parse_id(&id, RESOURCE)?;
    Ok(ApiResponse::success(service::toggle(&state, id).await?))
}

/// PATCH /api/v1/items/{id}/order
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<DisplayOrderUpdate>,
) -> ApiResult<Item> {
    let id = parse_id(&id, RESOURCE)?;
    Ok(ApiResponse::success(service::set_order(&state, id, payload).await?))
}

/// PATCH /api/v1/items/{id}/price
pub async fn update_price(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<PriceUpdate>,
) -> ApiResult<Item> {
    let id = parse_id(&id, RESOURCE)?;
    Ok(ApiResponse::success(service::set_price(&state, id, payload).await?))
}
