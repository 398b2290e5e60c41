//! Category API Handlers

use axum::extract::{Path, State};
use serde::Deserialize;
use shared::ApiResponse;
use shared::models::{Category, CategoryCreate, CategoryFilter, CategoryUpdate, DisplayOrderUpdate};

use crate::api::{ApiJson, ApiQuery, ApiResult, parse_id};
use crate::services::category as service;
use crate::state::AppState;

const RESOURCE: &str = "category";

#[derive(Debug, Default, Deserialize)]
pub struct GetQuery {
    #[serde(default)]
    pub include_subcategories: bool,
}

/// GET /api/v1/categories
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<CategoryFilter>,
) -> ApiResult<Vec<Category>> {
    let (rows, pagination) = service::list(&state, &filter).await?;
    let response = ApiResponse::paginated(rows, pagination);
    Ok(match filter.include_count {
        Some(true) => response.with_total(pagination.total),
        _ => response,
    })
}

/// GET /api/v1/categories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<GetQuery>,
) -> ApiResult<Category> {
    let id = parse_id(&id, RESOURCE)?;
    let category = service::get(&state, id, query.include_subcategories).await?;
    Ok(ApiResponse::success(category))
}

/// POST /api/v1/categories
pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CategoryCreate>,
) -> ApiResult<Category> {
    let category = service::create(&state, payload).await?;
    Ok(ApiResponse::created(category))
}

/// PUT /api/v1/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<CategoryUpdate>,
) -> ApiResult<Category> {
    let id = parse_id(&id, RESOURCE)?;
    let category = service::update(&state, id, payload).await?;
    Ok(ApiResponse::success(category))
}

/// DELETE /api/v1/categories/{id} (soft delete)
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let id = parse_id(&id, RESOURCE)?;
    service::delete(&state, id).await?;
    Ok(ApiResponse::no_content())
}

/// PATCH /api/v1/categories/{id}/toggle
pub async fn toggle(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Category> {
    let id = parse_id(&id, RESOURCE)?;
    let category = service::toggle(&state, id).await?;
    Ok(ApiResponse::success(category))
}

/// PATCH /api/v1/categories/{id}/order
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<DisplayOrderUpdate>,
) -> ApiResult<Category> {
    let id = parse_id(&id, RESOURCE)?;
    let category = service::set_order(&state, id, payload).await?;
    Ok(ApiResponse::success(category))
}
