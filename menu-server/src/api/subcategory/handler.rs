//! Subcategory API Handlers

use axum::extract::{Path, State};
use serde::Deserialize;
use shared::ApiResponse;
use shared::models::{
    DisplayOrderUpdate, SubCategory, SubCategoryCreate, SubCategoryFilter, SubCategoryUpdate,
};

use crate::api::{ApiJson, ApiQuery, ApiResult, parse_id};
use crate::services::subcategory as service;
use crate::state::AppState;

const RESOURCE: &str = "subcategory";

#[derive(Debug, Default, Deserialize)]
pub struct GetQuery {
    #[serde(default)]
    pub include_items: bool,
}

/// GET /api/v1/subcategories
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<SubCategoryFilter>,
) -> ApiResult<Vec<SubCategory>> {
    let (rows, pagination) = service::list(&state, &filter).await?;
    let response = ApiResponse::paginated(rows, pagination);
    Ok(match filter.include_count {
        Some(true) => response.with_total(pagination.total),
        _ => response,
    })
}

/// GET /api/v1/subcategories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<GetQuery>,
) -> ApiResult<SubCategory> {
    let id = parse_id(&id, RESOURCE)?;
    let sub = service::get(&state, id, query.include_items).await?;
    Ok(ApiResponse::success(sub))
}

/// POST /api/v1/subcategories
pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SubCategoryCreate>,
) -> ApiResult<SubCategory> {
    let sub = service::create(&state, payload).await?;
    Ok(ApiResponse::created(sub))
}

/// PUT /api/v1/subcategories/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<SubCategoryUpdate>,
) -> ApiResult<SubCategory> {
    let id = parse_id(&id, RESOURCE)?;
    let sub = service::update(&state, id, payload).await?;
    Ok(ApiResponse::success(sub))
}

/// DELETE /api/v1/subcategories/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let id = parse_id(&id, RESOURCE)?;
    service::delete(&state, id).await?;
    Ok(ApiResponse::no_content())
}

/// PATCH /api/v1/subcategories/{id}/toggle
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SubCategory> {
    let id = parse_id(&id, RESOURCE)?;
    Ok(ApiResponse::success(service::toggle(&state, id).await?))
}

/// PATCH /api/v1/subcategories/{id}/order
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<DisplayOrderUpdate>,
) -> ApiResult<SubCategory> {
    let id = parse_id(&id, RESOURCE)?;
    Ok(ApiResponse::success(service::set_order(&state, id, payload).await?))
}
