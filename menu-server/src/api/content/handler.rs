//! Content API Handlers

use axum::extract::{Path, State};
use shared::ApiResponse;
use shared::models::{ContentCreate, ContentFilter, ContentSection, ContentUpdate};

use crate::api::{ApiJson, ApiQuery, ApiResult, parse_id};
use crate::services::content as service;
use crate::state::AppState;

const RESOURCE: &str = "content";

/// GET /api/v1/content
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ContentFilter>,
) -> ApiResult<Vec<ContentSection>> {
    let (rows, pagination) = service::list(&state, &filter).await?;
    Ok(ApiResponse::paginated(rows, pagination))
}

/// GET /api/v1/content/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ContentSection> {
    let id = parse_id(&id, RESOURCE)?;
    Ok(ApiResponse::success(service::get(&state, id).await?))
}

/// GET /api/v1/content/by-key/{key}
pub async fn get_by_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<ContentSection> {
    Ok(ApiResponse::success(service::get_by_section(&state, &key).await?))
}

/// POST /api/v1/content
pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ContentCreate>,
) -> ApiResult<ContentSection> {
    let section = service::create(&state, payload).await?;
    Ok(ApiResponse::created(section))
}

/// PUT /api/v1/content/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<ContentUpdate>,
) -> ApiResult<ContentSection> {
    let id = parse_id(&id, RESOURCE)?;
    Ok(ApiResponse::success(service::update(&state, id, payload).await?))
}

/// DELETE /api/v1/content/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let id = parse_id(&id, RESOURCE)?;
    service::delete(&state, id).await?;
    Ok(ApiResponse::no_content())
}

/// PATCH /api/v1/content/{id}/toggle
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ContentSection> {
    let id = parse_id(&id, RESOURCE)?;
    Ok(ApiResponse::success(service::toggle(&state, id).await?))
}
