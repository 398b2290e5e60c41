//! Menu API Handlers

use axum::extract::{Path, State};
use shared::ApiResponse;
use shared::models::{CategoryMenu, CompleteMenu, Item};

use crate::api::item::{LimitQuery, SearchQuery};
use crate::api::{ApiQuery, ApiResult, parse_id};
use crate::services::{item as items, menu as service};
use crate::state::AppState;

/// GET /api/v1/menu
pub async fn complete(State(state): State<AppState>) -> ApiResult<CompleteMenu> {
    let menu = service::complete(&state).await?;
    Ok(ApiResponse::success(menu))
}

/// GET /api/v1/menu/categories/{id}
pub async fn category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CategoryMenu> {
    let id = parse_id(&id, "category")?;
    let menu = service::category(&state, id).await?;
    Ok(ApiResponse::success(menu))
}

/// GET /api/v1/menu/search?q=
pub async fn search(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<Vec<Item>> {
    let found = items::search(&state, query.q.as_deref(), query.limit).await?;
    let total = found.len() as i64;
    Ok(ApiResponse::success(found).with_total(total))
}

/// GET /api/v1/menu/featured
pub async fn featured(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> ApiResult<Vec<Item>> {
    Ok(ApiResponse::success(items::featured(&state, query.limit).await?))
}
