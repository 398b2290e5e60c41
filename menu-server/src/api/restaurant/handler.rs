//! Restaurant API Handlers

use axum::extract::{Path, State};
use shared::models::{
    OperatingHour, OperatingHoursUpdate, RestaurantInfo, RestaurantInfoCreate,
    RestaurantInfoUpdate,
};
use shared::{ApiResponse, AppError};

use crate::api::{ApiJson, ApiResult};
use crate::services::restaurant as service;
use crate::state::AppState;

/// GET /api/v1/restaurants/info
pub async fn get_info(State(state): State<AppState>) -> ApiResult<RestaurantInfo> {
    Ok(ApiResponse::success(service::get_info(&state).await?))
}

/// POST /api/v1/restaurants/info
pub async fn create_info(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RestaurantInfoCreate>,
) -> ApiResult<RestaurantInfo> {
    let info = service::create_info(&state, payload).await?;
    Ok(ApiResponse::created(info))
}

/// PUT /api/v1/restaurants/info
pub async fn update_info(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RestaurantInfoUpdate>,
) -> ApiResult<RestaurantInfo> {
    Ok(ApiResponse::success(service::update_info(&state, payload).await?))
}

/// DELETE /api/v1/restaurants/info
///
/// The restaurant record is never removed through the API.
pub async fn delete_info() -> ApiResult<()> {
    Err(AppError::not_implemented(
        "Deleting restaurant info is not supported",
    ))
}

/// GET /api/v1/restaurants/hours
pub async fn list_hours(State(state): State<AppState>) -> ApiResult<Vec<OperatingHour>> {
    Ok(ApiResponse::success(service::list_hours(&state).await?))
}

/// PUT /api/v1/restaurants/hours
pub async fn replace_hours(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<OperatingHoursUpdate>,
) -> ApiResult<Vec<OperatingHour>> {
    Ok(ApiResponse::success(service::replace_hours(&state, payload).await?))
}

/// GET /api/v1/restaurants/hours/{day}
pub async fn hours_for_day(
    State(state): State<AppState>,
    Path(day): Path<String>,
) -> ApiResult<OperatingHour> {
    let day: i16 = day.trim().parse().map_err(|_| {
        AppError::bad_request("Invalid day of week").with_detail("value", day.as_str())
    })?;
    Ok(ApiResponse::success(service::hours_for_day(&state, day).await?))
}
