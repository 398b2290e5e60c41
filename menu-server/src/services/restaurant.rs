//! Restaurant info and operating hours

use shared::models::restaurant::validate_day;
use shared::models::{
    OperatingHour, OperatingHoursUpdate, RestaurantInfo, RestaurantInfoCreate,
    RestaurantInfoUpdate,
};
use shared::{AppError, ErrorCode};

use crate::db;
use crate::db::restaurant::NewRestaurant;
use crate::error::ServiceResult;
use crate::state::AppState;

async fn current(state: &AppState) -> ServiceResult<RestaurantInfo> {
    Ok(db::restaurant::find_current(&state.pool)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?)
}

/// The restaurant with its hours, Sunday first
pub async fn get_info(state: &AppState) -> ServiceResult<RestaurantInfo> {
    let mut info = current(state).await?;
    info.operating_hours = db::restaurant::list_hours(&state.pool, info.id).await?;
    Ok(info)
}

/// Only one restaurant record may exist
pub async fn create_info(
    state: &AppState,
    mut payload: RestaurantInfoCreate,
) -> ServiceResult<RestaurantInfo> {
    payload.validate()?;
    if db::restaurant::any_exists(&state.pool).await? {
        return Err(AppError::new(ErrorCode::RestaurantAlreadyExists).into());
    }

    let new = NewRestaurant {
        name: payload.name,
        description: payload.description.unwrap_or_default(),
        address: payload.address.unwrap_or_else(|| serde_json::json!({})),
        contact_info: payload.contact_info.unwrap_or_else(|| serde_json::json!({})),
        settings: payload.settings.unwrap_or_else(|| serde_json::json!({})),
    };
    let info = db::restaurant::insert(&state.pool, &new).await?;

    tracing::info!(id = info.id, name = %info.name, "Restaurant info created");
    Ok(info)
}

pub async fn update_info(
    state: &AppState,
    mut payload: RestaurantInfoUpdate,
) -> ServiceResult<RestaurantInfo> {
    payload.validate()?;
    let current = current(state).await?;

    let mut info = db::restaurant::update(&state.pool, current.id, &payload)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;
    info.operating_hours = db::restaurant::list_hours(&state.pool, info.id).await?;
    Ok(info)
}

pub async fn list_hours(state: &AppState) -> ServiceResult<Vec<OperatingHour>> {
    let info = current(state).await?;
    Ok(db::restaurant::list_hours(&state.pool, info.id).await?)
}

/// Replace the whole week atomically
pub async fn replace_hours(
    state: &AppState,
    payload: OperatingHoursUpdate,
) -> ServiceResult<Vec<OperatingHour>> {
    let rows = payload.validate()?;
    let info = current(state).await?;

    let hours = db::restaurant::replace_hours(&state.pool, info.id, &rows).await?;
    tracing::info!(restaurant_id = info.id, days = hours.len(), "Operating hours replaced");
    Ok(hours)
}

pub async fn hours_for_day(state: &AppState, day: i16) -> ServiceResult<OperatingHour> {
    let day = validate_day(day)?;
    let info = current(state).await?;

    Ok(db::restaurant::find_hour(&state.pool, info.id, day)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::OperatingHourNotFound).with_detail("day_of_week", day)
        })?)
}
