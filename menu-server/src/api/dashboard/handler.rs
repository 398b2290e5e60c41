//! Dashboard API Handlers

use axum::extract::State;
use shared::ApiResponse;
use shared::models::dashboard::{
    CategoryStats, DashboardFilter, DashboardResponse, DashboardStats, MenuHealthMetrics,
    PriceDistribution, RecentActivity, WeeklyItemsData,
};

use crate::api::{ApiQuery, ApiResult};
use crate::services::dashboard as service;
use crate::state::AppState;

/// GET /api/v1/dashboard
pub async fn complete(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<DashboardFilter>,
) -> ApiResult<DashboardResponse> {
    Ok(ApiResponse::success(service::complete(&state, &filter).await?))
}

/// GET /api/v1/dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<DashboardFilter>,
) -> ApiResult<DashboardStats> {
    Ok(ApiResponse::success(service::stats(&state, &filter).await?))
}

/// GET /api/v1/dashboard/recent-activity
pub async fn recent_activity(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<DashboardFilter>,
) -> ApiResult<Vec<RecentActivity>> {
    Ok(ApiResponse::success(
        service::recent_activity(&state, &filter).await?,
    ))
}

/// GET /api/v1/dashboard/category-stats
pub async fn category_stats(State(state): State<AppState>) -> ApiResult<Vec<CategoryStats>> {
    Ok(ApiResponse::success(service::category_stats(&state).await?))
}

/// GET /api/v1/dashboard/price-distribution
pub async fn price_distribution(
    State(state): State<AppState>,
) -> ApiResult<Vec<PriceDistribution>> {
    Ok(ApiResponse::success(service::price_distribution(&state).await?))
}

/// GET /api/v1/dashboard/weekly-data
pub async fn weekly_data(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<DashboardFilter>,
) -> ApiResult<Vec<WeeklyItemsData>> {
    Ok(ApiResponse::success(service::weekly_data(&state, &filter).await?))
}

/// GET /api/v1/dashboard/menu-health
pub async fn menu_health(State(state): State<AppState>) -> ApiResult<MenuHealthMetrics> {
    Ok(ApiResponse::success(service::menu_health(&state).await?))
}
