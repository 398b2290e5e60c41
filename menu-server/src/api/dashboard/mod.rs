//! Dashboard API module

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/dashboard", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::complete))
        .route("/stats", get(handler::stats))
        .route("/recent-activity", get(handler::recent_activity))
        .route("/category-stats", get(handler::category_stats))
        .route("/price-distribution", get(handler::price_distribution))
        .route("/weekly-data", get(handler::weekly_data))
        .route("/menu-health", get(handler::menu_health))
}
