//! Restaurant API module

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/restaurants", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/info",
            get(handler::get_info)
                .post(handler::create_info)
                .put(handler::update_info)
                .delete(handler::delete_info),
        )
        .route("/hours", get(handler::list_hours).put(handler::replace_hours))
        .route("/hours/{day}", get(handler::hours_for_day))
}
