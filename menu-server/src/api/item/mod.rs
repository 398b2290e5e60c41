//! Item API module

mod handler;

pub(super) use handler::{LimitQuery, SearchQuery};

use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/items", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // Static segments before /{id}
        .route("/search", get(handler::search))
        .route("/featured", get(handler::featured))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/toggle", patch(handler::toggle))
        .route("/{id}/order", patch(handler::update_order))
        .route("/{id}/price", patch(handler::update_price))
}
