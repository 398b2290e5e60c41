//! Public menu API module
//!
//! Read-only views of the catalog for customer-facing clients.

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/menu", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::complete))
        .route("/search", get(handler::search))
        .route("/featured", get(handler::featured))
        .route("/categories/{id}", get(handler::category))
}
