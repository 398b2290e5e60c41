//! Image upload API module

mod handler;

use axum::extract::DefaultBodyLimit;
use axum::{Router, routing::get, routing::post};

use crate::services::upload::MAX_FILE_SIZE;
use crate::state::AppState;

/// Multipart overhead allowed on top of the image itself
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new().nest("/upload", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/image",
            post(handler::upload_image)
                .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + MULTIPART_OVERHEAD)),
        )
        .route(
            "/image/{*key}",
            get(handler::image_info).delete(handler::delete_image),
        )
        .route("/presigned-url", get(handler::presigned_url))
}
