//! Makes the request id visible to envelope `meta` for the rest of the request

use axum::{extract::Request, middleware::Next, response::Response};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Read the id set by `SetRequestIdLayer` and scope it to the handler task
pub async fn request_context(req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    shared::response::scope_request_id(request_id, next.run(req)).await
}
