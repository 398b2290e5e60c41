//! HTTP API
//!
//! Each resource lives in its own module with a `router()` nested under
//! `/api/v1`. [`build_app`] wraps the routes with the middleware stack.

pub mod category;
pub mod content;
pub mod dashboard;
pub mod extract;
pub mod health;
pub mod item;
pub mod menu;
pub mod restaurant;
pub mod subcategory;
pub mod upload;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue, Method, header};
use shared::{ApiResponse, AppError};
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::Config;
use crate::middleware;
use crate::middleware::request_context::REQUEST_ID_HEADER;
use crate::state::AppState;

pub use extract::{ApiJson, ApiQuery, parse_id};

/// Handler result: envelope on success, envelope error otherwise
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

pub const API_PREFIX: &str = "/api/v1";

/// Uuid v4 request ids; an incoming `X-Request-ID` is kept as is
#[derive(Clone, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// All routes, without middleware or state
pub fn build_router() -> Router<AppState> {
    let api = Router::new()
        .merge(category::router())
        .merge(subcategory::router())
        .merge(item::router())
        .merge(menu::router())
        .merge(restaurant::router())
        .merge(content::router())
        .merge(upload::router())
        .merge(dashboard::router())
        .merge(health::api_router());

    Router::new()
        .merge(health::router())
        .nest(API_PREFIX, api)
        .fallback(fallback)
}

/// Routes plus the full middleware stack and state
pub fn build_app(state: AppState) -> Router {
    let config = state.config.clone();

    build_router()
        // Innermost: rate limiting sees the request after context and logging are set up
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit,
        ))
        .layer(axum_middleware::from_fn(middleware::request_context))
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        // Outermost: every layer below sees the id
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            UuidRequestId,
        ))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origin = if config.cors_allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            config
                .cors_allowed_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([
            HeaderName::from_static(REQUEST_ID_HEADER),
            HeaderName::from_static("x-ratelimit-limit"),
            HeaderName::from_static("x-ratelimit-remaining"),
            HeaderName::from_static("x-ratelimit-reset"),
        ])
        .max_age(Duration::from_secs(3600))
}

async fn fallback(uri: http::Uri) -> AppError {
    AppError::not_found("Route").with_detail("path", uri.path())
}
