//! HTTP middleware

pub mod logging;
pub mod rate_limit;
pub mod request_context;

pub use logging::logging_middleware;
pub use rate_limit::{RateLimiter, rate_limit};
pub use request_context::request_context;
