//! Shared types for the restaurant menu backend
//!
//! Error system, response envelope, list query primitives, domain models
//! and small utilities used by the server and its tooling.

pub mod error;
pub mod models;
pub mod query;
pub mod response;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode, ErrorKind};
pub use query::{PageRequest, Pagination};
pub use response::ApiResponse;
