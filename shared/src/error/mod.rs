//! Unified error system for the menu backend
//!
//! - [`ErrorCode`]: fine-grained codes, grouped by range
//! - [`ErrorCategory`]: classification by code range
//! - [`ErrorKind`]: client-facing taxonomy, mapped to HTTP status
//! - [`AppError`]: error type carrying a code, message and details
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ErrorKind};
//!
//! let err = AppError::new(ErrorCode::CategoryNotFound);
//! assert_eq!(err.kind(), ErrorKind::NotFound);
//!
//! let err = AppError::validation("Name is required").with_detail("field", "name");
//! assert_eq!(err.http_status().as_u16(), 400);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::ErrorCode;
pub use self::http::ErrorKind;
pub use types::{AppError, AppResult};
