//! Response envelope
//!
//! Every endpoint answers with the same shape:
//!
//! ```json
//! {
//!   "success": true,
//!   "data": { ... },
//!   "meta": { "request_id": "...", "timestamp": "2024-01-01T00:00:00Z" }
//! }
//! ```
//!
//! Errors replace `data` with `error: { code, message, details }`.

use crate::error::{AppError, ErrorKind};
use crate::query::Pagination;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;

tokio::task_local! {
    static REQUEST_ID: String;
}

/// Run `fut` with `request_id` visible to [`current_request_id`]
pub async fn scope_request_id<F: Future>(request_id: String, fut: F) -> F::Output {
    REQUEST_ID.scope(request_id, fut).await
}

/// Request id of the request being handled on this task, if any
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|id| id.clone()).ok()
}

/// Error body of the envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

/// Envelope metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Meta {
    /// Meta stamped with the current request id and time
    pub fn now() -> Self {
        Self {
            pagination: None,
            total: None,
            request_id: current_request_id(),
            timestamp: Some(crate::util::now_rfc3339()),
        }
    }
}

/// Unified API response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// HTTP status used when rendered; not part of the body
    #[serde(skip)]
    pub status: StatusCode,
}

impl<T> ApiResponse<T> {
    /// 200 with data
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: Some(Meta::now()),
            status: StatusCode::OK,
        }
    }

    /// 201 with data
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::success(data)
        }
    }

    /// 200 with data and pagination meta
    pub fn paginated(data: T, pagination: Pagination) -> Self {
        Self::success(data).with_pagination(pagination)
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.meta.get_or_insert_with(Meta::now).pagination = Some(pagination);
        self
    }

    pub fn with_total(mut self, total: i64) -> Self {
        self.meta.get_or_insert_with(Meta::now).total = Some(total);
        self
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl ApiResponse<()> {
    /// 204, rendered without a body
    pub fn no_content() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            meta: None,
            status: StatusCode::NO_CONTENT,
        }
    }

    /// Failure envelope for an [`AppError`]
    pub fn error(err: &AppError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiErrorBody {
                code: err.kind(),
                message: err.message.clone(),
                details: err.details.clone(),
            }),
            meta: Some(Meta::now()),
            status: err.http_status(),
        }
    }
}

impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        if self.status == StatusCode::NO_CONTENT {
            return StatusCode::NO_CONTENT.into_response();
        }
        let status = self.status;
        (status, axum::Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_success_envelope() {
        let response = ApiResponse::success(42);
        assert!(response.success);
        assert_eq!(response.data, Some(42));
        assert!(response.error.is_none());
        assert_eq!(response.status, StatusCode::OK);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 42);
        assert!(json.get("error").is_none());
        assert!(json["meta"]["timestamp"].is_string());
        assert!(json.get("status").is_none());
    }

    #[test]
    fn test_created_status() {
        let response = ApiResponse::created("x");
        assert_eq!(response.status, StatusCode::CREATED);
    }

    #[test]
    fn test_error_envelope() {
        let err = AppError::new(ErrorCode::CategoryNameExists).with_detail("name", "Drinks");
        let response = ApiResponse::<()>::error(&err);
        assert_eq!(response.status, StatusCode::CONFLICT);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "CONFLICT_ERROR");
        assert_eq!(
            json["error"]["message"],
            "Category with this name already exists"
        );
        assert_eq!(json["error"]["details"]["name"], "Drinks");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_paginated_meta() {
        let response = ApiResponse::paginated(vec![1, 2], Pagination::new(2, 2, 5));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["meta"]["pagination"]["page"], 2);
        assert_eq!(json["meta"]["pagination"]["total_pages"], 3);
        assert_eq!(json["meta"]["pagination"]["has_next"], true);
        assert_eq!(json["meta"]["pagination"]["has_prev"], true);
    }

    #[tokio::test]
    async fn test_request_id_scope() {
        assert!(current_request_id().is_none());
        let meta = scope_request_id("req-1".to_string(), async { Meta::now() }).await;
        assert_eq!(meta.request_id.as_deref(), Some("req-1"));
    }

    #[test]
    fn test_deserialize_envelope() {
        let json = r#"{"success":true,"data":[1,2,3],"meta":{"total":3}}"#;
        let response: ApiResponse<Vec<i32>> = serde_json::from_str(json).unwrap();
        assert!(response.success);
        assert_eq!(response.data, Some(vec![1, 2, 3]));
        assert_eq!(response.meta.unwrap().total, Some(3));
    }
}
