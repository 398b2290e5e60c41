//! Wire-level error kinds and their HTTP status mapping

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Error taxonomy exposed to clients in `error.code`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "VALIDATION_ERROR")]
    Validation,
    #[serde(rename = "BAD_REQUEST_ERROR")]
    BadRequest,
    #[serde(rename = "UNAUTHORIZED_ERROR")]
    Unauthorized,
    #[serde(rename = "FORBIDDEN_ERROR")]
    Forbidden,
    #[serde(rename = "NOT_FOUND_ERROR")]
    NotFound,
    #[serde(rename = "CONFLICT_ERROR")]
    Conflict,
    #[serde(rename = "RATE_LIMIT_ERROR")]
    RateLimit,
    #[serde(rename = "INTERNAL_ERROR")]
    Internal,
    #[serde(rename = "NOT_IMPLEMENTED_ERROR")]
    NotImplemented,
    #[serde(rename = "SERVICE_UNAVAILABLE_ERROR")]
    ServiceUnavailable,
}

impl ErrorKind {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Validation | Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::RateLimit => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Wire name, as serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST_ERROR",
            Self::Unauthorized => "UNAUTHORIZED_ERROR",
            Self::Forbidden => "FORBIDDEN_ERROR",
            Self::NotFound => "NOT_FOUND_ERROR",
            Self::Conflict => "CONFLICT_ERROR",
            Self::RateLimit => "RATE_LIMIT_ERROR",
            Self::Internal => "INTERNAL_ERROR",
            Self::NotImplemented => "NOT_IMPLEMENTED_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE_ERROR",
        }
    }
}

impl ErrorCode {
    /// Client-facing kind for this code
    pub fn kind(&self) -> ErrorKind {
        match self {
            // 400 Validation
            Self::ValidationFailed
            | Self::RequiredField
            | Self::ValueOutOfRange
            | Self::ItemInvalidPrice
            | Self::InvalidOperatingHours
            | Self::FileTooLarge
            | Self::EmptyFile
            | Self::InvalidFileExtension
            | Self::InvalidContentType
            | Self::InvalidImage => ErrorKind::Validation,

            // 400 Bad request
            Self::InvalidRequest | Self::InvalidId => ErrorKind::BadRequest,

            // 404 Not Found
            Self::NotFound
            | Self::CategoryNotFound
            | Self::SubCategoryNotFound
            | Self::ItemNotFound
            | Self::RestaurantNotFound
            | Self::OperatingHourNotFound
            | Self::ContentNotFound
            | Self::ImageNotFound => ErrorKind::NotFound,

            // 409 Conflict
            Self::AlreadyExists
            | Self::CategoryNameExists
            | Self::CategoryHasSubcategories
            | Self::SubCategoryNameExists
            | Self::SubCategoryHasItems
            | Self::RestaurantAlreadyExists
            | Self::ContentSectionExists => ErrorKind::Conflict,

            Self::NotAuthenticated => ErrorKind::Unauthorized,
            Self::PermissionDenied => ErrorKind::Forbidden,
            Self::TooManyRequests => ErrorKind::RateLimit,
            Self::NotImplemented => ErrorKind::NotImplemented,

            // 503 (transient, client can retry)
            Self::ServiceUnavailable | Self::TimeoutError => ErrorKind::ServiceUnavailable,

            // 500
            Self::Unknown
            | Self::StorageFailed
            | Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError => ErrorKind::Internal,
        }
    }

    /// HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        self.kind().http_status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::CategoryNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ErrorCode::ImageNotFound.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(
            ErrorCode::CategoryNameExists.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::CategoryHasSubcategories.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::ContentSectionExists.http_status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_bad_request_and_validation() {
        assert_eq!(ErrorCode::InvalidId.kind(), ErrorKind::BadRequest);
        assert_eq!(ErrorCode::InvalidId.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::FileTooLarge.kind(), ErrorKind::Validation);
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_other_statuses() {
        assert_eq!(
            ErrorCode::TooManyRequests.http_status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ErrorCode::NotImplemented.http_status(),
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            ErrorCode::TimeoutError.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_kind_serializes_to_wire_name() {
        let json = serde_json::to_string(&ErrorKind::NotFound).unwrap();
        assert_eq!(json, "\"NOT_FOUND_ERROR\"");
        assert_eq!(ErrorKind::Conflict.as_str(), "CONFLICT_ERROR");
        let kind: ErrorKind = serde_json::from_str("\"RATE_LIMIT_ERROR\"").unwrap();
        assert_eq!(kind, ErrorKind::RateLimit);
    }
}
