//! Extractors that report rejections as envelope errors

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::Json;
use http::request::Parts;
use serde::de::DeserializeOwned;
use shared::AppError;

/// `Json<T>` whose rejection is a `VALIDATION_ERROR` / `BAD_REQUEST_ERROR` envelope
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(e) => {
            AppError::validation("Invalid request body").with_detail("reason", e.body_text())
        }
        JsonRejection::JsonSyntaxError(e) => {
            AppError::bad_request("Malformed JSON body").with_detail("reason", e.body_text())
        }
        JsonRejection::MissingJsonContentType(_) => {
            AppError::bad_request("Expected Content-Type: application/json")
        }
        other => AppError::bad_request("Invalid request body").with_detail("reason", other.body_text()),
    }
}

/// `Query<T>` whose rejection is a `VALIDATION_ERROR` envelope
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection: QueryRejection| {
                AppError::validation("Invalid query parameters")
                    .with_detail("reason", rejection.body_text())
            })
    }
}

/// Parse a path id; anything but a positive integer is "Invalid {resource} ID"
pub fn parse_id(raw: &str, resource: &str) -> Result<i64, AppError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::invalid_id(resource).with_detail("value", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorKind;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42", "category").unwrap(), 42);
        for bad in ["0", "-3", "abc", "1.5", ""] {
            let err = parse_id(bad, "category").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::BadRequest);
            assert_eq!(err.message, "Invalid category ID");
        }
    }
}
