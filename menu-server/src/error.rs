//! Service-layer error type
//!
//! `ServiceError` bridges repository errors (`sqlx::Error`, `BoxError`) and the
//! API-layer `AppError` so services can use `?` on both.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";
/// Postgres SQLSTATE for foreign_key_violation
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Database or infrastructure error (sqlx, S3, ...); logged, mapped to InternalError
    #[error("database error: {0}")]
    Db(BoxError),
    /// Business-rule error, passed through to the client
    #[error(transparent)]
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error() {
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    let err = AppError::conflict("Resource with these values already exists");
                    return ServiceError::App(match db_err.constraint() {
                        Some(constraint) => err.with_detail("constraint", constraint),
                        None => err,
                    });
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    return ServiceError::App(AppError::validation(
                        "Referenced resource does not exist",
                    ));
                }
                _ => {}
            }
        }
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        // Repositories return BoxError; recover typed sqlx errors so constraint
        // violations still surface as 409/400
        match e.downcast::<sqlx::Error>() {
            Ok(sqlx_err) => ServiceError::from(*sqlx_err),
            Err(other) => ServiceError::Db(other),
        }
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorKind;

    #[test]
    fn test_db_error_maps_to_internal() {
        let err: AppError = ServiceError::from(sqlx::Error::RowNotFound).into();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.message, "Internal server error");
    }

    #[test]
    fn test_boxed_error_maps_to_internal() {
        let boxed: BoxError = "s3 exploded".into();
        let err: AppError = ServiceError::from(boxed).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_app_error_passes_through() {
        let err: AppError = ServiceError::from(AppError::new(ErrorCode::ItemNotFound)).into();
        assert_eq!(err.code, ErrorCode::ItemNotFound);
    }
}
