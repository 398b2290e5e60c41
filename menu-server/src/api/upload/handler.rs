//! Upload API Handlers

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, Path, State};
use http::StatusCode;
use shared::{ApiResponse, AppError, ErrorCode};

use crate::api::{ApiQuery, ApiResult};
use crate::services::upload::{
    self as service, ImageInfo, ImageUpload, MAX_FILE_SIZE, PresignQuery, PresignedUpload,
    UploadedImage,
};
use crate::state::AppState;

const IMAGE_FIELD: &str = "image";
const FOLDER_FIELD: &str = "folder";

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::new(ErrorCode::FileTooLarge).with_detail("max_size", MAX_FILE_SIZE)
    } else {
        AppError::bad_request("Invalid multipart request").with_detail("reason", e.body_text())
    }
}

/// POST /api/v1/upload/image
///
/// Multipart fields: `image` (required), `folder` (optional).
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<UploadedImage> {
    let mut multipart = multipart.map_err(|rejection| {
        AppError::bad_request("Expected a multipart/form-data body")
            .with_detail("reason", rejection.body_text())
    })?;
    let mut image: Option<(Vec<u8>, String, Option<String>)> = None;
    let mut folder: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some(IMAGE_FIELD) => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?.to_vec();
                image = Some((data, filename, content_type));
            }
            Some(FOLDER_FIELD) => {
                folder = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let (data, filename, content_type) = image.ok_or_else(|| {
        AppError::new(ErrorCode::RequiredField)
            .with_detail("field", IMAGE_FIELD)
            .with_detail("reason", "No 'image' field found")
    })?;

    let uploaded = service::store_image(
        &state,
        ImageUpload {
            data,
            filename,
            content_type,
            folder,
        },
    )
    .await?;
    Ok(ApiResponse::created(uploaded))
}

/// GET /api/v1/upload/image/{*key}
pub async fn image_info(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<ImageInfo> {
    Ok(ApiResponse::success(service::image_info(&state, &key).await?))
}

/// DELETE /api/v1/upload/image/{*key}
pub async fn delete_image(State(state): State<AppState>, Path(key): Path<String>) -> ApiResult<()> {
    service::delete_image(&state, &key).await?;
    Ok(ApiResponse::no_content())
}

/// GET /api/v1/upload/presigned-url
pub async fn presigned_url(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PresignQuery>,
) -> ApiResult<PresignedUpload> {
    Ok(ApiResponse::success(
        service::presigned_upload(&state, query).await?,
    ))
}
