//! Menu image storage on S3
//!
//! Images are stored under `{folder}/{uuid}{ext}` and served from the
//! bucket's public URL. Clients may also upload directly with a presigned PUT.

use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::{ByteStream, DateTimeFormat};
use serde::{Deserialize, Serialize};
use shared::{AppError, ErrorCode};
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

use crate::error::ServiceResult;
use crate::state::AppState;

/// Maximum image size (10MB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Accepted file extensions
const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

/// Content types accepted for presigned uploads
const PRESIGN_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

pub const DEFAULT_FOLDER: &str = "items";

const FOLDER_MAX_LEN: usize = 50;

/// Presigned URL lifetime in minutes
const PRESIGN_DEFAULT_MINUTES: i64 = 15;
const PRESIGN_MAX_MINUTES: i64 = 60;

/// Image received from a multipart upload
#[derive(Debug)]
pub struct ImageUpload {
    pub data: Vec<u8>,
    pub filename: String,
    pub content_type: Option<String>,
    pub folder: Option<String>,
}

/// Stored image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedImage {
    pub key: String,
    pub url: String,
    pub bucket: String,
    pub size: usize,
    pub mime_type: String,
}

/// Object metadata from S3
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageInfo {
    pub key: String,
    pub size: i64,
    pub content_type: Option<String>,
    pub last_modified: Option<String>,
    pub url: String,
}

/// `GET /upload/presigned-url` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PresignQuery {
    pub key: Option<String>,
    pub content_type: Option<String>,
    /// Minutes
    pub expires_in: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresignedUpload {
    pub url: String,
    pub key: String,
    /// Minutes
    pub expires_in: i64,
    pub method: String,
}

/// Folder name, defaulting to `items`; only `[a-z0-9_-]` is allowed
pub fn validate_folder(folder: Option<&str>) -> Result<String, AppError> {
    let folder = match folder.map(str::trim) {
        None | Some("") => return Ok(DEFAULT_FOLDER.to_string()),
        Some(f) => f,
    };
    let valid = folder.len() <= FOLDER_MAX_LEN
        && folder
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
    if !valid {
        return Err(AppError::invalid_field(
            "folder",
            "Folder may only contain lowercase letters, digits, '_' and '-'",
        ));
    }
    Ok(folder.to_string())
}

/// Lowercased extension of `filename` if it is on the whitelist
pub fn validate_extension(filename: &str) -> Result<String, AppError> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::new(ErrorCode::InvalidFileExtension)
            .with_detail("extension", ext)
            .with_detail("allowed", SUPPORTED_EXTENSIONS.join(", ")));
    }
    Ok(ext)
}

/// Size, content type and decode checks for an uploaded image
pub fn validate_image(upload: &ImageUpload) -> Result<String, AppError> {
    if upload.data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }
    if upload.data.len() > MAX_FILE_SIZE {
        return Err(AppError::new(ErrorCode::FileTooLarge)
            .with_detail("size", upload.data.len())
            .with_detail("max_size", MAX_FILE_SIZE));
    }

    let ext = validate_extension(&upload.filename)?;

    match upload.content_type.as_deref() {
        Some(ct) if ct.starts_with("image/") => {}
        other => {
            return Err(AppError::new(ErrorCode::InvalidContentType)
                .with_detail("content_type", other.unwrap_or("")));
        }
    }

    if let Err(e) = image::load_from_memory(&upload.data) {
        return Err(AppError::new(ErrorCode::InvalidImage).with_detail("reason", e.to_string()));
    }

    Ok(ext)
}

/// Object keys come from the URL path; reject empty keys and traversal
pub fn validate_key(key: &str) -> Result<&str, AppError> {
    let key = key.trim_start_matches('/');
    if key.is_empty() || key.split('/').any(|part| part == "..") {
        return Err(AppError::invalid_field("key", "Invalid object key"));
    }
    Ok(key)
}

/// Expiry in minutes, default 15, within 1..=60
pub fn presign_minutes(expires_in: Option<i64>) -> Result<i64, AppError> {
    match expires_in {
        None => Ok(PRESIGN_DEFAULT_MINUTES),
        Some(m) if (1..=PRESIGN_MAX_MINUTES).contains(&m) => Ok(m),
        Some(m) => Err(AppError::new(ErrorCode::ValueOutOfRange)
            .with_detail("field", "expires_in")
            .with_detail("value", m)
            .with_detail("min", 1)
            .with_detail("max", PRESIGN_MAX_MINUTES)),
    }
}

fn storage_error(op: &str, key: &str, e: impl std::fmt::Display) -> AppError {
    tracing::error!(op, key, error = %e, "S3 request failed");
    AppError::new(ErrorCode::StorageFailed)
}

fn image_not_found(key: &str) -> AppError {
    AppError::new(ErrorCode::ImageNotFound).with_detail("key", key)
}

pub async fn store_image(state: &AppState, upload: ImageUpload) -> ServiceResult<UploadedImage> {
    let folder = validate_folder(upload.folder.as_deref())?;
    let ext = validate_image(&upload)?;

    let key = format!("{folder}/{}.{ext}", Uuid::new_v4());
    let mime_type = mime_guess::from_ext(&ext).first_or_octet_stream().to_string();
    let size = upload.data.len();

    state
        .s3
        .client
        .put_object()
        .bucket(&state.s3.bucket)
        .key(&key)
        .body(ByteStream::from(upload.data))
        .content_type(&mime_type)
        .send()
        .await
        .map_err(|e| storage_error("put_object", &key, e))?;

    tracing::info!(key = %key, size, original = %upload.filename, "Image uploaded");

    Ok(UploadedImage {
        url: state.s3.public_url(&key),
        key,
        bucket: state.s3.bucket.clone(),
        size,
        mime_type,
    })
}

pub async fn image_info(state: &AppState, key: &str) -> ServiceResult<ImageInfo> {
    let key = validate_key(key)?;
    let head = state
        .s3
        .client
        .head_object()
        .bucket(&state.s3.bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| {
            if e.as_service_error().is_some_and(|se| se.is_not_found()) {
                image_not_found(key)
            } else {
                storage_error("head_object", key, e)
            }
        })?;

    Ok(ImageInfo {
        key: key.to_string(),
        size: head.content_length().unwrap_or(0),
        content_type: head.content_type().map(str::to_string),
        last_modified: head
            .last_modified()
            .and_then(|t| t.fmt(DateTimeFormat::DateTime).ok()),
        url: state.s3.public_url(key),
    })
}

/// 404 when the object is absent, otherwise delete it
pub async fn delete_image(state: &AppState, key: &str) -> ServiceResult<()> {
    let info = image_info(state, key).await?;

    state
        .s3
        .client
        .delete_object()
        .bucket(&state.s3.bucket)
        .key(&info.key)
        .send()
        .await
        .map_err(|e| storage_error("delete_object", &info.key, e))?;

    tracing::info!(key = %info.key, "Image deleted");
    Ok(())
}

/// Presigned PUT for a direct browser upload
pub async fn presigned_upload(
    state: &AppState,
    query: PresignQuery,
) -> ServiceResult<PresignedUpload> {
    let key = query
        .key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| AppError::new(ErrorCode::RequiredField).with_detail("field", "key"))?;
    let key = validate_key(key)?.to_string();

    let content_type = query
        .content_type
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| {
            AppError::new(ErrorCode::RequiredField).with_detail("field", "content_type")
        })?;
    if !PRESIGN_CONTENT_TYPES.contains(&content_type) {
        return Err(AppError::new(ErrorCode::InvalidContentType)
            .with_detail("content_type", content_type)
            .with_detail("allowed", PRESIGN_CONTENT_TYPES.join(", "))
            .into());
    }

    let minutes = presign_minutes(query.expires_in)?;
    let presigning = PresigningConfig::expires_in(Duration::from_secs(minutes as u64 * 60))
        .map_err(|e| storage_error("presign_config", &key, e))?;

    let presigned = state
        .s3
        .client
        .put_object()
        .bucket(&state.s3.bucket)
        .key(&key)
        .content_type(content_type)
        .presigned(presigning)
        .await
        .map_err(|e| storage_error("presign_put_object", &key, e))?;

    Ok(PresignedUpload {
        url: presigned.uri().to_string(),
        key,
        expires_in: minutes,
        method: "PUT".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorKind;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([200, 30, 30]));
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn upload(data: Vec<u8>, filename: &str, content_type: Option<&str>) -> ImageUpload {
        ImageUpload {
            data,
            filename: filename.to_string(),
            content_type: content_type.map(str::to_string),
            folder: None,
        }
    }

    #[test]
    fn test_folder_rules() {
        assert_eq!(validate_folder(None).unwrap(), "items");
        assert_eq!(validate_folder(Some("  ")).unwrap(), "items");
        assert_eq!(validate_folder(Some("hero_banners-2")).unwrap(), "hero_banners-2");
        assert!(validate_folder(Some("Items")).is_err());
        assert!(validate_folder(Some("../etc")).is_err());
        assert!(validate_folder(Some("a/b")).is_err());
    }

    #[test]
    fn test_extension_whitelist() {
        assert_eq!(validate_extension("dish.JPG").unwrap(), "jpg");
        assert_eq!(validate_extension("dish.webp").unwrap(), "webp");
        let err = validate_extension("menu.pdf").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFileExtension);
        assert!(validate_extension("noext").is_err());
    }

    #[test]
    fn test_validate_image() {
        let ok = upload(png_bytes(), "dish.png", Some("image/png"));
        assert_eq!(validate_image(&ok).unwrap(), "png");

        let empty = upload(Vec::new(), "dish.png", Some("image/png"));
        assert_eq!(validate_image(&empty).unwrap_err().code, ErrorCode::EmptyFile);

        let big = upload(vec![0; MAX_FILE_SIZE + 1], "dish.png", Some("image/png"));
        assert_eq!(validate_image(&big).unwrap_err().code, ErrorCode::FileTooLarge);

        let wrong_type = upload(png_bytes(), "dish.png", Some("text/plain"));
        assert_eq!(
            validate_image(&wrong_type).unwrap_err().code,
            ErrorCode::InvalidContentType
        );

        let garbage = upload(b"not an image".to_vec(), "dish.png", Some("image/png"));
        let err = validate_image(&garbage).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidImage);
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_validate_key() {
        assert_eq!(validate_key("items/a.png").unwrap(), "items/a.png");
        assert_eq!(validate_key("/items/a.png").unwrap(), "items/a.png");
        assert!(validate_key("").is_err());
        assert!(validate_key("items/../secret").is_err());
    }

    #[test]
    fn test_presign_minutes() {
        assert_eq!(presign_minutes(None).unwrap(), 15);
        assert_eq!(presign_minutes(Some(1)).unwrap(), 1);
        assert_eq!(presign_minutes(Some(60)).unwrap(), 60);
        assert!(presign_minutes(Some(0)).is_err());
        assert!(presign_minutes(Some(61)).is_err());
    }
}
