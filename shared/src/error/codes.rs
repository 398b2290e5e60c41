//! Error codes for the menu backend
//!
//! Codes are grouped by range:
//! - 0xxx: General errors
//! - 1xxx: Access errors (auth, rate limiting)
//! - 2xxx: Menu catalog errors (categories, subcategories, items)
//! - 3xxx: Restaurant errors (info, operating hours)
//! - 4xxx: Content section errors
//! - 5xxx: Storage / upload errors
//! - 9xxx: System errors

use std::fmt;

/// Fine-grained error code
///
/// The numeric value is stable and used in logs; clients see the coarser
/// [`ErrorKind`](super::ErrorKind) returned by [`ErrorCode::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Malformed request
    InvalidRequest = 5,
    /// Path id is not a positive integer
    InvalidId = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Access ====================
    /// Authentication required
    NotAuthenticated = 1001,
    /// Permission denied
    PermissionDenied = 1002,
    /// Too many requests from this client
    TooManyRequests = 1003,

    // ==================== 2xxx: Menu catalog ====================
    CategoryNotFound = 2001,
    CategoryNameExists = 2002,
    CategoryHasSubcategories = 2003,
    SubCategoryNotFound = 2101,
    SubCategoryNameExists = 2102,
    SubCategoryHasItems = 2103,
    ItemNotFound = 2201,
    ItemInvalidPrice = 2202,

    // ==================== 3xxx: Restaurant ====================
    RestaurantNotFound = 3001,
    RestaurantAlreadyExists = 3002,
    OperatingHourNotFound = 3003,
    InvalidOperatingHours = 3004,

    // ==================== 4xxx: Content ====================
    ContentNotFound = 4001,
    ContentSectionExists = 4002,

    // ==================== 5xxx: Storage ====================
    FileTooLarge = 5001,
    EmptyFile = 5002,
    InvalidFileExtension = 5003,
    InvalidContentType = 5004,
    ImageNotFound = 5005,
    InvalidImage = 5006,
    StorageFailed = 5007,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    DatabaseError = 9002,
    ConfigError = 9003,
    ServiceUnavailable = 9004,
    TimeoutError = 9005,
    NotImplemented = 9006,
}

impl ErrorCode {
    /// Numeric value of this code
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Default human-readable message
    pub fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Unknown => "Unknown error",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidId => "ID must be a positive integer",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Access
            ErrorCode::NotAuthenticated => "Unauthorized access",
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::TooManyRequests => "Rate limit exceeded",

            // Menu catalog
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryNameExists => "Category with this name already exists",
            ErrorCode::CategoryHasSubcategories => {
                "Cannot delete category with existing subcategories"
            }
            ErrorCode::SubCategoryNotFound => "Subcategory not found",
            ErrorCode::SubCategoryNameExists => {
                "Subcategory with this name already exists in category"
            }
            ErrorCode::SubCategoryHasItems => "Cannot delete subcategory with existing items",
            ErrorCode::ItemNotFound => "Item not found",
            ErrorCode::ItemInvalidPrice => "Price must be zero or greater",

            // Restaurant
            ErrorCode::RestaurantNotFound => "Restaurant info not found",
            ErrorCode::RestaurantAlreadyExists => "Restaurant info already exists",
            ErrorCode::OperatingHourNotFound => "Operating hours not found",
            ErrorCode::InvalidOperatingHours => "Invalid operating hours",

            // Content
            ErrorCode::ContentNotFound => "Content section not found",
            ErrorCode::ContentSectionExists => "Content section with this name already exists",

            // Storage
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::InvalidFileExtension => "Invalid file extension",
            ErrorCode::InvalidContentType => "Invalid content type",
            ErrorCode::ImageNotFound => "Image not found",
            ErrorCode::InvalidImage => "File is not a valid image",
            ErrorCode::StorageFailed => "Object storage operation failed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::ServiceUnavailable => "Service unavailable",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::NotImplemented => "Not implemented",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::CategoryNameExists.code(), 2002);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(u16::from(ErrorCode::FileTooLarge), 5001);
    }

    #[test]
    fn test_display_is_padded() {
        assert_eq!(ErrorCode::NotFound.to_string(), "E0003");
        assert_eq!(ErrorCode::ItemNotFound.to_string(), "E2201");
    }

    #[test]
    fn test_default_messages() {
        assert_eq!(
            ErrorCode::CategoryHasSubcategories.message(),
            "Cannot delete category with existing subcategories"
        );
        assert_eq!(ErrorCode::InternalError.message(), "Internal server error");
    }
}
