//! Domain models
//!
//! Entities mirror database rows (`FromRow` with the `db` feature); the
//! `*Create` / `*Update` payloads carry their own input validation.

pub mod category;
pub mod content;
pub mod dashboard;
pub mod item;
pub mod menu;
pub mod restaurant;
pub mod subcategory;

pub use category::{Category, CategoryCreate, CategoryFilter, CategoryUpdate};
pub use content::{ContentCreate, ContentFilter, ContentSection, ContentUpdate};
pub use item::{Item, ItemCreate, ItemFilter, ItemUpdate, PriceUpdate};
pub use menu::{CategoryMenu, CompleteMenu, MenuStats};
pub use restaurant::{
    OperatingHour, OperatingHourInput, OperatingHoursUpdate, RestaurantInfo,
    RestaurantInfoCreate, RestaurantInfoUpdate,
};
pub use subcategory::{SubCategory, SubCategoryCreate, SubCategoryFilter, SubCategoryUpdate};

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Body of `PATCH /{id}/order`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayOrderUpdate {
    pub display_order: i32,
}

impl DisplayOrderUpdate {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_display_order(Some(self.display_order))
    }
}

/// Trim `value` and check it is non-empty and at most `max` characters
pub(crate) fn required_text(field: &str, value: &str, max: usize) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_field(field, format!("{field} is required")));
    }
    check_max_len(field, trimmed, max)?;
    Ok(trimmed.to_string())
}

pub(crate) fn check_max_len(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(
            AppError::invalid_field(field, format!("{field} must be at most {max} characters"))
                .with_detail("max", max),
        );
    }
    Ok(())
}

pub(crate) fn validate_display_order(value: Option<i32>) -> Result<(), AppError> {
    match value {
        Some(order) if order < 0 => Err(AppError::invalid_field(
            "display_order",
            "display_order must be zero or greater",
        )),
        _ => Ok(()),
    }
}

/// JSON columns hold objects; `null` is accepted and stored as `{}`
pub(crate) fn json_object(
    field: &str,
    value: Option<&serde_json::Value>,
) -> Result<serde_json::Value, AppError> {
    match value {
        None | Some(serde_json::Value::Null) => Ok(serde_json::json!({})),
        Some(v @ serde_json::Value::Object(_)) => Ok(v.clone()),
        Some(_) => Err(AppError::invalid_field(
            field,
            format!("{field} must be a JSON object"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_required_text() {
        assert_eq!(required_text("name", "  Drinks ", 100).unwrap(), "Drinks");
        let err = required_text("name", "   ", 100).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(required_text("name", &"x".repeat(101), 100).is_err());
        assert!(required_text("name", &"é".repeat(100), 100).is_ok());
    }

    #[test]
    fn test_display_order() {
        assert!(DisplayOrderUpdate { display_order: 0 }.validate().is_ok());
        assert!(DisplayOrderUpdate { display_order: -1 }.validate().is_err());
    }

    #[test]
    fn test_json_object() {
        assert_eq!(json_object("address", None).unwrap(), serde_json::json!({}));
        let v = serde_json::json!({"city": "Dubai"});
        assert_eq!(json_object("address", Some(&v)).unwrap(), v);
        assert!(json_object("address", Some(&serde_json::json!([1]))).is_err());
    }
}
