//! Category Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::subcategory::SubCategory;
use super::{required_text, validate_display_order};
use crate::error::AppError;

pub const NAME_MAX_LEN: usize = 100;

/// Top level of the menu hierarchy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub slug: String,
    pub display_order: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Populated only when requested (`include_subcategories`, complete menu)
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_categories: Option<Vec<SubCategory>>,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub description: Option<String>,
    pub display_order: Option<i32>,
    pub active: Option<bool>,
}

impl CategoryCreate {
    /// Validate and normalize in place (trims the name)
    pub fn validate(&mut self) -> Result<(), AppError> {
        self.name = required_text("name", &self.name, NAME_MAX_LEN)?;
        validate_display_order(self.display_order)
    }
}

/// Update category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub display_order: Option<i32>,
    pub active: Option<bool>,
}

impl CategoryUpdate {
    pub fn validate(&mut self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            self.name = Some(required_text("name", name, NAME_MAX_LEN)?);
        }
        validate_display_order(self.display_order)
    }
}

/// `GET /categories` query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryFilter {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub active: Option<bool>,
    pub search: Option<String>,
    pub order_by: Option<String>,
    pub order_dir: Option<String>,
    pub include_count: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_validation_trims() {
        let mut payload = CategoryCreate {
            name: "  Main Dishes ".into(),
            description: None,
            display_order: None,
            active: None,
        };
        payload.validate().unwrap();
        assert_eq!(payload.name, "Main Dishes");
    }

    #[test]
    fn test_create_validation_rejects() {
        let mut empty = CategoryCreate {
            name: "".into(),
            description: None,
            display_order: None,
            active: None,
        };
        assert!(empty.validate().is_err());

        let mut negative = CategoryCreate {
            name: "Drinks".into(),
            description: None,
            display_order: Some(-2),
            active: None,
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_update_validation_only_checks_present_fields() {
        let mut update = CategoryUpdate::default();
        assert!(update.validate().is_ok());

        let mut update = CategoryUpdate {
            name: Some(" ".into()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_serialize_omits_unloaded_relations() {
        let category = Category {
            id: 1,
            name: "Drinks".into(),
            description: String::new(),
            slug: "drinks".into(),
            display_order: 1,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            sub_categories: None,
        };
        let json = serde_json::to_value(&category).unwrap();
        assert!(json.get("sub_categories").is_none());
        assert_eq!(json["slug"], "drinks");
    }
}
