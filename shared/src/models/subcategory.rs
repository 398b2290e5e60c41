//! SubCategory Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::item::Item;
use super::{required_text, validate_display_order};
use crate::error::AppError;

pub const NAME_MAX_LEN: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SubCategory {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub slug: String,
    pub category_id: i64,
    pub display_order: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Item>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubCategoryCreate {
    pub name: String,
    pub description: Option<String>,
    pub category_id: i64,
    pub display_order: Option<i32>,
    pub active: Option<bool>,
}

impl SubCategoryCreate {
    pub fn validate(&mut self) -> Result<(), AppError> {
        self.name = required_text("name", &self.name, NAME_MAX_LEN)?;
        if self.category_id <= 0 {
            return Err(AppError::invalid_field("category_id", "category_id is required"));
        }
        validate_display_order(self.display_order)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubCategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub display_order: Option<i32>,
    pub active: Option<bool>,
}

impl SubCategoryUpdate {
    pub fn validate(&mut self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            self.name = Some(required_text("name", name, NAME_MAX_LEN)?);
        }
        if matches!(self.category_id, Some(id) if id <= 0) {
            return Err(AppError::invalid_field(
                "category_id",
                "category_id must be a positive integer",
            ));
        }
        validate_display_order(self.display_order)
    }
}

/// `GET /subcategories` query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubCategoryFilter {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category_id: Option<i64>,
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
    fn test_create_requires_category() {
        let mut payload = SubCategoryCreate {
            name: "Coffee".into(),
            description: None,
            category_id: 0,
            display_order: None,
            active: None,
        };
        let err = payload.validate().unwrap_err();
        assert_eq!(err.details.unwrap().get("field").unwrap(), "category_id");
    }

    #[test]
    fn test_update_rejects_bad_category() {
        let mut update = SubCategoryUpdate {
            category_id: Some(-1),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
