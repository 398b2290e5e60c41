//! Content sections (hero, about, ...) keyed by section name

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{check_max_len, json_object, required_text};
use crate::error::AppError;

pub const SECTION_NAME_MAX_LEN: usize = 50;
pub const TITLE_MAX_LEN: usize = 200;
pub const IMAGE_URL_MAX_LEN: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ContentSection {
    pub id: i64,
    pub section_name: String,
    pub title: String,
    pub content: String,
    pub metadata: serde_json::Value,
    pub image_url: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentCreate {
    pub section_name: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub image_url: Option<String>,
    pub active: Option<bool>,
}

impl ContentCreate {
    pub fn validate(&mut self) -> Result<(), AppError> {
        self.section_name =
            required_text("section_name", &self.section_name, SECTION_NAME_MAX_LEN)?;
        if let Some(title) = &self.title {
            check_max_len("title", title, TITLE_MAX_LEN)?;
        }
        if let Some(url) = &self.image_url {
            check_max_len("image_url", url, IMAGE_URL_MAX_LEN)?;
        }
        self.metadata = Some(json_object("metadata", self.metadata.as_ref())?);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentUpdate {
    pub section_name: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub image_url: Option<String>,
    pub active: Option<bool>,
}

impl ContentUpdate {
    pub fn validate(&mut self) -> Result<(), AppError> {
        if let Some(name) = &self.section_name {
            self.section_name = Some(required_text("section_name", name, SECTION_NAME_MAX_LEN)?);
        }
        if let Some(title) = &self.title {
            check_max_len("title", title, TITLE_MAX_LEN)?;
        }
        if let Some(url) = &self.image_url {
            check_max_len("image_url", url, IMAGE_URL_MAX_LEN)?;
        }
        if self.metadata.is_some() {
            self.metadata = Some(json_object("metadata", self.metadata.as_ref())?);
        }
        Ok(())
    }
}

/// `GET /content` query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentFilter {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub section_name: Option<String>,
    pub active: Option<bool>,
    pub search: Option<String>,
    pub order_by: Option<String>,
    pub order_dir: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_name_limits() {
        let mut payload = ContentCreate {
            section_name: "x".repeat(51),
            title: None,
            content: None,
            metadata: None,
            image_url: None,
            active: None,
        };
        assert!(payload.validate().is_err());

        payload.section_name = " hero ".into();
        payload.validate().unwrap();
        assert_eq!(payload.section_name, "hero");
        assert_eq!(payload.metadata, Some(serde_json::json!({})));
    }

    #[test]
    fn test_update_title_limit() {
        let mut update = ContentUpdate {
            title: Some("t".repeat(201)),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
