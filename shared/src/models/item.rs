//! Item Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{check_max_len, json_object, required_text, validate_display_order};
use crate::error::{AppError, ErrorCode};

pub const NAME_MAX_LEN: usize = 150;
pub const IMAGE_URL_MAX_LEN: usize = 500;
pub const DEFAULT_CURRENCY: &str = "AED";

/// Largest value a `DECIMAL(10,2)` column holds
const PRICE_MAX: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub currency: String,
    /// Free-form dietary flags, e.g. `{"vegetarian": true, "spicy": 2}`
    pub dietary_info: serde_json::Value,
    pub image_url: String,
    pub sub_category_id: i64,
    pub available: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub currency: Option<String>,
    pub dietary_info: Option<serde_json::Value>,
    pub image_url: Option<String>,
    pub sub_category_id: i64,
    pub available: Option<bool>,
    pub display_order: Option<i32>,
}

impl ItemCreate {
    pub fn validate(&mut self) -> Result<(), AppError> {
        self.name = required_text("name", &self.name, NAME_MAX_LEN)?;
        self.price = validate_price(self.price)?;
        self.currency = Some(match &self.currency {
            Some(c) => validate_currency(c)?,
            None => DEFAULT_CURRENCY.to_string(),
        });
        self.dietary_info = Some(json_object("dietary_info", self.dietary_info.as_ref())?);
        if let Some(url) = &self.image_url {
            check_max_len("image_url", url, IMAGE_URL_MAX_LEN)?;
        }
        if self.sub_category_id <= 0 {
            return Err(AppError::invalid_field(
                "sub_category_id",
                "sub_category_id is required",
            ));
        }
        validate_display_order(self.display_order)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub dietary_info: Option<serde_json::Value>,
    pub image_url: Option<String>,
    pub sub_category_id: Option<i64>,
    pub available: Option<bool>,
    pub display_order: Option<i32>,
}

impl ItemUpdate {
    pub fn validate(&mut self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            self.name = Some(required_text("name", name, NAME_MAX_LEN)?);
        }
        if let Some(price) = self.price {
            self.price = Some(validate_price(price)?);
        }
        if let Some(currency) = &self.currency {
            self.currency = Some(validate_currency(currency)?);
        }
        if self.dietary_info.is_some() {
            self.dietary_info = Some(json_object("dietary_info", self.dietary_info.as_ref())?);
        }
        if let Some(url) = &self.image_url {
            check_max_len("image_url", url, IMAGE_URL_MAX_LEN)?;
        }
        if matches!(self.sub_category_id, Some(id) if id <= 0) {
            return Err(AppError::invalid_field(
                "sub_category_id",
                "sub_category_id must be a positive integer",
            ));
        }
        validate_display_order(self.display_order)
    }
}

/// Body of `PATCH /items/{id}/price`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub price: Decimal,
    pub currency: Option<String>,
}

impl PriceUpdate {
    pub fn validate(&mut self) -> Result<(), AppError> {
        self.price = validate_price(self.price)?;
        if let Some(currency) = &self.currency {
            self.currency = Some(validate_currency(currency)?);
        }
        Ok(())
    }
}

/// `GET /items` query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemFilter {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sub_category_id: Option<i64>,
    pub category_id: Option<i64>,
    pub available: Option<bool>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub search: Option<String>,
    pub order_by: Option<String>,
    pub order_dir: Option<String>,
    pub include_count: Option<bool>,
}

impl ItemFilter {
    /// Price bounds as decimals; rejects negative or inverted ranges
    pub fn price_bounds(&self) -> Result<(Option<Decimal>, Option<Decimal>), AppError> {
        let to_decimal = |field: &str, v: Option<f64>| -> Result<Option<Decimal>, AppError> {
            match v {
                None => Ok(None),
                Some(v) if v < 0.0 || !v.is_finite() => Err(AppError::invalid_field(
                    field,
                    format!("{field} must be zero or greater"),
                )),
                Some(v) => Decimal::try_from(v)
                    .map(Some)
                    .map_err(|_| AppError::invalid_field(field, format!("{field} is not a number"))),
            }
        };
        let min = to_decimal("min_price", self.min_price)?;
        let max = to_decimal("max_price", self.max_price)?;
        if let (Some(lo), Some(hi)) = (min, max)
            && lo > hi
        {
            return Err(AppError::validation("min_price cannot be greater than max_price")
                .with_detail("min_price", lo.to_string())
                .with_detail("max_price", hi.to_string()));
        }
        Ok((min, max))
    }
}

fn validate_price(price: Decimal) -> Result<Decimal, AppError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(AppError::new(ErrorCode::ItemInvalidPrice).with_detail("field", "price"));
    }
    let price = price.round_dp(2);
    if price > PRICE_MAX {
        return Err(AppError::with_message(
            ErrorCode::ItemInvalidPrice,
            format!("Price must not exceed {PRICE_MAX}"),
        )
        .with_detail("field", "price"));
    }
    Ok(price)
}

/// Three ASCII letters, normalized to uppercase
fn validate_currency(currency: &str) -> Result<String, AppError> {
    let c = currency.trim();
    if c.len() != 3 || !c.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err(AppError::invalid_field(
            "currency",
            "currency must be a 3-letter code",
        ));
    }
    Ok(c.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn create(price: &str) -> ItemCreate {
        ItemCreate {
            name: "Falafel Wrap".into(),
            description: None,
            price: Decimal::from_str(price).unwrap(),
            currency: None,
            dietary_info: None,
            image_url: None,
            sub_category_id: 3,
            available: None,
            display_order: None,
        }
    }

    #[test]
    fn test_create_defaults() {
        let mut payload = create("24.50");
        payload.validate().unwrap();
        assert_eq!(payload.currency.as_deref(), Some("AED"));
        assert_eq!(payload.dietary_info, Some(serde_json::json!({})));
    }

    #[test]
    fn test_price_rules() {
        assert!(create("0").validate().is_ok());
        assert!(create("-0.01").validate().is_err());
        assert!(create("100000000.00").validate().is_err());

        let mut payload = create("12.345");
        payload.validate().unwrap();
        assert_eq!(payload.price, Decimal::from_str("12.34").unwrap());
    }

    #[test]
    fn test_currency_rules() {
        let mut payload = create("10");
        payload.currency = Some("usd".into());
        payload.validate().unwrap();
        assert_eq!(payload.currency.as_deref(), Some("USD"));

        let mut payload = create("10");
        payload.currency = Some("DOLLARS".into());
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_dietary_info_must_be_object() {
        let mut payload = create("10");
        payload.dietary_info = Some(serde_json::json!("vegan"));
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_price_bounds() {
        let filter = ItemFilter {
            min_price: Some(10.0),
            max_price: Some(5.0),
            ..Default::default()
        };
        assert!(filter.price_bounds().is_err());

        let filter = ItemFilter {
            min_price: Some(5.0),
            max_price: Some(10.0),
            ..Default::default()
        };
        let (lo, hi) = filter.price_bounds().unwrap();
        assert_eq!(lo, Some(Decimal::from(5)));
        assert_eq!(hi, Some(Decimal::from(10)));

        let filter = ItemFilter {
            min_price: Some(-1.0),
            ..Default::default()
        };
        assert!(filter.price_bounds().is_err());
    }

    #[test]
    fn test_price_serializes_as_number() {
        let update = PriceUpdate {
            price: Decimal::from_str("9.99").unwrap(),
            currency: None,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert!(json["price"].is_number());
        assert_eq!(json["price"], serde_json::json!(9.99));
    }

    #[test]
    fn test_price_accepts_number_or_string() {
        let body = serde_json::json!({"name": "Tea", "price": 7.5, "sub_category_id": 1});
        let payload: ItemCreate = serde_json::from_value(body).unwrap();
        assert_eq!(payload.price, Decimal::from_str("7.5").unwrap());

        let body = serde_json::json!({"name": "Tea", "price": "48.50", "sub_category_id": 1});
        let payload: ItemCreate = serde_json::from_value(body).unwrap();
        assert_eq!(payload.price, Decimal::from_str("48.50").unwrap());
    }
}
