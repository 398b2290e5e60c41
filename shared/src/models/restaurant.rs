//! Restaurant info and operating hours

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{json_object, required_text};
use crate::error::{AppError, ErrorCode};

pub const NAME_MAX_LEN: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RestaurantInfo {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub address: serde_json::Value,
    pub contact_info: serde_json::Value,
    pub settings: serde_json::Value,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub operating_hours: Vec<OperatingHour>,
}

/// One row per weekday, 0 = Sunday .. 6 = Saturday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OperatingHour {
    pub id: i64,
    pub day_of_week: i16,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub is_closed: bool,
    pub restaurant_info_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantInfoCreate {
    pub name: String,
    pub description: Option<String>,
    pub address: Option<serde_json::Value>,
    pub contact_info: Option<serde_json::Value>,
    pub settings: Option<serde_json::Value>,
}

impl RestaurantInfoCreate {
    pub fn validate(&mut self) -> Result<(), AppError> {
        self.name = required_text("name", &self.name, NAME_MAX_LEN)?;
        self.address = Some(json_object("address", self.address.as_ref())?);
        self.contact_info = Some(json_object("contact_info", self.contact_info.as_ref())?);
        self.settings = Some(json_object("settings", self.settings.as_ref())?);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantInfoUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<serde_json::Value>,
    pub contact_info: Option<serde_json::Value>,
    pub settings: Option<serde_json::Value>,
    pub active: Option<bool>,
}

impl RestaurantInfoUpdate {
    pub fn validate(&mut self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            self.name = Some(required_text("name", name, NAME_MAX_LEN)?);
        }
        if self.address.is_some() {
            self.address = Some(json_object("address", self.address.as_ref())?);
        }
        if self.contact_info.is_some() {
            self.contact_info = Some(json_object("contact_info", self.contact_info.as_ref())?);
        }
        if self.settings.is_some() {
            self.settings = Some(json_object("settings", self.settings.as_ref())?);
        }
        Ok(())
    }
}

/// One day in a `PUT /restaurants/hours` body; times are "HH:MM" or "HH:MM:SS"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatingHourInput {
    pub day_of_week: i16,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
    #[serde(default)]
    pub is_closed: bool,
}

/// A validated operating hour ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewOperatingHour {
    pub day_of_week: i16,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub is_closed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatingHoursUpdate {
    pub hours: Vec<OperatingHourInput>,
}

impl OperatingHoursUpdate {
    /// Check day range, duplicates and time formats; returns rows sorted by day
    pub fn validate(&self) -> Result<Vec<NewOperatingHour>, AppError> {
        let mut seen = HashSet::new();
        let mut rows = Vec::with_capacity(self.hours.len());

        for hour in &self.hours {
            let day = validate_day(hour.day_of_week)?;
            if !seen.insert(day) {
                return Err(invalid_hours(format!("Duplicate entry for day {day}"))
                    .with_detail("day_of_week", day));
            }

            let open_time = parse_time("open_time", hour.open_time.as_deref())?;
            let close_time = parse_time("close_time", hour.close_time.as_deref())?;
            if !hour.is_closed && (open_time.is_none() || close_time.is_none()) {
                return Err(invalid_hours(format!(
                    "Day {day} must have open_time and close_time unless closed"
                ))
                .with_detail("day_of_week", day));
            }

            rows.push(NewOperatingHour {
                day_of_week: day,
                open_time: if hour.is_closed { None } else { open_time },
                close_time: if hour.is_closed { None } else { close_time },
                is_closed: hour.is_closed,
            });
        }

        rows.sort_by_key(|r| r.day_of_week);
        Ok(rows)
    }
}

/// Day of week must be within 0..=6
pub fn validate_day(day: i16) -> Result<i16, AppError> {
    if !(0..=6).contains(&day) {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "day_of_week must be between 0 and 6",
        )
        .with_detail("day_of_week", day));
    }
    Ok(day)
}

fn parse_time(field: &str, value: Option<&str>) -> Result<Option<NaiveTime>, AppError> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map(Some)
        .map_err(|_| {
            invalid_hours(format!("{field} must be HH:MM or HH:MM:SS"))
                .with_detail("field", field)
                .with_detail("value", raw)
        })
}

fn invalid_hours(msg: String) -> AppError {
    AppError::with_message(ErrorCode::InvalidOperatingHours, msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: i16, open: Option<&str>, close: Option<&str>, closed: bool) -> OperatingHourInput {
        OperatingHourInput {
            day_of_week: d,
            open_time: open.map(Into::into),
            close_time: close.map(Into::into),
            is_closed: closed,
        }
    }

    #[test]
    fn test_hours_validate_and_sort() {
        let update = OperatingHoursUpdate {
            hours: vec![
                day(5, Some("09:00"), Some("23:59"), false),
                day(0, Some("09:00:00"), Some("23:00"), false),
                day(1, None, None, true),
            ],
        };
        let rows = update.validate().unwrap();
        assert_eq!(
            rows.iter().map(|r| r.day_of_week).collect::<Vec<_>>(),
            vec![0, 1, 5]
        );
        assert_eq!(rows[0].open_time, NaiveTime::from_hms_opt(9, 0, 0));
        assert!(rows[1].is_closed);
        assert!(rows[1].open_time.is_none());
    }

    #[test]
    fn test_hours_reject_out_of_range_day() {
        let update = OperatingHoursUpdate {
            hours: vec![day(7, Some("09:00"), Some("17:00"), false)],
        };
        assert!(update.validate().is_err());
        assert!(validate_day(-1).is_err());
        assert_eq!(validate_day(6).unwrap(), 6);
    }

    #[test]
    fn test_hours_reject_duplicates() {
        let update = OperatingHoursUpdate {
            hours: vec![
                day(2, Some("09:00"), Some("17:00"), false),
                day(2, Some("10:00"), Some("18:00"), false),
            ],
        };
        let err = update.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidOperatingHours);
    }

    #[test]
    fn test_hours_require_times_when_open() {
        let update = OperatingHoursUpdate {
            hours: vec![day(3, Some("09:00"), None, false)],
        };
        assert!(update.validate().is_err());

        let update = OperatingHoursUpdate {
            hours: vec![day(3, Some("9am"), Some("17:00"), false)],
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_create_fills_json_defaults() {
        let mut payload = RestaurantInfoCreate {
            name: "Saffron House".into(),
            description: None,
            address: None,
            contact_info: Some(serde_json::json!({"phone": "+971"})),
            settings: None,
        };
        payload.validate().unwrap();
        assert_eq!(payload.address, Some(serde_json::json!({})));
        assert_eq!(payload.contact_info.unwrap()["phone"], "+971");
    }
}
