//! Restaurant info and operating hours database operations

use shared::models::restaurant::NewOperatingHour;
use shared::models::{OperatingHour, RestaurantInfo, RestaurantInfoUpdate};
use sqlx::PgPool;

use super::BoxError;

const COLUMNS: &str =
    "id, name, description, address, contact_info, settings, active, created_at, updated_at";

const HOUR_COLUMNS: &str = "id, day_of_week, open_time, close_time, is_closed, \
                            restaurant_info_id, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct NewRestaurant {
    pub name: String,
    pub description: String,
    pub address: serde_json::Value,
    pub contact_info: serde_json::Value,
    pub settings: serde_json::Value,
}

/// The restaurant record, active or not (lowest id wins)
pub async fn find_current(pool: &PgPool) -> Result<Option<RestaurantInfo>, BoxError> {
    let row = sqlx::query_as::<_, RestaurantInfo>(&format!(
        "SELECT {COLUMNS} FROM restaurant_info ORDER BY id ASC LIMIT 1"
    ))
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Whether any restaurant record exists, active or not
pub async fn any_exists(pool: &PgPool) -> Result<bool, BoxError> {
    let found: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM restaurant_info)")
        .fetch_one(pool)
        .await?;
    Ok(found)
}

pub async fn insert(pool: &PgPool, new: &NewRestaurant) -> Result<RestaurantInfo, BoxError> {
    let row = sqlx::query_as::<_, RestaurantInfo>(&format!(
        "INSERT INTO restaurant_info (name, description, address, contact_info, settings, active) \
         VALUES ($1, $2, $3, $4, $5, TRUE) RETURNING {COLUMNS}"
    ))
    .bind(&new.name)
    .bind(&new.description)
    .bind(&new.address)
    .bind(&new.contact_info)
    .bind(&new.settings)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &RestaurantInfoUpdate,
) -> Result<Option<RestaurantInfo>, BoxError> {
    let row = sqlx::query_as::<_, RestaurantInfo>(&format!(
        "UPDATE restaurant_info SET \
            name = COALESCE($2, name), \
            description = COALESCE($3, description), \
            address = COALESCE($4, address), \
            contact_info = COALESCE($5, contact_info), \
            settings = COALESCE($6, settings), \
            active = COALESCE($7, active), \
            updated_at = NOW() \
         WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(data.name.as_deref())
    .bind(data.description.as_deref())
    .bind(data.address.as_ref())
    .bind(data.contact_info.as_ref())
    .bind(data.settings.as_ref())
    .bind(data.active)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Hours of one restaurant, Sunday first
pub async fn list_hours(pool: &PgPool, restaurant_id: i64) -> Result<Vec<OperatingHour>, BoxError> {
    let rows = sqlx::query_as::<_, OperatingHour>(&format!(
        "SELECT {HOUR_COLUMNS} FROM operating_hours \
         WHERE restaurant_info_id = $1 ORDER BY day_of_week ASC"
    ))
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_hour(
    pool: &PgPool,
    restaurant_id: i64,
    day_of_week: i16,
) -> Result<Option<OperatingHour>, BoxError> {
    let row = sqlx::query_as::<_, OperatingHour>(&format!(
        "SELECT {HOUR_COLUMNS} FROM operating_hours \
         WHERE restaurant_info_id = $1 AND day_of_week = $2"
    ))
    .bind(restaurant_id)
    .bind(day_of_week)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Replace every operating hour of a restaurant in one transaction
pub async fn replace_hours(
    pool: &PgPool,
    restaurant_id: i64,
    hours: &[NewOperatingHour],
) -> Result<Vec<OperatingHour>, BoxError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM operating_hours WHERE restaurant_info_id = $1")
        .bind(restaurant_id)
        .execute(&mut *tx)
        .await?;

    let mut rows = Vec::with_capacity(hours.len());
    for hour in hours {
        let row = sqlx::query_as::<_, OperatingHour>(&format!(
            "INSERT INTO operating_hours \
                (day_of_week, open_time, close_time, is_closed, restaurant_info_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {HOUR_COLUMNS}"
        ))
        .bind(hour.day_of_week)
        .bind(hour.open_time)
        .bind(hour.close_time)
        .bind(hour.is_closed)
        .bind(restaurant_id)
        .fetch_one(&mut *tx)
        .await?;
        rows.push(row);
    }

    tx.commit().await?;
    Ok(rows)
}
