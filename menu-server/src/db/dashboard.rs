//! Dashboard aggregate queries

use chrono::{DateTime, NaiveDate, Utc};
use shared::models::dashboard::{CategoryStats, PRICE_RANGES};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use super::BoxError;

/// Raw catalog totals used by `GET /dashboard/stats`
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct CatalogCounts {
    pub total_categories: i64,
    pub total_sub_categories: i64,
    pub total_items: i64,
    pub available_items: i64,
    pub average_price: f64,
    pub recent_items_count: i64,
    pub recent_categories_count: i64,
}

pub async fn catalog_counts(
    pool: &PgPool,
    since: DateTime<Utc>,
) -> Result<CatalogCounts, BoxError> {
    let row = sqlx::query_as::<_, CatalogCounts>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM categories WHERE deleted_at IS NULL) AS total_categories,
            (SELECT COUNT(*) FROM sub_categories WHERE deleted_at IS NULL) AS total_sub_categories,
            (SELECT COUNT(*) FROM items WHERE deleted_at IS NULL) AS total_items,
            (SELECT COUNT(*) FROM items WHERE deleted_at IS NULL AND available = TRUE) AS available_items,
            (SELECT COALESCE(AVG(price), 0)::FLOAT8 FROM items
                WHERE deleted_at IS NULL AND price > 0) AS average_price,
            (SELECT COUNT(*) FROM items
                WHERE deleted_at IS NULL AND created_at >= $1) AS recent_items_count,
            (SELECT COUNT(*) FROM categories
                WHERE deleted_at IS NULL AND created_at >= $1) AS recent_categories_count
        "#,
    )
    .bind(since)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// id, name, created_at, updated_at of the newest live rows
pub type RecentRow = (i64, String, DateTime<Utc>, DateTime<Utc>);

pub async fn recent_items(
    pool: &PgPool,
    since: Option<DateTime<Utc>>,
    limit: i64,
) -> Result<Vec<RecentRow>, BoxError> {
    let rows = sqlx::query_as::<_, RecentRow>(
        "SELECT id, name, created_at, updated_at FROM items \
         WHERE deleted_at IS NULL AND ($1::TIMESTAMPTZ IS NULL OR created_at >= $1) \
         ORDER BY created_at DESC, id DESC LIMIT $2",
    )
    .bind(since)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn recent_categories(
    pool: &PgPool,
    since: Option<DateTime<Utc>>,
    limit: i64,
) -> Result<Vec<RecentRow>, BoxError> {
    let rows = sqlx::query_as::<_, RecentRow>(
        "SELECT id, name, created_at, updated_at FROM categories \
         WHERE deleted_at IS NULL AND ($1::TIMESTAMPTZ IS NULL OR created_at >= $1) \
         ORDER BY created_at DESC, id DESC LIMIT $2",
    )
    .bind(since)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Per-category item counts and average price, busiest first
pub async fn category_stats(pool: &PgPool) -> Result<Vec<CategoryStats>, BoxError> {
    let rows = sqlx::query_as::<_, CategoryStats>(
        r#"
        SELECT
            c.id,
            c.name,
            COUNT(i.id) AS item_count,
            COUNT(i.id) FILTER (WHERE i.available) AS available_items,
            COALESCE(AVG(i.price), 0)::FLOAT8 AS average_price
        FROM categories c
        LEFT JOIN sub_categories s ON s.category_id = c.id AND s.deleted_at IS NULL
        LEFT JOIN items i ON i.sub_category_id = s.id AND i.deleted_at IS NULL
        WHERE c.deleted_at IS NULL
        GROUP BY c.id, c.name
        ORDER BY item_count DESC, c.id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Item counts per price bucket (same order as `PRICE_RANGES`) and the overall total.
/// Free items are left out of both.
pub async fn price_bucket_counts(pool: &PgPool) -> Result<(Vec<i64>, i64), BoxError> {
    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT ");
    for range in PRICE_RANGES.iter() {
        qb.push("COUNT(*) FILTER (WHERE price >= ").push_bind(range.min);
        if let Some(max) = range.max {
            qb.push(" AND price < ").push_bind(max);
        }
        qb.push("), ");
    }
    qb.push("COUNT(*) FROM items WHERE deleted_at IS NULL AND price > 0");

    let row = qb.build().fetch_one(pool).await?;
    let counts = (0..PRICE_RANGES.len())
        .map(|i| row.try_get::<i64, _>(i))
        .collect::<Result<Vec<_>, _>>()?;
    let total: i64 = row.try_get(PRICE_RANGES.len())?;
    Ok((counts, total))
}

/// Items created per UTC day since `since`; days without items are absent
pub async fn items_created_per_day(
    pool: &PgPool,
    since: DateTime<Utc>,
) -> Result<Vec<(NaiveDate, i64)>, BoxError> {
    let rows = sqlx::query_as::<_, (NaiveDate, i64)>(
        "SELECT (created_at AT TIME ZONE 'UTC')::DATE AS day, COUNT(*) \
         FROM items WHERE deleted_at IS NULL AND created_at >= $1 \
         GROUP BY day ORDER BY day ASC",
    )
    .bind(since)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct HealthCounts {
    pub categories_without_items: i64,
    pub subcategories_without_items: i64,
    pub items_without_images: i64,
    pub items_without_description: i64,
}

pub async fn health_counts(pool: &PgPool) -> Result<HealthCounts, BoxError> {
    let row = sqlx::query_as::<_, HealthCounts>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM categories c
                WHERE c.deleted_at IS NULL AND NOT EXISTS (
                    SELECT 1 FROM sub_categories s
                    JOIN items i ON i.sub_category_id = s.id AND i.deleted_at IS NULL
                    WHERE s.category_id = c.id AND s.deleted_at IS NULL
                )) AS categories_without_items,
            (SELECT COUNT(*) FROM sub_categories s
                WHERE s.deleted_at IS NULL AND NOT EXISTS (
                    SELECT 1 FROM items i
                    WHERE i.sub_category_id = s.id AND i.deleted_at IS NULL
                )) AS subcategories_without_items,
            (SELECT COUNT(*) FROM items
                WHERE deleted_at IS NULL AND TRIM(image_url) = '') AS items_without_images,
            (SELECT COUNT(*) FROM items
                WHERE deleted_at IS NULL AND TRIM(description) = '') AS items_without_description
        "#,
    )
    .fetch_one(pool)
    .await?;
    Ok(row)
}
