//! Category database operations

use shared::PageRequest;
use shared::models::{Category, CategoryFilter, CategoryUpdate};
use shared::query::{like_pattern, order_clause};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{BoxError, push_page, push_search};

const COLUMNS: &str =
    "id, name, description, slug, display_order, active, created_at, updated_at";

const ORDER_COLUMNS: &[(&str, &str)] = &[
    ("name", "name"),
    ("display_order", "display_order"),
    ("created_at", "created_at"),
    ("updated_at", "updated_at"),
    ("active", "active"),
];

pub const DEFAULT_ORDER: &str = "display_order ASC, created_at DESC";

/// Values for a new row, after service-level defaults are applied
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
    pub slug: String,
    pub display_order: i32,
    pub active: bool,
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &CategoryFilter) {
    if let Some(active) = filter.active {
        qb.push(" AND active = ").push_bind(active);
    }
    if let Some(pattern) = like_pattern(filter.search.as_deref()) {
        push_search(qb, &["name", "description"], &pattern);
    }
}

/// Filtered page of categories plus the total matching count
pub async fn list(
    pool: &PgPool,
    filter: &CategoryFilter,
    page: PageRequest,
) -> Result<(Vec<Category>, i64), BoxError> {
    let mut count_qb =
        QueryBuilder::new("SELECT COUNT(*) FROM categories WHERE deleted_at IS NULL");
    push_filters(&mut count_qb, filter);
    let total = count_qb.build_query_scalar::<i64>().fetch_one(pool).await?;

    let mut qb = QueryBuilder::new(format!(
        "SELECT {COLUMNS} FROM categories WHERE deleted_at IS NULL"
    ));
    push_filters(&mut qb, filter);
    let order = order_clause(
        filter.order_by.as_deref(),
        filter.order_dir.as_deref(),
        ORDER_COLUMNS,
        DEFAULT_ORDER,
    );
    push_page(&mut qb, &order, page);
    let rows = qb.build_query_as::<Category>().fetch_all(pool).await?;

    Ok((rows, total))
}

/// Active categories in menu order
pub async fn list_active(pool: &PgPool) -> Result<Vec<Category>, BoxError> {
    let rows = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM categories \
         WHERE deleted_at IS NULL AND active = TRUE \
         ORDER BY display_order ASC, id ASC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Category>, BoxError> {
    let row = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM categories WHERE id = $1 AND deleted_at IS NULL"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn exists(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let found: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1 AND deleted_at IS NULL)",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(found)
}

/// Case-insensitive name check, optionally ignoring one row
pub async fn name_exists(
    pool: &PgPool,
    name: &str,
    exclude_id: Option<i64>,
) -> Result<bool, BoxError> {
    let found: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM categories \
         WHERE LOWER(name) = LOWER($1) AND deleted_at IS NULL \
         AND ($2::BIGINT IS NULL OR id <> $2))",
    )
    .bind(name)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    Ok(found)
}

pub async fn slug_exists(
    pool: &PgPool,
    slug: &str,
    exclude_id: Option<i64>,
) -> Result<bool, BoxError> {
    let found: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM categories \
         WHERE slug = $1 AND deleted_at IS NULL \
         AND ($2::BIGINT IS NULL OR id <> $2))",
    )
    .bind(slug)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    Ok(found)
}

/// Number of live categories
pub async fn count(pool: &PgPool) -> Result<i64, BoxError> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE deleted_at IS NULL")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

pub async fn count_subcategories(pool: &PgPool, id: i64) -> Result<i64, BoxError> {
    let n: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sub_categories WHERE category_id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(n)
}

pub async fn insert(pool: &PgPool, new: &NewCategory) -> Result<Category, BoxError> {
    let row = sqlx::query_as::<_, Category>(&format!(
        "INSERT INTO categories (name, description, slug, display_order, active) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
    ))
    .bind(&new.name)
    .bind(&new.description)
    .bind(&new.slug)
    .bind(new.display_order)
    .bind(new.active)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Partial update; `None` fields keep their value
pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &CategoryUpdate,
    slug: Option<&str>,
) -> Result<Option<Category>, BoxError> {
    let row = sqlx::query_as::<_, Category>(&format!(
        "UPDATE categories SET \
            name = COALESCE($2, name), \
            description = COALESCE($3, description), \
            slug = COALESCE($4, slug), \
            display_order = COALESCE($5, display_order), \
            active = COALESCE($6, active), \
            updated_at = NOW() \
         WHERE id = $1 AND deleted_at IS NULL RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(data.name.as_deref())
    .bind(data.description.as_deref())
    .bind(slug)
    .bind(data.display_order)
    .bind(data.active)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn toggle_active(pool: &PgPool, id: i64) -> Result<Option<Category>, BoxError> {
    let row = sqlx::query_as::<_, Category>(&format!(
        "UPDATE categories SET active = NOT active, updated_at = NOW() \
         WHERE id = $1 AND deleted_at IS NULL RETURNING {COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn set_display_order(
    pool: &PgPool,
    id: i64,
    display_order: i32,
) -> Result<Option<Category>, BoxError> {
    let row = sqlx::query_as::<_, Category>(&format!(
        "UPDATE categories SET display_order = $2, updated_at = NOW() \
         WHERE id = $1 AND deleted_at IS NULL RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(display_order)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Mark deleted; returns false when the row was missing or already deleted
pub async fn soft_delete(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query(
        "UPDATE categories SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
