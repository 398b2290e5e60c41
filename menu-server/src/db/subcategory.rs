//! Subcategory database operations

use shared::PageRequest;
use shared::models::{SubCategory, SubCategoryFilter, SubCategoryUpdate};
use shared::query::{like_pattern, order_clause};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{BoxError, push_page, push_search};

const COLUMNS: &str =
    "id, name, description, slug, category_id, display_order, active, created_at, updated_at";

const ORDER_COLUMNS: &[(&str, &str)] = &[
    ("name", "name"),
    ("display_order", "display_order"),
    ("created_at", "created_at"),
    ("updated_at", "updated_at"),
    ("category_id", "category_id"),
    ("active", "active"),
];

const DEFAULT_ORDER: &str = "display_order ASC, created_at DESC";

#[derive(Debug, Clone)]
pub struct NewSubCategory {
    pub name: String,
    pub description: String,
    pub slug: String,
    pub category_id: i64,
    pub display_order: i32,
    pub active: bool,
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &SubCategoryFilter) {
    if let Some(category_id) = filter.category_id {
        qb.push(" AND category_id = ").push_bind(category_id);
    }
    if let Some(active) = filter.active {
        qb.push(" AND active = ").push_bind(active);
    }
    if let Some(pattern) = like_pattern(filter.search.as_deref()) {
        push_search(qb, &["name", "description"], &pattern);
    }
}

pub async fn list(
    pool: &PgPool,
    filter: &SubCategoryFilter,
    page: PageRequest,
) -> Result<(Vec<SubCategory>, i64), BoxError> {
    let mut count_qb =
        QueryBuilder::new("SELECT COUNT(*) FROM sub_categories WHERE deleted_at IS NULL");
    push_filters(&mut count_qb, filter);
    let total = count_qb.build_query_scalar::<i64>().fetch_one(pool).await?;

    let mut qb = QueryBuilder::new(format!(
        "SELECT {COLUMNS} FROM sub_categories WHERE deleted_at IS NULL"
    ));
    push_filters(&mut qb, filter);
    let order = order_clause(
        filter.order_by.as_deref(),
        filter.order_dir.as_deref(),
        ORDER_COLUMNS,
        DEFAULT_ORDER,
    );
    push_page(&mut qb, &order, page);
    let rows = qb.build_query_as::<SubCategory>().fetch_all(pool).await?;

    Ok((rows, total))
}

/// Subcategories of the given categories in menu order
pub async fn list_for_categories(
    pool: &PgPool,
    category_ids: &[i64],
    active_only: bool,
) -> Result<Vec<SubCategory>, BoxError> {
    if category_ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = sqlx::query_as::<_, SubCategory>(&format!(
        "SELECT {COLUMNS} FROM sub_categories \
         WHERE deleted_at IS NULL AND category_id = ANY($1) \
         AND ($2 = FALSE OR active = TRUE) \
         ORDER BY display_order ASC, id ASC"
    ))
    .bind(category_ids)
    .bind(active_only)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<SubCategory>, BoxError> {
    let row = sqlx::query_as::<_, SubCategory>(&format!(
        "SELECT {COLUMNS} FROM sub_categories WHERE id = $1 AND deleted_at IS NULL"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn exists(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let found: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM sub_categories WHERE id = $1 AND deleted_at IS NULL)",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(found)
}

/// Case-insensitive name check within one category
pub async fn name_exists(
    pool: &PgPool,
    category_id: i64,
    name: &str,
    exclude_id: Option<i64>,
) -> Result<bool, BoxError> {
    let found: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM sub_categories \
         WHERE category_id = $1 AND LOWER(name) = LOWER($2) AND deleted_at IS NULL \
         AND ($3::BIGINT IS NULL OR id <> $3))",
    )
    .bind(category_id)
    .bind(name)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    Ok(found)
}

pub async fn slug_exists(
    pool: &PgPool,
    category_id: i64,
    slug: &str,
    exclude_id: Option<i64>,
) -> Result<bool, BoxError> {
    let found: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM sub_categories \
         WHERE category_id = $1 AND slug = $2 AND deleted_at IS NULL \
         AND ($3::BIGINT IS NULL OR id <> $3))",
    )
    .bind(category_id)
    .bind(slug)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    Ok(found)
}

pub async fn count_in_category(pool: &PgPool, category_id: i64) -> Result<i64, BoxError> {
    let n: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sub_categories WHERE category_id = $1 AND deleted_at IS NULL",
    )
    .bind(category_id)
    .fetch_one(pool)
    .await?;
    Ok(n)
}

pub async fn count_items(pool: &PgPool, id: i64) -> Result<i64, BoxError> {
    let n: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM items WHERE sub_category_id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(n)
}

pub async fn insert(pool: &PgPool, new: &NewSubCategory) -> Result<SubCategory, BoxError> {
    let row = sqlx::query_as::<_, SubCategory>(&format!(
        "INSERT INTO sub_categories (name, description, slug, category_id, display_order, active) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMNS}"
    ))
    .bind(&new.name)
    .bind(&new.description)
    .bind(&new.slug)
    .bind(new.category_id)
    .bind(new.display_order)
    .bind(new.active)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &SubCategoryUpdate,
    slug: Option<&str>,
) -> Result<Option<SubCategory>, BoxError> {
    let row = sqlx::query_as::<_, SubCategory>(&format!(
        "UPDATE sub_categories SET \
            name = COALESCE($2, name), \
            description = COALESCE($3, description), \
            slug = COALESCE($4, slug), \
            category_id = COALESCE($5, category_id), \
            display_order = COALESCE($6, display_order), \
            active = COALESCE($7, active), \
            updated_at = NOW() \
         WHERE id = $1 AND deleted_at IS NULL RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(data.name.as_deref())
    .bind(data.description.as_deref())
    .bind(slug)
    .bind(data.category_id)
    .bind(data.display_order)
    .bind(data.active)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn toggle_active(pool: &PgPool, id: i64) -> Result<Option<SubCategory>, BoxError> {
    let row = sqlx::query_as::<_, SubCategory>(&format!(
        "UPDATE sub_categories SET active = NOT active, updated_at = NOW() \
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
) -> Result<Option<SubCategory>, BoxError> {
    let row = sqlx::query_as::<_, SubCategory>(&format!(
        "UPDATE sub_categories SET display_order = $2, updated_at = NOW() \
         WHERE id = $1 AND deleted_at IS NULL RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(display_order)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn soft_delete(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query(
        "UPDATE sub_categories SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
