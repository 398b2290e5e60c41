//! Item database operations

use rust_decimal::Decimal;
use shared::PageRequest;
use shared::models::{Item, ItemFilter, ItemUpdate};
use shared::query::{like_pattern, order_clause};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{BoxError, push_page, push_search};

const COLUMNS: &str = "id, name, description, price, currency, dietary_info, image_url, \
                       sub_category_id, available, display_order, created_at, updated_at";

const ORDER_COLUMNS: &[(&str, &str)] = &[
    ("name", "name"),
    ("price", "price"),
    ("display_order", "display_order"),
    ("created_at", "created_at"),
    ("updated_at", "updated_at"),
    ("available", "available"),
];

const DEFAULT_ORDER: &str = "display_order ASC, created_at DESC";

#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub currency: String,
    pub dietary_info: serde_json::Value,
    pub image_url: String,
    pub sub_category_id: i64,
    pub available: bool,
    pub display_order: i32,
}

/// Validated list filter, price bounds already parsed
pub struct ItemQuery<'a> {
    pub filter: &'a ItemFilter,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &ItemQuery<'_>) {
    let filter = query.filter;
    if let Some(sub_category_id) = filter.sub_category_id {
        qb.push(" AND sub_category_id = ").push_bind(sub_category_id);
    }
    if let Some(category_id) = filter.category_id {
        qb.push(
            " AND sub_category_id IN (SELECT id FROM sub_categories \
             WHERE deleted_at IS NULL AND category_id = ",
        )
        .push_bind(category_id)
        .push(")");
    }
    if let Some(available) = filter.available {
        qb.push(" AND available = ").push_bind(available);
    }
    if let Some(min) = query.min_price {
        qb.push(" AND price >= ").push_bind(min);
    }
    if let Some(max) = query.max_price {
        qb.push(" AND price <= ").push_bind(max);
    }
    if let Some(pattern) = like_pattern(filter.search.as_deref()) {
        push_search(qb, &["name", "description"], &pattern);
    }
}

pub async fn list(
    pool: &PgPool,
    query: &ItemQuery<'_>,
    page: PageRequest,
) -> Result<(Vec<Item>, i64), BoxError> {
    let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM items WHERE deleted_at IS NULL");
    push_filters(&mut count_qb, query);
    let total = count_qb.build_query_scalar::<i64>().fetch_one(pool).await?;

    let mut qb = QueryBuilder::new(format!(
        "SELECT {COLUMNS} FROM items WHERE deleted_at IS NULL"
    ));
    push_filters(&mut qb, query);
    let order = order_clause(
        query.filter.order_by.as_deref(),
        query.filter.order_dir.as_deref(),
        ORDER_COLUMNS,
        DEFAULT_ORDER,
    );
    push_page(&mut qb, &order, page);
    let rows = qb.build_query_as::<Item>().fetch_all(pool).await?;

    Ok((rows, total))
}

/// Items of the given subcategories in menu order
pub async fn list_for_subcategories(
    pool: &PgPool,
    sub_category_ids: &[i64],
    available_only: bool,
) -> Result<Vec<Item>, BoxError> {
    if sub_category_ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = sqlx::query_as::<_, Item>(&format!(
        "SELECT {COLUMNS} FROM items \
         WHERE deleted_at IS NULL AND sub_category_id = ANY($1) \
         AND ($2 = FALSE OR available = TRUE) \
         ORDER BY display_order ASC, id ASC"
    ))
    .bind(sub_category_ids)
    .bind(available_only)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Available items whose name or description contains `term`.
///
/// Exact name matches rank first, then name prefixes, then display order.
pub async fn search(pool: &PgPool, term: &str, limit: i64) -> Result<Vec<Item>, BoxError> {
    let Some(pattern) = like_pattern(Some(term)) else {
        return Ok(Vec::new());
    };
    // "%term%" -> "term%"
    let prefix = pattern[1..].to_string();

    let rows = sqlx::query_as::<_, Item>(&format!(
        "SELECT {COLUMNS} FROM items \
         WHERE deleted_at IS NULL AND available = TRUE \
         AND (LOWER(name) LIKE $1 OR LOWER(description) LIKE $1) \
         ORDER BY \
            CASE WHEN LOWER(name) = LOWER($2) THEN 0 \
                 WHEN LOWER(name) LIKE $3 THEN 1 \
                 ELSE 2 END, \
            display_order ASC, id ASC \
         LIMIT $4"
    ))
    .bind(&pattern)
    .bind(term.trim())
    .bind(&prefix)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Random available items that have an image
pub async fn featured(pool: &PgPool, limit: i64) -> Result<Vec<Item>, BoxError> {
    let rows = sqlx::query_as::<_, Item>(&format!(
        "SELECT {COLUMNS} FROM items \
         WHERE deleted_at IS NULL AND available = TRUE AND image_url <> '' \
         ORDER BY RANDOM() LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Item>, BoxError> {
    let row = sqlx::query_as::<_, Item>(&format!(
        "SELECT {COLUMNS} FROM items WHERE id = $1 AND deleted_at IS NULL"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn count_in_subcategory(pool: &PgPool, sub_category_id: i64) -> Result<i64, BoxError> {
    let n: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM items WHERE sub_category_id = $1 AND deleted_at IS NULL",
    )
    .bind(sub_category_id)
    .fetch_one(pool)
    .await?;
    Ok(n)
}

pub async fn insert(pool: &PgPool, new: &NewItem) -> Result<Item, BoxError> {
    let row = sqlx::query_as::<_, Item>(&format!(
        "INSERT INTO items (name, description, price, currency, dietary_info, image_url, \
                            sub_category_id, available, display_order) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {COLUMNS}"
    ))
    .bind(&new.name)
    .bind(&new.description)
    .bind(new.price)
    .bind(&new.currency)
    .bind(&new.dietary_info)
    .bind(&new.image_url)
    .bind(new.sub_category_id)
    .bind(new.available)
    .bind(new.display_order)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update(pool: &PgPool, id: i64, data: &ItemUpdate) -> Result<Option<Item>, BoxError> {
    let row = sqlx::query_as::<_, Item>(&format!(
        "UPDATE items SET \
            name = COALESCE($2, name), \
            description = COALESCE($3, description), \
            price = COALESCE($4, price), \
            currency = COALESCE($5, currency), \
            dietary_info = COALESCE($6, dietary_info), \
            image_url = COALESCE($7, image_url), \
            sub_category_id = COALESCE($8, sub_category_id), \
            available = COALESCE($9, available), \
            display_order = COALESCE($10, display_order), \
            updated_at = NOW() \
         WHERE id = $1 AND deleted_at IS NULL RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(data.name.as_deref())
    .bind(data.description.as_deref())
    .bind(data.price)
    .bind(data.currency.as_deref())
    .bind(data.dietary_info.as_ref())
    .bind(data.image_url.as_deref())
    .bind(data.sub_category_id)
    .bind(data.available)
    .bind(data.display_order)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn toggle_available(pool: &PgPool, id: i64) -> Result<Option<Item>, BoxError> {
    let row = sqlx::query_as::<_, Item>(&format!(
        "UPDATE items SET available = NOT available, updated_at = NOW() \
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
) -> Result<Option<Item>, BoxError> {
    let row = sqlx::query_as::<_, Item>(&format!(
        "UPDATE items SET display_order = $2, updated_at = NOW() \
         WHERE id = $1 AND deleted_at IS NULL RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(display_order)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn set_price(
    pool: &PgPool,
    id: i64,
    price: Decimal,
    currency: Option<&str>,
) -> Result<Option<Item>, BoxError> {
    let row = sqlx::query_as::<_, Item>(&format!(
        "UPDATE items SET price = $2, currency = COALESCE($3, currency), updated_at = NOW() \
         WHERE id = $1 AND deleted_at IS NULL RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(price)
    .bind(currency)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn soft_delete(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result =
        sqlx::query("UPDATE items SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected() > 0)
}
