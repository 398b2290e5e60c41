//! Content section database operations

use shared::PageRequest;
use shared::models::{ContentFilter, ContentSection, ContentUpdate};
use shared::query::{like_pattern, order_clause};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{BoxError, push_page, push_search};

const COLUMNS: &str =
    "id, section_name, title, content, metadata, image_url, active, created_at, updated_at";

const ORDER_COLUMNS: &[(&str, &str)] = &[
    ("section_name", "section_name"),
    ("title", "title"),
    ("created_at", "created_at"),
    ("updated_at", "updated_at"),
    ("active", "active"),
];

const DEFAULT_ORDER: &str = "section_name ASC";

#[derive(Debug, Clone)]
pub struct NewContent {
    pub section_name: String,
    pub title: String,
    pub content: String,
    pub metadata: serde_json::Value,
    pub image_url: String,
    pub active: bool,
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ContentFilter) {
    if let Some(name) = filter.section_name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        qb.push(" AND section_name = ").push_bind(name.to_owned());
    }
    if let Some(active) = filter.active {
        qb.push(" AND active = ").push_bind(active);
    }
    if let Some(pattern) = like_pattern(filter.search.as_deref()) {
        push_search(qb, &["title", "content", "section_name"], &pattern);
    }
}

pub async fn list(
    pool: &PgPool,
    filter: &ContentFilter,
    page: PageRequest,
) -> Result<(Vec<ContentSection>, i64), BoxError> {
    let mut count_qb =
        QueryBuilder::new("SELECT COUNT(*) FROM content_sections WHERE deleted_at IS NULL");
    push_filters(&mut count_qb, filter);
    let total = count_qb.build_query_scalar::<i64>().fetch_one(pool).await?;

    let mut qb = QueryBuilder::new(format!(
        "SELECT {COLUMNS} FROM content_sections WHERE deleted_at IS NULL"
    ));
    push_filters(&mut qb, filter);
    let order = order_clause(
        filter.order_by.as_deref(),
        filter.order_dir.as_deref(),
        ORDER_COLUMNS,
        DEFAULT_ORDER,
    );
    push_page(&mut qb, &order, page);
    let rows = qb.build_query_as::<ContentSection>().fetch_all(pool).await?;

    Ok((rows, total))
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<ContentSection>, BoxError> {
    let row = sqlx::query_as::<_, ContentSection>(&format!(
        "SELECT {COLUMNS} FROM content_sections WHERE id = $1 AND deleted_at IS NULL"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_by_section(
    pool: &PgPool,
    section_name: &str,
) -> Result<Option<ContentSection>, BoxError> {
    let row = sqlx::query_as::<_, ContentSection>(&format!(
        "SELECT {COLUMNS} FROM content_sections WHERE section_name = $1 AND deleted_at IS NULL"
    ))
    .bind(section_name)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn section_exists(
    pool: &PgPool,
    section_name: &str,
    exclude_id: Option<i64>,
) -> Result<bool, BoxError> {
    let found: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM content_sections \
         WHERE section_name = $1 AND deleted_at IS NULL \
         AND ($2::BIGINT IS NULL OR id <> $2))",
    )
    .bind(section_name)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    Ok(found)
}

pub async fn insert(pool: &PgPool, new: &NewContent) -> Result<ContentSection, BoxError> {
    let row = sqlx::query_as::<_, ContentSection>(&format!(
        "INSERT INTO content_sections (section_name, title, content, metadata, image_url, active) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMNS}"
    ))
    .bind(&new.section_name)
    .bind(&new.title)
    .bind(&new.content)
    .bind(&new.metadata)
    .bind(&new.image_url)
    .bind(new.active)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &ContentUpdate,
) -> Result<Option<ContentSection>, BoxError> {
    let row = sqlx::query_as::<_, ContentSection>(&format!(
        "UPDATE content_sections SET \
            section_name = COALESCE($2, section_name), \
            title = COALESCE($3, title), \
            content = COALESCE($4, content), \
            metadata = COALESCE($5, metadata), \
            image_url = COALESCE($6, image_url), \
            active = COALESCE($7, active), \
            updated_at = NOW() \
         WHERE id = $1 AND deleted_at IS NULL RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(data.section_name.as_deref())
    .bind(data.title.as_deref())
    .bind(data.content.as_deref())
    .bind(data.metadata.as_ref())
    .bind(data.image_url.as_deref())
    .bind(data.active)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn toggle_active(pool: &PgPool, id: i64) -> Result<Option<ContentSection>, BoxError> {
    let row = sqlx::query_as::<_, ContentSection>(&format!(
        "UPDATE content_sections SET active = NOT active, updated_at = NOW() \
         WHERE id = $1 AND deleted_at IS NULL RETURNING {COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn soft_delete(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query(
        "UPDATE content_sections SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
