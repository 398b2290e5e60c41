//! Database access layer
//!
//! Free async functions over `&PgPool`, one module per table group.
//! Soft-deleted rows (`deleted_at IS NOT NULL`) are filtered out everywhere.

pub mod category;
pub mod content;
pub mod dashboard;
pub mod item;
pub mod restaurant;
pub mod subcategory;

pub use crate::error::BoxError;

use sqlx::{Postgres, QueryBuilder};

/// Append `AND (LOWER(a) LIKE $n OR LOWER(b) LIKE $n ...)` for a search pattern
pub(crate) fn push_search(qb: &mut QueryBuilder<'_, Postgres>, columns: &[&str], pattern: &str) {
    qb.push(" AND (");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push(format!("LOWER({column}) LIKE "));
        qb.push_bind(pattern.to_owned());
    }
    qb.push(")");
}

/// Append `ORDER BY .. LIMIT .. OFFSET ..`
pub(crate) fn push_page(
    qb: &mut QueryBuilder<'_, Postgres>,
    order: &str,
    page: shared::PageRequest,
) {
    qb.push(" ORDER BY ")
        .push(order)
        .push(" LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.offset());
}
