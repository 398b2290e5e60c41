//! Business rules between handlers and repositories
//!
//! Services own uniqueness checks, defaults (slug, display order), existence
//! checks on parents, and menu cache invalidation after catalog writes.

pub mod category;
pub mod content;
pub mod dashboard;
pub mod item;
pub mod menu;
pub mod restaurant;
pub mod subcategory;
pub mod upload;

use shared::AppError;
use shared::util::{SLUG_MAX_LEN, slugify};
use std::future::Future;

use crate::error::{BoxError, ServiceResult};

/// Give up after this many numbered slug candidates
const MAX_SLUG_ATTEMPTS: u32 = 1000;

/// Next display order for a new row: explicit positive values win, otherwise `count + 1`
pub(crate) fn next_display_order(requested: Option<i32>, existing: i64) -> i32 {
    match requested {
        Some(order) if order > 0 => order,
        _ => i32::try_from(existing + 1).unwrap_or(i32::MAX),
    }
}

/// Slug for `name` that `taken` does not report as used.
///
/// Collisions get a numeric suffix (`drinks-2`, `drinks-3`, ...). Names that
/// slugify to nothing use `fallback`.
pub(crate) async fn unique_slug<F, Fut>(
    name: &str,
    fallback: &str,
    mut taken: F,
) -> ServiceResult<String>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, BoxError>>,
{
    let base = match slugify(name) {
        s if s.is_empty() => fallback.to_string(),
        s => s,
    };
    if !taken(base.clone()).await? {
        return Ok(base);
    }

    for n in 2..=MAX_SLUG_ATTEMPTS {
        let suffix = format!("-{n}");
        let stem: String = base.chars().take(SLUG_MAX_LEN - suffix.len()).collect();
        let candidate = format!("{}{suffix}", stem.trim_end_matches('-'));
        if !taken(candidate.clone()).await? {
            return Ok(candidate);
        }
    }

    Err(AppError::conflict(format!("Could not allocate a unique slug for '{name}'")).into())
}
