//! Subcategory business rules

use shared::models::{
    DisplayOrderUpdate, SubCategory, SubCategoryCreate, SubCategoryFilter, SubCategoryUpdate,
};
use shared::{AppError, ErrorCode, PageRequest, Pagination};

use super::{next_display_order, unique_slug};
use crate::db;
use crate::db::subcategory::NewSubCategory;
use crate::error::ServiceResult;
use crate::state::AppState;

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::SubCategoryNotFound).with_detail("id", id)
}

fn name_taken(name: &str, category_id: i64) -> AppError {
    AppError::new(ErrorCode::SubCategoryNameExists)
        .with_detail("name", name)
        .with_detail("category_id", category_id)
}

/// Parent category must exist and not be deleted
async fn ensure_category(state: &AppState, category_id: i64) -> ServiceResult<()> {
    if !db::category::exists(&state.pool, category_id).await? {
        return Err(AppError::invalid_id("category")
            .with_detail("reason", "Category does not exist")
            .with_detail("category_id", category_id)
            .into());
    }
    Ok(())
}

pub async fn list(
    state: &AppState,
    filter: &SubCategoryFilter,
) -> ServiceResult<(Vec<SubCategory>, Pagination)> {
    let page = PageRequest::new(filter.page, filter.limit);
    let (rows, total) = db::subcategory::list(&state.pool, filter, page).await?;
    Ok((rows, page.paginate(total)))
}

/// One subcategory; `include_items` preloads its available items
pub async fn get(state: &AppState, id: i64, include_items: bool) -> ServiceResult<SubCategory> {
    let mut sub = db::subcategory::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if include_items {
        let items = db::item::list_for_subcategories(&state.pool, &[id], true).await?;
        sub.items = Some(items);
    }
    Ok(sub)
}

pub async fn create(state: &AppState, mut payload: SubCategoryCreate) -> ServiceResult<SubCategory> {
    payload.validate()?;
    let pool = &state.pool;
    let category_id = payload.category_id;

    ensure_category(state, category_id).await?;

    if db::subcategory::name_exists(pool, category_id, &payload.name, None).await? {
        return Err(name_taken(&payload.name, category_id).into());
    }

    let slug = unique_slug(&payload.name, "subcategory", |s| async move {
        db::subcategory::slug_exists(pool, category_id, &s, None).await
    })
    .await?;

    let existing = db::subcategory::count_in_category(pool, category_id).await?;
    let new = NewSubCategory {
        name: payload.name,
        description: payload.description.unwrap_or_default(),
        slug,
        category_id,
        display_order: next_display_order(payload.display_order, existing),
        active: payload.active.unwrap_or(true),
    };

    let sub = db::subcategory::insert(pool, &new).await?;
    state.cache.invalidate_menu();

    tracing::info!(id = sub.id, category_id, name = %sub.name, "Subcategory created");
    Ok(sub)
}

pub async fn update(
    state: &AppState,
    id: i64,
    mut payload: SubCategoryUpdate,
) -> ServiceResult<SubCategory> {
    payload.validate()?;
    let pool = &state.pool;

    let current = db::subcategory::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let target_category = payload.category_id.unwrap_or(current.category_id);
    let moving = target_category != current.category_id;
    if moving {
        ensure_category(state, target_category).await?;
    }

    let mut slug = None;
    let renamed = payload.name.as_deref().filter(|n| *n != current.name);
    if renamed.is_some() || moving {
        let name = payload.name.as_deref().unwrap_or(&current.name);
        if db::subcategory::name_exists(pool, target_category, name, Some(id)).await? {
            return Err(name_taken(name, target_category).into());
        }
        slug = Some(
            unique_slug(name, "subcategory", |s| async move {
                db::subcategory::slug_exists(pool, target_category, &s, Some(id)).await
            })
            .await?,
        );
    }

    let sub = db::subcategory::update(pool, id, &payload, slug.as_deref())
        .await?
        .ok_or_else(|| not_found(id))?;
    state.cache.invalidate_menu();
    Ok(sub)
}

/// Soft delete; refused while live items remain
pub async fn delete(state: &AppState, id: i64) -> ServiceResult<()> {
    let pool = &state.pool;
    if !db::subcategory::exists(pool, id).await? {
        return Err(not_found(id).into());
    }

    let items = db::subcategory::count_items(pool, id).await?;
    if items > 0 {
        return Err(AppError::new(ErrorCode::SubCategoryHasItems)
            .with_detail("items", items)
            .into());
    }

    if !db::subcategory::soft_delete(pool, id).await? {
        return Err(not_found(id).into());
    }
    state.cache.invalidate_menu();

    tracing::info!(id, "Subcategory deleted");
    Ok(())
}

pub async fn toggle(state: &AppState, id: i64) -> ServiceResult<SubCategory> {
    let sub = db::subcategory::toggle_active(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    state.cache.invalidate_menu();
    Ok(sub)
}

pub async fn set_order(
    state: &AppState,
    id: i64,
    payload: DisplayOrderUpdate,
) -> ServiceResult<SubCategory> {
    payload.validate()?;
    let sub = db::subcategory::set_display_order(&state.pool, id, payload.display_order)
        .await?
        .ok_or_else(|| not_found(id))?;
    state.cache.invalidate_menu();
    Ok(sub)
}
