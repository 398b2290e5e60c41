//! Category business rules

use shared::models::{Category, CategoryCreate, CategoryFilter, CategoryUpdate, DisplayOrderUpdate};
use shared::{AppError, ErrorCode, PageRequest, Pagination};

use super::{next_display_order, unique_slug};
use crate::db;
use crate::db::category::NewCategory;
use crate::error::ServiceResult;
use crate::state::AppState;

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::CategoryNotFound).with_detail("id", id)
}

pub async fn list(
    state: &AppState,
    filter: &CategoryFilter,
) -> ServiceResult<(Vec<Category>, Pagination)> {
    let page = PageRequest::new(filter.page, filter.limit);
    let (rows, total) = db::category::list(&state.pool, filter, page).await?;
    Ok((rows, page.paginate(total)))
}

/// One category; `include_subcategories` preloads its active subcategories
pub async fn get(
    state: &AppState,
    id: i64,
    include_subcategories: bool,
) -> ServiceResult<Category> {
    let mut category = db::category::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if include_subcategories {
        let subs = db::subcategory::list_for_categories(&state.pool, &[id], true).await?;
        category.sub_categories = Some(subs);
    }
    Ok(category)
}

pub async fn create(state: &AppState, mut payload: CategoryCreate) -> ServiceResult<Category> {
    payload.validate()?;
    let pool = &state.pool;

    if db::category::name_exists(pool, &payload.name, None).await? {
        return Err(AppError::new(ErrorCode::CategoryNameExists)
            .with_detail("name", payload.name.as_str())
            .into());
    }

    let slug = unique_slug(&payload.name, "category", |s| async move {
        db::category::slug_exists(pool, &s, None).await
    })
    .await?;

    let existing = db::category::count(pool).await?;
    let new = NewCategory {
        name: payload.name,
        description: payload.description.unwrap_or_default(),
        slug,
        display_order: next_display_order(payload.display_order, existing),
        active: payload.active.unwrap_or(true),
    };

    let category = db::category::insert(pool, &new).await?;
    state.cache.invalidate_menu();

    tracing::info!(id = category.id, name = %category.name, "Category created");
    Ok(category)
}

pub async fn update(
    state: &AppState,
    id: i64,
    mut payload: CategoryUpdate,
) -> ServiceResult<Category> {
    payload.validate()?;
    let pool = &state.pool;

    let current = db::category::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let mut slug = None;
    if let Some(name) = payload.name.as_deref()
        && name != current.name
    {
        if db::category::name_exists(pool, name, Some(id)).await? {
            return Err(AppError::new(ErrorCode::CategoryNameExists)
                .with_detail("name", name)
                .into());
        }
        slug = Some(
            unique_slug(name, "category", |s| async move {
                db::category::slug_exists(pool, &s, Some(id)).await
            })
            .await?,
        );
    }

    let category = db::category::update(pool, id, &payload, slug.as_deref())
        .await?
        .ok_or_else(|| not_found(id))?;
    state.cache.invalidate_menu();
    Ok(category)
}

/// Soft delete; refused while live subcategories remain
pub async fn delete(state: &AppState, id: i64) -> ServiceResult<()> {
    let pool = &state.pool;
    if !db::category::exists(pool, id).await? {
        return Err(not_found(id).into());
    }

    let children = db::category::count_subcategories(pool, id).await?;
    if children > 0 {
        return Err(AppError::new(ErrorCode::CategoryHasSubcategories)
            .with_detail("sub_categories", children)
            .into());
    }

    if !db::category::soft_delete(pool, id).await? {
        return Err(not_found(id).into());
    }
    state.cache.invalidate_menu();

    tracing::info!(id, "Category deleted");
    Ok(())
}

pub async fn toggle(state: &AppState, id: i64) -> ServiceResult<Category> {
    let category = db::category::toggle_active(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    state.cache.invalidate_menu();
    Ok(category)
}

pub async fn set_order(
    state: &AppState,
    id: i64,
    payload: DisplayOrderUpdate,
) -> ServiceResult<Category> {
    payload.validate()?;
    let category = db::category::set_display_order(&state.pool, id, payload.display_order)
        .await?
        .ok_or_else(|| not_found(id))?;
    state.cache.invalidate_menu();
    Ok(category)
}
