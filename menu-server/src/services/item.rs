//! Item business rules

use shared::models::item::DEFAULT_CURRENCY;
use shared::models::{DisplayOrderUpdate, Item, ItemCreate, ItemFilter, ItemUpdate, PriceUpdate};
use shared::{AppError, ErrorCode, PageRequest, Pagination};

use super::next_display_order;
use crate::db;
use crate::db::item::{ItemQuery, NewItem};
use crate::error::ServiceResult;
use crate::state::AppState;

pub const SEARCH_DEFAULT_LIMIT: i64 = 20;
pub const SEARCH_MAX_LIMIT: i64 = 100;
pub const FEATURED_DEFAULT_LIMIT: i64 = 10;
pub const FEATURED_MAX_LIMIT: i64 = 50;

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::ItemNotFound).with_detail("id", id)
}

/// Clamp an optional limit into `1..=max`, falling back to `default`
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.filter(|l| *l > 0).unwrap_or(default).min(max)
}

async fn ensure_subcategory(state: &AppState, sub_category_id: i64) -> ServiceResult<()> {
    if !db::subcategory::exists(&state.pool, sub_category_id).await? {
        return Err(AppError::invalid_id("sub-category")
            .with_detail("reason", "Subcategory does not exist")
            .with_detail("sub_category_id", sub_category_id)
            .into());
    }
    Ok(())
}

pub async fn list(state: &AppState, filter: &ItemFilter) -> ServiceResult<(Vec<Item>, Pagination)> {
    let (min_price, max_price) = filter.price_bounds()?;
    let query = ItemQuery {
        filter,
        min_price,
        max_price,
    };
    let page = PageRequest::new(filter.page, filter.limit);
    let (rows, total) = db::item::list(&state.pool, &query, page).await?;
    Ok((rows, page.paginate(total)))
}

pub async fn get(state: &AppState, id: i64) -> ServiceResult<Item> {
    let item = db::item::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(item)
}

pub async fn create(state: &AppState, mut payload: ItemCreate) -> ServiceResult<Item> {
    payload.validate()?;
    ensure_subcategory(state, payload.sub_category_id).await?;

    let existing = db::item::count_in_subcategory(&state.pool, payload.sub_category_id).await?;
    let new = NewItem {
        name: payload.name,
        description: payload.description.unwrap_or_default(),
        price: payload.price,
        currency: payload
            .currency
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        dietary_info: payload
            .dietary_info
            .unwrap_or_else(|| serde_json::json!({})),
        image_url: payload.image_url.unwrap_or_default(),
        sub_category_id: payload.sub_category_id,
        available: payload.available.unwrap_or(true),
        display_order: next_display_order(payload.display_order, existing),
    };

    let item = db::item::insert(&state.pool, &new).await?;
    state.cache.invalidate_menu();

    tracing::info!(id = item.id, sub_category_id = item.sub_category_id, "Item created");
    Ok(item)
}

pub async fn update(state: &AppState, id: i64, mut payload: ItemUpdate) -> ServiceResult<Item> {
    payload.validate()?;

    let current = db::item::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(sub_category_id) = payload.sub_category_id
        && sub_category_id != current.sub_category_id
    {
        ensure_subcategory(state, sub_category_id).await?;
    }

    let item = db::item::update(&state.pool, id, &payload)
        .await?
        .ok_or_else(|| not_found(id))?;
    state.cache.invalidate_menu();
    Ok(item)
}

pub async fn delete(state: &AppState, id: i64) -> ServiceResult<()> {
    if !db::item::soft_delete(&state.pool, id).await? {
        return Err(not_found(id).into());
    }
    state.cache.invalidate_menu();

    tracing::info!(id, "Item deleted");
    Ok(())
}

pub async fn toggle(state: &AppState, id: i64) -> ServiceResult<Item> {
    let item = db::item::toggle_available(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    state.cache.invalidate_menu();
    Ok(item)
}

pub async fn set_order(
    state: &AppState,
    id: i64,
    payload: DisplayOrderUpdate,
) -> ServiceResult<Item> {
    payload.validate()?;
    let item = db::item::set_display_order(&state.pool, id, payload.display_order)
        .await?
        .ok_or_else(|| not_found(id))?;
    state.cache.invalidate_menu();
    Ok(item)
}

pub async fn set_price(state: &AppState, id: i64, mut payload: PriceUpdate) -> ServiceResult<Item> {
    payload.validate()?;
    let item = db::item::set_price(&state.pool, id, payload.price, payload.currency.as_deref())
        .await?
        .ok_or_else(|| not_found(id))?;
    state.cache.invalidate_menu();

    tracing::info!(id, price = %item.price, currency = %item.currency, "Item price updated");
    Ok(item)
}

/// Available items matching `q`; `q` must be non-blank
pub async fn search(state: &AppState, q: Option<&str>, limit: Option<i64>) -> ServiceResult<Vec<Item>> {
    let q = q.map(str::trim).filter(|q| !q.is_empty()).ok_or_else(|| {
        AppError::with_message(ErrorCode::RequiredField, "Search query is required")
            .with_detail("field", "q")
    })?;
    let limit = clamp_limit(limit, SEARCH_DEFAULT_LIMIT, SEARCH_MAX_LIMIT);
    Ok(db::item::search(&state.pool, q, limit).await?)
}

/// Random available items with images
pub async fn featured(state: &AppState, limit: Option<i64>) -> ServiceResult<Vec<Item>> {
    let limit = clamp_limit(limit, FEATURED_DEFAULT_LIMIT, FEATURED_MAX_LIMIT);
    Ok(db::item::featured(&state.pool, limit).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None, 20, 100), 20);
        assert_eq!(clamp_limit(Some(0), 20, 100), 20);
        assert_eq!(clamp_limit(Some(-5), 10, 50), 10);
        assert_eq!(clamp_limit(Some(35), 10, 50), 35);
        assert_eq!(clamp_limit(Some(500), 20, 100), 100);
    }
}
