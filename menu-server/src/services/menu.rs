//! Complete menu aggregation, served through the menu cache

use shared::models::{Category, CategoryMenu, CompleteMenu, Item, MenuStats, SubCategory};
use shared::{AppError, ErrorCode};
use std::collections::HashMap;

use crate::cache::{MENU_COMPLETE_KEY, menu_category_key};
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;

/// Attach items to subcategories and subcategories to categories.
///
/// Inputs must already be in menu order; grouping keeps that order.
pub fn assemble(
    mut categories: Vec<Category>,
    subs: Vec<SubCategory>,
    items: Vec<Item>,
) -> Vec<Category> {
    let mut items_by_sub: HashMap<i64, Vec<Item>> = HashMap::new();
    for item in items {
        items_by_sub.entry(item.sub_category_id).or_default().push(item);
    }

    let mut subs_by_category: HashMap<i64, Vec<SubCategory>> = HashMap::new();
    for mut sub in subs {
        sub.items = Some(items_by_sub.remove(&sub.id).unwrap_or_default());
        subs_by_category.entry(sub.category_id).or_default().push(sub);
    }

    for category in &mut categories {
        category.sub_categories = Some(subs_by_category.remove(&category.id).unwrap_or_default());
    }
    categories
}

/// Active categories → active subcategories → available items
pub async fn complete(state: &AppState) -> ServiceResult<CompleteMenu> {
    if let Some(menu) = state.cache.get::<CompleteMenu>(MENU_COMPLETE_KEY) {
        tracing::debug!("Complete menu served from cache");
        return Ok(menu);
    }

    let generation = state.cache.menu_generation();
    let pool = &state.pool;
    let categories = db::category::list_active(pool).await?;
    let category_ids: Vec<i64> = categories.iter().map(|c| c.id).collect();
    let subs = db::subcategory::list_for_categories(pool, &category_ids, true).await?;
    let sub_ids: Vec<i64> = subs.iter().map(|s| s.id).collect();
    let items = db::item::list_for_subcategories(pool, &sub_ids, true).await?;

    let categories = assemble(categories, subs, items);
    let menu = CompleteMenu {
        stats: MenuStats::from_tree(&categories),
        categories,
    };

    state.cache.set_menu(MENU_COMPLETE_KEY, &menu, generation);
    Ok(menu)
}

/// One category with every live subcategory and item, whatever their flags
pub async fn category(state: &AppState, id: i64) -> ServiceResult<CategoryMenu> {
    let key = menu_category_key(id);
    if let Some(menu) = state.cache.get::<CategoryMenu>(&key) {
        return Ok(menu);
    }

    let generation = state.cache.menu_generation();
    let pool = &state.pool;
    let category = db::category::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound).with_detail("id", id))?;
    let subs = db::subcategory::list_for_categories(pool, &[id], false).await?;
    let sub_ids: Vec<i64> = subs.iter().map(|s| s.id).collect();
    let items = db::item::list_for_subcategories(pool, &sub_ids, false).await?;

    let mut tree = assemble(vec![category], subs, items);
    let stats = MenuStats::from_tree(&tree);
    let menu = match tree.pop() {
        Some(category) => CategoryMenu { category, stats },
        None => return Err(AppError::new(ErrorCode::CategoryNotFound).into()),
    };

    state.cache.set_menu(key, &menu, generation);
    Ok(menu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn category(id: i64) -> Category {
        Category {
            id,
            name: format!("c{id}"),
            description: String::new(),
            slug: format!("c{id}"),
            display_order: id as i32,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            sub_categories: None,
        }
    }

    fn sub(id: i64, category_id: i64) -> SubCategory {
        SubCategory {
            id,
            name: format!("s{id}"),
            description: String::new(),
            slug: format!("s{id}"),
            category_id,
            display_order: id as i32,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            items: None,
        }
    }

    fn item(id: i64, sub_category_id: i64) -> Item {
        Item {
            id,
            name: format!("i{id}"),
            description: String::new(),
            price: Decimal::new(1250, 2),
            currency: "AED".into(),
            dietary_info: serde_json::json!({}),
            image_url: String::new(),
            sub_category_id,
            available: true,
            display_order: id as i32,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_assemble_groups_in_order() {
        let tree = assemble(
            vec![category(1), category(2)],
            vec![sub(10, 1), sub(11, 1), sub(20, 2)],
            vec![item(100, 10), item(101, 10), item(200, 20)],
        );

        let first = tree[0].sub_categories.as_ref().unwrap();
        assert_eq!(first.iter().map(|s| s.id).collect::<Vec<_>>(), vec![10, 11]);
        let first_items = first[0].items.as_ref().unwrap();
        assert_eq!(first_items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![100, 101]);
        assert!(first[1].items.as_ref().unwrap().is_empty());

        let second = tree[1].sub_categories.as_ref().unwrap();
        assert_eq!(second[0].items.as_ref().unwrap()[0].id, 200);

        let stats = MenuStats::from_tree(&tree);
        assert_eq!(stats.total_categories, 2);
        assert_eq!(stats.total_sub_categories, 3);
        assert_eq!(stats.total_items, 3);
    }

    #[test]
    fn test_assemble_empty_category() {
        let tree = assemble(vec![category(5)], vec![], vec![]);
        assert_eq!(tree[0].sub_categories.as_deref().map(|s| s.len()), Some(0));
    }
}
