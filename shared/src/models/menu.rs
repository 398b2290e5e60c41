//! Read-optimized menu aggregates

use serde::{Deserialize, Serialize};

use super::category::Category;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuStats {
    pub total_categories: i64,
    pub total_sub_categories: i64,
    pub total_items: i64,
    pub available_items: i64,
}

impl MenuStats {
    /// Count the tree below `categories` (subcategories and items must be loaded)
    pub fn from_tree(categories: &[Category]) -> Self {
        let mut stats = Self {
            total_categories: categories.len() as i64,
            ..Self::default()
        };
        for sub in categories.iter().flat_map(|c| c.sub_categories.iter().flatten()) {
            stats.total_sub_categories += 1;
            for item in sub.items.iter().flatten() {
                stats.total_items += 1;
                if item.available {
                    stats.available_items += 1;
                }
            }
        }
        stats
    }
}

/// Active categories → active subcategories → available items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteMenu {
    pub categories: Vec<Category>,
    pub stats: MenuStats,
}

/// One category with every subcategory and item beneath it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryMenu {
    pub category: Category,
    pub stats: MenuStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Item, SubCategory};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn item(id: i64, available: bool) -> Item {
        Item {
            id,
            name: format!("item-{id}"),
            description: String::new(),
            price: Decimal::from(10),
            currency: "AED".into(),
            dietary_info: serde_json::json!({}),
            image_url: String::new(),
            sub_category_id: 1,
            available,
            display_order: id as i32,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sub(id: i64, items: Vec<Item>) -> SubCategory {
        SubCategory {
            id,
            name: format!("sub-{id}"),
            description: String::new(),
            slug: format!("sub-{id}"),
            category_id: 1,
            display_order: 0,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            items: Some(items),
        }
    }

    #[test]
    fn test_stats_from_tree() {
        let category = Category {
            id: 1,
            name: "Mains".into(),
            description: String::new(),
            slug: "mains".into(),
            display_order: 0,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            sub_categories: Some(vec![
                sub(1, vec![item(1, true), item(2, false)]),
                sub(2, vec![item(3, true)]),
            ]),
        };
        let empty = Category {
            id: 2,
            sub_categories: None,
            ..category.clone()
        };

        let stats = MenuStats::from_tree(&[category, empty]);
        assert_eq!(
            stats,
            MenuStats {
                total_categories: 2,
                total_sub_categories: 2,
                total_items: 3,
                available_items: 2,
            }
        );
    }
}
