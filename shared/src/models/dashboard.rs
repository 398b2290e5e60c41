//! Dashboard aggregates

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::util::round2;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_categories: i64,
    pub total_sub_categories: i64,
    pub total_items: i64,
    pub available_items: i64,
    pub unavailable_items: i64,
    pub average_price: f64,
    pub recent_items_count: i64,
    pub recent_categories_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Item,
    Category,
    Subcategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentActivity {
    pub id: i64,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub name: String,
    pub action: ActionType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CategoryStats {
    pub id: i64,
    pub name: String,
    pub item_count: i64,
    pub available_items: i64,
    pub average_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceDistribution {
    pub range: String,
    pub count: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyItemsData {
    pub date: NaiveDate,
    pub day: String,
    pub count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityStats {
    pub total_items: i64,
    pub available_items: i64,
    pub unavailable_items: i64,
    /// Percentage of available items, two decimals
    pub availability_rate: f64,
}

impl AvailabilityStats {
    pub fn new(total_items: i64, available_items: i64) -> Self {
        let availability_rate = if total_items > 0 {
            round2(available_items as f64 / total_items as f64 * 100.0)
        } else {
            0.0
        };
        Self {
            total_items,
            available_items,
            unavailable_items: total_items - available_items,
            availability_rate,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuHealthMetrics {
    pub categories_without_items: i64,
    pub subcategories_without_items: i64,
    pub items_without_images: i64,
    pub items_without_description: i64,
    pub availability_stats: AvailabilityStats,
    pub price_range_stats: Vec<PriceDistribution>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub recent_activity: Vec<RecentActivity>,
    pub category_stats: Vec<CategoryStats>,
    pub price_distribution: Vec<PriceDistribution>,
    pub weekly_data: Vec<WeeklyItemsData>,
    pub menu_health: MenuHealthMetrics,
}

/// Dashboard query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardFilter {
    pub days: Option<i64>,
    pub date_from: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
}

impl DashboardFilter {
    pub const DEFAULT_DAYS: i64 = 7;
    pub const MAX_DAYS: i64 = 90;

    /// Look-back window in days, clamped to 1..=90
    pub fn days(&self) -> i64 {
        self.days
            .filter(|d| *d > 0)
            .unwrap_or(Self::DEFAULT_DAYS)
            .min(Self::MAX_DAYS)
    }

    /// Start of the "recent" window: `date_from` when given, else now minus `days`
    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.date_from
            .unwrap_or_else(|| now - chrono::Duration::days(self.days()))
    }
}

/// Price bucket: `[min, max)`, `max == None` means open-ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Option<Decimal>,
    pub label: &'static str,
}

/// Fixed buckets used for price distribution
pub const PRICE_RANGES: [PriceRange; 5] = [
    PriceRange { min: Decimal::ZERO, max: Some(Decimal::from_parts(25, 0, 0, false, 0)), label: "0-25 AED" },
    PriceRange { min: Decimal::from_parts(25, 0, 0, false, 0), max: Some(Decimal::from_parts(50, 0, 0, false, 0)), label: "25-50 AED" },
    PriceRange { min: Decimal::from_parts(50, 0, 0, false, 0), max: Some(Decimal::from_parts(100, 0, 0, false, 0)), label: "50-100 AED" },
    PriceRange { min: Decimal::from_parts(100, 0, 0, false, 0), max: Some(Decimal::from_parts(200, 0, 0, false, 0)), label: "100-200 AED" },
    PriceRange { min: Decimal::from_parts(200, 0, 0, false, 0), max: None, label: "200+ AED" },
];

/// Turn per-bucket counts (same order as [`PRICE_RANGES`]) into a distribution.
///
/// Empty buckets are skipped; an empty menu yields an empty list.
pub fn price_distribution(counts: &[i64], total: i64) -> Vec<PriceDistribution> {
    if total <= 0 {
        return Vec::new();
    }
    PRICE_RANGES
        .iter()
        .zip(counts)
        .filter(|(_, count)| **count > 0)
        .map(|(range, count)| PriceDistribution {
            range: range.label.to_string(),
            count: *count,
            percentage: round2(*count as f64 / total as f64 * 100.0),
        })
        .collect()
}

/// Short English weekday label ("Mon", "Tue", ...)
pub fn day_label(date: NaiveDate) -> String {
    date.format("%a").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_distribution_skips_empty() {
        let dist = price_distribution(&[3, 0, 1, 0, 0], 4);
        assert_eq!(
            dist,
            vec![
                PriceDistribution {
                    range: "0-25 AED".into(),
                    count: 3,
                    percentage: 75.0,
                },
                PriceDistribution {
                    range: "50-100 AED".into(),
                    count: 1,
                    percentage: 25.0,
                },
            ]
        );
    }

    #[test]
    fn test_price_distribution_rounding_and_empty() {
        let dist = price_distribution(&[1, 1, 1, 0, 0], 3);
        assert_eq!(dist[0].percentage, 33.33);
        assert!(price_distribution(&[0, 0, 0, 0, 0], 0).is_empty());
    }

    #[test]
    fn test_price_ranges_are_contiguous() {
        for pair in PRICE_RANGES.windows(2) {
            assert_eq!(pair[0].max, Some(pair[1].min));
        }
        assert!(PRICE_RANGES[4].max.is_none());
    }

    #[test]
    fn test_availability_rate() {
        let stats = AvailabilityStats::new(3, 2);
        assert_eq!(stats.unavailable_items, 1);
        assert_eq!(stats.availability_rate, 66.67);
        assert_eq!(AvailabilityStats::new(0, 0).availability_rate, 0.0);
    }

    #[test]
    fn test_filter_days() {
        assert_eq!(DashboardFilter::default().days(), 7);
        let f = DashboardFilter {
            days: Some(365),
            ..Default::default()
        };
        assert_eq!(f.days(), 90);
        let f = DashboardFilter {
            days: Some(0),
            ..Default::default()
        };
        assert_eq!(f.days(), 7);
    }

    #[test]
    fn test_day_label() {
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(day_label(monday), "Mon");
    }

    #[test]
    fn test_activity_serialization() {
        let activity = RecentActivity {
            id: 1,
            activity_type: ActivityType::Item,
            name: "Latte".into(),
            action: ActionType::Created,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["type"], "item");
        assert_eq!(json["action"], "created");
    }
}
