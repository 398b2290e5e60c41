//! Dashboard statistics

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use shared::models::dashboard::{
    ActionType, ActivityType, AvailabilityStats, CategoryStats, DashboardFilter,
    DashboardResponse, DashboardStats, MenuHealthMetrics, PriceDistribution, RecentActivity,
    WeeklyItemsData, day_label, price_distribution as distribution,
};
use shared::util::round2;

use crate::db;
use crate::db::dashboard::RecentRow;
use crate::error::ServiceResult;
use crate::state::AppState;

const RECENT_ITEMS: i64 = 10;
const RECENT_CATEGORIES: i64 = 5;

pub async fn stats(state: &AppState, filter: &DashboardFilter) -> ServiceResult<DashboardStats> {
    let since = filter.since(Utc::now());
    let counts = db::dashboard::catalog_counts(&state.pool, since).await?;
    Ok(DashboardStats {
        total_categories: counts.total_categories,
        total_sub_categories: counts.total_sub_categories,
        total_items: counts.total_items,
        available_items: counts.available_items,
        unavailable_items: counts.total_items - counts.available_items,
        average_price: round2(counts.average_price),
        recent_items_count: counts.recent_items_count,
        recent_categories_count: counts.recent_categories_count,
    })
}

/// Newest item and category creations merged, newest first
pub async fn recent_activity(
    state: &AppState,
    filter: &DashboardFilter,
) -> ServiceResult<Vec<RecentActivity>> {
    let (items, categories) = tokio::try_join!(
        db::dashboard::recent_items(&state.pool, filter.date_from, RECENT_ITEMS),
        db::dashboard::recent_categories(&state.pool, filter.date_from, RECENT_CATEGORIES),
    )?;
    Ok(merge_activity(items, categories, filter.limit))
}

pub fn merge_activity(
    items: Vec<RecentRow>,
    categories: Vec<RecentRow>,
    limit: Option<i64>,
) -> Vec<RecentActivity> {
    let to_activity = |activity_type: ActivityType| {
        move |(id, name, created_at, updated_at): RecentRow| RecentActivity {
            id,
            activity_type,
            name,
            action: ActionType::Created,
            created_at,
            updated_at,
        }
    };

    let mut activity: Vec<RecentActivity> = items
        .into_iter()
        .map(to_activity(ActivityType::Item))
        .chain(categories.into_iter().map(to_activity(ActivityType::Category)))
        .collect();
    activity.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    if let Some(limit) = limit.filter(|l| *l > 0) {
        activity.truncate(limit as usize);
    }
    activity
}

pub async fn category_stats(state: &AppState) -> ServiceResult<Vec<CategoryStats>> {
    let mut rows = db::dashboard::category_stats(&state.pool).await?;
    for row in &mut rows {
        row.average_price = round2(row.average_price);
    }
    Ok(rows)
}

pub async fn price_distribution(state: &AppState) -> ServiceResult<Vec<PriceDistribution>> {
    let (counts, total) = db::dashboard::price_bucket_counts(&state.pool).await?;
    Ok(distribution(&counts, total))
}

/// Items created per day over the last `days` days, oldest first, zero-filled
pub async fn weekly_data(
    state: &AppState,
    filter: &DashboardFilter,
) -> ServiceResult<Vec<WeeklyItemsData>> {
    let days = filter.days();
    let today = Utc::now().date_naive();
    let start = today - Duration::days(days - 1);
    let since = start.and_time(NaiveTime::MIN).and_utc();

    let counts = db::dashboard::items_created_per_day(&state.pool, since).await?;
    Ok(fill_days(start, days, &counts))
}

pub fn fill_days(start: NaiveDate, days: i64, counts: &[(NaiveDate, i64)]) -> Vec<WeeklyItemsData> {
    (0..days)
        .map(|offset| {
            let date = start + Duration::days(offset);
            let count = counts
                .iter()
                .find(|(d, _)| *d == date)
                .map(|(_, c)| *c)
                .unwrap_or(0);
            WeeklyItemsData {
                date,
                day: day_label(date),
                count,
            }
        })
        .collect()
}

pub async fn menu_health(state: &AppState) -> ServiceResult<MenuHealthMetrics> {
    let pool = &state.pool;
    let (health, counts, buckets) = tokio::try_join!(
        db::dashboard::health_counts(pool),
        db::dashboard::catalog_counts(pool, Utc::now()),
        db::dashboard::price_bucket_counts(pool),
    )?;

    Ok(MenuHealthMetrics {
        categories_without_items: health.categories_without_items,
        subcategories_without_items: health.subcategories_without_items,
        items_without_images: health.items_without_images,
        items_without_description: health.items_without_description,
        availability_stats: AvailabilityStats::new(counts.total_items, counts.available_items),
        price_range_stats: distribution(&buckets.0, buckets.1),
    })
}

/// Every dashboard section, computed concurrently
pub async fn complete(state: &AppState, filter: &DashboardFilter) -> ServiceResult<DashboardResponse> {
    let (stats, recent_activity, category_stats, price_distribution, weekly_data, menu_health) =
        tokio::try_join!(
            stats(state, filter),
            recent_activity(state, filter),
            category_stats(state),
            price_distribution(state),
            weekly_data(state, filter),
            menu_health(state),
        )?;

    Ok(DashboardResponse {
        stats,
        recent_activity,
        category_stats,
        price_distribution,
        weekly_data,
        menu_health,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fill_days_zero_fills_oldest_first() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let third = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let data = fill_days(start, 7, &[(third, 4)]);

        assert_eq!(data.len(), 7);
        assert_eq!(data[0].date, start);
        assert_eq!(data[0].day, "Mon");
        assert_eq!(data[0].count, 0);
        assert_eq!(data[2].count, 4);
        assert_eq!(data[6].day, "Sun");
    }

    #[test]
    fn test_merge_activity_sorted_and_limited() {
        let at = |h| Utc.with_ymd_and_hms(2024, 5, 1, h, 0, 0).unwrap();
        let items = vec![(1, "Latte".to_string(), at(9), at(9)), (2, "Mocha".to_string(), at(7), at(7))];
        let categories = vec![(3, "Drinks".to_string(), at(8), at(8))];

        let merged = merge_activity(items.clone(), categories.clone(), None);
        assert_eq!(merged.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1, 3, 2]);
        assert_eq!(merged[1].activity_type, ActivityType::Category);
        assert!(merged.iter().all(|a| a.action == ActionType::Created));

        let limited = merge_activity(items, categories, Some(2));
        assert_eq!(limited.len(), 2);
    }
}
