//! List query primitives: pagination, sort direction, ordering whitelist, search patterns

use serde::{Deserialize, Serialize};

/// Default page size
pub const DEFAULT_LIMIT: i64 = 10;
/// Maximum page size
pub const MAX_LIMIT: i64 = 100;

/// Normalized page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// page < 1 becomes 1, limit < 1 becomes 10, limit > 100 becomes 100
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(1);
        let limit = match limit {
            Some(l) if l < 1 => DEFAULT_LIMIT,
            Some(l) if l > MAX_LIMIT => MAX_LIMIT,
            Some(l) => l,
            None => DEFAULT_LIMIT,
        };
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Build the pagination meta for a result set of `total` rows
    pub fn paginate(&self, total: i64) -> Pagination {
        Pagination::new(self.page, self.limit, total)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Pagination metadata returned in `meta.pagination`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let PageRequest { page, limit } = PageRequest::new(Some(page), Some(limit));
        let total = total.max(0);
        let total_pages = (total + limit - 1) / limit;

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Sort direction; anything other than `desc` (case-insensitive) is ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Build an `ORDER BY` body from a client-supplied column name.
///
/// `allowed` maps accepted parameter names to SQL expressions. Unknown or
/// missing names fall back to `default`, which is used verbatim.
pub fn order_clause(
    order_by: Option<&str>,
    order_dir: Option<&str>,
    allowed: &[(&str, &str)],
    default: &str,
) -> String {
    let dir = SortDir::parse(order_dir);
    order_by
        .and_then(|name| {
            allowed
                .iter()
                .find(|(param, _)| param.eq_ignore_ascii_case(name.trim()))
        })
        .map(|(_, column)| format!("{column} {}", dir.as_sql()))
        .unwrap_or_else(|| default.to_string())
}

/// Turn a search term into a lowercase `LIKE` pattern (`%term%`).
///
/// Returns `None` for blank input. `%`, `_` and `\` in the term are escaped.
pub fn like_pattern(search: Option<&str>) -> Option<String> {
    let term = search?.trim();
    if term.is_empty() {
        return None;
    }
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    Some(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_bounds() {
        assert_eq!(PageRequest::new(None, None), PageRequest { page: 1, limit: 10 });
        assert_eq!(PageRequest::new(Some(0), Some(0)), PageRequest { page: 1, limit: 10 });
        assert_eq!(PageRequest::new(Some(-3), Some(-1)), PageRequest { page: 1, limit: 10 });
        assert_eq!(PageRequest::new(Some(4), Some(500)), PageRequest { page: 4, limit: 100 });
        assert_eq!(PageRequest::new(Some(2), Some(25)).offset(), 25);
    }

    #[test]
    fn test_offset_saturates_on_huge_page() {
        let page = PageRequest::new(Some(i64::MAX), Some(100));
        assert_eq!(page.offset(), i64::MAX);
        assert_eq!(Pagination::new(i64::MAX, 100, 5).offset(), i64::MAX);
    }

    #[test]
    fn test_pagination_pages() {
        let p = Pagination::new(1, 10, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next);
        assert!(!p.has_prev);

        let p = Pagination::new(1, 10, 10);
        assert_eq!(p.total_pages, 1);
        assert!(!p.has_next);

        let p = Pagination::new(1, 10, 11);
        assert_eq!(p.total_pages, 2);
        assert!(p.has_next);

        let p = Pagination::new(3, 10, 25);
        assert_eq!(p.total_pages, 3);
        assert!(!p.has_next);
        assert!(p.has_prev);
        assert_eq!(p.offset(), 20);
    }

    #[test]
    fn test_pagination_clamps_inputs() {
        let p = Pagination::new(0, 1000, 250);
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 100);
        assert_eq!(p.total_pages, 3);
    }

    #[test]
    fn test_sort_dir() {
        assert_eq!(SortDir::parse(Some("DESC")), SortDir::Desc);
        assert_eq!(SortDir::parse(Some("desc")), SortDir::Desc);
        assert_eq!(SortDir::parse(Some("sideways")), SortDir::Asc);
        assert_eq!(SortDir::parse(None).as_sql(), "ASC");
    }

    #[test]
    fn test_order_clause_whitelist() {
        let allowed = [("name", "name"), ("price", "i.price")];
        let default = "display_order ASC, created_at DESC";

        assert_eq!(
            order_clause(Some("price"), Some("desc"), &allowed, default),
            "i.price DESC"
        );
        assert_eq!(order_clause(Some("NAME"), None, &allowed, default), "name ASC");
        assert_eq!(
            order_clause(Some("name; DROP TABLE items"), None, &allowed, default),
            default
        );
        assert_eq!(order_clause(None, Some("desc"), &allowed, default), default);
    }

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern(Some("  Burger ")), Some("%burger%".to_string()));
        assert_eq!(like_pattern(Some("50%_off")), Some("%50\\%\\_off%".to_string()));
        assert_eq!(like_pattern(Some("   ")), None);
        assert_eq!(like_pattern(None), None);
    }
}
