/// Page/limit normalization and page metadata
///
/// List endpoints accept `page` and `limit` as raw query strings. Anything
/// unparseable or out of range falls back to a default instead of failing:
///
/// - `page` below 1 or unparseable: 1
/// - `limit` below 1 or unparseable: 10
/// - `limit` above 100: 100
///
/// # Example
///
/// ```
/// use okefin_shared::pagination::{PageInfo, Pagination};
///
/// let pagination = Pagination::from_raw(Some("0"), Some("-5"));
/// assert_eq!(pagination.page, 1);
/// assert_eq!(pagination.limit, 10);
///
/// let info = PageInfo::new(&pagination, 21);
/// assert_eq!(info.total_pages, 3);
/// ```

use serde::Serialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Normalized pagination request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Normalizes already-parsed values
    pub fn new(page: i64, limit: i64) -> Self {
        let page = if page < 1 { DEFAULT_PAGE } else { page };
        let limit = if limit < 1 {
            DEFAULT_LIMIT
        } else {
            limit.min(MAX_LIMIT)
        };
        Self { page, limit }
    }

    /// Normalizes raw query-string values
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .and_then(|l| l.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_LIMIT);
        Self::new(page, limit)
    }

    /// Row offset for `LIMIT .. OFFSET ..`
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Page metadata echoed back to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub limit: i64,
}

impl PageInfo {
    pub fn new(pagination: &Pagination, total_items: i64) -> Self {
        Self {
            current_page: pagination.page,
            total_pages: total_pages(total_items, pagination.limit),
            total_items,
            limit: pagination.limit,
        }
    }
}

/// `ceil(total_items / limit)`
pub fn total_pages(total_items: i64, limit: i64) -> i64 {
    if total_items <= 0 || limit <= 0 {
        return 0;
    }
    (total_items + limit - 1) / limit
}

/// One page of results plus its metadata
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, pagination: &Pagination, total_items: i64) -> Self {
        Self {
            items,
            pagination: PageInfo::new(pagination, total_items),
        }
    }

    /// Converts every item, keeping the metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}
