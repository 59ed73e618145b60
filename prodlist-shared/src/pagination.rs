/// Page-number pagination
///
/// List endpoints return `{"items": [...], "count": <total>}` with a fixed
/// page size of 20. Pages are 1-indexed; a page past the end yields an empty
/// `items` list while `count` still reports the full total.

use serde::{Deserialize, Serialize};

/// Items per page on every list endpoint
pub const PAGE_SIZE: i64 = 20;

/// Pagination envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    /// Items on the requested page
    pub items: Vec<T>,

    /// Total number of items across all pages
    pub count: i64,
}

impl<T> Page<T> {
    /// Builds a page from fetched items and the total count
    pub fn new(items: Vec<T>, count: i64) -> Self {
        Self { items, count }
    }

    /// Converts the items, keeping the count
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            count: self.count,
        }
    }
}

/// `LIMIT` / `OFFSET` pair for a 1-indexed page number
///
/// Page numbers below 1 are treated as 1.
///
/// ```
/// use prodlist_shared::pagination::{limit_offset, PAGE_SIZE};
///
/// assert_eq!(limit_offset(1), (PAGE_SIZE, 0));
/// assert_eq!(limit_offset(3), (PAGE_SIZE, 40));
/// ```
pub fn limit_offset(page: u32) -> (i64, i64) {
    let page = i64::from(page.max(1));
    (PAGE_SIZE, (page - 1).saturating_mul(PAGE_SIZE))
}
