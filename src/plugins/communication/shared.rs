use serde::{Serialize, Deserialize};

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Serialize, Deserialize, Debug)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
    pub total_pages: i64,
    pub has_more: bool,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>, paging: Pagination, total: i64) -> Self {
        let fetched = items.len() as i64;
        let has_more = paging.offset() + fetched < total;
        let per_page = paging.per_page as i64;
        let total_pages = if total == 0 { 0 } else { (total + per_page - 1) / per_page };
        ListResponse { items, page: paging.page, per_page: paging.per_page, total, total_pages, has_more }
    }
}

/// 1-based page number and page size, already clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Pagination {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.per_page as i64
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination::new(None, None)
    }
}
