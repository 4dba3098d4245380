//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_NUMBER, MAX_PAGE_SIZE};

/// Pagination query parameters (reusable across all list endpoints)
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: u64,
    /// Page size, capped at 100
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    pub fn new(page: u64, limit: u64) -> Self {
        Self { page, limit }
    }

    /// Page number clamped to 1..=MAX_PAGE_NUMBER, so `page * limit` cannot overflow
    pub fn page(&self) -> u64 {
        self.page.clamp(1, MAX_PAGE_NUMBER)
    }

    /// Get limit clamped to 1..=MAX_PAGE_SIZE
    pub fn limit(&self) -> u64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }

    /// Zero-based page index handed to the paginator
    pub fn index(&self) -> u64 {
        self.page() - 1
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response envelope
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Create new paginated response
    pub fn new(data: Vec<T>, params: &PaginationParams, total: u64) -> Self {
        let limit = params.limit();
        Self {
            data,
            total,
            page: params.page(),
            limit,
            total_pages: total.div_ceil(limit),
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_capped() {
        let params = PaginationParams::new(1, 1000);
        assert_eq!(params.limit(), MAX_PAGE_SIZE);
        assert_eq!(PaginationParams::new(1, 0).limit(), 1);
    }

    #[test]
    fn test_index() {
        assert_eq!(PaginationParams::new(3, 20).index(), 2);
        assert_eq!(PaginationParams::new(0, 20).index(), 0);
    }

    #[test]
    fn test_huge_page_is_clamped() {
        let params = PaginationParams::new(u64::MAX, MAX_PAGE_SIZE);
        assert_eq!(params.page(), MAX_PAGE_NUMBER);
        assert!(params.index().checked_mul(params.limit()).is_some());

        let page = Paginated::<u8>::new(vec![], &params, 0);
        assert_eq!(page.page, MAX_PAGE_NUMBER);
    }

    #[test]
    fn test_envelope() {
        let page = Paginated::new(vec![1, 2], &PaginationParams::new(2, 2), 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 2);

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["limit"], 2);
    }
}
