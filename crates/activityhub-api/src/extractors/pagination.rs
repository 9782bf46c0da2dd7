//! Pagination query parameter extractors.

use serde::{Deserialize, Serialize};

use activityhub_core::types::pagination::{DEFAULT_PAGE_SIZE, PageRequest};

/// Query parameters for paginated endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-based, default: 1).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (default: 20, max: 100).
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    /// Converts to a clamped `PageRequest`.
    pub fn into_page_request(self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }
}

/// Query parameters for the public activity listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityListParams {
    /// Page number.
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    /// Only activities in this category.
    pub category: Option<String>,
}

impl ActivityListParams {
    /// Splits into a page request and the category filter.
    pub fn into_parts(self) -> (PageRequest, Option<String>) {
        (
            PageRequest::new(self.page, self.per_page),
            self.category.filter(|c| !c.trim().is_empty()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_page_is_clamped() {
        let params = PaginationParams {
            page: 0,
            per_page: 1000,
        };
        let page = params.into_page_request();
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 100);
    }

    #[test]
    fn test_blank_category_is_ignored() {
        let params = ActivityListParams {
            page: 1,
            per_page: 10,
            category: Some("  ".into()),
        };
        let (_, category) = params.into_parts();
        assert!(category.is_none());
    }
}
