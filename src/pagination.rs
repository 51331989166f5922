//! This module defines the common functionality for paging data.

/// The config for pagination.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: i64,
    /// The number of transactions per page when not specified in a request.
    pub default_page_size: i64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
        }
    }
}

/// A resolved page window: both fields are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    /// The 1-based page number.
    pub page: i64,
    /// The maximum number of rows in the page.
    pub limit: i64,
}

impl PageParams {
    /// Resolve raw query values against `config`.
    ///
    /// Absent or non-positive values fall back to the defaults, so the
    /// resulting window is always valid.
    pub fn resolve(page: Option<i64>, limit: Option<i64>, config: &PaginationConfig) -> Self {
        let page = match page {
            Some(page) if page > 0 => page,
            _ => config.default_page,
        };
        let limit = match limit {
            Some(limit) if limit > 0 => limit,
            _ => config.default_page_size,
        };

        Self { page, limit }
    }

    /// The number of rows to skip to reach this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// The total number of pages needed to hold `total` rows.
    ///
    /// `ceil(total / limit)`, which is zero when `total` is zero.
    pub fn total_pages(&self, total: i64) -> i64 {
        (total + self.limit - 1) / self.limit
    }
}
