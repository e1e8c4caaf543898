use serde::Deserialize;

use crate::core::error::SearchError;
use crate::models::PaginationResult;

/// Pagination bounds, taken from the `[search]` config section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PaginationSettings {
    #[serde(default = "default_limit")]
    pub default_limit: u32,
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_limit() -> u32 { 20 }
fn default_max_limit() -> u32 { 100 }

/// A validated page of the result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub limit: u32,
    pub offset: u64,
}

impl PageWindow {
    fn new(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            offset: (page as u64 - 1) * limit as u64,
        }
    }

    /// Same page with a smaller row budget; offset follows the new limit
    pub fn with_limit(&self, limit: u32) -> Self {
        Self::new(self.page, limit.max(1))
    }
}

/// Converts page/limit input into offsets and page metadata
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    settings: PaginationSettings,
}

impl Paginator {
    pub fn new(settings: PaginationSettings) -> Self {
        let max_limit = settings.max_limit.max(1);
        Self {
            settings: PaginationSettings {
                default_limit: settings.default_limit.clamp(1, max_limit),
                max_limit,
            },
        }
    }

    pub fn settings(&self) -> PaginationSettings {
        self.settings
    }

    /// Validate a page request, applying defaults for absent values
    ///
    /// Out-of-range values are rejected, never clamped.
    pub fn window(&self, page: Option<i64>, limit: Option<i64>) -> Result<PageWindow, SearchError> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(self.settings.default_limit as i64);

        if page < 1 || page > u32::MAX as i64 {
            return Err(SearchError::InvalidPagination(format!(
                "page must be a positive integer, got {}",
                page
            )));
        }

        if limit < 1 || limit > self.settings.max_limit as i64 {
            return Err(SearchError::InvalidPagination(format!(
                "limit must be between 1 and {}, got {}",
                self.settings.max_limit, limit
            )));
        }

        Ok(PageWindow::new(page as u32, limit as u32))
    }
}

impl PaginationResult {
    /// Page metadata for `total` rows; there is always at least one page
    pub fn from_total(page: u32, limit: u32, total: u64) -> Self {
        let limit = limit.max(1);
        let pages = total.div_ceil(limit as u64).max(1);
        let total_pages = u32::try_from(pages).unwrap_or(u32::MAX);

        let has_next_page = page < total_pages;
        let has_prev_page = page > 1;

        Self {
            current_page: page,
            total_pages,
            total_items: total,
            items_per_page: limit,
            has_next_page,
            has_prev_page,
            next_page: has_next_page.then(|| page + 1),
            prev_page: has_prev_page.then(|| page - 1),
        }
    }
}
