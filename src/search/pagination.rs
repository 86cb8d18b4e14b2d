//! Pagination math for result pages

use crate::results::total_pages;
use serde::Serialize;
use std::ops::RangeInclusive;

/// Position of one page within a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page (1-indexed)
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
}

impl Pagination {
    pub fn new(page: u32, page_size: u32, total_count: u64) -> Self {
        Self {
            page: page.max(1),
            page_size,
            total_count,
        }
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_count, self.page_size)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Whether `page` can be navigated to
    pub fn contains(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages()
    }

    /// Offset of the first hit on the current page
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Page numbers to show, at most `width` wide and centred on the
    /// current page where possible
    pub fn window(&self, width: u32) -> RangeInclusive<u32> {
        let total = self.total_pages();
        if total == 0 || width == 0 {
            return 1..=0;
        }

        let width = width.min(total);
        let half = width / 2;
        let start = self
            .page
            .saturating_sub(half)
            .max(1)
            .min(total - width + 1);

        start..=start + width - 1
    }
}
