//! Page/limit arithmetic for paginated list endpoints.

use serde::Serialize;

/// Page used when the caller omits `page` or sends a non-positive value.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the caller omits `limit`.
pub const DEFAULT_LIMIT: i64 = 10;

/// Upper bound on a single page.
pub const MAX_LIMIT: i64 = 1000;

/// A normalized page request: `page >= 1`, `1 <= limit <= MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Normalize raw query parameters.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p > 0 => p,
            _ => DEFAULT_PAGE,
        };
        let limit = clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT);
        Self { page, limit }
    }

    /// Row offset of the first item on this page. Saturates at `i64::MAX`
    /// for absurdly large pages, which simply reads past the last row.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Pagination metadata returned alongside a page of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total_data: i64,
    pub total_page: i64,
}

impl PageMeta {
    pub fn new(request: PageRequest, total_data: i64) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total_data,
            total_page: total_pages(total_data, request.limit),
        }
    }

    /// Metadata for an unpaginated listing: everything on one page.
    pub fn single_page(total_data: i64) -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: total_data,
            total_data,
            total_page: if total_data > 0 { 1 } else { 0 },
        }
    }
}

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Number of pages needed to hold `total` rows, rounding up.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    (total - 1) / limit + 1
}
