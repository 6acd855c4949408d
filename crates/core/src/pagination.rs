//! Page-based pagination for list queries.
//!
//! Callers think in pages; the store wants `LIMIT` / `OFFSET`. The offset is
//! `(page - 1) * per_page`, so page 1 always starts at the first row.

use crate::error::CoreError;

/// Page size used when the caller does not specify one.
pub const DEFAULT_PER_PAGE: i64 = 20;

/// Largest accepted page size.
pub const MAX_PER_PAGE: i64 = 100;

/// A validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    per_page: i64,
}

impl PageRequest {
    /// Build a page request, rejecting pages below 1 and page sizes outside
    /// `1..=MAX_PER_PAGE`.
    pub fn new(page: i64, per_page: i64) -> Result<Self, CoreError> {
        if page < 1 {
            return Err(CoreError::Validation(format!(
                "page must be at least 1, got {page}"
            )));
        }
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(CoreError::Validation(format!(
                "per_page must be between 1 and {MAX_PER_PAGE}, got {per_page}"
            )));
        }
        // Reject pages whose offset would not fit in a BIGINT.
        if (page - 1).checked_mul(per_page).is_none() {
            return Err(CoreError::Validation(format!("page {page} is out of range")));
        }
        Ok(Self { page, per_page })
    }

    /// Build from optional query parameters, defaulting to the first page of
    /// [`DEFAULT_PER_PAGE`] rows.
    pub fn from_query(page: Option<i64>, per_page: Option<i64>) -> Result<Self, CoreError> {
        Self::new(page.unwrap_or(1), per_page.unwrap_or(DEFAULT_PER_PAGE))
    }

    /// Value bound to `LIMIT`.
    pub fn limit(&self) -> i64 {
        self.per_page
    }

    /// Value bound to `OFFSET`.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}
