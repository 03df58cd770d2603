//! Pagination requests and results.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Records per page. Callers cannot choose a different size over HTTP.
pub const DEFAULT_PAGE_LIMIT: usize = 100;

/// A 1-based page request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl PageRequest {
    /// Request `page` at the default limit. Pages below 1 become page 1.
    pub fn new(page: i64) -> Self {
        let page = if page < 1 {
            1
        } else {
            usize::try_from(page).unwrap_or(usize::MAX)
        };
        Self {
            page,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// Same page with a different limit.
    pub fn with_limit(self, limit: usize) -> Self {
        Self { limit, ..self }
    }

    /// Clamp `page` to at least 1 and replace a zero limit with the default.
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            limit: if self.limit == 0 {
                DEFAULT_PAGE_LIMIT
            } else {
                self.limit
            },
        }
    }

    /// Index of the first record on this page.
    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1).saturating_mul(self.limit)
    }

    /// Slice bounds of this page within `total` records, or `None` past the end.
    pub fn range(&self, total: usize) -> Option<Range<usize>> {
        let offset = self.offset();
        if offset >= total {
            return None;
        }
        Some(offset..offset.saturating_add(self.limit).min(total))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Pagination metadata returned alongside each page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageInfo {
    /// Metadata for `request` over a collection of `total` records.
    pub fn compute(request: PageRequest, total: usize) -> Self {
        let request = request.normalized();
        let pages = total.div_ceil(request.limit);
        Self {
            page: request.page,
            limit: request.limit,
            total,
            pages,
            has_next: request.page < pages,
            has_prev: request.page > 1,
        }
    }
}

/// One page of records plus its metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Page<T> {
    /// An empty page over an empty collection.
    pub fn empty(request: PageRequest) -> Self {
        Self {
            data: Vec::new(),
            pagination: PageInfo::compute(request, 0),
        }
    }

    /// Number of records on this page.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if this page holds no records.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
