//! Offset pagination primitives shared by list endpoints.
//!
//! A [`PageRequest`] is the validated window a caller asked for: a 1-based
//! page number and a page size bounded by [`MAX_PAGE_SIZE`]. After a
//! repository has counted the matching rows, [`PageDescriptor::compute`]
//! derives the navigation metadata returned alongside the items, and
//! [`Paginated`] bundles both for transport.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page number used when the caller does not supply one.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Validation failures raised while building a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// The page number was zero; pages start at one.
    #[error("page must be a positive integer")]
    PageOutOfRange,
    /// The page size was zero or above [`MAX_PAGE_SIZE`].
    #[error("page_size must be between 1 and {max}")]
    PageSizeOutOfRange {
        /// The maximum page size accepted.
        max: u32,
    },
}

/// A validated offset pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Validate and construct a page request.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError::PageOutOfRange`] when `page` is zero and
    /// [`PageRequestError::PageSizeOutOfRange`] when `page_size` is zero or
    /// larger than [`MAX_PAGE_SIZE`].
    pub const fn new(page: u32, page_size: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::PageOutOfRange);
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(PageRequestError::PageSizeOutOfRange { max: MAX_PAGE_SIZE });
        }
        Ok(Self { page, page_size })
    }

    /// Build a request from optional caller input, applying defaults for
    /// absent values.
    ///
    /// # Errors
    ///
    /// Propagates the same failures as [`PageRequest::new`].
    pub fn from_parts(page: Option<u32>, page_size: Option<u32>) -> Result<Self, PageRequestError> {
        Self::new(
            page.unwrap_or(DEFAULT_PAGE),
            page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// The number of items per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Rows to skip before the first item of this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }

    /// Maximum number of rows to return for this page.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.page_size as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Navigation metadata describing one page of a listing.
///
/// `next_page` is always populated with the following page number, so
/// clients must consult `has_next_page` before following it.
/// `previous_page` is omitted on the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDescriptor {
    /// Number of items across every page.
    pub total_items: u64,
    /// Number of pages needed to show every item.
    pub total_pages: u64,
    /// The page this descriptor belongs to.
    pub current_page: u32,
    /// Items per page.
    pub page_size: u32,
    /// Whether a page follows this one.
    pub has_next_page: bool,
    /// Whether a page precedes this one.
    pub has_prev_page: bool,
    /// The page number after this one.
    pub next_page: Option<u32>,
    /// The page number before this one, absent on the first page.
    pub previous_page: Option<u32>,
}

impl PageDescriptor {
    /// Derive navigation metadata from a row count and the request window.
    #[must_use]
    pub const fn compute(total_items: u64, request: PageRequest) -> Self {
        let total_pages = total_items.div_ceil(request.page_size as u64);
        let current_page = request.page;
        let has_prev_page = current_page > 1;
        Self {
            total_items,
            total_pages,
            current_page,
            page_size: request.page_size,
            has_next_page: (current_page as u64) < total_pages,
            has_prev_page,
            next_page: current_page.checked_add(1),
            previous_page: if has_prev_page {
                Some(current_page - 1)
            } else {
                None
            },
        }
    }
}

/// A page of items together with its navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items on the current page.
    pub data: Vec<T>,
    /// Navigation metadata for the page.
    pub pagination: PageDescriptor,
}

impl<T> Paginated<T> {
    /// Bundle a page of items with metadata derived from `total_items`.
    #[must_use]
    pub const fn new(data: Vec<T>, total_items: u64, request: PageRequest) -> Self {
        Self {
            data,
            pagination: PageDescriptor::compute(total_items, request),
        }
    }

    /// Convert each item while keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}
