//! Page-based slicing shared by every list screen.

use serde::Serialize;

/// One page of a larger, stably ordered result set.
///
/// `page` is 1-based. `total_pages` is `ceil(total / page_size)` and is
/// zero exactly when the underlying set is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    /// An empty result: no items and zero pages.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            page_size: 0,
            total_pages: 0,
            total_items: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// 1-based position of the first item of this page within the whole set.
    pub fn first_index(&self) -> usize {
        (self.page - 1)
            .saturating_mul(self.page_size)
            .saturating_add(1)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            total_items: self.total_items,
        }
    }
}

/// Slices `items` into page `page` of size `page_size`.
///
/// Page numbers below 1 are treated as 1 and a `page_size` of zero as one.
/// A page past the end yields no items but keeps the true totals.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    if items.is_empty() {
        return Page::empty();
    }
    let page_size = page_size.max(1);
    let page = page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size);
    let offset = (page - 1).checked_mul(page_size).unwrap_or(total_items);
    let items = items
        .into_iter()
        .skip(offset)
        .take(page_size)
        .collect();
    Page {
        items,
        page,
        page_size,
        total_pages,
        total_items,
    }
}
