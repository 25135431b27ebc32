//! Derived view over the key list
//!
//! Search, pagination and aggregate counts are pure functions of the full
//! key list plus the cursor inputs (search text, page size, 1-based page).
//! Nothing here is cached; callers recompute on every read, which keeps
//! the view trivially consistent with the list it was given.

use chrono::{DateTime, Utc};

use crate::key::Key;
use crate::{Error, Result};

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One entry in the pagination strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMark {
    /// A navigable page number (1-based)
    Page(usize),
    /// A run of hidden pages
    Gap,
}

/// Case-insensitive substring filter over key strings and package names.
///
/// An empty search returns the full list in order.
pub fn filter_keys<'a>(keys: &'a [Key], search: &str) -> Vec<&'a Key> {
    if search.is_empty() {
        return keys.iter().collect();
    }
    let needle = search.to_lowercase();
    keys.iter()
        .filter(|k| {
            k.key.to_lowercase().contains(&needle)
                || k.package
                    .as_ref()
                    .and_then(|p| p.name.as_deref())
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Number of pages needed for `len` rows at `page_size` rows per page.
///
/// `page_size` must be non-zero; [`ViewState`] guarantees that for its
/// callers.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size)
}

/// The 1-based `current_page` slice of `filtered`.
///
/// Pages past the end yield an empty slice, a partial last page is
/// truncated.
pub fn paginate<'a, 'b>(
    filtered: &'b [&'a Key],
    page_size: usize,
    current_page: usize,
) -> &'b [&'a Key] {
    let start = current_page.saturating_sub(1).saturating_mul(page_size);
    if start >= filtered.len() {
        return &[];
    }
    let end = (start + page_size).min(filtered.len());
    &filtered[start..end]
}

/// Compact pagination strip: always page 1 and the last page, pages within
/// one of the current page, and one gap marker per hidden run.
///
/// Defined for `total >= 1`; `total == 1` yields `[Page(1)]`.
pub fn visible_pages(total: usize, current: usize) -> Vec<PageMark> {
    let mut marks = vec![PageMark::Page(1)];
    if total <= 1 {
        return marks;
    }

    let start = current.saturating_sub(1).max(2);
    let end = (current + 1).min(total - 1);

    if start > 2 {
        marks.push(PageMark::Gap);
    }
    for page in start..=end {
        marks.push(PageMark::Page(page));
    }
    if end < total - 1 {
        marks.push(PageMark::Gap);
    }

    marks.push(PageMark::Page(total));
    marks
}

/// Aggregate counts over the full, unfiltered key list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyStats {
    pub total: usize,
    pub active: usize,
    pub expired: usize,
    pub used: usize,
    pub total_devices: usize,
}

impl KeyStats {
    /// Single pass over `keys`, with `now` as the expiry clock.
    pub fn collect(keys: &[Key], now: DateTime<Utc>) -> Self {
        let mut stats = Self::default();
        for key in keys {
            stats.total += 1;
            if key.is_expired(now) {
                stats.expired += 1;
            } else {
                stats.active += 1;
            }
            if key.is_used() {
                stats.used += 1;
            }
            stats.total_devices += key.activated_devices.len();
        }
        stats
    }
}

/// Cursor state for the key table: search text, page size and 1-based page.
///
/// Changing the search text or the page size snaps back to the first page;
/// no other transition moves the cursor implicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    search: String,
    page_size: usize,
    current_page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            current_page: 1,
        }
    }
}

impl ViewState {
    /// Create a cursor with the given page size
    pub fn new(page_size: usize) -> Result<Self> {
        let mut state = Self::default();
        state.set_page_size(page_size)?;
        Ok(state)
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Update the search text and reset to the first page
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.current_page = 1;
    }

    /// Update the page size and reset to the first page
    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        if page_size == 0 {
            return Err(Error::InvalidInput("page size must be positive".into()));
        }
        self.page_size = page_size;
        self.current_page = 1;
        Ok(())
    }

    /// Move to a 1-based page; out-of-range pages render as empty
    pub fn set_page(&mut self, page: usize) -> Result<()> {
        if page == 0 {
            return Err(Error::InvalidInput("pages are numbered from 1".into()));
        }
        self.current_page = page;
        Ok(())
    }

    /// Snap back to the first page
    pub fn reset_page(&mut self) {
        self.current_page = 1;
    }

    /// Keys matching the current search, in list order
    pub fn filtered<'a>(&self, keys: &'a [Key]) -> Vec<&'a Key> {
        filter_keys(keys, &self.search)
    }

    /// The rows of the current page
    pub fn page<'a>(&self, keys: &'a [Key]) -> Vec<&'a Key> {
        let filtered = self.filtered(keys);
        paginate(&filtered, self.page_size, self.current_page).to_vec()
    }

    /// Pages under the current filter, never less than one
    pub fn total_pages(&self, keys: &[Key]) -> usize {
        total_pages(self.filtered(keys).len(), self.page_size).max(1)
    }

    /// Pagination strip for the current filter and page
    pub fn visible_pages(&self, keys: &[Key]) -> Vec<PageMark> {
        visible_pages(self.total_pages(keys), self.current_page)
    }
}
