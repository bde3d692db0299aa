use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::feed::types::RankedContentItem;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 30;
pub const DEFAULT_ITEMS_PER_LOAD: usize = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageSizeError {
    #[error("items per load must be at least 1")]
    ZeroBatch,
    #[error("items per page ({per_page}) must be a positive multiple of items per load ({per_load})")]
    NotAMultiple { per_page: usize, per_load: usize },
}

/// Batch and page sizes. A page is always a whole number of batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSize {
    per_page: usize,
    per_load: usize,
}

impl PageSize {
    pub fn new(per_page: usize, per_load: usize) -> Result<Self, PageSizeError> {
        if per_load == 0 {
            return Err(PageSizeError::ZeroBatch);
        }
        if per_page < per_load || per_page % per_load != 0 {
            return Err(PageSizeError::NotAMultiple { per_page, per_load });
        }
        Ok(PageSize { per_page, per_load })
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn per_load(&self) -> usize {
        self.per_load
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize {
            per_page: DEFAULT_ITEMS_PER_PAGE,
            per_load: DEFAULT_ITEMS_PER_LOAD,
        }
    }
}

/// Incremental delivery over a fixed, already ranked list.
///
/// Within a page, `load_more` grows the displayed prefix one batch at a time.
/// At the page boundary, `next_page` replaces the displayed items with the first
/// batch of the following page. Transitions return a new value; the ranked list
/// itself is shared.
#[derive(Debug, Clone)]
pub struct Paginator {
    all: Arc<Vec<RankedContentItem>>,
    size: PageSize,
    page: usize,
    shown: usize,
    fresh_from: usize,
    scroll_to_top: bool,
}

impl Paginator {
    pub fn new(all: Vec<RankedContentItem>, size: PageSize) -> Self {
        let mut paginator = Paginator {
            all: Arc::new(all),
            size,
            page: 0,
            shown: 0,
            fresh_from: 0,
            scroll_to_top: true,
        };
        paginator.shown = paginator.page_len().min(size.per_load);
        paginator
    }

    pub fn empty(size: PageSize) -> Self {
        Paginator::new(Vec::new(), size)
    }

    fn page_start(&self) -> usize {
        self.page * self.size.per_page
    }

    fn page_len(&self) -> usize {
        self.all
            .len()
            .saturating_sub(self.page_start())
            .min(self.size.per_page)
    }

    pub fn all(&self) -> &[RankedContentItem] {
        &self.all
    }

    /// Items of the current page exposed so far.
    pub fn displayed(&self) -> &[RankedContentItem] {
        let start = self.page_start().min(self.all.len());
        &self.all[start..start + self.shown]
    }

    /// Items added by the transition that produced this value.
    pub fn new_items(&self) -> &[RankedContentItem] {
        &self.displayed()[self.fresh_from..]
    }

    /// More items can be loaded without leaving the current page.
    pub fn has_more(&self) -> bool {
        self.shown < self.page_len()
    }

    /// The current page is fully shown and items remain beyond it.
    pub fn has_next_page(&self) -> bool {
        !self.has_more() && self.page_start() + self.page_len() < self.all.len()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.all.len().div_ceil(self.size.per_page)
    }

    pub fn total(&self) -> usize {
        self.all.len()
    }

    pub fn scroll_to_top(&self) -> bool {
        self.scroll_to_top
    }

    pub fn page_size(&self) -> PageSize {
        self.size
    }

    /// Extends the displayed prefix by one batch. A no-op at the page boundary.
    pub fn load_more(&self) -> Self {
        let shown = (self.shown + self.size.per_load).min(self.page_len());
        Paginator {
            all: Arc::clone(&self.all),
            size: self.size,
            page: self.page,
            shown,
            fresh_from: self.shown,
            scroll_to_top: false,
        }
    }

    /// Moves to the first batch of the next page. A no-op unless `has_next_page`.
    ///
    /// Only one batch is shown even when the next page is short: with 45 items,
    /// page two opens on 10 of its 15 and `load_more` brings in the last 5.
    pub fn next_page(&self) -> Self {
        if !self.has_next_page() {
            let mut unchanged = self.clone();
            unchanged.fresh_from = self.shown;
            unchanged.scroll_to_top = false;
            return unchanged;
        }
        let mut next = Paginator {
            all: Arc::clone(&self.all),
            size: self.size,
            page: self.page + 1,
            shown: 0,
            fresh_from: 0,
            scroll_to_top: true,
        };
        next.shown = next.page_len().min(self.size.per_load);
        next
    }
}
