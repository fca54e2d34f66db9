use crate::core::{AdminError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const PAGE_SIZE_OPTIONS: [usize; 5] = [10, 20, 30, 40, 50];

/// The slice of the remote list currently requested: a 0-based page index
/// and a non-zero page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageWindow {
    pub page_index: usize,
    pub page_size: usize,
}

impl PageWindow {
    pub fn new(page_index: usize, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(AdminError::Config("page_size must be > 0".to_string()));
        }
        Ok(Self {
            page_index,
            page_size,
        })
    }

    /// 1-based page number, as the list endpoint expects it.
    pub fn page_number(&self) -> usize {
        self.page_index + 1
    }

    pub fn offset(&self) -> usize {
        self.page_index * self.page_size
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A navigation intent raised by the pagination controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    First,
    Prev,
    Next,
    Last,
    PageSize(usize),
}

/// Boundary rules for a window over `total_count` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    pub total_count: usize,
    pub window: PageWindow,
}

impl Paginator {
    pub fn new(total_count: usize, window: PageWindow) -> Self {
        Self {
            total_count,
            window,
        }
    }

    pub fn page_count(&self) -> usize {
        self.total_count.div_ceil(self.window.page_size)
    }

    pub fn can_previous(&self) -> bool {
        self.window.page_index > 0
    }

    pub fn can_next(&self) -> bool {
        self.window.page_index + 1 < self.page_count()
    }

    pub fn is_enabled(&self, nav: Nav) -> bool {
        match nav {
            Nav::First | Nav::Prev => self.can_previous(),
            Nav::Next | Nav::Last => self.can_next(),
            Nav::PageSize(size) => size > 0 && size != self.window.page_size,
        }
    }

    /// The window a navigation intent leads to, or `None` when the control
    /// is disabled.
    ///
    /// Changing the page size keeps the first visible row on screen, so the
    /// new index is `floor(old_index * old_size / new_size)`.
    pub fn resolve(&self, nav: Nav) -> Option<PageWindow> {
        if !self.is_enabled(nav) {
            return None;
        }
        let PageWindow {
            page_index,
            page_size,
        } = self.window;
        let next = match nav {
            Nav::First => PageWindow {
                page_index: 0,
                page_size,
            },
            Nav::Prev => PageWindow {
                page_index: page_index - 1,
                page_size,
            },
            Nav::Next => PageWindow {
                page_index: page_index + 1,
                page_size,
            },
            Nav::Last => PageWindow {
                page_index: self.page_count() - 1,
                page_size,
            },
            Nav::PageSize(size) => PageWindow {
                page_index: self.window.offset() / size,
                page_size: size,
            },
        };
        Some(next)
    }
}
