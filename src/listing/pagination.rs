use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Rows-per-page choices offered by the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum PageSize {
    Five,
    Ten,
    #[default]
    Twenty,
}

impl PageSize {
    pub const ALL: [PageSize; 3] = [PageSize::Five, PageSize::Ten, PageSize::Twenty];

    pub fn get(self) -> usize {
        match self {
            PageSize::Five => 5,
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|size| size.get() == value)
            .ok_or_else(|| format!("Unsupported page size {}, expected 5, 10 or 20", value))
    }
}

impl From<PageSize> for usize {
    fn from(value: PageSize) -> Self {
        value.get()
    }
}

/// 1-based page cursor over `total` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pager {
    page: usize,
    page_size: PageSize,
    total: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Pager::new(0)
    }
}

impl Pager {
    pub fn new(total: usize) -> Self {
        Self {
            page: 1,
            page_size: PageSize::default(),
            total,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.page_size.get())
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn next(&mut self) {
        if self.has_next() {
            self.page += 1;
        }
    }

    pub fn previous(&mut self) {
        if self.has_previous() {
            self.page -= 1;
        }
    }

    pub fn set_page_size(&mut self, size: PageSize) {
        self.page_size = size;
        self.page = 1;
    }

    /// Updates the row count, pulling the cursor back if its page vanished.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.page = self.page.min(self.total_pages()).max(1);
    }

    /// Index range of the current page within the sorted rows.
    pub fn range(&self) -> Range<usize> {
        let size = self.page_size.get();
        let start = ((self.page - 1) * size).min(self.total);
        let end = (self.page * size).min(self.total);
        start..end
    }

    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let range = self.range();
        &rows[range.start.min(rows.len())..range.end.min(rows.len())]
    }
}
