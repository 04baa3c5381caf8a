//! Page arithmetic for list views

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Page size must be at least 1")]
pub struct PageSizeError;

/// One page of a list of `total` items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number, clamped into range
    pub number: usize,
    pub per_page: usize,
    pub total: usize,
}

impl Page {
    /// Requested page numbers outside `1..=total_pages` are clamped
    pub fn new(requested: usize, per_page: usize, total: usize) -> Result<Self, PageSizeError> {
        if per_page == 0 {
            return Err(PageSizeError);
        }
        let last = total.div_ceil(per_page).max(1);
        Ok(Self {
            number: requested.clamp(1, last),
            per_page,
            total,
        })
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.per_page)
    }

    /// Index range of the visible items
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = ((self.number - 1) * self.per_page).min(self.total);
        let end = (start + self.per_page).min(self.total);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        &items[range.start.min(items.len())..range.end.min(items.len())]
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(Page::new(1, 10, 0).unwrap().total_pages(), 0);
        assert_eq!(Page::new(1, 10, 10).unwrap().total_pages(), 1);
        assert_eq!(Page::new(1, 10, 11).unwrap().total_pages(), 2);
        assert_eq!(Page::new(1, 12, 25).unwrap().total_pages(), 3);
    }

    #[test]
    fn test_page_is_clamped() {
        assert_eq!(Page::new(0, 10, 35).unwrap().number, 1);
        assert_eq!(Page::new(9, 10, 35).unwrap().number, 4);
        assert_eq!(Page::new(3, 10, 0).unwrap().number, 1);
    }

    #[test]
    fn test_slice_last_page() {
        let items: Vec<u32> = (0..25).collect();
        let page = Page::new(3, 10, items.len()).unwrap();
        assert_eq!(page.slice(&items), &[20, 21, 22, 23, 24]);
        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn test_empty_list() {
        let items: Vec<u32> = Vec::new();
        let page = Page::new(1, 10, 0).unwrap();
        assert!(page.slice(&items).is_empty());
        assert!(!page.has_next());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert_eq!(Page::new(1, 0, 5), Err(PageSizeError));
    }
}
