//! This modules defines the common functionality for paging data.

use std::ops::Range;

/// The page sizes a user can choose between.
pub const PAGE_SIZE_OPTIONS: [u64; 3] = [10, 20, 50];

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of items to display per page when not specified in a request.
    pub default_page_size: u64,
    /// The page sizes a user may select. Requests for any other size fall back
    /// to `default_page_size`.
    pub page_size_options: Vec<u64>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: PAGE_SIZE_OPTIONS[0],
            page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
        }
    }
}

impl PaginationConfig {
    /// Returns `page_size` if it is one of the allowed sizes, otherwise the default size.
    pub fn page_size_or_default(&self, page_size: Option<u64>) -> u64 {
        page_size
            .filter(|size| self.page_size_options.contains(size))
            .unwrap_or(self.default_page_size)
    }
}

/// A request to move to another page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    First,
    Previous,
    Next,
    Last,
    /// Jump to a specific page number (1-based).
    Page(u64),
}

/// The layout of one page of a list of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// The number of items across all pages.
    pub total_items: u64,
    /// The maximum number of items on one page.
    pub items_per_page: u64,
    /// The number of pages, zero when there are no items.
    pub total_pages: u64,
    /// The current page (1-based), always within `1..=total_pages.max(1)`.
    pub current_page: u64,
    /// Index of the first item on the current page.
    pub start_index: u64,
    /// One past the index of the last slot on the current page.
    ///
    /// Not clipped to `total_items`; use [Pagination::slice_range] for that.
    pub end_index: u64,
}

impl Pagination {
    /// Lay out `total_items` into pages of `items_per_page` and select `current_page`.
    ///
    /// A `current_page` outside the valid range is clamped into it and an
    /// `items_per_page` of zero is treated as one.
    pub fn new(total_items: u64, items_per_page: u64, current_page: u64) -> Self {
        let items_per_page = items_per_page.max(1);
        let total_pages = total_items.div_ceil(items_per_page);
        let current_page = current_page.clamp(1, total_pages.max(1));
        let start_index = (current_page - 1) * items_per_page;
        let end_index = start_index + items_per_page;

        Self {
            total_items,
            items_per_page,
            total_pages,
            current_page,
            start_index,
            end_index,
        }
    }

    /// The index range of the current page, clipped to `0..total_items`.
    pub fn slice_range(&self) -> Range<usize> {
        let start = self.start_index.min(self.total_items) as usize;
        let end = self.end_index.min(self.total_items) as usize;

        start..end
    }

    /// The items on the current page.
    ///
    /// `items` should have `total_items` elements. Extra elements past
    /// `total_items` are never returned.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.slice_range();
        let end = range.end.min(items.len());
        let start = range.start.min(end);

        &items[start..end]
    }

    /// Whether there are no items at all, in which case an empty state is
    /// shown instead of a table.
    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }

    /// Whether the pagination controls should be displayed.
    pub fn show_controls(&self) -> bool {
        self.total_pages > 1
    }

    /// Whether "first" and "previous" lead anywhere.
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Whether "next" and "last" lead anywhere.
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// The page that `request` leads to, clamped to `1..=total_pages`.
    ///
    /// Requests at a boundary leave the page unchanged, there is no wraparound.
    pub fn navigate(&self, request: PageRequest) -> u64 {
        let last_page = self.total_pages.max(1);

        let page = match request {
            PageRequest::First => 1,
            PageRequest::Previous => self.current_page.saturating_sub(1),
            PageRequest::Next => self.current_page.saturating_add(1),
            PageRequest::Last => last_page,
            PageRequest::Page(page) => page,
        };

        page.clamp(1, last_page)
    }

    /// The 1-based position of the first item shown, for "Showing a-b of n".
    pub fn first_item_number(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.start_index + 1
        }
    }

    /// The 1-based position of the last item shown, for "Showing a-b of n".
    pub fn last_item_number(&self) -> u64 {
        self.end_index.min(self.total_items)
    }
}

#[cfg(test)]
mod tests {
    use super::{PageRequest, Pagination, PaginationConfig};

    #[test]
    fn third_page_of_twenty_five() {
        let pagination = Pagination::new(25, 10, 3);

        assert_eq!(pagination.total_pages, 3);
        assert_eq!(pagination.start_index, 20);
        assert_eq!(pagination.end_index, 30);

        let items: Vec<u64> = (0..25).collect();
        let page = pagination.slice(&items);
        assert_eq!(page.len(), 5, "want 5 items on the last page, got {}", page.len());
        assert_eq!(page, &[20, 21, 22, 23, 24]);
    }

    #[test]
    fn empty_list_has_no_pages_or_controls() {
        let pagination = Pagination::new(0, 10, 1);

        assert_eq!(pagination.total_pages, 0);
        assert!(pagination.is_empty());
        assert!(!pagination.show_controls());
        assert!(pagination.slice::<u8>(&[]).is_empty());
        assert_eq!(pagination.first_item_number(), 0);
        assert_eq!(pagination.last_item_number(), 0);
    }

    #[test]
    fn single_page_hides_controls() {
        let pagination = Pagination::new(10, 10, 1);

        assert_eq!(pagination.total_pages, 1);
        assert!(!pagination.show_controls());
    }

    #[test]
    fn clamps_out_of_range_page() {
        assert_eq!(Pagination::new(25, 10, 9).current_page, 3);
        assert_eq!(Pagination::new(25, 10, 0).current_page, 1);
        assert_eq!(Pagination::new(0, 10, 4).current_page, 1);
    }

    #[test]
    fn zero_page_size_is_treated_as_one() {
        let pagination = Pagination::new(3, 0, 2);

        assert_eq!(pagination.items_per_page, 1);
        assert_eq!(pagination.total_pages, 3);
        assert_eq!(pagination.slice_range(), 1..2);
    }

    #[test]
    fn navigation_clamps_at_boundaries() {
        let first = Pagination::new(25, 10, 1);
        assert_eq!(first.navigate(PageRequest::Previous), 1);
        assert_eq!(first.navigate(PageRequest::Next), 2);
        assert!(!first.has_previous());
        assert!(first.has_next());

        let last = Pagination::new(25, 10, 3);
        assert_eq!(last.navigate(PageRequest::Next), 3);
        assert_eq!(last.navigate(PageRequest::Previous), 2);
        assert!(last.has_previous());
        assert!(!last.has_next());
    }

    #[test]
    fn navigation_first_and_last() {
        let pagination = Pagination::new(95, 20, 3);

        assert_eq!(pagination.navigate(PageRequest::First), 1);
        assert_eq!(pagination.navigate(PageRequest::Last), 5);
        assert_eq!(pagination.navigate(PageRequest::Page(42)), 5);
        assert_eq!(pagination.navigate(PageRequest::Page(0)), 1);
    }

    #[test]
    fn showing_range_is_clipped_to_total() {
        let pagination = Pagination::new(25, 10, 3);

        assert_eq!(pagination.first_item_number(), 21);
        assert_eq!(pagination.last_item_number(), 25);
    }

    #[test]
    fn unknown_page_size_falls_back_to_default() {
        let config = PaginationConfig::default();

        assert_eq!(config.page_size_or_default(Some(20)), 20);
        assert_eq!(config.page_size_or_default(Some(7)), 10);
        assert_eq!(config.page_size_or_default(None), 10);
    }
}
