use serde::Serialize;

/// Projects shown per page.
pub const PAGE_SIZE: usize = 6;

/// Number of pages needed for `count` items.
pub fn page_count(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// Current position in a paginated listing. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    page_size: usize,
    current_page: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new()
    }
}

impl PageState {
    pub fn new() -> Self {
        Self {
            page_size: PAGE_SIZE,
            current_page: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self, count: usize) -> usize {
        page_count(count, self.page_size)
    }

    /// The slice of `items` on the current page; empty past the end.
    pub fn page<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.current_page - 1) * self.page_size;
        if start >= items.len() {
            return &[];
        }
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }

    /// Pull the current page back in range after the collection changed size.
    pub fn clamp(&mut self, count: usize) {
        let last = self.total_pages(count).max(1);
        self.current_page = self.current_page.clamp(1, last);
    }

    /// Move to `page` if it exists. Out-of-range requests are ignored.
    pub fn goto(&mut self, page: usize, count: usize) -> bool {
        let last = self.total_pages(count).max(1);
        if page < 1 || page > last {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn next(&mut self, count: usize) -> bool {
        self.goto(self.current_page + 1, count)
    }

    pub fn previous(&mut self, count: usize) -> bool {
        match self.current_page.checked_sub(1) {
            Some(page) => self.goto(page, count),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, PAGE_SIZE), 0);
        assert_eq!(page_count(6, PAGE_SIZE), 1);
        assert_eq!(page_count(7, PAGE_SIZE), 2);
        assert_eq!(page_count(13, PAGE_SIZE), 3);
    }

    #[test]
    fn thirteen_items_have_three_pages_and_page_four_is_ignored() {
        let items: Vec<u32> = (1..=13).collect();
        let mut state = PageState::new();
        assert_eq!(state.total_pages(items.len()), 3);

        assert!(state.goto(2, items.len()));
        assert!(!state.goto(4, items.len()));
        assert_eq!(state.current_page(), 2);
        assert!(!state.goto(0, items.len()));
        assert_eq!(state.current_page(), 2);

        assert!(state.goto(3, items.len()));
        assert_eq!(state.page(&items), &[13]);
    }

    #[test]
    fn page_slices_are_bounded_by_page_size() {
        let items: Vec<u32> = (1..=13).collect();
        let state = PageState::new();
        assert_eq!(state.page(&items), &[1, 2, 3, 4, 5, 6]);
        assert!(state.page::<u32>(&[]).is_empty());
    }

    #[test]
    fn next_and_previous_stop_at_the_edges() {
        let mut state = PageState::new();
        assert!(!state.previous(13));
        assert!(state.next(13));
        assert!(state.next(13));
        assert!(!state.next(13));
        assert_eq!(state.current_page(), 3);
        assert!(state.previous(13));
        assert_eq!(state.current_page(), 2);
    }

    #[test]
    fn clamp_after_shrink() {
        let mut state = PageState::new();
        state.goto(3, 13);
        state.clamp(7);
        assert_eq!(state.current_page(), 2);
        state.clamp(0);
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn clamp_stays_in_bounds_for_any_count() {
        for start in 1..=5 {
            for count in 0..40 {
                let mut state = PageState::new();
                state.goto(start, 30);
                state.clamp(count);
                let last = page_count(count, PAGE_SIZE).max(1);
                assert!(state.current_page() >= 1);
                assert!(state.current_page() <= last);
            }
        }
    }

    #[test]
    fn clamp_keeps_valid_page() {
        let mut state = PageState::new();
        state.goto(2, 13);
        state.clamp(20);
        assert_eq!(state.current_page(), 2);
    }
}
