//! Page cursor for server-paginated lists.

/// A 1-indexed page cursor over `total` items, `limit` per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u64,
    limit: u64,
    total: u64,
}

impl Pagination {
    /// # Panics
    ///
    /// Panics if `limit` is zero.
    pub fn new(limit: u64) -> Self {
        assert!(limit > 0, "page size must be positive");
        Pagination {
            page: 1,
            limit,
            total: 0,
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn set_total(&mut self, total: u64) {
        self.total = total;
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.limit)
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }

    /// Move forward one page, stopping at the last page. Returns whether the page changed.
    pub fn next(&mut self) -> bool {
        if self.has_next_page() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Move back one page, stopping at page 1. Returns whether the page changed.
    pub fn previous(&mut self) -> bool {
        if self.has_previous_page() {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::Pagination;

    fn with_total(limit: u64, total: u64) -> Pagination {
        let mut pagination = Pagination::new(limit);
        pagination.set_total(total);
        pagination
    }

    #[test]
    fn total_pages_rounds_up() {
        for (total, limit, want) in [(0, 10, 0), (1, 10, 1), (10, 10, 1), (11, 10, 2), (25, 10, 3), (7, 1, 7)] {
            assert_eq!(with_total(limit, total).total_pages(), want, "total={total} limit={limit}");
        }
    }

    #[test]
    fn walks_forward_and_clamps_at_last_page() {
        let mut pagination = with_total(10, 25);
        assert_eq!(pagination.total_pages(), 3);
        assert!(pagination.has_next_page());

        assert!(pagination.next());
        assert!(pagination.next());
        assert!(!pagination.next());

        assert_eq!(pagination.page(), 3);
        assert!(!pagination.has_next_page());
    }

    #[test]
    fn previous_clamps_at_first_page() {
        let mut pagination = with_total(10, 25);

        assert!(!pagination.previous());
        assert_eq!(pagination.page(), 1);

        pagination.next();
        assert!(pagination.previous());
        assert_eq!(pagination.page(), 1);
    }

    #[test]
    fn empty_list_has_no_pages_to_visit() {
        let mut pagination = with_total(10, 0);

        assert!(!pagination.has_next_page());
        assert!(!pagination.next());
        assert_eq!(pagination.page(), 1);
    }

    #[test]
    fn reset_returns_to_first_page() {
        let mut pagination = with_total(5, 50);
        pagination.next();
        pagination.next();

        pagination.reset();

        assert_eq!(pagination.page(), 1);
    }

    #[test]
    #[should_panic(expected = "page size must be positive")]
    fn zero_limit_is_rejected() {
        Pagination::new(0);
    }
}
