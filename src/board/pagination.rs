//! Page-number pagination.
//!
//! The requested page comes straight from the query string. Anything that
//! is not a positive integer selects the first page, and numbers past the
//! end select the last page.

/// Resolved position of a page within a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number.
    pub number: i64,
    /// Items per page.
    pub per_page: i64,
    /// Total number of pages (at least 1).
    pub num_pages: i64,
    /// Total number of items.
    pub total: i64,
}

impl Pagination {
    /// Resolve a requested page against the total item count.
    pub fn new(requested: Option<&str>, total: i64, per_page: i64) -> Self {
        let per_page = per_page.max(1);
        let total = total.max(0);
        let num_pages = ((total + per_page - 1) / per_page).max(1);

        let number = requested
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|n| *n >= 1)
            .map(|n| n.min(num_pages))
            .unwrap_or(1);

        Self {
            number,
            per_page,
            num_pages,
            total,
        }
    }

    /// Number of items to skip.
    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.per_page
    }

    /// Maximum number of items to return.
    pub fn limit(&self) -> i64 {
        self.per_page
    }

    /// Whether a page exists before this one.
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Whether a page exists after this one.
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    /// Whether the result set spans more than one page.
    pub fn has_other_pages(&self) -> bool {
        self.num_pages > 1
    }

    /// Attach the fetched items.
    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            items,
            pagination: self,
        }
    }
}

/// One page of results.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// The items in this page.
    pub items: Vec<T>,
    /// Where this page sits.
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_by_default() {
        let p = Pagination::new(None, 45, 20);
        assert_eq!(p.number, 1);
        assert_eq!(p.num_pages, 3);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.limit(), 20);
    }

    #[test]
    fn test_requested_page() {
        let p = Pagination::new(Some("2"), 45, 20);
        assert_eq!(p.number, 2);
        assert_eq!(p.offset(), 20);
    }

    #[test]
    fn test_out_of_range_clamps_to_last() {
        let p = Pagination::new(Some("99"), 45, 20);
        assert_eq!(p.number, 3);
        assert_eq!(p.offset(), 40);
    }

    #[test]
    fn test_invalid_page_selects_first() {
        for raw in ["abc", "0", "-3", ""] {
            assert_eq!(Pagination::new(Some(raw), 45, 20).number, 1, "{raw}");
        }
    }

    #[test]
    fn test_empty_result_has_one_page() {
        let p = Pagination::new(Some("5"), 0, 20);
        assert_eq!(p.num_pages, 1);
        assert_eq!(p.number, 1);
    }

    #[test]
    fn test_page_navigation() {
        let middle = Pagination::new(Some("2"), 5, 2);
        assert!(middle.has_previous());
        assert!(middle.has_next());
        assert!(middle.has_other_pages());

        let last = Pagination::new(Some("3"), 5, 2);
        assert!(last.has_previous());
        assert!(!last.has_next());

        let single = Pagination::new(None, 2, 2);
        assert!(!single.has_previous());
        assert!(!single.has_next());
        assert!(!single.has_other_pages());
    }

    #[test]
    fn test_into_page_keeps_position() {
        let page = Pagination::new(Some("2"), 5, 2).into_page(vec![3, 4]);
        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.pagination.number, 2);
        assert_eq!(page.pagination.num_pages, 3);
    }
}
