//! Page-link window for paginated complaint lists.

/// Default page size requested from the complaint endpoints.
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 10;

/// Link counts kept at the list edges and around the current page.
#[derive(Clone, Copy, Debug)]
struct PageWindow {
    edge: usize,
    before: usize,
    after: usize,
}

const COMPLAINT_LIST_WINDOW: PageWindow = PageWindow {
    edge: 2,
    before: 2,
    after: 4,
};

impl PageWindow {
    fn links(self, last: usize, current: usize) -> Vec<Option<usize>> {
        if last == 0 {
            return Vec::new();
        }

        // Half-open ranges of pages, each clamped to what follows the previous one.
        let head = 1..(self.edge + 1).min(last + 1);
        let middle_start = head.end.max(current.saturating_sub(self.before));
        let middle = middle_start..(current + self.after + 1).min(last + 1);
        let tail = middle.end.max(last.saturating_sub(self.edge) + 1)..last + 1;

        let mut links: Vec<Option<usize>> = head.clone().map(Some).collect();
        if middle.start > head.end {
            links.push(None);
        }
        links.extend(middle.clone().map(Some));
        if tail.start > middle.end {
            links.push(None);
        }
        links.extend(tail.map(Some));
        links
    }
}

/// Page numbers to display around `current_page`; `None` is an ellipsis.
pub fn page_window(total_pages: usize, current_page: usize) -> Vec<Option<usize>> {
    COMPLAINT_LIST_WINDOW.links(total_pages, current_page.clamp(1, total_pages.max(1)))
}
