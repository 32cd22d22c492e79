//! Pagination state and the page-control window algorithm
//!
//! The viewer never clamps the requested page client-side; the backend's
//! response is trusted for `total_pages`, `start_row`, and `end_row`, and
//! out-of-range requests come back as server errors.

use serde::Deserialize;

use super::summary::DatasetKind;

/// Allowed page densities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PerPage {
    TwentyFive,
    #[default]
    Fifty,
    Hundred,
}

impl PerPage {
    pub fn as_u32(&self) -> u32 {
        match self {
            PerPage::TwentyFive => 25,
            PerPage::Fifty => 50,
            PerPage::Hundred => 100,
        }
    }

    /// Cycle 25 -> 50 -> 100 -> 25
    pub fn next(&self) -> PerPage {
        match self {
            PerPage::TwentyFive => PerPage::Fifty,
            PerPage::Fifty => PerPage::Hundred,
            PerPage::Hundred => PerPage::TwentyFive,
        }
    }
}

/// Client-side pagination state for one dataset kind
///
/// Lives from the moment a dataset kind is chosen for viewing until a
/// different kind is chosen or the view is closed.
#[derive(Debug, Clone)]
pub struct PaginationState {
    pub kind: DatasetKind,
    pub page: u32,
    pub per_page: PerPage,
    pub total_rows: u64,
}

impl PaginationState {
    pub fn new(kind: DatasetKind) -> Self {
        Self {
            kind,
            page: 1,
            per_page: PerPage::default(),
            total_rows: 0,
        }
    }

    pub fn total_pages(&self) -> u32 {
        let per_page = u64::from(self.per_page.as_u32());
        (self.total_rows.div_ceil(per_page) as u32).max(1)
    }

    /// Changing page density invalidates the current offset
    pub fn set_per_page(&mut self, per_page: PerPage) {
        self.per_page = per_page;
        self.page = 1;
    }

    /// Record a successful page response
    pub fn apply(&mut self, view: &PageView) {
        self.page = view.current_page;
        self.total_rows = view.total_rows;
    }
}

/// One page of a dataset as returned by the backend
#[derive(Debug, Clone, Deserialize)]
pub struct PageView {
    pub total_rows: u64,
    pub total_pages: u32,
    pub current_page: u32,
    pub per_page: u32,
    pub start_row: u64,
    pub end_row: u64,
    /// Server-rendered table for the current window
    pub current_data: String,
}

/// One element of the rendered pagination control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    Previous { enabled: bool },
    Page { number: u32, active: bool },
    Ellipsis,
    Next { enabled: bool },
}

/// Build the pagination control for `cur` of `last` pages.
///
/// The window spans `[max(1, cur-2), min(last, cur+2)]`. Page 1 is shown
/// ahead of the window when the window starts past it, with an ellipsis
/// only if the gap exceeds one page; symmetrically for the last page. The
/// result carries at most 7 numbered controls regardless of `last`.
pub fn pagination_controls(cur: u32, last: u32) -> Vec<PageControl> {
    let mut controls = vec![PageControl::Previous { enabled: cur > 1 }];

    let start = cur.saturating_sub(2).max(1);
    let end = (cur + 2).min(last);

    if start > 1 {
        controls.push(PageControl::Page {
            number: 1,
            active: false,
        });
        if start > 2 {
            controls.push(PageControl::Ellipsis);
        }
    }

    for number in start..=end {
        controls.push(PageControl::Page {
            number,
            active: number == cur,
        });
    }

    if end < last {
        if end < last - 1 {
            controls.push(PageControl::Ellipsis);
        }
        controls.push(PageControl::Page {
            number: last,
            active: false,
        });
    }

    controls.push(PageControl::Next { enabled: cur < last });
    controls
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Strip the prev/next controls, keeping numbers and ellipses
    fn numbers(cur: u32, last: u32) -> Vec<String> {
        pagination_controls(cur, last)
            .into_iter()
            .filter_map(|c| match c {
                PageControl::Page { number, .. } => Some(number.to_string()),
                PageControl::Ellipsis => Some("...".to_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_single_page() {
        assert_eq!(numbers(1, 1), vec!["1"]);
        let controls = pagination_controls(1, 1);
        assert_eq!(controls.first(), Some(&PageControl::Previous { enabled: false }));
        assert_eq!(controls.last(), Some(&PageControl::Next { enabled: false }));
    }

    #[test]
    fn test_first_page_of_many() {
        assert_eq!(numbers(1, 10), vec!["1", "2", "3", "...", "10"]);
    }

    #[test]
    fn test_middle_page() {
        assert_eq!(
            numbers(5, 10),
            vec!["1", "...", "3", "4", "5", "6", "7", "...", "10"]
        );
    }

    #[test]
    fn test_last_page() {
        assert_eq!(numbers(10, 10), vec!["1", "...", "8", "9", "10"]);
    }

    #[test]
    fn test_gap_of_one_has_no_ellipsis() {
        // Window [2..6]: page 1 is adjacent, no leading ellipsis
        assert_eq!(numbers(4, 10), vec!["1", "2", "3", "4", "5", "6", "...", "10"]);
        // Window [5..9]: page 10 is adjacent, no trailing ellipsis
        assert_eq!(numbers(7, 10), vec!["1", "...", "5", "6", "7", "8", "9", "10"]);
    }

    #[test]
    fn test_at_most_seven_numbered_controls() {
        for last in 1..=50 {
            for cur in 1..=last {
                let count = pagination_controls(cur, last)
                    .iter()
                    .filter(|c| matches!(c, PageControl::Page { .. }))
                    .count();
                assert!(count <= 7, "cur={cur} last={last} rendered {count} pages");
            }
        }
    }

    #[test]
    fn test_active_marker_follows_current_page() {
        let controls = pagination_controls(5, 10);
        let active: Vec<u32> = controls
            .iter()
            .filter_map(|c| match c {
                PageControl::Page { number, active: true } => Some(*number),
                _ => None,
            })
            .collect();
        assert_eq!(active, vec![5]);
    }

    #[test]
    fn test_prev_next_enablement() {
        let controls = pagination_controls(1, 10);
        assert_eq!(controls.first(), Some(&PageControl::Previous { enabled: false }));
        assert_eq!(controls.last(), Some(&PageControl::Next { enabled: true }));

        let controls = pagination_controls(10, 10);
        assert_eq!(controls.first(), Some(&PageControl::Previous { enabled: true }));
        assert_eq!(controls.last(), Some(&PageControl::Next { enabled: false }));
    }

    #[test]
    fn test_per_page_change_resets_page() {
        let mut state = PaginationState::new(DatasetKind::Metadata);
        state.page = 7;
        state.total_rows = 1000;
        state.set_per_page(PerPage::Hundred);
        assert_eq!(state.page, 1);
        assert_eq!(state.per_page.as_u32(), 100);
    }

    #[test]
    fn test_total_pages_rounds_up_and_is_at_least_one() {
        let mut state = PaginationState::new(DatasetKind::Expression);
        assert_eq!(state.total_pages(), 1);
        state.total_rows = 101;
        assert_eq!(state.total_pages(), 3);
        state.total_rows = 100;
        assert_eq!(state.total_pages(), 2);
    }

    #[test]
    fn test_per_page_cycle() {
        assert_eq!(PerPage::TwentyFive.next(), PerPage::Fifty);
        assert_eq!(PerPage::Fifty.next(), PerPage::Hundred);
        assert_eq!(PerPage::Hundred.next(), PerPage::TwentyFive);
    }
}
