//! Page-button window: which page numbers to show around the current page,
//! plus first/last shortcuts and ellipses outside the window.

use serde::Serialize;

/// Number of page buttons shown when the caller does not say otherwise.
pub const DEFAULT_MAX_VISIBLE: u32 = 5;

/// One slot in the rendered pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "page", rename_all = "snake_case")]
pub enum PageEntry {
    /// Shortcut to page 1 ahead of the window.
    FirstPage,
    LeadingEllipsis,
    Page(u32),
    TrailingEllipsis,
    /// Shortcut to the final page after the window.
    LastPage(u32),
}

impl PageEntry {
    /// The page a click on this entry navigates to; `None` for ellipses.
    pub fn target(&self) -> Option<u32> {
        match self {
            PageEntry::FirstPage => Some(1),
            PageEntry::Page(page) | PageEntry::LastPage(page) => Some(*page),
            PageEntry::LeadingEllipsis | PageEntry::TrailingEllipsis => None,
        }
    }
}

/// Contiguous `start..=end` range centred on `current_page`, `max_visible` wide
/// where the page count allows. A page outside `1..=total_pages` is treated as
/// the nearest valid page.
pub fn visible_range(current_page: u32, total_pages: u32, max_visible: u32) -> (u32, u32) {
    if total_pages <= max_visible {
        return (1, total_pages);
    }

    let current_page = current_page.clamp(1, total_pages);
    let half = max_visible / 2;
    let start = current_page.saturating_sub(half).max(1);
    let end = current_page.saturating_add(half).min(total_pages);

    let desired = max_visible.saturating_sub(1);
    if end - start >= desired {
        return (start, end);
    }
    if start == 1 {
        (start, (start + desired).min(total_pages))
    } else {
        (end.saturating_sub(desired).max(1), end)
    }
}

/// Ordered page entries for the pagination bar.
///
/// `current_page` is not rejected when out of range; the window snaps to the
/// nearest end. Callers skip pagination entirely when `total_pages <= 1`.
pub fn compute_window(current_page: u32, total_pages: u32, max_visible: u32) -> Vec<PageEntry> {
    if total_pages <= max_visible {
        return (1..=total_pages).map(PageEntry::Page).collect();
    }

    let (start, end) = visible_range(current_page, total_pages, max_visible);
    let mut entries = Vec::with_capacity((end - start + 1) as usize + 4);

    if start > 1 {
        entries.push(PageEntry::FirstPage);
        if start > 2 {
            entries.push(PageEntry::LeadingEllipsis);
        }
    }
    entries.extend((start..=end).map(PageEntry::Page));
    if end < total_pages {
        if end < total_pages - 1 {
            entries.push(PageEntry::TrailingEllipsis);
        }
        entries.push(PageEntry::LastPage(total_pages));
    }
    entries
}

/// A navigation button: where it goes and whether it is clickable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavButton {
    pub target: u32,
    pub disabled: bool,
}

/// Everything a renderer needs to draw the pagination bar.
///
/// `first` and `last` are `None` once [`PaginationControls::without_first_last`]
/// hides the jump-to-edge buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationControls {
    pub current_page: u32,
    pub total_pages: u32,
    pub first: Option<NavButton>,
    pub previous: NavButton,
    pub entries: Vec<PageEntry>,
    pub next: NavButton,
    pub last: Option<NavButton>,
}

impl PaginationControls {
    /// `None` when there is at most one page and the bar should not be shown.
    pub fn new(current_page: u32, total_pages: u32, max_visible: u32) -> Option<Self> {
        if total_pages <= 1 {
            return None;
        }
        let on_first = current_page <= 1;
        let on_last = current_page >= total_pages;
        Some(Self {
            current_page,
            total_pages,
            first: Some(NavButton {
                target: 1,
                disabled: on_first,
            }),
            previous: NavButton {
                target: current_page.saturating_sub(1).clamp(1, total_pages),
                disabled: on_first,
            },
            entries: compute_window(current_page, total_pages, max_visible),
            next: NavButton {
                target: current_page.saturating_add(1).min(total_pages),
                disabled: on_last,
            },
            last: Some(NavButton {
                target: total_pages,
                disabled: on_last,
            }),
        })
    }

    /// Drop the first/last buttons, keeping previous/next and the page entries.
    pub fn without_first_last(mut self) -> Self {
        self.first = None;
        self.last = None;
        self
    }

    pub fn is_active(&self, entry: &PageEntry) -> bool {
        entry.target() == Some(self.current_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use PageEntry::*;

    fn numbers(entries: &[PageEntry]) -> Vec<u32> {
        entries
            .iter()
            .filter_map(|e| match e {
                Page(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn first_page_of_ten() {
        assert_eq!(
            compute_window(1, 10, 5),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), TrailingEllipsis, LastPage(10)]
        );
    }

    #[test]
    fn last_page_of_ten() {
        assert_eq!(
            compute_window(10, 10, 5),
            vec![FirstPage, LeadingEllipsis, Page(6), Page(7), Page(8), Page(9), Page(10)]
        );
    }

    #[test]
    fn middle_page_of_ten() {
        assert_eq!(
            compute_window(5, 10, 5),
            vec![
                FirstPage,
                LeadingEllipsis,
                Page(3),
                Page(4),
                Page(5),
                Page(6),
                Page(7),
                TrailingEllipsis,
                LastPage(10)
            ]
        );
    }

    #[test]
    fn no_ellipsis_when_gap_is_one_page() {
        // Window 2..=6: page 1 is adjacent, 7 is adjacent to the last page.
        assert_eq!(
            compute_window(4, 7, 5),
            vec![FirstPage, Page(2), Page(3), Page(4), Page(5), Page(6), LastPage(7)]
        );
    }

    #[test]
    fn few_pages_are_all_shown() {
        assert_eq!(compute_window(2, 3, 5), vec![Page(1), Page(2), Page(3)]);
        assert_eq!(compute_window(1, 5, 5).len(), 5);
        assert!(compute_window(1, 0, 5).is_empty());
    }

    #[test]
    fn controls_hidden_for_single_page() {
        assert!(PaginationControls::new(1, 1, 5).is_none());
        assert!(PaginationControls::new(1, 0, 5).is_none());
    }

    #[test]
    fn controls_disable_edges() {
        let first = PaginationControls::new(1, 2, 5).unwrap();
        assert!(first.first.unwrap().disabled && first.previous.disabled);
        assert!(!first.next.disabled && !first.last.unwrap().disabled);
        assert_eq!(first.next.target, 2);

        let last = PaginationControls::new(2, 2, 5).unwrap();
        assert!(last.next.disabled && last.last.unwrap().disabled);
        assert_eq!(last.previous.target, 1);
        assert!(last.is_active(&Page(2)));
        assert!(!last.is_active(&Page(1)));
    }

    #[test]
    fn page_past_the_end_snaps_to_last_window() {
        assert_eq!(visible_range(50, 10, 5), (6, 10));
        assert_eq!(compute_window(50, 10, 5), compute_window(10, 10, 5));
        assert_eq!(compute_window(0, 10, 5), compute_window(1, 10, 5));
    }

    #[test]
    fn controls_for_page_past_the_end() {
        let controls = PaginationControls::new(50, 10, 5).unwrap();
        assert!(controls.next.disabled && controls.last.unwrap().disabled);
        assert!(!controls.previous.disabled);
        assert_eq!(controls.previous.target, 10);
        assert!(controls.entries.iter().all(|e| !controls.is_active(e)));
    }

    #[test]
    fn first_last_buttons_can_be_hidden() {
        let controls = PaginationControls::new(3, 10, 5).unwrap().without_first_last();
        assert_eq!(controls.first, None);
        assert_eq!(controls.last, None);
        assert_eq!(controls.previous.target, 2);
        assert_eq!(controls.next.target, 4);
        assert!(controls.entries.contains(&LastPage(10)));
    }

    #[test]
    fn entries_serialize_with_kind_tag() {
        let json = serde_json::to_value(compute_window(1, 10, 5)).unwrap();
        assert_eq!(json[0], serde_json::json!({ "kind": "page", "page": 1 }));
        assert_eq!(json[5], serde_json::json!({ "kind": "trailing_ellipsis" }));
    }

    fn window_case() -> impl Strategy<Value = (u32, u32, u32)> {
        (0u32..6, 1u32..200).prop_flat_map(|(half, total)| {
            let max_visible = half * 2 + 1;
            (1..=total, Just(total), Just(max_visible))
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// Small page counts list every page with no decoration.
        #[test]
        fn prop_small_totals_list_every_page(total in 0u32..12, half in 0u32..6) {
            let max_visible = half * 2 + 1;
            prop_assume!(total <= max_visible);
            let current = total.max(1);
            let entries = compute_window(current, total, max_visible);
            prop_assert_eq!(entries, (1..=total).map(Page).collect::<Vec<_>>());
        }

        /// The numeric window is contiguous, contains the current page, and is
        /// exactly `max_visible` wide once there are more pages than that.
        #[test]
        fn prop_window_is_contiguous_and_full((current, total, max_visible) in window_case()) {
            let entries = compute_window(current, total, max_visible);
            let pages = numbers(&entries);
            prop_assert!(pages.windows(2).all(|w| w[1] == w[0] + 1));
            prop_assert!(pages.contains(&current));
            if total > max_visible {
                prop_assert_eq!(pages.len() as u32, max_visible);
            }
        }

        /// Boundary shortcuts and ellipses appear exactly when there is a gap.
        #[test]
        fn prop_decoration_matches_gaps((current, total, max_visible) in window_case()) {
            prop_assume!(total > max_visible);
            let entries = compute_window(current, total, max_visible);
            let pages = numbers(&entries);
            let (start, end) = (pages[0], pages[pages.len() - 1]);

            prop_assert_eq!(entries.contains(&FirstPage), start > 1);
            prop_assert_eq!(entries.contains(&LeadingEllipsis), start > 2);
            prop_assert_eq!(entries.contains(&LastPage(total)), end < total);
            prop_assert_eq!(entries.contains(&TrailingEllipsis), end + 1 < total);
            prop_assert!(entries.iter().filter(|e| **e == FirstPage).count() <= 1);
            prop_assert!(entries.iter().filter(|e| matches!(e, LastPage(_))).count() <= 1);
        }

        /// Every clickable target stays within `1..=total`.
        #[test]
        fn prop_targets_in_range((current, total, max_visible) in window_case()) {
            let entries = compute_window(current, total, max_visible);
            prop_assert!(entries
                .iter()
                .filter_map(PageEntry::target)
                .all(|p| (1..=total).contains(&p)));
        }

        /// Any current page, in range or not, yields a bounded window and
        /// in-range navigation targets.
        #[test]
        fn prop_any_current_page_is_safe(
            current in 0u32..1000,
            total in 2u32..200,
            half in 0u32..6,
        ) {
            let max_visible = half * 2 + 1;
            let pages = numbers(&compute_window(current, total, max_visible));
            prop_assert!(pages.len() as u32 <= max_visible);
            prop_assert!(pages.iter().all(|p| (1..=total).contains(p)));

            let controls = PaginationControls::new(current, total, max_visible).unwrap();
            prop_assert!((1..=total).contains(&controls.previous.target));
            prop_assert!((1..=total).contains(&controls.next.target));
        }
    }
}
