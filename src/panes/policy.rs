//! Pane policies.
//!
//! These are heuristics with user-visible effects, kept as free functions so
//! they can be tested apart from the [`PaneManager`](super::PaneManager).

/// Maximum number of simultaneously open panes.
pub const MAX_PANES: usize = 4;

/// Whether another split pane can be opened.
pub fn can_add_pane(pane_count: usize) -> bool {
    pane_count < MAX_PANES
}

/// A pane collapsed by a layout gesture is removed only when exactly two
/// panes are open. With more panes the layout keeps the collapsed slot.
pub fn should_remove_on_collapse(pane_count: usize) -> bool {
    pane_count == 2
}

/// Focus after removing the pane at `removed`.
///
/// `remaining` is the pane count after removal. With a single pane left the
/// focus is always that pane. Otherwise the focused pane keeps focus (its
/// index shifts down if an earlier pane went away), and removing the focused
/// pane moves focus to the pane that took its slot, or the new last pane.
pub fn focus_after_removal(
    focused: Option<usize>,
    removed: usize,
    remaining: usize,
) -> Option<usize> {
    if remaining == 0 {
        return None;
    }
    if remaining == 1 {
        return Some(0);
    }
    match focused {
        None => None,
        Some(idx) if idx == removed => Some(idx.min(remaining - 1)),
        Some(idx) if idx > removed => Some(idx - 1),
        Some(idx) => Some(idx),
    }
}

/// Focus resulting from a pointer click on pane `idx`.
///
/// With two or more panes, a click with the inspect modifier held (Alt)
/// looks at the pane without focusing it, which clears focus.
pub fn focus_for_click(idx: usize, pane_count: usize, inspect_modifier: bool) -> Option<usize> {
    if pane_count < 2 || !inspect_modifier {
        Some(idx)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity() {
        assert!(can_add_pane(0));
        assert!(can_add_pane(3));
        assert!(!can_add_pane(4));
        assert!(!can_add_pane(5));
    }

    #[test]
    fn test_collapse_only_removes_at_two() {
        assert!(!should_remove_on_collapse(1));
        assert!(should_remove_on_collapse(2));
        assert!(!should_remove_on_collapse(3));
        assert!(!should_remove_on_collapse(4));
    }

    #[test]
    fn test_focus_after_removal_single_remaining() {
        assert_eq!(focus_after_removal(Some(1), 1, 1), Some(0));
        assert_eq!(focus_after_removal(None, 0, 1), Some(0));
    }

    #[test]
    fn test_focus_after_removal_shifts_and_clamps() {
        // focused pane after the removed one shifts down
        assert_eq!(focus_after_removal(Some(2), 0, 3), Some(1));
        // focused pane before the removed one is untouched
        assert_eq!(focus_after_removal(Some(0), 2, 3), Some(0));
        // removing the focused last pane clamps to the new last pane
        assert_eq!(focus_after_removal(Some(3), 3, 3), Some(2));
        // removing the focused middle pane focuses its successor
        assert_eq!(focus_after_removal(Some(1), 1, 3), Some(1));
        // no focus stays no focus
        assert_eq!(focus_after_removal(None, 1, 3), None);
    }

    #[test]
    fn test_focus_for_click() {
        assert_eq!(focus_for_click(0, 1, true), Some(0));
        assert_eq!(focus_for_click(1, 2, false), Some(1));
        assert_eq!(focus_for_click(1, 2, true), None);
    }
}
