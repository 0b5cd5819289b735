//! # Page Break Decisions
//!
//! What to do with the next fragment given the state of the current page.
//! The rules run in a fixed order:
//!
//! 1. keep-with-next: a fragment that would be separated from its
//!    successor moves to a fresh page first;
//! 2. keep-together: never split; moved whole, or an error when no page is
//!    tall enough;
//! 3. anything that fits is placed whole;
//! 4. tables split between rows;
//! 5. everything else splits at the page boundary.
//!
//! `MoveToNextPage` is only ever returned for a page that already has
//! content, so acting on it and asking again always makes progress.

use super::EPSILON;
use crate::error::FolioError;
use crate::layout::LayoutFragment;

/// The current page as the decision sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageState {
    pub remaining: f64,
    pub content_height: f64,
    pub has_content: bool,
}

impl PageState {
    fn fits(&self, height: f64) -> bool {
        height <= self.remaining + EPSILON
    }
}

/// Break hints in force for a fragment: its own, plus any handed down by a
/// container that pagination expanded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BreakHints {
    pub break_before: bool,
    pub keep_with_next: bool,
}

impl BreakHints {
    pub fn of(fragment: &LayoutFragment) -> Self {
        Self {
            break_before: fragment.break_before(),
            keep_with_next: fragment.keep_with_next(),
        }
    }
}

/// Decide what to do with a fragment at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakDecision {
    /// Place the entire fragment on the current page.
    Place,
    /// Finish the current page, then decide again.
    MoveToNextPage,
    /// Split a table between rows, repeating its header.
    SplitRows,
    /// Split the fragment wherever the page ends.
    Split,
}

pub fn decide_break(
    fragment: &LayoutFragment,
    hints: BreakHints,
    next: Option<&LayoutFragment>,
    page: PageState,
) -> Result<BreakDecision, FolioError> {
    let height = fragment.height;

    if hints.keep_with_next && page.has_content {
        if let Some(next) = next {
            if !page.fits(height + next.height) {
                return Ok(BreakDecision::MoveToNextPage);
            }
        }
    }

    if fragment.keep_together() {
        if height > page.content_height + EPSILON {
            return Err(FolioError::PaginationImpossible {
                path: fragment.path().to_string(),
                height,
                content_height: page.content_height,
            });
        }
        if !page.fits(height) && page.has_content {
            return Ok(BreakDecision::MoveToNextPage);
        }
        return Ok(BreakDecision::Place);
    }

    if page.fits(height) {
        return Ok(BreakDecision::Place);
    }

    if fragment.is_table() {
        return Ok(BreakDecision::SplitRows);
    }

    // Nothing left of this page to split into
    if page.remaining <= EPSILON && page.has_content {
        return Ok(BreakDecision::MoveToNextPage);
    }

    Ok(BreakDecision::Split)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::keys;

    fn state(remaining: f64, has_content: bool) -> PageState {
        PageState {
            remaining,
            content_height: 500.0,
            has_content,
        }
    }

    fn frag(height: f64) -> LayoutFragment {
        LayoutFragment::block("F", 100.0, height)
    }

    fn decide(
        f: &LayoutFragment,
        next: Option<&LayoutFragment>,
        page: PageState,
    ) -> Result<BreakDecision, FolioError> {
        decide_break(f, BreakHints::of(f), next, page)
    }

    #[test]
    fn everything_fits() {
        let decision = decide(&frag(100.0), None, state(100.0, true)).unwrap();
        assert_eq!(decision, BreakDecision::Place);
    }

    #[test]
    fn unbreakable_moves() {
        let f = frag(200.0).with_metadata(keys::KEEP_TOGETHER, "true");
        let decision = decide(&f, None, state(150.0, true)).unwrap();
        assert_eq!(decision, BreakDecision::MoveToNextPage);
        // On an empty page it is placed, never moved again
        let decision = decide(&f, None, state(500.0, false)).unwrap();
        assert_eq!(decision, BreakDecision::Place);
    }

    #[test]
    fn unbreakable_taller_than_page_is_an_error() {
        let f = frag(501.0).with_metadata(keys::KEEP_TOGETHER, "true");
        let err = decide(&f, None, state(500.0, false)).unwrap_err();
        assert!(matches!(err, FolioError::PaginationImpossible { .. }));
    }

    #[test]
    fn keep_with_next_looks_at_successor() {
        let f = frag(200.0).with_metadata(keys::KEEP_WITH_NEXT, "true");
        let next = frag(260.0);
        let decision = decide(&f, Some(&next), state(300.0, true)).unwrap();
        assert_eq!(decision, BreakDecision::MoveToNextPage);
        let decision = decide(&f, Some(&next), state(500.0, false)).unwrap();
        assert_eq!(decision, BreakDecision::Place);
        // Last fragment: nothing to keep with
        let decision = decide(&f, None, state(300.0, true)).unwrap();
        assert_eq!(decision, BreakDecision::Place);
    }

    #[test]
    fn keep_with_next_is_checked_before_keep_together() {
        let f = frag(100.0)
            .with_metadata(keys::KEEP_WITH_NEXT, "true")
            .with_metadata(keys::KEEP_TOGETHER, "true");
        let next = frag(100.0);
        let decision = decide(&f, Some(&next), state(150.0, true)).unwrap();
        assert_eq!(decision, BreakDecision::MoveToNextPage);
    }

    #[test]
    fn tables_split_by_rows() {
        let table = frag(800.0).with_metadata(keys::TABLE_COLUMNS, "2");
        let decision = decide(&table, None, state(300.0, true)).unwrap();
        assert_eq!(decision, BreakDecision::SplitRows);
    }

    #[test]
    fn split_at_page_end() {
        let decision = decide(&frag(800.0), None, state(300.0, true)).unwrap();
        assert_eq!(decision, BreakDecision::Split);
        let decision = decide(&frag(800.0), None, state(0.0, true)).unwrap();
        assert_eq!(decision, BreakDecision::MoveToNextPage);
    }

    #[test]
    fn inherited_keep_with_next_counts() {
        let f = frag(200.0);
        let next = frag(260.0);
        let hints = BreakHints {
            keep_with_next: true,
            ..Default::default()
        };
        let decision = decide_break(&f, hints, Some(&next), state(300.0, true)).unwrap();
        assert_eq!(decision, BreakDecision::MoveToNextPage);
        let decision = decide(&f, Some(&next), state(300.0, true)).unwrap();
        assert_eq!(decision, BreakDecision::Place);
    }
}
