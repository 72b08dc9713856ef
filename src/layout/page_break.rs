//! # Page Break Decisions
//!
//! Rows are atomic: a row either goes on the current page or starts the
//! next one. This module encodes that rule so the document can stay a
//! plain loop.

/// Heights closer than this are treated as equal.
pub const EPSILON: f64 = 1e-6;

/// What to do with the next row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakDecision {
    /// The row fits in the space left on the current page.
    Place,
    /// Close the current page and place the row on a fresh one.
    MoveToNextPage,
    /// The row does not fit even on a fresh page. It is placed anyway and
    /// runs past the bottom margin.
    Overflow,
}

/// Decide where a row of `height` goes when `remaining` points are left
/// above the footer. `page_is_fresh` is true when the page holds nothing
/// but its header, so moving on would not gain any space.
pub fn decide_break(remaining: f64, height: f64, page_is_fresh: bool) -> BreakDecision {
    if height <= remaining + EPSILON {
        BreakDecision::Place
    } else if page_is_fresh {
        BreakDecision::Overflow
    } else {
        BreakDecision::MoveToNextPage
    }
}
