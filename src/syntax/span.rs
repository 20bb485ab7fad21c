//! Source positions and spans.
//!
//! Every token, parse node, and diagnostic carries a [`Span`]. Rows and
//! columns are zero-based (columns count characters, not bytes); renderers
//! convert to one-based for display.

use serde::{Deserialize, Serialize};

/// A single position in the source text.
///
/// # Examples
///
/// ```rust
/// use taintlint::syntax::Pos;
/// let pos = Pos { byte: 14, row: 0, col: 14 };
/// assert_eq!(pos.row, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Pos {
    pub byte: usize,
    pub row: usize,
    pub col: usize,
}

/// A half-open region of the source text, `start..end`.
///
/// Zero-width spans mark positions where something was expected but absent
/// (a synthesized missing token).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub fn new(start: Pos, end: Pos) -> Self {
        Span { start, end }
    }

    /// A zero-width span anchored at `pos`.
    pub fn point(pos: Pos) -> Self {
        Span { start: pos, end: pos }
    }

    /// Byte length of the spanned text.
    pub fn len(&self) -> usize {
        self.end.byte.saturating_sub(self.start.byte)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if `other` lies entirely within this span.
    pub fn contains(&self, other: &Span) -> bool {
        self.start.byte <= other.start.byte && other.end.byte <= self.end.byte
    }

    /// Smallest span covering both `self` and `other`.
    pub fn join(&self, other: &Span) -> Span {
        let start = if self.start.byte <= other.start.byte {
            self.start
        } else {
            other.start
        };
        let end = if self.end.byte >= other.end.byte {
            self.end
        } else {
            other.end
        };
        Span { start, end }
    }

    /// Human-oriented location, one-based.
    pub fn display_position(&self) -> (usize, usize) {
        (self.start.row + 1, self.start.col + 1)
    }
}
