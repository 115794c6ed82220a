//! Position types shared by the model, the selection mapper and the host seam.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Range in the flattened flow, with anchor and focus positions.
///
/// Positions are flow offsets: a text run contributes one unit per `char`,
/// every other node contributes one unit. The anchor is where the range
/// started, the focus is where it ends now; use `start()` and `end()` for
/// ordered bounds.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRange {
    pub anchor: usize,
    pub focus: usize,
}

impl FlowRange {
    pub fn new(anchor: usize, focus: usize) -> Self {
        Self { anchor, focus }
    }

    /// Create a collapsed range (caret position).
    pub fn caret(offset: usize) -> Self {
        Self {
            anchor: offset,
            focus: offset,
        }
    }

    /// Lower bound of the range.
    pub fn start(&self) -> usize {
        self.anchor.min(self.focus)
    }

    /// Upper bound of the range.
    pub fn end(&self) -> usize {
        self.anchor.max(self.focus)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn to_range(&self) -> Range<usize> {
        self.start()..self.end()
    }
}

/// Reference to a node of the structured content, by index.
///
/// This is what the rendering layer's reverse lookup hands back for a DOM
/// element it rendered.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowNodeRef {
    pub index: usize,
}

impl FlowNodeRef {
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds() {
        let range = FlowRange::new(5, 10);
        assert_eq!(range.start(), 5);
        assert_eq!(range.end(), 10);

        let range = FlowRange::new(10, 5);
        assert_eq!(range.start(), 5);
        assert_eq!(range.end(), 10);
        assert_eq!(range.to_range(), 5..10);
    }

    #[test]
    fn test_range_collapsed() {
        let range = FlowRange::caret(7);
        assert!(range.is_collapsed());
        assert_eq!(range.to_range(), 7..7);
    }
}
