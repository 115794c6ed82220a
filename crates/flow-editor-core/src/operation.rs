//! Structured operations and the selection that produces them.

use serde::{Deserialize, Serialize};

use crate::model::{FlowContent, StyleKey, Theme};
use crate::types::FlowRange;

/// An immutable description of a change to the flow, applied by the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum FlowOperation {
    /// Insert content at a caret position.
    Insert {
        position: usize,
        content: FlowContent,
    },
    /// Remove `start..end`.
    Remove { start: usize, end: usize },
    /// Replace `start..end` with content.
    Replace {
        start: usize,
        end: usize,
        content: FlowContent,
    },
    /// Set a character style key on every styled node in `start..end`.
    Format {
        start: usize,
        end: usize,
        key: StyleKey,
        value: bool,
    },
}

/// Where in the structured document an edit applies.
///
/// Only the selection mapper creates these, from a DOM range.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub struct FlowSelection {
    range: FlowRange,
}

impl FlowSelection {
    pub fn new(range: FlowRange) -> Self {
        Self { range }
    }

    pub fn range(&self) -> FlowRange {
        self.range
    }

    pub fn is_collapsed(&self) -> bool {
        self.range.is_collapsed()
    }

    /// Operation inserting `content` over this selection in `target`.
    ///
    /// Explicit style values the theme already implies are dropped from the
    /// content. Returns `None` when the selection lies outside `target` or the
    /// edit would change nothing.
    pub fn insert(
        &self,
        content: FlowContent,
        target: &FlowContent,
        theme: &Theme,
    ) -> Option<FlowOperation> {
        let len = target.len();
        if self.range.end() > len {
            tracing::warn!(
                start = self.range.start(),
                end = self.range.end(),
                len,
                "selection outside document, dropping insert"
            );
            return None;
        }
        let (start, end) = (self.range.start(), self.range.end());
        let content = content.without_theme_defaults(theme);

        match (content.node_count() == 0, self.range.is_collapsed()) {
            (true, true) => None,
            (true, false) => Some(FlowOperation::Remove { start, end }),
            (false, true) => Some(FlowOperation::Insert {
                position: start,
                content,
            }),
            (false, false) => Some(FlowOperation::Replace {
                start,
                end,
                content,
            }),
        }
    }

    /// Operation removing the selected content; `None` for a caret.
    pub fn remove(&self) -> Option<FlowOperation> {
        if self.range.is_collapsed() {
            return None;
        }
        Some(FlowOperation::Remove {
            start: self.range.start(),
            end: self.range.end(),
        })
    }
}
