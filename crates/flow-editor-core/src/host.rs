//! Platform abstraction for the editing surface.
//!
//! The rendering layer owns the DOM and the bidirectional mapping between DOM
//! nodes and flow nodes. It exposes that mapping to the input pipeline through
//! [`EditingHost`]; the pipeline never walks the DOM itself.

use std::fmt;

use crate::event::TargetRange;
use crate::types::{FlowNodeRef, FlowRange};

/// The editable surface an edit event happened in.
///
/// The browser implementation works on `web_sys::Node`; tests use plain ids.
pub trait EditingHost {
    /// Handle to a DOM node. Equality must be node identity.
    type Node: Clone + PartialEq + fmt::Debug;

    /// Convert a DOM range to a flow range.
    ///
    /// `backward` tells the mapping which side to prefer when a boundary falls
    /// between flow nodes (for example inside an unmapped inline wrapper), so
    /// the result is deterministic. Returns `None` when the range cannot be
    /// mapped faithfully.
    fn map_range_to_flow(&self, range: &TargetRange<Self::Node>, backward: bool)
    -> Option<FlowRange>;

    /// The flow node a DOM node was rendered from, if any.
    fn reverse_lookup(&self, node: &Self::Node) -> Option<FlowNodeRef>;

    fn is_text_node(&self, node: &Self::Node) -> bool;

    fn parent_node(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Index of `node` among its parent's children.
    fn child_index(&self, node: &Self::Node) -> Option<usize>;

    /// Text the browser typed natively into `run` was committed to the
    /// document at `position`.
    ///
    /// The DOM already holds that text but the host's layout predates it.
    /// Until the next render, positions inside `run` past `position`, and
    /// every later node, must map `text` further along. Events that follow
    /// the commit are mapped right after this call.
    fn note_native_insertion(&self, run: FlowNodeRef, position: usize, text: &str);
}
