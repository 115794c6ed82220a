//! Test doubles: a DOM made of integer ids, fake media, a recording document.

use std::cell::RefCell;

use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;

use crate::dispatch::DocumentHost;
use crate::error::PlatformError;
use crate::event::TargetRange;
use crate::host::EditingHost;
use crate::media::MediaPlatform;
use crate::model::{
    Alignment, EditorState, FlowContent, FlowNode, ParagraphStyle, StyleKey, TextStyle,
};
use crate::operation::FlowOperation;
use crate::text::utf16_to_char_offset;
use crate::types::{FlowNodeRef, FlowRange};

/// The editing host element.
pub const ROOT: u32 = 1;
/// Element rendered for flow node `i` is `ELEMENT_BASE + i`.
pub const ELEMENT_BASE: u32 = 100;
/// Text node inside the element of text run `i` is `TEXT_BASE + i`.
pub const TEXT_BASE: u32 = 200;

pub const RUN_B: u32 = ELEMENT_BASE + 1;
pub const TEXT_A: u32 = TEXT_BASE;
pub const TEXT_B: u32 = TEXT_BASE + 1;

/// Fake editing host rendering each flow node as one element under `ROOT`,
/// with a single text node inside each text run element.
///
/// Committed native insertions are spliced into its text nodes, the way the
/// browser's DOM already holds them.
pub struct FakeHost {
    content: RefCell<FlowContent>,
    hints: RefCell<Vec<bool>>,
}

impl FakeHost {
    pub fn new(content: FlowContent) -> Self {
        Self {
            content: RefCell::new(content),
            hints: RefCell::new(Vec::new()),
        }
    }

    /// `"hello "` plain, `"world"` bold, then a centered paragraph break.
    pub fn hello_world() -> Self {
        Self::new(FlowContent::new(vec![
            FlowNode::text("hello ", TextStyle::default()),
            FlowNode::text("world", TextStyle::default().with(StyleKey::Bold, true)),
            FlowNode::ParagraphBreak {
                style: ParagraphStyle {
                    alignment: Some(Alignment::Center),
                    variant: None,
                },
            },
        ]))
    }

    pub fn state(&self) -> EditorState {
        EditorState::new(self.content.borrow().clone())
    }

    /// Direction hints passed to `map_range_to_flow`, in call order.
    pub fn backward_hints(&self) -> Vec<bool> {
        self.hints.borrow().clone()
    }

    fn text_run(&self, node: u32) -> Option<(usize, String)> {
        let index = node.checked_sub(TEXT_BASE)? as usize;
        match self.content.borrow().node(index)? {
            FlowNode::Text(run) => Some((index, run.text.clone())),
            _ => None,
        }
    }

    fn element_index(&self, node: u32) -> Option<usize> {
        let index = node.checked_sub(ELEMENT_BASE)? as usize;
        (node < TEXT_BASE && index < self.content.borrow().node_count()).then_some(index)
    }

    fn map_position(&self, node: u32, offset: usize) -> Option<usize> {
        let content = self.content.borrow();
        if node == ROOT {
            return match content.node_start(offset) {
                Some(start) => Some(start),
                None => (offset == content.node_count()).then(|| content.len()),
            };
        }
        if let Some((index, text)) = self.text_run(node) {
            let start = content.node_start(index)?;
            return Some(start + utf16_to_char_offset(&text, offset)?);
        }
        let index = self.element_index(node)?;
        let start = content.node_start(index)?;
        match offset {
            0 => Some(start),
            _ => Some(start + content.node(index)?.len()),
        }
    }
}

impl EditingHost for FakeHost {
    type Node = u32;

    fn map_range_to_flow(&self, range: &TargetRange<u32>, backward: bool) -> Option<FlowRange> {
        self.hints.borrow_mut().push(backward);
        let start = self.map_position(range.start_container, range.start_offset)?;
        let end = self.map_position(range.end_container, range.end_offset)?;
        Some(FlowRange::new(start, end))
    }

    fn reverse_lookup(&self, node: &u32) -> Option<FlowNodeRef> {
        self.element_index(*node).map(FlowNodeRef::new)
    }

    fn is_text_node(&self, node: &u32) -> bool {
        self.text_run(*node).is_some()
    }

    fn parent_node(&self, node: &u32) -> Option<u32> {
        if let Some((index, _)) = self.text_run(*node) {
            return Some(ELEMENT_BASE + index as u32);
        }
        self.element_index(*node).map(|_| ROOT)
    }

    fn child_index(&self, node: &u32) -> Option<usize> {
        if self.text_run(*node).is_some() {
            return Some(0);
        }
        self.element_index(*node)
    }

    fn note_native_insertion(&self, run: FlowNodeRef, position: usize, text: &str) {
        let mut content = self.content.borrow_mut();
        let Some(start) = content.node_start(run.index) else {
            return;
        };
        let mut nodes = content.nodes().to_vec();
        if let Some(FlowNode::Text(typed_into)) = nodes.get_mut(run.index) {
            let at = typed_into
                .text
                .char_indices()
                .nth(position.saturating_sub(start))
                .map_or(typed_into.text.len(), |(byte, _)| byte);
            typed_into.text.insert_str(at, text);
        }
        *content = FlowContent::new(nodes);
    }
}

/// A fake image blob: just its dimensions, or undecodable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeImage {
    size: Option<(u32, u32)>,
}

impl FakeImage {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Some((width, height)),
        }
    }

    pub fn broken() -> Self {
        Self { size: None }
    }
}

/// Media whose placeholders are `"{w}x{h}"` of the requested canvas.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeMedia;

impl MediaPlatform for FakeMedia {
    type Blob = FakeImage;
    type Bitmap = (u32, u32);

    fn decode_bitmap(
        &self,
        blob: FakeImage,
    ) -> LocalBoxFuture<'static, Result<(u32, u32), PlatformError>> {
        async move { blob.size.ok_or_else(|| PlatformError::Decode("broken".into())) }
            .boxed_local()
    }

    fn bitmap_size(&self, bitmap: &(u32, u32)) -> (u32, u32) {
        *bitmap
    }

    fn encode_lossy(
        &self,
        _bitmap: &(u32, u32),
        width: u32,
        height: u32,
        _quality: f64,
    ) -> Result<Option<String>, PlatformError> {
        Ok(Some(format!("data:image/jpeg;base64,{width}x{height}")))
    }
}

/// Document host that records what the dispatcher does to it.
///
/// Applied operations are recorded but not executed; the content stays as
/// constructed.
pub struct RecordingDocument {
    pub state: EditorState,
    pub applied: Vec<FlowOperation>,
    pub replaced: Vec<EditorState>,
}

impl RecordingDocument {
    pub fn new(state: EditorState) -> Self {
        Self {
            state,
            applied: Vec::new(),
            replaced: Vec::new(),
        }
    }
}

impl DocumentHost for RecordingDocument {
    fn state(&self) -> &EditorState {
        &self.state
    }

    fn apply(&mut self, operation: FlowOperation) {
        self.applied.push(operation);
    }

    fn replace_state(&mut self, state: EditorState) {
        self.replaced.push(state.clone());
        self.state = state;
    }
}
