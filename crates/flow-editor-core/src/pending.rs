//! Native insertion fast path.
//!
//! For plain typing the browser is allowed to insert characters into the DOM
//! itself. The pipeline only records what was typed in a [`PendingOperation`]
//! and, once the run of keystrokes ends, turns the whole buffer into a single
//! structured insert. One keystroke-run becomes one undo step and one model
//! mutation, and spell check and IME never see the text node re-rendered
//! mid-word.

use web_time::Instant;

use crate::event::{EditEvent, TargetRange};
use crate::host::EditingHost;
use crate::model::{EditorState, FlowContent, FlowNode, StyleKey, TextStyle, Theme};
use crate::operation::{FlowOperation, FlowSelection};
use crate::selection::map_input_to_selection;
use crate::text::{is_ordinary_text, utf16_len};
use crate::types::{FlowNodeRef, FlowRange};

/// Text the browser inserted natively that the model has not seen yet.
#[derive(Clone, Debug)]
pub struct PendingOperation<N> {
    /// DOM text node the browser is typing into.
    text_node: N,
    /// Text run the text node belongs to.
    run: FlowNodeRef,
    /// Index of the text node inside the run's element.
    child_index: usize,
    /// UTF-16 offset in the text node where the buffer starts.
    text_offset: usize,
    /// Flow position of the first buffered character.
    position: usize,
    text: String,
    /// When the buffering episode started.
    started_at: Instant,
}

impl<N: PartialEq> PartialEq for PendingOperation<N> {
    fn eq(&self, other: &Self) -> bool {
        // Compare all fields except started_at
        self.text_node == other.text_node
            && self.run == other.run
            && self.child_index == other.child_index
            && self.text_offset == other.text_offset
            && self.position == other.position
            && self.text == other.text
    }
}

impl<N: PartialEq> PendingOperation<N> {
    pub fn new(
        text_node: N,
        run: FlowNodeRef,
        child_index: usize,
        text_offset: usize,
        position: usize,
        text: impl Into<String>,
    ) -> Self {
        Self {
            text_node,
            run,
            child_index,
            text_offset,
            position,
            text: text.into(),
            started_at: Instant::now(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn text_node(&self) -> &N {
        &self.text_node
    }

    pub fn run(&self) -> FlowNodeRef {
        self.run
    }

    pub fn child_index(&self) -> usize {
        self.child_index
    }

    pub fn text_offset(&self) -> usize {
        self.text_offset
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// UTF-16 offset right after the buffered text.
    pub fn end_offset(&self) -> usize {
        self.text_offset + utf16_len(&self.text)
    }

    /// Whether an insertion at `offset` in `node` continues the buffer.
    pub fn can_append_at(&self, node: &N, offset: usize) -> bool {
        self.text_node == *node && offset == self.end_offset()
    }

    /// Extend the buffer. Never touches the model.
    pub fn append(mut self, data: &str) -> Self {
        self.text.push_str(data);
        self
    }

    /// Turn the buffer into one structured insert against `state`.
    ///
    /// The text takes the style of the run it was typed into, or the caret
    /// style when that run is gone. Returns `None` if the insertion point no
    /// longer exists in `state`.
    pub fn complete(&self, state: &EditorState) -> Option<FlowOperation> {
        let style = match state.content.node(self.run.index) {
            Some(FlowNode::Text(run)) => run.style.clone(),
            _ => state.caret.clone(),
        };
        let content = FlowContent::new(vec![FlowNode::text(self.text.clone(), style)]);
        let op = FlowSelection::new(FlowRange::caret(self.position)).insert(
            content,
            &state.content,
            &state.theme,
        );
        tracing::debug!(
            position = self.position,
            chars = self.text.chars().count(),
            buffered_ms = self.started_at.elapsed().as_millis() as u64,
            completed = op.is_some(),
            "completing pending insertion"
        );
        op
    }
}

/// The typed text and caret, if the event qualifies for native insertion at
/// all: ordinary text and exactly one collapsed target range.
fn native_insertion_point<N: PartialEq, B>(
    event: &EditEvent<N, B>,
) -> Option<(&str, &TargetRange<N>)> {
    let data = event.data.as_deref().filter(|data| is_ordinary_text(data))?;
    let range = event.single_target_range()?;
    range.is_collapsed().then_some((data, range))
}

/// Extend an active pending operation with this event, if it continues it.
pub fn try_append<N: Clone + PartialEq, B>(
    event: &EditEvent<N, B>,
    pending: &PendingOperation<N>,
) -> Option<PendingOperation<N>> {
    let (data, range) = native_insertion_point(event)?;
    if !pending.can_append_at(&range.start_container, range.start_offset) {
        tracing::trace!(
            offset = range.start_offset,
            expected = pending.end_offset(),
            "insertion not contiguous with pending text"
        );
        return None;
    }
    Some(pending.clone().append(data))
}

/// Start a pending operation for this event, if the browser can be trusted
/// to perform the insertion itself.
///
/// The caret must sit in a DOM text node whose parent the rendering layer
/// maps to a text run, and the caret style must match that run, since the
/// browser will render the new characters with the run's style.
pub fn try_begin<H: EditingHost, B>(
    event: &EditEvent<H::Node, B>,
    host: &H,
    state: &EditorState,
) -> Option<PendingOperation<H::Node>> {
    let (data, range) = native_insertion_point(event)?;
    let text_node = &range.start_container;
    if !host.is_text_node(text_node) {
        tracing::trace!("caret not in a text node");
        return None;
    }
    let parent = host.parent_node(text_node)?;
    let run_ref = host.reverse_lookup(&parent)?;
    let Some(FlowNode::Text(run)) = state.content.node(run_ref.index) else {
        tracing::trace!(index = run_ref.index, "caret parent is not a text run");
        return None;
    };
    if !same_resolved_style(&run.style, &state.caret, &state.theme) {
        tracing::trace!("caret style differs from run style");
        return None;
    }
    let child_index = host.child_index(text_node)?;
    let position = map_input_to_selection(event, host)?.range().start();

    Some(PendingOperation::new(
        text_node.clone(),
        run_ref,
        child_index,
        range.start_offset,
        position,
        data,
    ))
}

fn same_resolved_style(a: &TextStyle, b: &TextStyle, theme: &Theme) -> bool {
    StyleKey::ALL
        .iter()
        .all(|key| a.resolve(*key, theme) == b.resolve(*key, theme))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::TextStyle;
    use crate::testing::{FakeHost, RUN_B, TEXT_A, TEXT_B};

    type Event = EditEvent<u32, ()>;

    fn typed(data: &str, node: u32, offset: usize) -> Event {
        Event::new("insertText")
            .with_data(data)
            .with_range(TargetRange::caret(node, offset))
    }

    #[test]
    fn test_can_append_only_when_contiguous() {
        let pending = PendingOperation::new(TEXT_A, FlowNodeRef::new(0), 0, 0, 0, "a");
        assert!(pending.can_append_at(&TEXT_A, 1));
        assert!(!pending.can_append_at(&TEXT_A, 0));
        assert!(!pending.can_append_at(&TEXT_A, 5));
        assert!(!pending.can_append_at(&TEXT_B, 1));
    }

    #[test]
    fn test_end_offset_counts_utf16() {
        let pending = PendingOperation::new(TEXT_A, FlowNodeRef::new(0), 0, 2, 2, "é日");
        assert_eq!(pending.end_offset(), 4);
    }

    #[test]
    fn test_append_extends_buffer() {
        let pending = PendingOperation::new(TEXT_A, FlowNodeRef::new(0), 0, 3, 3, "a");
        let pending = pending.append("bc");
        assert_eq!(pending.text(), "abc");
        assert_eq!(pending.position(), 3);
        assert_eq!(pending.end_offset(), 6);
    }

    #[test]
    fn test_begin_in_text_run() {
        let host = FakeHost::hello_world();
        let state = host.state();
        let pending = try_begin(&typed("x", TEXT_A, 2), &host, &state).unwrap();
        assert_eq!(pending.text(), "x");
        assert_eq!(pending.position(), 2);
        assert_eq!(pending.run(), FlowNodeRef::new(0));
        assert_eq!(pending.child_index(), 0);
        assert_eq!(pending.text_offset(), 2);
    }

    #[test]
    fn test_begin_rejects_non_text_container() {
        let host = FakeHost::hello_world();
        let state = host.state();
        assert!(try_begin(&typed("x", RUN_B, 0), &host, &state).is_none());
    }

    #[test]
    fn test_begin_rejects_style_mismatch() {
        let host = FakeHost::hello_world();
        // Second run is bold, caret is plain.
        let state = host.state();
        assert!(try_begin(&typed("x", TEXT_B, 1), &host, &state).is_none());

        let state = state.with_caret(TextStyle::default().with(StyleKey::Bold, true));
        assert!(try_begin(&typed("x", TEXT_B, 1), &host, &state).is_some());
    }

    #[test]
    fn test_begin_rejects_special_text_and_selections() {
        let host = FakeHost::hello_world();
        let state = host.state();
        assert!(try_begin(&typed("🙂", TEXT_A, 1), &host, &state).is_none());
        assert!(try_begin(&typed("", TEXT_A, 1), &host, &state).is_none());

        let spanning = Event::new("insertText")
            .with_data("x")
            .with_range(TargetRange::new(TEXT_A, 0, TEXT_A, 2));
        assert!(try_begin(&spanning, &host, &state).is_none());
    }

    #[test]
    fn test_try_append() {
        let pending = PendingOperation::new(TEXT_A, FlowNodeRef::new(0), 0, 0, 0, "a");
        let extended = try_append(&typed("b", TEXT_A, 1), &pending).unwrap();
        assert_eq!(extended.text(), "ab");
        assert!(try_append(&typed("b", TEXT_A, 5), &pending).is_none());
        assert!(try_append(&typed("\n", TEXT_A, 1), &pending).is_none());
    }

    #[test]
    fn test_complete_uses_run_style() {
        let host = FakeHost::hello_world();
        let bold = TextStyle::default().with(StyleKey::Bold, true);
        let state = host.state().with_caret(bold.clone());
        let pending = PendingOperation::new(TEXT_B, FlowNodeRef::new(1), 0, 1, 7, "xy");
        assert_eq!(
            pending.complete(&state),
            Some(FlowOperation::Insert {
                position: 7,
                content: FlowContent::new(vec![FlowNode::text("xy", bold)]),
            })
        );
    }

    #[test]
    fn test_complete_past_end_is_dropped() {
        let host = FakeHost::hello_world();
        let pending = PendingOperation::new(TEXT_A, FlowNodeRef::new(0), 0, 0, 500, "x");
        assert_eq!(pending.complete(&host.state()), None);
    }
}
