//! Input handlers.
//!
//! A handler is a pure function of the event, the editing host, the current
//! editor state and the pending operation (if any). Handlers keep no state
//! between events; continuity lives in the pending operation the dispatcher
//! threads through.

use std::fmt;
use std::rc::Rc;

use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;

use crate::config::InputConfig;
use crate::error::ExtractError;
use crate::event::EditEvent;
use crate::extract::{Extraction, extract_content};
use crate::host::EditingHost;
use crate::input::InputType;
use crate::media::MediaPlatform;
use crate::model::{EditorState, FlowContent, FlowNode};
use crate::operation::{FlowOperation, FlowSelection};
use crate::pending::{PendingOperation, try_append, try_begin};
use crate::registry::InputHandler;
use crate::selection::map_input_to_selection;
use crate::toggle::toggle_style_outcome;
use crate::upload::UploadManager;

/// Services a handler may call into.
pub struct InputContext<'a, H: EditingHost, M: MediaPlatform> {
    pub host: &'a H,
    pub media: &'a M,
    pub uploads: &'a Rc<UploadManager<M::Blob>>,
    pub config: &'a InputConfig,
}

impl<H: EditingHost, M: MediaPlatform> Clone for InputContext<'_, H, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H: EditingHost, M: MediaPlatform> Copy for InputContext<'_, H, M> {}

/// The edit event type a context accepts.
pub type HostEvent<H, M> =
    EditEvent<<H as EditingHost>::Node, <M as MediaPlatform>::Blob>;

/// A structured operation that is only known once async extraction finishes.
pub type DeferredOperation = LocalBoxFuture<'static, Result<Option<FlowOperation>, ExtractError>>;

/// What a handler produced.
pub enum HandlerOutcome<N> {
    /// Nothing to do; leave the browser's native behavior alone.
    Noop,
    /// Apply this operation.
    Operation(FlowOperation),
    /// Replace the editor state (caret-only changes).
    State(EditorState),
    /// The browser performs the edit natively; track it.
    Pending(PendingOperation<N>),
    /// The operation resolves later.
    Deferred(DeferredOperation),
}

impl<N: fmt::Debug> fmt::Debug for HandlerOutcome<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerOutcome::Noop => f.write_str("Noop"),
            HandlerOutcome::Operation(op) => f.debug_tuple("Operation").field(op).finish(),
            HandlerOutcome::State(state) => f.debug_tuple("State").field(state).finish(),
            HandlerOutcome::Pending(pending) => f.debug_tuple("Pending").field(pending).finish(),
            HandlerOutcome::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl<N> From<Option<FlowOperation>> for HandlerOutcome<N> {
    fn from(op: Option<FlowOperation>) -> Self {
        op.map_or(HandlerOutcome::Noop, HandlerOutcome::Operation)
    }
}

impl InputHandler {
    /// Run this handler.
    pub fn handle<H: EditingHost, M: MediaPlatform>(
        &self,
        event: &HostEvent<H, M>,
        ctx: InputContext<'_, H, M>,
        state: &EditorState,
        pending: Option<&PendingOperation<H::Node>>,
    ) -> HandlerOutcome<H::Node> {
        match self {
            InputHandler::DeleteSelection => delete_selection(event, ctx.host),
            InputHandler::ToggleStyle(key) => toggle_style_outcome(*key, event, ctx.host, state),
            InputHandler::InsertContent if event.input_type == InputType::InsertText => {
                try_insert_text(event, ctx, state, pending)
            }
            InputHandler::InsertContent => insert_content(event, ctx, state),
            InputHandler::InsertParagraph => insert_paragraph(event, ctx, state),
        }
    }
}

/// Remove whatever the target range covers.
pub fn delete_selection<H: EditingHost, B>(
    event: &EditEvent<H::Node, B>,
    host: &H,
) -> HandlerOutcome<H::Node> {
    map_input_to_selection(event, host)
        .and_then(|selection| selection.remove())
        .into()
}

/// Insert the event's extracted content over the target range.
pub fn insert_content<H: EditingHost, M: MediaPlatform>(
    event: &HostEvent<H, M>,
    ctx: InputContext<'_, H, M>,
    state: &EditorState,
) -> HandlerOutcome<H::Node> {
    insert_with(event, ctx, state, |content, _| content)
}

/// Insert a paragraph break that keeps the enclosing paragraph's style, so
/// both halves of the split paragraph look the same.
pub fn insert_paragraph<H: EditingHost, M: MediaPlatform>(
    event: &HostEvent<H, M>,
    ctx: InputContext<'_, H, M>,
    state: &EditorState,
) -> HandlerOutcome<H::Node> {
    let target = state.content.clone();
    insert_with(event, ctx, state, move |content, selection| {
        let style = target.paragraph_style_at(selection.range().start());
        content
            .nodes()
            .iter()
            .cloned()
            .map(|node| match node {
                FlowNode::ParagraphBreak { .. } => FlowNode::ParagraphBreak {
                    style: style.clone(),
                },
                other => other,
            })
            .collect()
    })
}

/// Typed text: buffer it natively when possible, otherwise insert it.
///
/// With a pending operation the event must continue it exactly; without one
/// the caret must sit in a text run the browser can extend. Anything else
/// falls back to [`insert_content`].
pub fn try_insert_text<H: EditingHost, M: MediaPlatform>(
    event: &HostEvent<H, M>,
    ctx: InputContext<'_, H, M>,
    state: &EditorState,
    pending: Option<&PendingOperation<H::Node>>,
) -> HandlerOutcome<H::Node> {
    if ctx.config.native_fast_path {
        let native = match pending {
            Some(pending) => try_append(event, pending),
            None => try_begin(event, ctx.host, state),
        };
        if let Some(pending) = native {
            return HandlerOutcome::Pending(pending);
        }
    }
    insert_content(event, ctx, state)
}

fn insert_with<H, M, F>(
    event: &HostEvent<H, M>,
    ctx: InputContext<'_, H, M>,
    state: &EditorState,
    shape: F,
) -> HandlerOutcome<H::Node>
where
    H: EditingHost,
    M: MediaPlatform,
    F: FnOnce(FlowContent, &FlowSelection) -> FlowContent + 'static,
{
    // Resolve the range first so unmappable events never register uploads.
    let Some(selection) = map_input_to_selection(event, ctx.host) else {
        return HandlerOutcome::Noop;
    };

    match extract_content(event, &state.caret, ctx.uploads, ctx.media, ctx.config) {
        Extraction::Ready(None) => HandlerOutcome::Noop,
        Extraction::Ready(Some(content)) => selection
            .insert(shape(content, &selection), &state.content, &state.theme)
            .into(),
        Extraction::Deferred(content) => {
            let target = state.content.clone();
            let theme = state.theme.clone();
            let uploads = Rc::clone(ctx.uploads);
            HandlerOutcome::Deferred(
                content
                    .map(move |content| {
                        content.map(|content| {
                            let content = shape(content, &selection);
                            let op = selection.insert(content.clone(), &target, &theme);
                            if op.is_none() {
                                // Nothing will reference these images.
                                for id in content.upload_ids() {
                                    uploads.finish(id);
                                }
                            }
                            op
                        })
                    })
                    .boxed_local(),
            )
        }
    }
}
