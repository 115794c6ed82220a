//! Dispatch loop: routes edit events to handlers and owns the pending
//! operation between events.
//!
//! Two states: idle, or buffering a native insertion. While buffering, typed
//! text that continues the buffer is left to the browser; anything else
//! completes the buffer into one operation first and is then handled as if
//! idle.

use std::fmt;

use crate::error::ExtractError;
use crate::handlers::{DeferredOperation, HandlerOutcome, HostEvent, InputContext};
use crate::host::EditingHost;
use crate::input::InputType;
use crate::media::MediaPlatform;
use crate::model::EditorState;
use crate::operation::FlowOperation;
use crate::pending::{PendingOperation, try_append};
use crate::registry::{InputHandler, lookup};
use crate::upload::UploadManager;

/// The document the dispatcher edits. Implemented by the host.
pub trait DocumentHost {
    /// Current editor state.
    fn state(&self) -> &EditorState;

    /// Apply a structured operation to the document.
    fn apply(&mut self, operation: FlowOperation);

    /// Swap in a new editor state (caret-only changes).
    fn replace_state(&mut self, state: EditorState);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Buffering,
}

/// An operation still being extracted, tagged with the epoch it belongs to.
pub struct DeferredEdit {
    epoch: u64,
    operation: DeferredOperation,
}

impl DeferredEdit {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The epoch and the future to drive; feed both back into
    /// [`InputDispatcher::resolve`].
    pub fn into_parts(self) -> (u64, DeferredOperation) {
        (self.epoch, self.operation)
    }
}

impl fmt::Debug for DeferredEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredEdit")
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

/// What the host should do with the browser event.
#[derive(Debug)]
pub enum DispatchResult {
    /// Not ours; leave the browser's default behavior alone.
    Ignored,
    /// The document was updated; suppress the browser's default.
    Handled,
    /// The browser performs the edit itself; do not suppress it.
    Native,
    /// Suppress the default and resolve the edit once extraction finishes.
    Deferred(DeferredEdit),
}

impl DispatchResult {
    /// Whether the host should call `preventDefault` on the event.
    pub fn prevents_default(&self) -> bool {
        matches!(self, DispatchResult::Handled | DispatchResult::Deferred(_))
    }
}

/// Drives handlers for one editing host.
#[derive(Debug)]
pub struct InputDispatcher<N> {
    pending: Option<PendingOperation<N>>,
    epoch: u64,
}

impl<N> Default for InputDispatcher<N> {
    fn default() -> Self {
        Self {
            pending: None,
            epoch: 0,
        }
    }
}

impl<N: Clone + PartialEq> InputDispatcher<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DispatchState {
        match self.pending {
            Some(_) => DispatchState::Buffering,
            None => DispatchState::Idle,
        }
    }

    pub fn pending(&self) -> Option<&PendingOperation<N>> {
        self.pending.as_ref()
    }

    /// Advanced by every event that edits the document, natively or not.
    /// Events that leave the document alone keep it.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Handle one browser edit event.
    pub fn dispatch<H, M, D>(
        &mut self,
        event: &HostEvent<H, M>,
        ctx: InputContext<'_, H, M>,
        doc: &mut D,
    ) -> DispatchResult
    where
        H: EditingHost<Node = N>,
        M: MediaPlatform,
        D: DocumentHost,
    {
        if event.is_composing {
            tracing::trace!(input_type = %event.input_type, "composition event, passing through");
            self.flush(ctx.host, doc);
            return DispatchResult::Ignored;
        }

        let Some(handler) = lookup(&event.input_type) else {
            tracing::trace!(input_type = %event.input_type, "no handler registered");
            return DispatchResult::Ignored;
        };

        if let Some(pending) = &self.pending {
            let continues = handler == InputHandler::InsertContent
                && event.input_type == InputType::InsertText
                && ctx.config.native_fast_path;
            if let Some(extended) = continues.then(|| try_append(event, pending)).flatten() {
                tracing::trace!(buffered = extended.text(), "extended pending insertion");
                self.pending = Some(extended);
                self.supersede();
                return DispatchResult::Native;
            }
            self.flush(ctx.host, doc);
        }

        let state = doc.state().clone();
        match handler.handle(event, ctx, &state, None) {
            HandlerOutcome::Noop => DispatchResult::Ignored,
            HandlerOutcome::Operation(op) => {
                tracing::debug!(%handler, ?op, "applying operation");
                doc.apply(op);
                self.supersede();
                DispatchResult::Handled
            }
            HandlerOutcome::State(next) => {
                tracing::debug!(%handler, "replacing editor state");
                doc.replace_state(next);
                self.supersede();
                DispatchResult::Handled
            }
            HandlerOutcome::Pending(pending) => {
                tracing::debug!(position = pending.position(), "buffering native insertion");
                self.pending = Some(pending);
                self.supersede();
                DispatchResult::Native
            }
            HandlerOutcome::Deferred(operation) => {
                let epoch = self.supersede();
                tracing::debug!(epoch, "deferring edit until extraction finishes");
                DispatchResult::Deferred(DeferredEdit { epoch, operation })
            }
        }
    }

    /// Complete any pending insertion into the document.
    ///
    /// The host is told about the committed text so that events mapped after
    /// this see the positions the browser's DOM already has.
    pub fn flush<H, D>(&mut self, host: &H, doc: &mut D)
    where
        H: EditingHost<Node = N>,
        D: DocumentHost,
    {
        let Some(pending) = self.pending.take() else {
            return;
        };
        match pending.complete(doc.state()) {
            Some(op) => {
                doc.apply(op);
                host.note_native_insertion(pending.run(), pending.position(), pending.text());
            }
            None => tracing::warn!(
                position = pending.position(),
                "pending insertion no longer fits the document, dropping it"
            ),
        }
    }

    /// Apply the outcome of a deferred edit.
    ///
    /// Results from an epoch other than the current one were superseded by a
    /// later edit and are discarded, along with the uploads they registered.
    /// A current result always finds the dispatcher idle, since buffering
    /// starts a new epoch. Returns whether the document changed.
    pub fn resolve<B: Clone, D: DocumentHost>(
        &mut self,
        epoch: u64,
        result: Result<Option<FlowOperation>, ExtractError>,
        uploads: &UploadManager<B>,
        doc: &mut D,
    ) -> bool {
        if epoch != self.epoch {
            tracing::debug!(epoch, current = self.epoch, "discarding stale deferred edit");
            if let Ok(Some(op)) = &result {
                release_uploads(op, uploads);
            }
            return false;
        }
        match result {
            Ok(Some(op)) => {
                tracing::debug!(?op, "applying deferred operation");
                doc.apply(op);
                true
            }
            Ok(None) => false,
            Err(err) => {
                tracing::warn!(error = %err, "dropping edit after failed extraction");
                false
            }
        }
    }

    fn supersede(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }
}

fn release_uploads<B: Clone>(op: &FlowOperation, uploads: &UploadManager<B>) {
    let content = match op {
        FlowOperation::Insert { content, .. } | FlowOperation::Replace { content, .. } => content,
        FlowOperation::Remove { .. } | FlowOperation::Format { .. } => return,
    };
    for id in content.upload_ids() {
        uploads.finish(id);
    }
}
