//! One editing surface: host mapping, dispatcher, document and uploads.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use web_sys::{Blob, InputEvent, Node};

use flow_editor_core::{
    DispatchResult, DocumentHost, ExtractError, FlowOperation, InputConfig, InputContext,
    InputDispatcher, UploadManager,
};

use crate::dom_map::BrowserHost;
use crate::events::edit_event_from_dom;
use crate::media::BrowserMedia;

/// Drives the core dispatcher from browser events.
///
/// The document's `apply`/`replace_state` run while the session is borrowed;
/// they must not call back into the session synchronously.
pub struct InputSession<D> {
    host: RefCell<BrowserHost>,
    media: BrowserMedia,
    uploads: Rc<UploadManager<Blob>>,
    config: InputConfig,
    dispatcher: RefCell<InputDispatcher<Node>>,
    document: RefCell<D>,
}

impl<D: DocumentHost + 'static> InputSession<D> {
    pub fn new(
        root: Node,
        document: D,
        uploads: Rc<UploadManager<Blob>>,
        config: InputConfig,
    ) -> Rc<Self> {
        Rc::new(Self {
            host: RefCell::new(BrowserHost::new(root)),
            media: BrowserMedia,
            uploads,
            config,
            dispatcher: RefCell::new(InputDispatcher::new()),
            document: RefCell::new(document),
        })
    }

    pub fn host(&self) -> Ref<'_, BrowserHost> {
        self.host.borrow()
    }

    /// For the rendering layer to update the DOM ↔ flow map after a render.
    /// Not to be held across [`handle_event`](Self::handle_event) or
    /// [`flush`](Self::flush).
    pub fn host_mut(&self) -> RefMut<'_, BrowserHost> {
        self.host.borrow_mut()
    }

    pub fn document(&self) -> Ref<'_, D> {
        self.document.borrow()
    }

    pub fn document_mut(&self) -> RefMut<'_, D> {
        self.document.borrow_mut()
    }

    pub fn uploads(&self) -> &Rc<UploadManager<Blob>> {
        &self.uploads
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// Whether a native insertion is waiting to be reconciled.
    pub fn is_buffering(&self) -> bool {
        self.dispatcher.borrow().pending().is_some()
    }

    /// Handle a `beforeinput` event.
    ///
    /// Calls `preventDefault` when the model took over the edit. Deferred
    /// edits are driven on the microtask queue and applied when they resolve,
    /// unless a later event superseded them. Returns whether the default was
    /// prevented.
    pub fn handle_event(self: &Rc<Self>, event: &InputEvent) -> bool {
        let edit = edit_event_from_dom(event);
        let result = {
            let host = self.host.borrow();
            let ctx = InputContext {
                host: &*host,
                media: &self.media,
                uploads: &self.uploads,
                config: &self.config,
            };
            let mut document = self.document.borrow_mut();
            self.dispatcher
                .borrow_mut()
                .dispatch(&edit, ctx, &mut *document)
        };

        let prevented = result.prevents_default();
        if prevented {
            event.prevent_default();
        }

        if let DispatchResult::Deferred(deferred) = result {
            let session = Rc::clone(self);
            wasm_bindgen_futures::spawn_local(async move {
                let (epoch, operation) = deferred.into_parts();
                let outcome = operation.await;
                session.resolve(epoch, outcome);
            });
        }
        prevented
    }

    /// Apply a deferred edit's outcome. Returns whether the document changed.
    pub fn resolve(&self, epoch: u64, outcome: Result<Option<FlowOperation>, ExtractError>) -> bool {
        let mut document = self.document.borrow_mut();
        self.dispatcher
            .borrow_mut()
            .resolve(epoch, outcome, &self.uploads, &mut *document)
    }

    /// Reconcile any pending native insertion now.
    pub fn flush(&self) {
        let host = self.host.borrow();
        let mut document = self.document.borrow_mut();
        self.dispatcher.borrow_mut().flush(&*host, &mut *document);
    }
}
