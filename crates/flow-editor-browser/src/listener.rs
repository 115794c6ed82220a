//! DOM listeners feeding an [`InputSession`].

use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::InputEvent;

use flow_editor_core::DocumentHost;

use crate::session::InputSession;

/// Listeners attached to an editing host. Dropping this detaches them.
pub struct InputListener {
    _before_input: EventListener,
    _blur: EventListener,
}

/// Attach `beforeinput` handling to the session's root element.
///
/// Losing focus ends a native insertion run, so `blur` flushes it.
pub fn attach<D: DocumentHost + 'static>(session: &Rc<InputSession<D>>) -> InputListener {
    let root = session.host().root().clone();

    let before_input = {
        let session = Rc::clone(session);
        EventListener::new_with_options(
            &root,
            "beforeinput",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let Some(event) = event.dyn_ref::<InputEvent>() else {
                    tracing::warn!(event_type = %event.type_(), "beforeinput without InputEvent");
                    return;
                };
                session.handle_event(event);
            },
        )
    };

    let blur = {
        let session = Rc::clone(session);
        EventListener::new(&root, "blur", move |_| session.flush())
    };

    tracing::debug!("input listeners attached");
    InputListener {
        _before_input: before_input,
        _blur: blur,
    }
}
