//! Browser event extraction for the `beforeinput` event.
//!
//! Converts a `web_sys::InputEvent` into the platform-neutral
//! [`EditEvent`] the core dispatcher consumes.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, InputEvent, Node};

use flow_editor_core::{DataTransfer, EditEvent, InputType, TargetRange, TransferFile};

/// Edit event as seen in the browser.
pub type DomEditEvent = EditEvent<Node, Blob>;

// === StaticRange binding ===
//
// Custom wasm_bindgen binding for StaticRange since web-sys doesn't expose it.
// StaticRange is returned by InputEvent.getTargetRanges() and represents
// a fixed range that doesn't update when the DOM changes.

#[wasm_bindgen]
extern "C" {
    /// The StaticRange interface represents a static range of text in the DOM.
    pub type StaticRange;

    #[wasm_bindgen(constructor)]
    pub fn new(init: &js_sys::Object) -> StaticRange;

    #[wasm_bindgen(method, getter, structural)]
    pub fn startContainer(this: &StaticRange) -> Node;

    #[wasm_bindgen(method, getter, structural)]
    pub fn startOffset(this: &StaticRange) -> u32;

    #[wasm_bindgen(method, getter, structural)]
    pub fn endContainer(this: &StaticRange) -> Node;

    #[wasm_bindgen(method, getter, structural)]
    pub fn endOffset(this: &StaticRange) -> u32;

    #[wasm_bindgen(method, getter, structural)]
    pub fn collapsed(this: &StaticRange) -> bool;
}

impl From<&StaticRange> for TargetRange<Node> {
    fn from(range: &StaticRange) -> Self {
        TargetRange::new(
            range.startContainer(),
            range.startOffset() as usize,
            range.endContainer(),
            range.endOffset() as usize,
        )
    }
}

/// All target ranges of the event, in browser order.
pub fn target_ranges_from_event(event: &InputEvent) -> Vec<TargetRange<Node>> {
    event
        .get_target_ranges()
        .iter()
        .map(|range| TargetRange::from(range.unchecked_ref::<StaticRange>()))
        .collect()
}

/// Files and plain text carried by a paste or drop.
pub fn transfer_from_dom(transfer: &web_sys::DataTransfer) -> DataTransfer<Blob> {
    let mut files = Vec::new();
    if let Some(list) = transfer.files() {
        for index in 0..list.length() {
            if let Some(file) = list.get(index) {
                let mime_type = file.type_();
                files.push(TransferFile::new(mime_type, Blob::from(file)));
            }
        }
    }

    let text = transfer
        .get_data("text/plain")
        .ok()
        .filter(|text| !text.is_empty());

    DataTransfer { files, text }
}

/// Snapshot a `beforeinput` event.
pub fn edit_event_from_dom(event: &InputEvent) -> DomEditEvent {
    let mut edit = EditEvent::new(InputType::parse(&event.input_type()));
    edit.data = event.data();
    edit.data_transfer = event.data_transfer().as_ref().map(transfer_from_dom);
    edit.target_ranges = target_ranges_from_event(event);
    edit.is_composing = event.is_composing();
    tracing::trace!(
        input_type = %edit.input_type,
        ranges = edit.target_ranges.len(),
        composing = edit.is_composing,
        "captured beforeinput"
    );
    edit
}
