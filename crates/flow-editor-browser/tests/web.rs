//! WASM browser tests for flow-editor-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

use std::rc::Rc;

use js_sys::{Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{Document, HtmlElement, ImageBitmap, InputEvent, InputEventInit, Node};

wasm_bindgen_test_configure!(run_in_browser);

use flow_editor_browser::{
    BrowserHost, BrowserMedia, InputSession, MappedNode, StaticRange, config_from_js,
    edit_event_from_dom,
};
use flow_editor_core::{
    DocumentHost, EditingHost, EditorState, FlowContent, FlowNode, FlowNodeRef, FlowOperation,
    FlowRange, InputConfig, InputType, MediaPlatform, StyleKey, TargetRange, TextStyle,
    UploadManager, derive_placeholder,
};

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

/// `"hello "` plain, `"world"` bold.
fn content() -> FlowContent {
    FlowContent::new(vec![
        FlowNode::text("hello ", TextStyle::default()),
        FlowNode::text("world", TextStyle::default().with(StyleKey::Bold, true)),
    ])
}

struct Rendered {
    root: HtmlElement,
    runs: Vec<Node>,
    texts: Vec<Node>,
    decoration: Node,
}

/// Render each run as a span, with an unmapped decoration between them.
fn render(host_content: &FlowContent) -> (Rendered, BrowserHost) {
    let doc = document();
    let root: HtmlElement = doc.create_element("div").unwrap().unchecked_into();
    root.set_attribute("contenteditable", "true").unwrap();
    doc.body().unwrap().append_child(&root).unwrap();

    let mut host = BrowserHost::new(root.clone().into());
    let mut runs = Vec::new();
    let mut texts = Vec::new();
    let decoration: Node = doc.create_element("span").unwrap().into();
    decoration
        .append_child(&doc.create_text_node("·"))
        .unwrap();

    let mut start = 0;
    for (index, node) in host_content.nodes().iter().enumerate() {
        if index == 1 {
            root.append_child(&decoration).unwrap();
        }
        let span: Node = doc.create_element("span").unwrap().into();
        if let FlowNode::Text(run) = node {
            let text: Node = doc.create_text_node(&run.text).into();
            span.append_child(&text).unwrap();
            texts.push(text);
        }
        root.append_child(&span).unwrap();
        host.map_mut()
            .register(&span, MappedNode::new(FlowNodeRef::new(index), start, node.len()));
        start += node.len();
        runs.push(span);
    }

    (
        Rendered {
            root,
            runs,
            texts,
            decoration,
        },
        host,
    )
}

struct TestDocument {
    state: EditorState,
    applied: Vec<FlowOperation>,
}

impl DocumentHost for TestDocument {
    fn state(&self) -> &EditorState {
        &self.state
    }

    fn apply(&mut self, operation: FlowOperation) {
        self.applied.push(operation);
    }

    fn replace_state(&mut self, state: EditorState) {
        self.state = state;
    }
}

fn input_event(input_type: &str, data: Option<&str>) -> InputEvent {
    let init = InputEventInit::new();
    init.set_input_type(input_type);
    init.set_data(data);
    init.set_cancelable(true);
    InputEvent::new_with_event_init_dict("beforeinput", &init).unwrap()
}

fn static_range(start: &Node, start_offset: u32, end: &Node, end_offset: u32) -> StaticRange {
    let init = Object::new();
    Reflect::set(&init, &"startContainer".into(), start).unwrap();
    Reflect::set(&init, &"startOffset".into(), &start_offset.into()).unwrap();
    Reflect::set(&init, &"endContainer".into(), end).unwrap();
    Reflect::set(&init, &"endOffset".into(), &end_offset.into()).unwrap();
    StaticRange::new(&init)
}

// === Event conversion ===

#[wasm_bindgen_test]
fn test_event_conversion() {
    let event = input_event("insertText", Some("a"));
    let edit = edit_event_from_dom(&event);
    assert_eq!(edit.input_type, InputType::InsertText);
    assert_eq!(edit.data.as_deref(), Some("a"));
    assert!(edit.data_transfer.is_none());
    assert!(edit.target_ranges.is_empty());
    assert!(!edit.is_composing);
}

#[wasm_bindgen_test]
fn test_event_conversion_unknown_type() {
    let edit = edit_event_from_dom(&input_event("insertFromTelepathy", None));
    match edit.input_type {
        InputType::Unknown(s) => assert_eq!(s, "insertFromTelepathy"),
        other => panic!("Expected Unknown variant, got {other:?}"),
    }
}

#[wasm_bindgen_test]
fn test_static_range_to_target_range() {
    let (dom, _host) = render(&content());
    let range = static_range(&dom.texts[0], 1, &dom.texts[1], 2);
    let target = TargetRange::from(&range);
    assert_eq!(target.start_container, dom.texts[0]);
    assert_eq!(target.start_offset, 1);
    assert_eq!(target.end_container, dom.texts[1]);
    assert_eq!(target.end_offset, 2);
}

// === DOM mapping ===

#[wasm_bindgen_test]
fn test_map_text_offsets() {
    let (dom, host) = render(&content());
    let range = TargetRange::new(dom.texts[0].clone(), 2, dom.texts[1].clone(), 3);
    assert_eq!(
        host.map_range_to_flow(&range, false),
        Some(FlowRange::new(2, 9))
    );
}

#[wasm_bindgen_test]
fn test_map_element_offsets() {
    let (dom, host) = render(&content());
    let start = TargetRange::caret(dom.runs[1].clone(), 0);
    let end = TargetRange::caret(dom.runs[1].clone(), 1);
    assert_eq!(host.map_range_to_flow(&start, false), Some(FlowRange::caret(6)));
    assert_eq!(host.map_range_to_flow(&end, false), Some(FlowRange::caret(11)));
}

#[wasm_bindgen_test]
fn test_unmapped_decoration_snaps() {
    let (dom, host) = render(&content());
    let inside = dom.decoration.first_child().unwrap();
    let caret = TargetRange::caret(inside, 1);
    assert_eq!(host.map_range_to_flow(&caret, true), Some(FlowRange::caret(6)));
    assert_eq!(host.map_range_to_flow(&caret, false), Some(FlowRange::caret(6)));

    let root: Node = dom.root.clone().into();
    let end = TargetRange::caret(root, 3);
    assert_eq!(host.map_range_to_flow(&end, true), Some(FlowRange::caret(11)));
}

#[wasm_bindgen_test]
fn test_outside_root_is_unmappable() {
    let (_dom, host) = render(&content());
    let stray: Node = document().create_text_node("stray").into();
    assert_eq!(host.map_range_to_flow(&TargetRange::caret(stray, 0), false), None);
}

#[wasm_bindgen_test]
fn test_committed_typing_moves_later_positions() {
    let (dom, mut host) = render(&content());
    // The browser typed "abc" at the end of the first run.
    dom.texts[0].set_text_content(Some("hello abc"));
    host.note_native_insertion(FlowNodeRef::new(0), 6, "abc");

    let typed = TargetRange::new(dom.texts[0].clone(), 8, dom.texts[0].clone(), 9);
    assert_eq!(host.map_range_to_flow(&typed, true), Some(FlowRange::new(8, 9)));
    let world = TargetRange::new(dom.texts[1].clone(), 0, dom.texts[1].clone(), 1);
    assert_eq!(host.map_range_to_flow(&world, false), Some(FlowRange::new(9, 10)));
    let end = TargetRange::caret(dom.runs[1].clone(), 1);
    assert_eq!(host.map_range_to_flow(&end, false), Some(FlowRange::caret(14)));

    // A render re-registers the layout, which then already holds the text.
    host.map_mut()
        .register(&dom.runs[1], MappedNode::new(FlowNodeRef::new(1), 9, 5));
    assert_eq!(host.map_range_to_flow(&world, false), Some(FlowRange::new(9, 10)));
}

#[wasm_bindgen_test]
fn test_reverse_lookup_and_tree_queries() {
    let (dom, host) = render(&content());
    assert_eq!(host.reverse_lookup(&dom.runs[1]), Some(FlowNodeRef::new(1)));
    assert_eq!(host.reverse_lookup(&dom.decoration), None);
    assert!(host.is_text_node(&dom.texts[0]));
    assert!(!host.is_text_node(&dom.runs[0]));
    assert_eq!(host.parent_node(&dom.texts[1]), Some(dom.runs[1].clone()));
    assert_eq!(host.child_index(&dom.runs[1]), Some(2));
    assert_eq!(host.map().element(FlowNodeRef::new(0)), Some(&dom.runs[0]));
}

// === Session ===

#[wasm_bindgen_test]
fn test_session_leaves_unmapped_events_alone() {
    let (dom, host) = render(&content());
    let session = InputSession::new(
        dom.root.clone().into(),
        TestDocument {
            state: EditorState::new(content()),
            applied: Vec::new(),
        },
        Rc::new(UploadManager::new()),
        InputConfig::default(),
    );
    *session.host_mut() = host;

    let event = input_event("historyUndo", None);
    assert!(!session.handle_event(&event));
    assert!(!event.default_prevented());

    // Synthetic events carry no target ranges, so nothing can be mapped.
    let event = input_event("insertText", Some("x"));
    assert!(!session.handle_event(&event));
    assert!(!session.is_buffering());
    session.flush();
    assert!(session.document().applied.is_empty());
}

// === Config ===

#[wasm_bindgen_test]
fn test_config_from_js() {
    let value = Object::new();
    Reflect::set(&value, &"nativeFastPath".into(), &JsValue::FALSE).unwrap();
    Reflect::set(&value, &"placeholderPixelBudget".into(), &JsValue::from(64)).unwrap();
    let config = config_from_js(value.into()).unwrap();
    assert!(!config.native_fast_path);
    assert_eq!(config.placeholder_pixel_budget, 64);
    assert_eq!(config.image_mime_prefix, "image/");

    assert_eq!(config_from_js(JsValue::UNDEFINED).unwrap(), InputConfig::default());
    assert!(config_from_js(JsValue::from_str("nope")).is_err());
}

// === Media ===

async fn bitmap(width: u32, height: u32) -> ImageBitmap {
    let canvas: web_sys::HtmlCanvasElement =
        document().create_element("canvas").unwrap().unchecked_into();
    canvas.set_width(width);
    canvas.set_height(height);
    let promise = web_sys::window()
        .unwrap()
        .create_image_bitmap_with_html_canvas_element(&canvas)
        .unwrap();
    JsFuture::from(promise).await.unwrap().unchecked_into()
}

#[wasm_bindgen_test]
async fn test_placeholder_from_canvas() {
    let bitmap = bitmap(1000, 1000).await;
    assert_eq!(BrowserMedia.bitmap_size(&bitmap), (1000, 1000));

    let placeholder = derive_placeholder(&BrowserMedia, &bitmap, &InputConfig::default())
        .unwrap()
        .unwrap();
    assert!(!placeholder.is_empty());
    assert!(!placeholder.starts_with("data:"));
}

#[wasm_bindgen_test]
async fn test_decode_rejects_non_image() {
    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str("not an image"));
    let blob = web_sys::Blob::new_with_str_sequence(&parts).unwrap();
    assert!(BrowserMedia.decode_bitmap(blob).await.is_err());
}
