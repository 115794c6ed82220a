//! DOM ↔ flow mapping and the browser [`EditingHost`].
//!
//! The rendering layer registers every element it renders for a flow node.
//! Text runs render as an element whose text node children hold the run's
//! text; other nodes render as a single element of length one. DOM positions
//! that fall outside registered elements (wrappers, decorations) snap to the
//! nearest registered node in the direction the edit points.

use std::cell::RefCell;

use js_sys::Map;
use wasm_bindgen::JsValue;
use web_sys::Node;

use flow_editor_core::text::utf16_to_char_offset;
use flow_editor_core::{EditingHost, FlowNodeRef, FlowRange, TargetRange};

/// Where a rendered element sits in the flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MappedNode {
    pub node: FlowNodeRef,
    /// Flow position of the node's first position.
    pub start: usize,
    pub len: usize,
}

impl MappedNode {
    pub fn new(node: FlowNodeRef, start: usize, len: usize) -> Self {
        Self { node, start, len }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Bidirectional map between rendered elements and flow nodes.
///
/// Lookups by DOM node go through a JS `Map` keyed on node identity.
pub struct DomFlowMap {
    slots: Map,
    entries: Vec<(Node, MappedNode)>,
}

impl Default for DomFlowMap {
    fn default() -> Self {
        Self {
            slots: Map::new(),
            entries: Vec::new(),
        }
    }
}

impl DomFlowMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `element` renders `mapped`. Re-registering an element
    /// replaces its entry.
    pub fn register(&mut self, element: &Node, mapped: MappedNode) {
        match self.slot(element) {
            Some(slot) => self.entries[slot] = (element.clone(), mapped),
            None => {
                self.slots
                    .set(element, &JsValue::from_f64(self.entries.len() as f64));
                self.entries.push((element.clone(), mapped));
            }
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, element: &Node) -> Option<MappedNode> {
        self.slot(element).map(|slot| self.entries[slot].1)
    }

    /// The element rendered for `node`.
    pub fn element(&self, node: FlowNodeRef) -> Option<&Node> {
        self.entries
            .iter()
            .find(|(_, mapped)| mapped.node == node)
            .map(|(element, _)| element)
    }

    fn slot(&self, element: &Node) -> Option<usize> {
        self.slots
            .get(element)
            .as_f64()
            .map(|slot| slot as usize)
            .filter(|slot| *slot < self.entries.len())
    }
}

/// Text typed natively and committed since the map was last rendered.
#[derive(Clone, Copy, Debug)]
struct TypedText {
    run: FlowNodeRef,
    position: usize,
    chars: usize,
}

/// The contenteditable root plus its flow map.
pub struct BrowserHost {
    root: Node,
    map: DomFlowMap,
    typed: RefCell<Vec<TypedText>>,
}

impl BrowserHost {
    pub fn new(root: Node) -> Self {
        Self {
            root,
            map: DomFlowMap::new(),
            typed: RefCell::new(Vec::new()),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn map(&self) -> &DomFlowMap {
        &self.map
    }

    /// For the rendering layer. The registered layout is taken as current,
    /// so natively typed text noted so far is forgotten.
    pub fn map_mut(&mut self) -> &mut DomFlowMap {
        self.typed.get_mut().clear();
        &mut self.map
    }

    /// Registered entry for `element`, moved along by committed typing.
    fn mapped(&self, element: &Node) -> Option<MappedNode> {
        let mut mapped = self.map.get(element)?;
        for typed in self.typed.borrow().iter() {
            if mapped.node == typed.run {
                mapped.len += typed.chars;
            } else if mapped.start >= typed.position {
                mapped.start += typed.chars;
            }
        }
        Some(mapped)
    }

    fn map_position(&self, container: &Node, offset: usize, backward: bool) -> Option<usize> {
        if !self.root.contains(Some(container)) {
            tracing::debug!("range container outside editing host");
            return None;
        }

        if container.node_type() == Node::TEXT_NODE {
            let parent = container.parent_node()?;
            if let Some(mapped) = self.mapped(&parent) {
                let text = container.text_content().unwrap_or_default();
                let inner = utf16_to_char_offset(&text, offset)?;
                let before = preceding_text_chars(container);
                return Some(mapped.start + (before + inner).min(mapped.len));
            }
            // Text outside any flow node: treat as a boundary next to it.
            let index = child_index_of(container);
            let edge = if backward { index } else { index + 1 };
            return self.boundary_position(&parent, edge, backward);
        }

        if let Some(mapped) = self.mapped(container) {
            let children = container.child_nodes();
            if offset == 0 {
                return Some(mapped.start);
            }
            if offset as u32 >= children.length() {
                return Some(mapped.end());
            }
            let chars: usize = (0..offset as u32)
                .filter_map(|i| children.item(i))
                .map(|child| child.text_content().unwrap_or_default().chars().count())
                .sum();
            return Some(mapped.start + chars.min(mapped.len));
        }

        self.boundary_position(container, offset, backward)
    }

    /// Flow position of the boundary before child `offset` of an unmapped
    /// element.
    fn boundary_position(&self, parent: &Node, offset: usize, backward: bool) -> Option<usize> {
        let children = parent.child_nodes();
        let count = children.length() as usize;

        let before = || {
            (0..offset.min(count))
                .rev()
                .filter_map(|i| children.item(i as u32))
                .find_map(|child| self.last_end(&child))
        };
        let after = || {
            (offset..count)
                .filter_map(|i| children.item(i as u32))
                .find_map(|child| self.first_start(&child))
        };

        let snapped = if backward {
            before().or_else(after)
        } else {
            after().or_else(before)
        };
        if snapped.is_some() {
            return snapped;
        }

        if parent == &self.root {
            // Nothing rendered at all: the empty document.
            return self.map.is_empty().then_some(0);
        }
        let grandparent = parent.parent_node()?;
        let index = child_index_of(parent);
        let edge = if backward { index } else { index + 1 };
        self.boundary_position(&grandparent, edge, backward)
    }

    fn first_start(&self, node: &Node) -> Option<usize> {
        if let Some(mapped) = self.mapped(node) {
            return Some(mapped.start);
        }
        let children = node.child_nodes();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .find_map(|child| self.first_start(&child))
    }

    fn last_end(&self, node: &Node) -> Option<usize> {
        if let Some(mapped) = self.mapped(node) {
            return Some(mapped.end());
        }
        let children = node.child_nodes();
        (0..children.length())
            .rev()
            .filter_map(|i| children.item(i))
            .find_map(|child| self.last_end(&child))
    }
}

impl EditingHost for BrowserHost {
    type Node = Node;

    fn map_range_to_flow(&self, range: &TargetRange<Node>, backward: bool) -> Option<FlowRange> {
        let start = self.map_position(&range.start_container, range.start_offset, backward)?;
        let end = if range.is_collapsed() {
            start
        } else {
            self.map_position(&range.end_container, range.end_offset, backward)?
        };
        Some(FlowRange::new(start, end))
    }

    fn reverse_lookup(&self, node: &Node) -> Option<FlowNodeRef> {
        self.map.get(node).map(|mapped| mapped.node)
    }

    fn is_text_node(&self, node: &Node) -> bool {
        node.node_type() == Node::TEXT_NODE
    }

    fn parent_node(&self, node: &Node) -> Option<Node> {
        node.parent_node()
    }

    fn child_index(&self, node: &Node) -> Option<usize> {
        node.parent_node().map(|_| child_index_of(node))
    }

    fn note_native_insertion(&self, run: FlowNodeRef, position: usize, text: &str) {
        let chars = text.chars().count();
        tracing::trace!(run = run.index, position, chars, "noting native insertion");
        self.typed.borrow_mut().push(TypedText {
            run,
            position,
            chars,
        });
    }
}

fn child_index_of(node: &Node) -> usize {
    let mut index = 0;
    let mut sibling = node.previous_sibling();
    while let Some(current) = sibling {
        index += 1;
        sibling = current.previous_sibling();
    }
    index
}

/// Characters in the text siblings before `node` inside the same element.
fn preceding_text_chars(node: &Node) -> usize {
    let mut chars = 0;
    let mut sibling = node.previous_sibling();
    while let Some(current) = sibling {
        chars += current.text_content().unwrap_or_default().chars().count();
        sibling = current.previous_sibling();
    }
    chars
}
