//! Structured flow content: text runs, breaks and embedded media.
//!
//! The content is immutable once built. Editing happens by producing a
//! [`FlowOperation`](crate::FlowOperation) that the host applies to its own
//! document; this crate only reads the model to decide which operation to emit.

use std::ops::Range;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::upload::UploadId;

/// A toggleable character style property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleKey {
    Bold,
    Italic,
    Underline,
    Strike,
}

impl StyleKey {
    pub const ALL: [StyleKey; 4] = [
        StyleKey::Bold,
        StyleKey::Italic,
        StyleKey::Underline,
        StyleKey::Strike,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StyleKey::Bold => "bold",
            StyleKey::Italic => "italic",
            StyleKey::Underline => "underline",
            StyleKey::Strike => "strike",
        }
    }
}

/// Character style with explicit (`Some`) or inherited (`None`) values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strike: Option<bool>,
}

impl TextStyle {
    /// Explicit value for `key`, if any.
    pub fn get(&self, key: StyleKey) -> Option<bool> {
        match key {
            StyleKey::Bold => self.bold,
            StyleKey::Italic => self.italic,
            StyleKey::Underline => self.underline,
            StyleKey::Strike => self.strike,
        }
    }

    pub fn set(&mut self, key: StyleKey, value: Option<bool>) {
        let slot = match key {
            StyleKey::Bold => &mut self.bold,
            StyleKey::Italic => &mut self.italic,
            StyleKey::Underline => &mut self.underline,
            StyleKey::Strike => &mut self.strike,
        };
        *slot = value;
    }

    pub fn with(mut self, key: StyleKey, value: bool) -> Self {
        self.set(key, Some(value));
        self
    }

    /// Effective value of `key`: explicit value, else the theme default, else off.
    pub fn resolve(&self, key: StyleKey, theme: &Theme) -> bool {
        self.get(key)
            .or_else(|| theme.text.get(key))
            .unwrap_or(false)
    }

    /// Drop explicit values that match what the theme would resolve anyway.
    pub fn without_theme_defaults(&self, theme: &Theme) -> Self {
        let mut style = self.clone();
        for key in StyleKey::ALL {
            if let Some(value) = self.get(key) {
                if value == theme.text.get(key).unwrap_or(false) {
                    style.set(key, None);
                }
            }
        }
        style
    }
}

/// Style resolution context for effective style values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Default character style; unset keys resolve to off.
    pub text: TextStyle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    Start,
    Center,
    End,
    Justify,
}

/// Paragraph-level style, carried by the break that terminates a paragraph.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    /// Named paragraph variant (heading, quote, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<SmolStr>,
}

/// Source of an embedded image: an upload plus a tiny preview.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSource {
    pub upload: UploadId,
    pub width: u32,
    pub height: u32,
    /// Base64 payload of a heavily downsampled lossy preview, without the
    /// data-URL header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub style: TextStyle,
}

impl TextRun {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageNode {
    pub source: ImageSource,
    pub style: TextStyle,
}

/// A node of the flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FlowNode {
    Text(TextRun),
    LineBreak { style: TextStyle },
    ParagraphBreak { style: ParagraphStyle },
    Image(ImageNode),
}

impl FlowNode {
    pub fn text(text: impl Into<String>, style: TextStyle) -> Self {
        FlowNode::Text(TextRun::new(text, style))
    }

    /// Number of flow positions this node occupies.
    pub fn len(&self) -> usize {
        match self {
            FlowNode::Text(run) => run.text.chars().count(),
            FlowNode::LineBreak { .. } | FlowNode::ParagraphBreak { .. } | FlowNode::Image(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Character style of the node, for nodes that have one.
    pub fn text_style(&self) -> Option<&TextStyle> {
        match self {
            FlowNode::Text(run) => Some(&run.style),
            FlowNode::LineBreak { style } => Some(style),
            FlowNode::Image(image) => Some(&image.style),
            FlowNode::ParagraphBreak { .. } => None,
        }
    }

    fn map_text_style(self, f: impl FnOnce(&TextStyle) -> TextStyle) -> Self {
        match self {
            FlowNode::Text(run) => FlowNode::Text(TextRun {
                style: f(&run.style),
                text: run.text,
            }),
            FlowNode::LineBreak { style } => FlowNode::LineBreak { style: f(&style) },
            FlowNode::Image(image) => FlowNode::Image(ImageNode {
                style: f(&image.style),
                source: image.source,
            }),
            node @ FlowNode::ParagraphBreak { .. } => node,
        }
    }
}

/// An immutable sequence of flow nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowContent {
    nodes: Vec<FlowNode>,
}

impl FlowContent {
    pub fn new(nodes: Vec<FlowNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[FlowNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&FlowNode> {
        self.nodes.get(index)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total length in flow positions.
    pub fn len(&self) -> usize {
        self.nodes.iter().map(FlowNode::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(FlowNode::is_empty)
    }

    /// Flow position where the node at `index` starts.
    pub fn node_start(&self, index: usize) -> Option<usize> {
        if index >= self.nodes.len() {
            return None;
        }
        Some(self.nodes[..index].iter().map(FlowNode::len).sum())
    }

    /// Find the node containing `position`, with the offset inside it.
    ///
    /// A position on a boundary belongs to the node that starts there. The
    /// end of the content resolves to the end of the last node.
    pub fn locate(&self, position: usize) -> Option<(usize, usize)> {
        let mut start = 0;
        for (index, node) in self.nodes.iter().enumerate() {
            let end = start + node.len();
            if position < end {
                return Some((index, position - start));
            }
            start = end;
        }
        if position == start && !self.nodes.is_empty() {
            let last = self.nodes.len() - 1;
            return Some((last, self.nodes[last].len()));
        }
        None
    }

    /// Style of the paragraph enclosing `position`.
    ///
    /// That is the style of the first paragraph break at or after the
    /// position; an unterminated trailing paragraph gets the default.
    pub fn paragraph_style_at(&self, position: usize) -> ParagraphStyle {
        let mut start = 0;
        for node in &self.nodes {
            let end = start + node.len();
            if let FlowNode::ParagraphBreak { style } = node {
                if position < end {
                    return style.clone();
                }
            }
            start = end;
        }
        ParagraphStyle::default()
    }

    /// Character styles overlapping `range`, each with the number of
    /// positions it covers. Paragraph breaks carry no character style and are
    /// skipped.
    pub fn styled_spans(&self, range: Range<usize>) -> Vec<(&TextStyle, usize)> {
        let mut spans = Vec::new();
        let mut start = 0;
        for node in &self.nodes {
            let end = start + node.len();
            let overlap = end.min(range.end).saturating_sub(start.max(range.start));
            if overlap > 0 {
                if let Some(style) = node.text_style() {
                    spans.push((style, overlap));
                }
            }
            if end >= range.end {
                break;
            }
            start = end;
        }
        spans
    }

    /// Copy with every explicit style value the theme already implies removed.
    pub fn without_theme_defaults(&self, theme: &Theme) -> Self {
        let nodes = self
            .nodes
            .iter()
            .cloned()
            .map(|node| node.map_text_style(|style| style.without_theme_defaults(theme)))
            .collect();
        Self { nodes }
    }

    /// Uploads referenced by image nodes, in order.
    pub fn upload_ids(&self) -> impl Iterator<Item = UploadId> + '_ {
        self.nodes.iter().filter_map(|node| match node {
            FlowNode::Image(image) => Some(image.source.upload),
            _ => None,
        })
    }
}

impl From<Vec<FlowNode>> for FlowContent {
    fn from(nodes: Vec<FlowNode>) -> Self {
        Self::new(nodes)
    }
}

impl FromIterator<FlowNode> for FlowContent {
    fn from_iter<I: IntoIterator<Item = FlowNode>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Snapshot of the editor the host owns.
///
/// Cloning is cheap; the pipeline never mutates a state, it only derives
/// operations or replacement snapshots.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditorState {
    pub content: Arc<FlowContent>,
    /// Style that newly typed text adopts.
    pub caret: TextStyle,
    pub theme: Arc<Theme>,
}

impl EditorState {
    pub fn new(content: FlowContent) -> Self {
        Self {
            content: Arc::new(content),
            caret: TextStyle::default(),
            theme: Arc::new(Theme::default()),
        }
    }

    pub fn with_caret(mut self, caret: TextStyle) -> Self {
        self.caret = caret;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Arc::new(theme);
        self
    }
}
