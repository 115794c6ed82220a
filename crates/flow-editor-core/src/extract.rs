//! Content extractor: what an insertion event wants to insert.
//!
//! Text, breaks and plain-text transfers resolve immediately. Image transfers
//! need their bitmaps decoded for placeholders, so they resolve later through
//! a deferred value the dispatcher hands to the host.

use std::fmt;
use std::rc::Rc;

use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;

use crate::config::InputConfig;
use crate::error::ExtractError;
use crate::event::{DataTransfer, EditEvent};
use crate::input::InputType;
use crate::media::{MediaPlatform, derive_placeholder};
use crate::model::{FlowContent, FlowNode, ImageNode, ImageSource, ParagraphStyle, TextStyle};
use crate::text::normalize_text;
use crate::upload::{Upload, UploadManager};

/// Result of content extraction.
pub enum Extraction {
    /// Content is known now; `None` means there is nothing to insert.
    Ready(Option<FlowContent>),
    /// Content needs asynchronous work (image decoding) first.
    Deferred(LocalBoxFuture<'static, Result<FlowContent, ExtractError>>),
}

impl fmt::Debug for Extraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extraction::Ready(content) => f.debug_tuple("Ready").field(content).finish(),
            Extraction::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl Extraction {
    fn none() -> Self {
        Extraction::Ready(None)
    }

    fn node(node: FlowNode) -> Self {
        Extraction::Ready(Some(FlowContent::new(vec![node])))
    }
}

/// Input types whose payload is extracted from `data` or the data transfer.
fn carries_payload(input_type: &InputType) -> bool {
    matches!(
        input_type,
        InputType::InsertFromPaste
            | InputType::InsertFromPasteAsQuotation
            | InputType::InsertFromDrop
            | InputType::InsertTranspose
            | InputType::InsertReplacementText
            | InputType::InsertFromYank
            | InputType::InsertText
            | InputType::InsertCompositionText
            | InputType::InsertFromComposition
    )
}

/// Extract the content an insertion event wants to insert, styled with the
/// caret style.
pub fn extract_content<M: MediaPlatform, N>(
    event: &EditEvent<N, M::Blob>,
    caret: &TextStyle,
    uploads: &Rc<UploadManager<M::Blob>>,
    media: &M,
    config: &InputConfig,
) -> Extraction {
    match &event.input_type {
        InputType::InsertParagraph => Extraction::node(FlowNode::ParagraphBreak {
            style: ParagraphStyle::default(),
        }),
        InputType::InsertLineBreak => Extraction::node(FlowNode::LineBreak {
            style: caret.clone(),
        }),
        input_type if carries_payload(input_type) => {
            if let Some(transfer) = &event.data_transfer {
                extract_transfer(transfer, caret, uploads, media, config)
            } else if let Some(data) = event.data.as_deref().filter(|d| !d.is_empty()) {
                Extraction::node(FlowNode::text(data, caret.clone()))
            } else {
                Extraction::none()
            }
        }
        _ => Extraction::none(),
    }
}

/// Extract content from a paste or drop payload.
///
/// Image files win over text. Every image is registered with the upload
/// manager right away, in item order; decoding happens in the deferred value.
pub fn extract_transfer<M: MediaPlatform>(
    transfer: &DataTransfer<M::Blob>,
    caret: &TextStyle,
    uploads: &Rc<UploadManager<M::Blob>>,
    media: &M,
    config: &InputConfig,
) -> Extraction {
    let images: Vec<Upload<M::Blob>> = transfer
        .files
        .iter()
        .filter(|file| config.is_image_mime(&file.mime_type))
        .map(|file| uploads.begin(file.blob.clone()))
        .collect();

    if !images.is_empty() {
        tracing::debug!(count = images.len(), "extracting images from transfer");
        return Extraction::Deferred(
            image_content(
                images,
                caret.clone(),
                Rc::clone(uploads),
                media.clone(),
                config.clone(),
            )
            .boxed_local(),
        );
    }

    match transfer.text.as_deref().map(normalize_text) {
        Some(text) if !text.is_empty() => Extraction::node(FlowNode::text(text, caret.clone())),
        _ => Extraction::none(),
    }
}

/// Decode each registered image and build its node.
///
/// Files are independent: one that fails to decode is dropped (and its
/// upload released) while the others are kept.
async fn image_content<M: MediaPlatform>(
    images: Vec<Upload<M::Blob>>,
    caret: TextStyle,
    uploads: Rc<UploadManager<M::Blob>>,
    media: M,
    config: InputConfig,
) -> Result<FlowContent, ExtractError> {
    let attempted = images.len();
    let mut nodes = Vec::with_capacity(attempted);

    for upload in images {
        let bitmap = match media.decode_bitmap(upload.blob).await {
            Ok(bitmap) => bitmap,
            Err(err) => {
                tracing::warn!(upload = %upload.id, error = %err, "dropping undecodable image");
                uploads.finish(upload.id);
                continue;
            }
        };
        let (width, height) = media.bitmap_size(&bitmap);
        let placeholder = derive_placeholder(&media, &bitmap, &config).unwrap_or_else(|err| {
            tracing::warn!(upload = %upload.id, error = %err, "placeholder failed");
            None
        });
        nodes.push(FlowNode::Image(ImageNode {
            source: ImageSource {
                upload: upload.id,
                width,
                height,
                placeholder,
            },
            style: caret.clone(),
        }));
    }

    if nodes.is_empty() {
        return Err(ExtractError::NoDecodableImages { attempted });
    }
    Ok(FlowContent::new(nodes))
}
