//! flow-editor-core: input-event interpretation for the flow editor, without
//! framework dependencies.
//!
//! This crate provides:
//! - `InputDispatcher` - routes edit events to handlers, owns the pending
//!   native insertion between keystrokes
//! - `EditingHost` / `MediaPlatform` / `DocumentHost` - seams the browser (or a
//!   test) implements
//! - Selection mapping, content extraction, style toggling - all pure
//!   functions of the event, the host and the editor state

pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod extract;
pub mod handlers;
pub mod host;
pub mod input;
pub mod media;
pub mod model;
pub mod operation;
pub mod pending;
pub mod registry;
pub mod selection;
pub mod text;
pub mod toggle;
pub mod types;
pub mod upload;

#[cfg(test)]
mod testing;

pub use config::InputConfig;
pub use dispatch::{DeferredEdit, DispatchResult, DispatchState, DocumentHost, InputDispatcher};
pub use error::{ExtractError, PlatformError};
pub use event::{DataTransfer, EditEvent, TargetRange, TransferFile};
pub use extract::{Extraction, extract_content, extract_transfer};
pub use handlers::{DeferredOperation, HandlerOutcome, InputContext};
pub use host::EditingHost;
pub use input::InputType;
#[cfg(feature = "native-media")]
pub use media::NativeMedia;
pub use media::{MediaPlatform, derive_placeholder, placeholder_scale};
pub use model::{
    Alignment, EditorState, FlowContent, FlowNode, ImageNode, ImageSource, ParagraphStyle,
    StyleKey, TextRun, TextStyle, Theme,
};
pub use operation::{FlowOperation, FlowSelection};
pub use pending::PendingOperation;
pub use registry::{InputHandler, lookup};
pub use selection::map_input_to_selection;
pub use smol_str::SmolStr;
pub use toggle::{StyleState, effective_style, toggle_style};
pub use types::{FlowNodeRef, FlowRange};
pub use upload::{Upload, UploadId, UploadManager};
