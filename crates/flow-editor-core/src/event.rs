//! Platform-neutral snapshot of a browser edit (`beforeinput`) event.
//!
//! `N` is the host's node handle (`web_sys::Node` in the browser), `B` its
//! blob type. The browser crate builds these from `InputEvent`; tests build
//! them directly.

use crate::input::InputType;

/// A DOM range the browser reports as affected by an edit.
///
/// Offsets follow DOM rules: UTF-16 code units inside text nodes, child
/// indices inside elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRange<N> {
    pub start_container: N,
    pub start_offset: usize,
    pub end_container: N,
    pub end_offset: usize,
}

impl<N: PartialEq> TargetRange<N> {
    pub fn new(start_container: N, start_offset: usize, end_container: N, end_offset: usize) -> Self {
        Self {
            start_container,
            start_offset,
            end_container,
            end_offset,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start_container == self.end_container && self.start_offset == self.end_offset
    }
}

impl<N: Clone + PartialEq> TargetRange<N> {
    /// A collapsed range at `offset` inside `container`.
    pub fn caret(container: N, offset: usize) -> Self {
        Self::new(container.clone(), offset, container, offset)
    }
}

/// A file carried by a data transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFile<B> {
    pub mime_type: String,
    pub blob: B,
}

impl<B> TransferFile<B> {
    pub fn new(mime_type: impl Into<String>, blob: B) -> Self {
        Self {
            mime_type: mime_type.into(),
            blob,
        }
    }
}

/// Payload of a paste or drop.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTransfer<B> {
    /// File items, in transfer-item order.
    pub files: Vec<TransferFile<B>>,
    /// The `text/plain` payload, if present.
    pub text: Option<String>,
}

impl<B> Default for DataTransfer<B> {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            text: None,
        }
    }
}

impl<B> DataTransfer<B> {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            files: Vec::new(),
            text: Some(text.into()),
        }
    }

    pub fn with_files(files: Vec<TransferFile<B>>) -> Self {
        Self { files, text: None }
    }
}

/// An edit event as seen by the input pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct EditEvent<N, B> {
    pub input_type: InputType,
    pub data: Option<String>,
    pub data_transfer: Option<DataTransfer<B>>,
    pub target_ranges: Vec<TargetRange<N>>,
    /// Whether the event belongs to an IME composition session.
    pub is_composing: bool,
}

impl<N, B> EditEvent<N, B> {
    pub fn new(input_type: impl Into<InputType>) -> Self {
        Self {
            input_type: input_type.into(),
            data: None,
            data_transfer: None,
            target_ranges: Vec::new(),
            is_composing: false,
        }
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_transfer(mut self, transfer: DataTransfer<B>) -> Self {
        self.data_transfer = Some(transfer);
        self
    }

    pub fn with_range(mut self, range: TargetRange<N>) -> Self {
        self.target_ranges.push(range);
        self
    }

    pub fn composing(mut self, is_composing: bool) -> Self {
        self.is_composing = is_composing;
        self
    }

    /// The only target range, if there is exactly one.
    pub fn single_target_range(&self) -> Option<&TargetRange<N>> {
        match self.target_ranges.as_slice() {
            [range] => Some(range),
            _ => None,
        }
    }
}
