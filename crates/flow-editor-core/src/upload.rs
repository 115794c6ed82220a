//! Upload registry: maps opaque upload ids to the blobs being uploaded.
//!
//! Each editor constructs its own [`UploadManager`] and passes it through the
//! input context, so independent editors never share upload state.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier handed out by [`UploadManager::begin`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadId(u64);

impl UploadId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "upload-{}", self.0)
    }
}

/// A registered upload.
#[derive(Clone, Debug, PartialEq)]
pub struct Upload<B> {
    pub id: UploadId,
    pub blob: B,
}

/// Registry of in-flight uploads.
///
/// Single-threaded: input handling runs on the UI thread, so interior
/// mutability is plain `RefCell`.
pub struct UploadManager<B> {
    uploads: RefCell<HashMap<UploadId, Upload<B>>>,
    next_id: Cell<u64>,
}

impl<B> Default for UploadManager<B> {
    fn default() -> Self {
        Self {
            uploads: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
        }
    }
}

impl<B: Clone> UploadManager<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a blob and return its upload record.
    ///
    /// Registering the same blob twice yields two distinct uploads.
    pub fn begin(&self, blob: B) -> Upload<B> {
        let id = UploadId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let upload = Upload { id, blob };
        self.uploads.borrow_mut().insert(id, upload.clone());
        tracing::debug!(upload = %id, "upload registered");
        upload
    }

    pub fn get(&self, id: UploadId) -> Option<Upload<B>> {
        self.uploads.borrow().get(&id).cloned()
    }

    /// Remove a finished (or abandoned) upload.
    pub fn finish(&self, id: UploadId) -> Option<Upload<B>> {
        self.uploads.borrow_mut().remove(&id)
    }

    pub fn len(&self) -> usize {
        self.uploads.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.uploads.borrow().is_empty()
    }
}

impl<B> fmt::Debug for UploadManager<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadManager")
            .field("uploads", &self.uploads.borrow().len())
            .field("next_id", &self.next_id.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_allocates_distinct_ids() {
        let uploads = UploadManager::new();
        let a = uploads.begin("same");
        let b = uploads.begin("same");
        assert_ne!(a.id, b.id);
        assert_eq!(uploads.len(), 2);
        assert_eq!(uploads.get(a.id).map(|u| u.blob), Some("same"));
    }

    #[test]
    fn test_finish_removes() {
        let uploads = UploadManager::new();
        let upload = uploads.begin(vec![1u8, 2, 3]);
        assert_eq!(uploads.finish(upload.id), Some(upload.clone()));
        assert!(uploads.get(upload.id).is_none());
        assert!(uploads.is_empty());
    }

    #[test]
    fn test_managers_are_independent() {
        let first = UploadManager::new();
        let second = UploadManager::<&str>::new();
        let upload = first.begin("blob");
        assert!(second.get(upload.id).is_none());
    }

    #[test]
    fn test_upload_id_display() {
        assert_eq!(UploadId::from_raw(7).to_string(), "upload-7");
    }
}
