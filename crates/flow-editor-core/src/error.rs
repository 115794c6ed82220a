//! Error types for the fallible seams of the input pipeline.
//!
//! Nothing here crosses the dispatch boundary: the dispatcher turns every
//! error into a dropped edit and logs it.

use thiserror::Error;

/// Errors reported by a platform implementation (DOM, media decoding, canvas).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlatformError {
    /// The blob could not be decoded into a bitmap.
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// The bitmap could not be encoded to a lossy image.
    #[error("failed to encode image: {0}")]
    Encode(String),

    /// A required platform object (window, document, canvas) was missing.
    #[error("platform unavailable: {0}")]
    Unavailable(String),
}

impl From<&str> for PlatformError {
    fn from(s: &str) -> Self {
        PlatformError::Unavailable(s.to_string())
    }
}

impl From<String> for PlatformError {
    fn from(s: String) -> Self {
        PlatformError::Unavailable(s)
    }
}

/// Errors from deferred content extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExtractError {
    /// Every image in the transfer failed to decode.
    #[error("none of the {attempted} dropped images could be decoded")]
    NoDecodableImages { attempted: usize },

    /// A platform call failed outside of per-file decoding.
    #[error(transparent)]
    Platform(#[from] PlatformError),
}
