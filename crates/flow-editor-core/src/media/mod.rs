//! Image decoding and placeholder previews.
//!
//! Placeholders are tiny lossy previews shown while an image uploads. The
//! scaling and data-URL handling live here; decoding, drawing and encoding are
//! platform media APIs behind [`MediaPlatform`].

use futures_util::future::LocalBoxFuture;

use crate::config::InputConfig;
use crate::error::PlatformError;

#[cfg(feature = "native-media")]
mod native;

#[cfg(feature = "native-media")]
pub use native::NativeMedia;

/// Platform media operations.
pub trait MediaPlatform: Clone + 'static {
    /// A file payload (`web_sys::Blob` in the browser).
    type Blob: Clone + 'static;
    /// A decoded image.
    type Bitmap: 'static;

    /// Decode a blob into a bitmap.
    fn decode_bitmap(&self, blob: Self::Blob)
    -> LocalBoxFuture<'static, Result<Self::Bitmap, PlatformError>>;

    /// Pixel dimensions of a decoded bitmap.
    fn bitmap_size(&self, bitmap: &Self::Bitmap) -> (u32, u32);

    /// Draw `bitmap` scaled to `width`×`height` and encode it as a lossy
    /// image data URL at `quality` (`0.0..=1.0`).
    ///
    /// Returns `Ok(None)` when no rendering context is available.
    fn encode_lossy(
        &self,
        bitmap: &Self::Bitmap,
        width: u32,
        height: u32,
        quality: f64,
    ) -> Result<Option<String>, PlatformError>;
}

/// Scale factor bringing `width`×`height` down to `pixel_budget` pixels.
///
/// Never upscales.
pub fn placeholder_scale(width: u32, height: u32, pixel_budget: u32) -> f64 {
    let area = f64::from(width) * f64::from(height);
    if area <= 0.0 {
        return 1.0;
    }
    (f64::from(pixel_budget) / area).sqrt().min(1.0)
}

/// Canvas size for a placeholder of a `width`×`height` image.
pub fn placeholder_size(width: u32, height: u32, pixel_budget: u32) -> (u32, u32) {
    let scale = placeholder_scale(width, height, pixel_budget);
    let scaled = |v: u32| ((f64::from(v) * scale).round() as u32).clamp(1, v.max(1));
    (scaled(width), scaled(height))
}

/// The base64 payload of a data URL, without the `data:...;base64,` header.
pub fn strip_data_url_header(data_url: &str) -> Option<&str> {
    data_url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .map(|(_, payload)| payload)
}

/// Derive a placeholder for a decoded bitmap.
///
/// `Ok(None)` means there is no placeholder (empty bitmap, or no rendering
/// context), which is not an error.
pub fn derive_placeholder<M: MediaPlatform>(
    media: &M,
    bitmap: &M::Bitmap,
    config: &InputConfig,
) -> Result<Option<String>, PlatformError> {
    let (width, height) = media.bitmap_size(bitmap);
    if width == 0 || height == 0 {
        return Ok(None);
    }
    let (target_width, target_height) =
        placeholder_size(width, height, config.placeholder_pixel_budget);
    tracing::trace!(
        width,
        height,
        target_width,
        target_height,
        "deriving placeholder"
    );
    let Some(data_url) =
        media.encode_lossy(bitmap, target_width, target_height, config.placeholder_quality)?
    else {
        tracing::debug!("no rendering context, skipping placeholder");
        return Ok(None);
    };
    Ok(strip_data_url_header(&data_url).map(str::to_string))
}
