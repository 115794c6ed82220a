//! `image`-crate media backend for hosts without a browser canvas.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use futures_util::FutureExt;
use futures_util::future::{self, LocalBoxFuture};
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;

use super::MediaPlatform;
use crate::error::PlatformError;

/// Decodes with `image` and encodes placeholders as JPEG.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeMedia;

impl MediaPlatform for NativeMedia {
    type Blob = Bytes;
    type Bitmap = DynamicImage;

    fn decode_bitmap(
        &self,
        blob: Self::Blob,
    ) -> LocalBoxFuture<'static, Result<Self::Bitmap, PlatformError>> {
        let decoded =
            image::load_from_memory(&blob).map_err(|e| PlatformError::Decode(e.to_string()));
        future::ready(decoded).boxed_local()
    }

    fn bitmap_size(&self, bitmap: &Self::Bitmap) -> (u32, u32) {
        (bitmap.width(), bitmap.height())
    }

    fn encode_lossy(
        &self,
        bitmap: &Self::Bitmap,
        width: u32,
        height: u32,
        quality: f64,
    ) -> Result<Option<String>, PlatformError> {
        let scaled = bitmap.resize_exact(width, height, FilterType::Triangle).to_rgb8();
        let quality = (quality * 100.0).round().clamp(1.0, 100.0) as u8;

        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, quality)
            .encode_image(&scaled)
            .map_err(|e| PlatformError::Encode(e.to_string()))?;

        Ok(Some(format!(
            "data:image/jpeg;base64,{}",
            STANDARD.encode(&buf)
        )))
    }
}
