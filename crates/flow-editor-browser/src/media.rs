//! Browser media: `createImageBitmap` for decoding, a detached canvas for
//! placeholder encoding.

use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, CanvasRenderingContext2d, HtmlCanvasElement, ImageBitmap};

use flow_editor_core::{MediaPlatform, PlatformError};

/// Describe a JS exception for logs and error values.
pub(crate) fn js_error_message(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            err.dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{err:?}"))
}

async fn decode(blob: Blob) -> Result<ImageBitmap, PlatformError> {
    let window = web_sys::window().ok_or("no window")?;
    let promise = window
        .create_image_bitmap_with_blob(&blob)
        .map_err(|e| PlatformError::Decode(js_error_message(&e)))?;
    let bitmap = JsFuture::from(promise)
        .await
        .map_err(|e| PlatformError::Decode(js_error_message(&e)))?;
    bitmap
        .dyn_into::<ImageBitmap>()
        .map_err(|_| PlatformError::Decode("createImageBitmap returned a non-bitmap".into()))
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserMedia;

impl BrowserMedia {
    fn canvas(width: u32, height: u32) -> Option<HtmlCanvasElement> {
        let document = web_sys::window()?.document()?;
        let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
        canvas.set_width(width);
        canvas.set_height(height);
        Some(canvas)
    }
}

impl MediaPlatform for BrowserMedia {
    type Blob = Blob;
    type Bitmap = ImageBitmap;

    fn decode_bitmap(&self, blob: Blob) -> LocalBoxFuture<'static, Result<ImageBitmap, PlatformError>> {
        decode(blob).boxed_local()
    }

    fn bitmap_size(&self, bitmap: &ImageBitmap) -> (u32, u32) {
        (bitmap.width(), bitmap.height())
    }

    fn encode_lossy(
        &self,
        bitmap: &ImageBitmap,
        width: u32,
        height: u32,
        quality: f64,
    ) -> Result<Option<String>, PlatformError> {
        let Some(canvas) = Self::canvas(width, height) else {
            return Ok(None);
        };
        let context = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok());
        let Some(context) = context else {
            return Ok(None);
        };

        context
            .draw_image_with_image_bitmap_and_dw_and_dh(
                bitmap,
                0.0,
                0.0,
                f64::from(width),
                f64::from(height),
            )
            .map_err(|e| PlatformError::Encode(js_error_message(&e)))?;
        canvas
            .to_data_url_with_type_and_encoder_options("image/jpeg", &JsValue::from_f64(quality))
            .map(Some)
            .map_err(|e| PlatformError::Encode(js_error_message(&e)))
    }
}
