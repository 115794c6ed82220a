//! Input pipeline configuration.

use serde::Deserialize;

/// Tunables for input handling.
///
/// Every field has a default, so hosts can deserialize a partial object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InputConfig {
    /// Let the browser perform plain text insertion natively and reconcile later.
    pub native_fast_path: bool,
    /// Pixel count the placeholder preview is scaled down to.
    pub placeholder_pixel_budget: u32,
    /// Lossy encoder quality for placeholders, in `0.0..=1.0`.
    pub placeholder_quality: f64,
    /// MIME prefix identifying image files in a data transfer.
    pub image_mime_prefix: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            native_fast_path: true,
            placeholder_pixel_budget: 256,
            placeholder_quality: 0.05,
            image_mime_prefix: "image/".to_string(),
        }
    }
}

impl InputConfig {
    /// Whether a MIME type names an image under this configuration.
    pub fn is_image_mime(&self, mime_type: &str) -> bool {
        mime_type
            .to_ascii_lowercase()
            .starts_with(&self.image_mime_prefix)
    }
}
