//! Screenshot editor state and export.

use image::DynamicImage;
use tracing::debug;

use crate::processing::canvas::{normalize_rotation, render};
use crate::processing::filters::FilterChain;
use crate::processing::{EncodeOptions, decode_oriented, encode_image};
use crate::utils::{
    ConvertResult, DEFAULT_CAPTURE_NAME, TargetFormat, ValidationError, editor_download_name,
};

/// Rotation applied by a single left/right step
pub const ROTATION_STEP: i32 = 90;

/// Everything the editor needs to reproduce an export.
///
/// `rotation` accumulates raw steps; use [`EditorState::displayed_rotation`]
/// for the normalized angle.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub rotation: i32,
    pub filter: FilterChain,
    pub name: String,
    pub format: TargetFormat,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            rotation: 0,
            filter: FilterChain::none(),
            name: DEFAULT_CAPTURE_NAME.to_string(),
            format: TargetFormat::Png,
        }
    }
}

/// Result of exporting an edited screenshot.
#[derive(Debug, Clone)]
pub struct EditedImage {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
    /// Dimensions of the source before rotation
    pub source_width: u32,
    pub source_height: u32,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rotate_left(&mut self) {
        self.rotation -= ROTATION_STEP;
    }

    pub fn rotate_right(&mut self) {
        self.rotation += ROTATION_STEP;
    }

    pub fn displayed_rotation(&self) -> i32 {
        normalize_rotation(self.rotation)
    }

    /// Selects a filter by preset name or CSS value.
    pub fn set_filter(&mut self, filter: &str) -> Result<(), ValidationError> {
        self.filter = FilterChain::resolve(filter)?;
        Ok(())
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_format(&mut self, format: TargetFormat) {
        self.format = format;
    }

    /// Back to rotation 0, no filter, `capture.png`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn download_name(&self) -> String {
        editor_download_name(&self.name, self.format)
    }

    /// Renders `image` with the current rotation and filter, then encodes it.
    pub fn export(&self, image: &DynamicImage) -> ConvertResult<EditedImage> {
        let canvas = render(image, self.rotation, &self.filter);
        debug!(
            "Rendered {}x{} canvas (rotation {} deg, filter '{}')",
            canvas.width(),
            canvas.height(),
            self.displayed_rotation(),
            self.filter.as_css()
        );

        let bytes = encode_image(
            &DynamicImage::ImageRgba8(canvas),
            EncodeOptions::for_canvas(self.format),
        )?;

        Ok(EditedImage {
            filename: self.download_name(),
            mime: self.format.mime_type(),
            bytes,
            source_width: image.width(),
            source_height: image.height(),
        })
    }

    /// Decodes pasted bytes and exports them. Runs on the blocking pool.
    pub fn export_bytes(&self, bytes: &[u8]) -> ConvertResult<EditedImage> {
        let image = decode_oriented(bytes)?;
        self.export(&image)
    }
}
