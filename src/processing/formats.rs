//! Maps (format, compress) to encoder settings and runs the encoders.
//!
//! Conversion profiles follow the upload endpoint's quality/size trade-off;
//! canvas profiles mirror what a browser `canvas.toBlob` produces by default.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ExtendedColorType, ImageEncoder};

use crate::utils::{ConvertError, ConvertResult, TargetFormat};

// ── Quality constants ──────────────────────────────────────────────────────────────────

const JPEG_QUALITY: u8 = 92;
const JPEG_COMPRESSED_QUALITY: u8 = 82;
const WEBP_QUALITY: f32 = 92.0;
/// For lossless WebP libwebp reads quality as effort; 75 is its default
const WEBP_LOSSLESS_EFFORT: f32 = 75.0;
const CANVAS_JPEG_QUALITY: u8 = 92;
const CANVAS_WEBP_QUALITY: f32 = 80.0;

/// Encoder settings for one output file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EncodeOptions {
    Jpeg { quality: u8 },
    Png { compression: CompressionType, filter: FilterType },
    WebP { lossless: bool, quality: f32 },
}

impl EncodeOptions {
    /// Settings used by the conversion endpoint.
    ///
    /// `compress` favours smaller files: lossless WebP, lower JPEG quality,
    /// and maximum PNG deflate effort with adaptive filtering.
    pub fn for_conversion(format: TargetFormat, compress: bool) -> Self {
        match (format, compress) {
            (TargetFormat::WebP, true) => Self::WebP { lossless: true, quality: WEBP_LOSSLESS_EFFORT },
            (TargetFormat::WebP, false) => Self::WebP { lossless: false, quality: WEBP_QUALITY },
            (TargetFormat::Jpeg, true) => Self::Jpeg { quality: JPEG_COMPRESSED_QUALITY },
            (TargetFormat::Jpeg, false) => Self::Jpeg { quality: JPEG_QUALITY },
            (TargetFormat::Png, true) => Self::Png {
                compression: CompressionType::Best,
                filter: FilterType::Adaptive,
            },
            (TargetFormat::Png, false) => Self::Png {
                compression: CompressionType::Default,
                filter: FilterType::Adaptive,
            },
        }
    }

    /// Settings used when exporting an edited screenshot.
    pub fn for_canvas(format: TargetFormat) -> Self {
        match format {
            TargetFormat::WebP => Self::WebP { lossless: false, quality: CANVAS_WEBP_QUALITY },
            TargetFormat::Jpeg => Self::Jpeg { quality: CANVAS_JPEG_QUALITY },
            TargetFormat::Png => Self::Png {
                compression: CompressionType::Default,
                filter: FilterType::Adaptive,
            },
        }
    }

    pub fn format(&self) -> TargetFormat {
        match self {
            Self::Jpeg { .. } => TargetFormat::Jpeg,
            Self::Png { .. } => TargetFormat::Png,
            Self::WebP { .. } => TargetFormat::WebP,
        }
    }
}

// ── Encoders ───────────────────────────────────────────────────────────────────────────

/// Encodes `image` into an in-memory buffer using `options`.
pub fn encode_image(image: &DynamicImage, options: EncodeOptions) -> ConvertResult<Vec<u8>> {
    match options {
        EncodeOptions::Jpeg { quality } => encode_jpeg(image, quality),
        EncodeOptions::Png { compression, filter } => encode_png(image, compression, filter),
        EncodeOptions::WebP { lossless, quality } => encode_webp(image, lossless, quality),
    }
}

/// JPEG has no alpha channel; transparent pixels end up with their stored color.
fn encode_jpeg(image: &DynamicImage, quality: u8) -> ConvertResult<Vec<u8>> {
    let rgb = image.to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| ConvertError::encode(format!("JPEG encode failed: {e}")))?;
    Ok(buf)
}

fn encode_png(
    image: &DynamicImage,
    compression: CompressionType,
    filter: FilterType,
) -> ConvertResult<Vec<u8>> {
    let mut buf = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut buf, compression, filter);

    let result = if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        encoder.write_image(rgba.as_raw(), rgba.width(), rgba.height(), ExtendedColorType::Rgba8)
    } else {
        let rgb = image.to_rgb8();
        encoder.write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
    };

    result.map_err(|e| ConvertError::encode(format!("PNG encode failed: {e}")))?;
    Ok(buf)
}

/// libwebp only takes 8-bit RGB or RGBA input, at most 16383 px per side.
fn encode_webp(image: &DynamicImage, lossless: bool, quality: f32) -> ConvertResult<Vec<u8>> {
    let input = if image.color().has_alpha() {
        DynamicImage::ImageRgba8(image.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8())
    };

    let memory = webp::Encoder::from_image(&input)
        .map_err(|e| ConvertError::encode(format!("WebP encode failed: {e}")))?
        .encode_simple(lossless, quality)
        .map_err(|e| ConvertError::encode(format!("WebP encode failed: {e:?}")))?;
    Ok(memory.to_vec())
}
