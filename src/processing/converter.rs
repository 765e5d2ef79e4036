//! Batch converter for uploaded images.
//!
//! Each upload is decoded and re-encoded inside `tokio::task::spawn_blocking`
//! so the async runtime is never blocked. Uploads are independent, so all of
//! them are dispatched at once and joined in upload order.

use std::io::Cursor;

use futures::future::try_join_all;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader};
use tracing::{debug, info};

use crate::core::{ConvertRequest, ConvertedImage, UploadedImage};
use crate::utils::{ConvertError, ConvertResult, TargetFormat, converted_name, format_bytes};

use super::formats::{EncodeOptions, encode_image};

/// Converts every upload of a request to one target format.
#[derive(Debug, Clone, Copy)]
pub struct BatchConverter {
    options: EncodeOptions,
}

impl BatchConverter {
    pub fn new(format: TargetFormat, compress: bool) -> Self {
        Self {
            options: EncodeOptions::for_conversion(format, compress),
        }
    }

    pub fn for_request(request: &ConvertRequest) -> Self {
        Self::new(request.target_format, request.compress)
    }

    pub fn format(&self) -> TargetFormat {
        self.options.format()
    }

    /// Converts all `files` concurrently. Results keep upload order; the
    /// first failing upload fails the whole batch.
    pub async fn execute_batch(
        &self,
        files: Vec<UploadedImage>,
    ) -> ConvertResult<Vec<ConvertedImage>> {
        let total = files.len();
        debug!("Converting {} uploads to {}", total, self.format());

        let handles = files.into_iter().enumerate().map(|(index, upload)| {
            let converter = *self;
            tokio::task::spawn_blocking(move || converter.convert_single(&upload, index))
        });

        let results = try_join_all(handles).await?;
        let converted = results.into_iter().collect::<ConvertResult<Vec<_>>>()?;

        let input: u64 = converted.iter().map(|c| c.original_size).sum();
        let output: u64 = converted.iter().map(|c| c.bytes.len() as u64).sum();
        info!(
            "Converted {} images to {} ({} -> {})",
            total,
            self.format(),
            format_bytes(input),
            format_bytes(output)
        );

        Ok(converted)
    }

    /// Converts one upload synchronously. Runs on the blocking pool.
    pub fn convert_single(&self, upload: &UploadedImage, index: usize) -> ConvertResult<ConvertedImage> {
        let filename = converted_name(upload.file_name.as_deref(), index, self.format());
        let image = decode_oriented(&upload.bytes)?;

        debug!("Decoded '{}': {}x{}", filename, image.width(), image.height());

        let bytes = encode_image(&image, self.options)?;
        let converted = ConvertedImage {
            filename,
            original_size: upload.bytes.len() as u64,
            bytes,
        };

        debug!(
            "'{}' -> {} bytes saved ({} -> {})",
            converted.filename,
            converted.saved_bytes(),
            format_bytes(converted.original_size),
            format_bytes(converted.bytes.len() as u64)
        );

        Ok(converted)
    }
}

/// Decodes image bytes and applies the EXIF orientation, so the output is
/// upright and needs no orientation tag.
pub fn decode_oriented(bytes: &[u8]) -> ConvertResult<DynamicImage> {
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ConvertError::decode(format!("Cannot read input: {e}")))?
        .into_decoder()
        .map_err(|e| ConvertError::decode(format!("Unsupported image data: {e}")))?;

    // Missing or unreadable EXIF simply means no rotation.
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);

    let mut image = DynamicImage::from_decoder(decoder)
        .map_err(|e| ConvertError::decode(format!("Failed to decode image: {e}")))?;
    image.apply_orientation(orientation);
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    /// A 16x8 JPEG, red left half, whose EXIF says "rotate 90 degrees
    /// clockwise to display".
    fn jpeg_rotated_by_exif() -> Vec<u8> {
        let img = RgbImage::from_fn(16, 8, |x, _| {
            if x < 8 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) }
        });
        let mut jpeg = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .unwrap();

        #[rustfmt::skip]
        let app1: &[u8] = &[
            0xFF, 0xE1, 0x00, 0x22,
            b'E', b'x', b'i', b'f', 0x00, 0x00,
            // Big-endian TIFF header, first IFD at offset 8
            b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08,
            // One entry: Orientation (0x0112), SHORT, count 1, value 6
            0x00, 0x01,
            0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01, 0x00, 0x06, 0x00, 0x00,
            // No next IFD
            0x00, 0x00, 0x00, 0x00,
        ];
        // Right after SOI, ahead of any JFIF segment
        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(app1);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    fn png_upload(name: Option<&str>, width: u32, height: u32) -> UploadedImage {
        let img = RgbImage::from_pixel(width, height, Rgb([200, 10, 10]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        UploadedImage {
            file_name: name.map(str::to_string),
            content_type: Some("image/png".to_string()),
            bytes,
        }
    }

    #[tokio::test]
    async fn batch_keeps_upload_order() {
        let files = vec![
            png_upload(Some("first.png"), 4, 3),
            png_upload(None, 2, 2),
            png_upload(Some("third shot.png"), 5, 1),
        ];
        let converted = BatchConverter::new(TargetFormat::Jpeg, true)
            .execute_batch(files)
            .await
            .unwrap();

        let names: Vec<_> = converted.iter().map(|c| c.filename.as_str()).collect();
        assert_eq!(names, vec!["first.jpeg", "image-2.jpeg", "third-shot.jpeg"]);

        let decoded = image::load_from_memory(&converted[2].bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (5, 1));
    }

    #[tokio::test]
    async fn undecodable_upload_fails_the_batch() {
        let mut bad = png_upload(Some("bad.png"), 1, 1);
        bad.bytes = b"definitely not an image".to_vec();
        let files = vec![png_upload(Some("ok.png"), 1, 1), bad];

        let err = BatchConverter::new(TargetFormat::Png, false)
            .execute_batch(files)
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::Decode(_)));
    }

    #[test]
    fn exif_orientation_is_applied() {
        let image = decode_oriented(&jpeg_rotated_by_exif()).unwrap();
        assert_eq!((image.width(), image.height()), (8, 16));

        // The red left half ends up on top after a clockwise turn
        let top = image.to_rgb8().get_pixel(4, 2).0;
        assert!(top[0] > 150 && top[2] < 100, "top pixel was {top:?}");
    }

    #[tokio::test]
    async fn converted_output_is_upright() {
        let upload = UploadedImage {
            file_name: Some("phone.jpg".to_string()),
            content_type: Some("image/jpeg".to_string()),
            bytes: jpeg_rotated_by_exif(),
        };
        let converted = BatchConverter::new(TargetFormat::Png, false)
            .execute_batch(vec![upload])
            .await
            .unwrap();

        assert_eq!(converted[0].filename, "phone.png");
        let decoded = image::load_from_memory(&converted[0].bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 16));
    }
}
