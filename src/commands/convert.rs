//! `POST /api/convert`: batch format conversion.

use axum::body::Body;
use axum::extract::Multipart;
use axum::http::Response;
use tracing::{debug, info};

use crate::core::UploadedImage;
use crate::processing::{BatchConverter, package};
use crate::utils::{ApiError, format_bytes, validate_convert_form};

use super::response::{SKIPPED_FILES_HEADER, attachment_response};

/// Converts the uploaded `files` to `targetFormat`.
///
/// One accepted file is returned directly; several are returned as
/// `converted-images.zip`.
///
/// # Form fields
/// * `files` - One part per image, repeated
/// * `targetFormat` - `webp` (default), `jpeg`, or `png`
/// * `compress` - `true` to favour smaller output
pub async fn convert_images(mut multipart: Multipart) -> Result<Response<Body>, ApiError> {
    let mut files = Vec::new();
    let mut target_format: Option<String> = None;
    let mut compress: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "files" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?.to_vec();
                files.push(UploadedImage {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            // First value wins when a field is repeated
            "targetFormat" if target_format.is_none() => target_format = Some(field.text().await?),
            "compress" if compress.is_none() => compress = Some(field.text().await?),
            other => debug!("Ignoring form field '{}'", other),
        }
    }

    let total_bytes: usize = files.iter().map(|f| f.bytes.len()).sum();
    debug!("Received {} uploads ({})", files.len(), format_bytes(total_bytes as u64));

    let request = validate_convert_form(files, target_format.as_deref(), compress.as_deref())?;
    let skipped = request.skipped;
    let converter = BatchConverter::for_request(&request);
    let format = converter.format();

    let converted = converter.execute_batch(request.files).await?;
    let output = tokio::task::spawn_blocking(move || package(converted, format)).await??;

    info!("Sending {} ({})", output.filename(), format_bytes(output.byte_len() as u64));

    let filename = output.filename().to_string();
    let content_type = output.content_type();
    let extra = if skipped > 0 {
        vec![(SKIPPED_FILES_HEADER, skipped.to_string())]
    } else {
        Vec::new()
    };

    Ok(attachment_response(content_type, &filename, output.into_bytes(), &extra)?)
}
