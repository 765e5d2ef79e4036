use tracing::warn;
use crate::core::{ConvertRequest, UploadedImage};
use crate::utils::{
    ACCEPTED_EXTENSIONS, ACCEPTED_TYPES, ConvertResult, TargetFormat, ValidationError,
    extension_of,
};

/// Default target when `targetFormat` is missing or empty
pub const DEFAULT_TARGET: &str = "webp";

/// Checks whether an upload looks like a PNG, JPEG, or WebP file.
///
/// The declared content type wins; the file extension is the fallback.
pub fn is_accepted_upload(upload: &UploadedImage) -> bool {
    if let Some(content_type) = upload.content_type.as_deref() {
        if ACCEPTED_TYPES.contains(&content_type) {
            return true;
        }
    }

    upload
        .file_name
        .as_deref()
        .and_then(extension_of)
        .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Parses the `compress` form field. Only the literal `true` enables it.
pub fn parse_compress(value: Option<&str>) -> bool {
    value == Some("true")
}

/// Parses the `targetFormat` form field. Missing or empty means webp.
pub fn parse_target_format(value: Option<&str>) -> Result<TargetFormat, ValidationError> {
    value.filter(|v| !v.is_empty()).unwrap_or(DEFAULT_TARGET).parse()
}

/// Validates the raw form values and builds a [`ConvertRequest`].
///
/// Uploads with an unaccepted type are dropped; the request fails only when
/// nothing usable is left.
pub fn validate_convert_form(
    files: Vec<UploadedImage>,
    target_format: Option<&str>,
    compress: Option<&str>,
) -> ConvertResult<ConvertRequest> {
    if files.is_empty() {
        return Err(ValidationError::NoFiles.into());
    }

    let target_format = parse_target_format(target_format)?;
    let compress = parse_compress(compress);

    let total = files.len();
    let files: Vec<_> = files.into_iter().filter(is_accepted_upload).collect();
    if files.is_empty() {
        return Err(ValidationError::NoAcceptedFiles(total).into());
    }

    let skipped = total - files.len();
    if skipped > 0 {
        warn!("Skipped {} of {} uploads with unsupported format", skipped, total);
    }

    Ok(ConvertRequest {
        files,
        target_format,
        compress,
        skipped,
    })
}
