//! Download response assembly.

use axum::body::Body;
use axum::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Response};

use crate::utils::{ConvertError, ConvertResult, attachment};

/// Number of uploads dropped because of an unaccepted type
pub const SKIPPED_FILES_HEADER: &str = "x-skipped-files";
/// Source width of an edited screenshot
pub const IMAGE_WIDTH_HEADER: &str = "x-image-width";
/// Source height of an edited screenshot
pub const IMAGE_HEIGHT_HEADER: &str = "x-image-height";

/// Builds a non-cacheable attachment response.
pub fn attachment_response(
    content_type: &'static str,
    filename: &str,
    bytes: Vec<u8>,
    extra_headers: &[(&'static str, String)],
) -> ConvertResult<Response<Body>> {
    let disposition = HeaderValue::from_str(&attachment(filename))
        .map_err(|e| ConvertError::response(format!("Invalid download name '{filename}': {e}")))?;

    let mut builder = Response::builder()
        .header(CONTENT_TYPE, HeaderValue::from_static(content_type))
        .header(CONTENT_DISPOSITION, disposition)
        .header(CACHE_CONTROL, HeaderValue::from_static("no-store"));

    for (name, value) in extra_headers {
        let value = HeaderValue::from_str(value)
            .map_err(|e| ConvertError::response(format!("Invalid header {name}: {e}")))?;
        builder = builder.header(HeaderName::from_static(name), value);
    }

    builder
        .body(Body::from(bytes))
        .map_err(|e| ConvertError::response(e.to_string()))
}
