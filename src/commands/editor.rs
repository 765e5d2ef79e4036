//! `POST /api/edit`: screenshot editor export.

use axum::body::Body;
use axum::extract::Multipart;
use axum::http::Response;
use tracing::{debug, info};

use crate::core::EditorState;
use crate::utils::{ApiError, TargetFormat, ValidationError, format_bytes};

use super::response::{IMAGE_HEIGHT_HEADER, IMAGE_WIDTH_HEADER, attachment_response};

/// Applies rotation and filter to a pasted screenshot and returns the export.
///
/// # Form fields
/// * `image` - The pasted image (required)
/// * `rotation` - Clockwise degrees, default 0
/// * `filter` - Preset name or CSS filter value, default `none`
/// * `name` - Download base name, default `capture`
/// * `format` - `png` (default), `jpeg`, or `webp`
pub async fn edit_screenshot(mut multipart: Multipart) -> Result<Response<Body>, ApiError> {
    let mut state = EditorState::new();
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(ApiError::edit)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => image = Some(field.bytes().await.map_err(ApiError::edit)?),
            "rotation" | "filter" | "name" | "format" => {
                let value = field.text().await.map_err(ApiError::edit)?;
                apply_field(&mut state, &name, value).map_err(ApiError::edit)?;
            }
            other => debug!("Ignoring form field '{}'", other),
        }
    }

    let bytes = image.ok_or_else(|| ApiError::edit(ValidationError::MissingImage))?;
    debug!("Editing pasted image ({})", format_bytes(bytes.len() as u64));

    let edited = tokio::task::spawn_blocking(move || state.export_bytes(&bytes))
        .await
        .map_err(ApiError::edit)?
        .map_err(ApiError::edit)?;

    info!(
        "Exported {} ({}x{} source, {})",
        edited.filename,
        edited.source_width,
        edited.source_height,
        format_bytes(edited.bytes.len() as u64)
    );

    let extra = [
        (IMAGE_WIDTH_HEADER, edited.source_width.to_string()),
        (IMAGE_HEIGHT_HEADER, edited.source_height.to_string()),
    ];
    attachment_response(edited.mime, &edited.filename, edited.bytes, &extra).map_err(ApiError::edit)
}

fn apply_field(state: &mut EditorState, name: &str, value: String) -> Result<(), ValidationError> {
    match name {
        "rotation" => state.rotation = parse_rotation(&value)?,
        "filter" => state.set_filter(&value)?,
        "name" => state.set_name(value),
        "format" => state.set_format(value.parse::<TargetFormat>()?),
        _ => {}
    }
    Ok(())
}

/// Empty means no rotation.
fn parse_rotation(value: &str) -> Result<i32, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    value
        .parse()
        .map_err(|_| ValidationError::field("rotation", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_field_parsing() {
        assert_eq!(parse_rotation("-90").unwrap(), -90);
        assert_eq!(parse_rotation(" 450 ").unwrap(), 450);
        assert_eq!(parse_rotation("").unwrap(), 0);
        assert!(parse_rotation("ninety").is_err());
    }
}
