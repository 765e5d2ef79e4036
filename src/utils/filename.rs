//! Download file name handling.

use crate::utils::TargetFormat;

/// Name of the archive returned for multi-file conversions
pub const ARCHIVE_NAME: &str = "converted-images.zip";

/// Default base name for editor exports
pub const DEFAULT_CAPTURE_NAME: &str = "capture";

/// Drops the final `.ext` of a file name. A trailing dot or a dot inside a
/// directory component is not an extension.
fn strip_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) => {
            let ext = &filename[idx + 1..];
            if ext.is_empty() || ext.contains('/') {
                filename
            } else {
                &filename[..idx]
            }
        }
        None => filename,
    }
}

/// Reduces `stem` to `[A-Za-z0-9_-]`, collapsing runs of `-` and trimming
/// one dash from each end. Falls back when nothing usable is left.
pub fn sanitize_stem(stem: &str, fallback: &str) -> String {
    let mut cleaned = String::with_capacity(stem.len());
    for c in stem.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' };
        if c == '-' && cleaned.ends_with('-') {
            continue;
        }
        cleaned.push(c);
    }

    let cleaned = cleaned.strip_prefix('-').unwrap_or(&cleaned);
    let cleaned = cleaned.strip_suffix('-').unwrap_or(cleaned);

    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Safe base name for a converted upload, without extension.
pub fn sanitize_basename(filename: Option<&str>, fallback: &str) -> String {
    let raw = filename.map(strip_extension).unwrap_or_default();
    let raw = if raw.is_empty() { fallback } else { raw };
    sanitize_stem(raw, fallback)
}

/// Output name for a converted upload at position `index` (0-based).
pub fn converted_name(filename: Option<&str>, index: usize, format: TargetFormat) -> String {
    let fallback = format!("image-{}", index + 1);
    format!("{}.{}", sanitize_basename(filename, &fallback), format)
}

/// Download name for an editor export.
pub fn editor_download_name(name: &str, format: TargetFormat) -> String {
    format!("{}.{}", sanitize_stem(name, DEFAULT_CAPTURE_NAME), format)
}

/// Content-Disposition value for a download.
pub fn attachment(filename: &str) -> String {
    format!("attachment; filename=\"{filename}\"")
}

/// Extracts the file name from a Content-Disposition header.
///
/// The RFC 5987 `filename*=UTF-8''...` form wins over plain `filename=`.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    let lower = header.to_ascii_lowercase();

    const EXTENDED: &str = "filename*=utf-8''";
    if let Some(start) = lower.find(EXTENDED) {
        let value = &header[start + EXTENDED.len()..];
        let value = value.split(';').next().unwrap_or_default();
        if !value.is_empty() {
            if let Some(decoded) = percent_decode(value) {
                return Some(decoded);
            }
        }
    }

    const SIMPLE: &str = "filename=";
    let start = lower.find(SIMPLE)?;
    let value = &header[start + SIMPLE.len()..];
    let value = value.strip_prefix('"').unwrap_or(value);
    let end = value.find(['"', ';']).unwrap_or(value.len());
    let value = &value[..end];

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn percent_decode(value: &str) -> Option<String> {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = value.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basename_is_sanitized() {
        assert_eq!(sanitize_basename(Some("My Screenshot (1).png"), "x"), "My-Screenshot-1");
        assert_eq!(sanitize_basename(Some("photo.final.JPG"), "x"), "photo-final");
        assert_eq!(sanitize_basename(Some("--a__b--.webp"), "x"), "a__b");
        assert_eq!(sanitize_basename(Some("Résumé.png"), "x"), "R-sum");
    }

    #[test]
    fn basename_falls_back() {
        assert_eq!(sanitize_basename(None, "image-1"), "image-1");
        assert_eq!(sanitize_basename(Some(".png"), "image-2"), "image-2");
        assert_eq!(sanitize_basename(Some("###.png"), "image-3"), "image-3");
        assert_eq!(sanitize_basename(Some(""), "image-4"), "image-4");
    }

    #[test]
    fn trailing_dot_is_not_an_extension() {
        assert_eq!(sanitize_basename(Some("a.b."), "x"), "a-b");
        assert_eq!(sanitize_basename(Some("dir.v2/file"), "x"), "dir-v2-file");
    }

    #[test]
    fn converted_names_use_position_fallback() {
        assert_eq!(converted_name(None, 0, TargetFormat::WebP), "image-1.webp");
        assert_eq!(converted_name(Some("?.png"), 2, TargetFormat::Jpeg), "image-3.jpeg");
        assert_eq!(converted_name(Some("cat.png"), 5, TargetFormat::Png), "cat.png");
    }

    #[test]
    fn editor_names_keep_dots_as_dashes() {
        assert_eq!(editor_download_name("capture", TargetFormat::Png), "capture.png");
        assert_eq!(editor_download_name("", TargetFormat::WebP), "capture.webp");
        assert_eq!(editor_download_name("v1.2 notes", TargetFormat::Jpeg), "v1-2-notes.jpeg");
    }

    #[test]
    fn disposition_parsing() {
        assert_eq!(
            filename_from_disposition(&attachment("cat.webp")).as_deref(),
            Some("cat.webp")
        );
        assert_eq!(
            filename_from_disposition("attachment; filename=plain.png; size=3").as_deref(),
            Some("plain.png")
        );
        assert_eq!(
            filename_from_disposition("attachment; filename*=UTF-8''na%C3%AFve%20cat.png")
                .as_deref(),
            Some("naïve cat.png")
        );
        assert_eq!(filename_from_disposition("inline"), None);
    }
}
