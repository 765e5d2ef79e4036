use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::utils::ValidationError;

/// Output formats the service can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    #[default]
    WebP,
    Jpeg,
    Png,
}

impl TargetFormat {
    pub const ALL: [TargetFormat; 3] = [Self::WebP, Self::Jpeg, Self::Png];

    /// Lowercase name, also used as the output file extension
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WebP => "webp",
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        }
    }

    /// MIME type for the Content-Type header
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::WebP => "image/webp",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Whether the encoded output can keep an alpha channel
    pub fn supports_alpha(&self) -> bool {
        !matches!(self, Self::Jpeg)
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetFormat {
    type Err = ValidationError;

    /// Only the exact target names are accepted; `jpg` is an input extension, not a target.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "webp" => Ok(Self::WebP),
            "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            other => Err(ValidationError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Content types accepted as conversion input
pub const ACCEPTED_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

/// File extensions accepted as conversion input
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// Get the lowercase extension of a file name, if any
pub fn extension_of(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() || ext.contains('/') {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Human readable byte count: `0 B`, `512 B`, `1.5 KB`, `3.2 MB`
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let power = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let power = power.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(power as i32);

    if power == 0 {
        format!("{value:.0} {}", UNITS[power])
    } else {
        format!("{value:.1} {}", UNITS[power])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_only_target_names() {
        assert_eq!("WEBP".parse::<TargetFormat>().unwrap(), TargetFormat::WebP);
        assert_eq!("jpeg".parse::<TargetFormat>().unwrap(), TargetFormat::Jpeg);
        assert!("jpg".parse::<TargetFormat>().is_err());
        assert!("gif".parse::<TargetFormat>().is_err());
        assert!(" png".parse::<TargetFormat>().is_err());
    }

    #[test]
    fn extension_lookup() {
        assert_eq!(extension_of("shot.PNG").as_deref(), Some("png"));
        assert_eq!(extension_of("archive.tar.jpg").as_deref(), Some("jpg"));
        assert_eq!(extension_of("noext"), None);
        assert_eq!(extension_of("trailing."), None);
    }

    #[test]
    fn bytes_are_humanized() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }
}
