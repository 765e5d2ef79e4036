//! Core types for conversion requests and results.

use crate::utils::{ARCHIVE_NAME, TargetFormat};

/// One file part taken from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Client-side file name, if the part carried one
    pub file_name: Option<String>,
    /// Declared content type of the part
    pub content_type: Option<String>,
    /// Raw file bytes
    pub bytes: Vec<u8>,
}

/// A parsed conversion request.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    /// Accepted uploads in form order
    pub files: Vec<UploadedImage>,
    /// Requested output format
    pub target_format: TargetFormat,
    /// Prefer smaller output over speed
    pub compress: bool,
    /// Number of uploads dropped because of their type
    pub skipped: usize,
}

/// One converted file, ready to download or archive.
#[derive(Debug, Clone)]
pub struct ConvertedImage {
    /// Sanitised output name including extension
    pub filename: String,
    /// Encoded bytes
    pub bytes: Vec<u8>,
    /// Size of the upload that produced this file
    pub original_size: u64,
}

impl ConvertedImage {
    /// Bytes saved relative to the upload (negative if the file grew)
    pub fn saved_bytes(&self) -> i64 {
        self.original_size as i64 - self.bytes.len() as i64
    }
}

/// Response payload for a conversion.
#[derive(Debug, Clone)]
pub enum ConversionOutput {
    /// Exactly one input: the converted file itself
    Single {
        filename: String,
        mime: &'static str,
        bytes: Vec<u8>,
    },
    /// Several inputs: a zip archive of all converted files
    Archive { bytes: Vec<u8> },
}

impl ConversionOutput {
    pub fn filename(&self) -> &str {
        match self {
            Self::Single { filename, .. } => filename,
            Self::Archive { .. } => ARCHIVE_NAME,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Single { mime, .. } => mime,
            Self::Archive { .. } => "application/zip",
        }
    }

    /// Size of the payload in bytes
    pub fn byte_len(&self) -> usize {
        match self {
            Self::Single { bytes, .. } | Self::Archive { bytes } => bytes.len(),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Single { bytes, .. } | Self::Archive { bytes } => bytes,
        }
    }
}
