//! Packages converted images into a single download.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::core::{ConversionOutput, ConvertedImage};
use crate::utils::{ConvertError, ConvertResult, TargetFormat, format_bytes};

/// Turns converted images into the response payload.
///
/// One image is returned as-is; several are zipped.
pub fn package(
    mut items: Vec<ConvertedImage>,
    format: TargetFormat,
) -> ConvertResult<ConversionOutput> {
    match items.len() {
        0 => Err(ConvertError::Io("no converted images to package".to_string())),
        1 => {
            let item = items.remove(0);
            Ok(ConversionOutput::Single {
                filename: item.filename,
                mime: format.mime_type(),
                bytes: item.bytes,
            })
        }
        _ => Ok(ConversionOutput::Archive { bytes: zip_images(&items)? }),
    }
}

/// Writes every item into a DEFLATE zip archive held in memory.
pub fn zip_images(items: &[ConvertedImage]) -> ConvertResult<Vec<u8>> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let mut used = HashSet::with_capacity(items.len());

    for item in items {
        let name = unique_entry_name(&item.filename, &mut used);
        zip.start_file(name, options)?;
        zip.write_all(&item.bytes)?;
    }

    let bytes = zip.finish()?.into_inner();
    debug!("Packaged {} images into {}", items.len(), format_bytes(bytes.len() as u64));
    Ok(bytes)
}

/// Returns `name`, or `stem-N.ext` for the first free N >= 2 when taken.
fn unique_entry_name(name: &str, used: &mut HashSet<String>) -> String {
    if used.insert(name.to_string()) {
        return name.to_string();
    }

    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (name, None),
    };

    let mut n = 2;
    loop {
        let candidate = match ext {
            Some(ext) => format!("{stem}-{n}.{ext}"),
            None => format!("{stem}-{n}"),
        };
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
