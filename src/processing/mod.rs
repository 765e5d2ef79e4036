//! Image processing: decode, encode, convert, package, and edit.
//!
//! - [`converter`]: Concurrent batch conversion of uploads.
//! - [`formats`]: Maps (format, compress) to encoder settings.
//! - [`archive`]: Single-file or zip response payloads.
//! - [`filters`]: CSS-style color filters and presets.
//! - [`canvas`]: Rotation-aware rendering for the editor.

pub mod archive;
pub mod canvas;
pub mod converter;
pub mod filters;
pub mod formats;

pub use archive::package;
pub use converter::{BatchConverter, decode_oriented};
pub use filters::{FILTER_PRESETS, FilterChain, FilterPreset};
pub use formats::{EncodeOptions, encode_image};
