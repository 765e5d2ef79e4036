// Module declarations in dependency order
pub mod config;
pub mod utils;
pub mod processing;
pub mod core;
pub mod commands;

// Public exports for external consumers
pub use crate::config::Config;
pub use crate::core::{AppState, ConversionOutput, ConvertRequest, EditorState, UploadedImage};
pub use crate::utils::{ApiError, ConvertError, ConvertResult, TargetFormat};
pub use crate::commands::router;

// This library file is the public API for consuming this crate as a library.
// The server entry point is in main.rs.
