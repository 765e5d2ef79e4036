//! Core application types and state.
//!
//! - [`AppState`]: State shared by the HTTP handlers
//! - [`ConvertRequest`]: A validated conversion upload
//! - [`ConversionOutput`]: Single file or zip archive response payload
//! - [`EditorState`]: Rotation, filter, name, and format of a screenshot edit

mod editor;
mod state;
mod types;

pub use editor::{EditedImage, EditorState, ROTATION_STEP};
pub use state::AppState;
pub use types::{ConversionOutput, ConvertRequest, ConvertedImage, UploadedImage};
