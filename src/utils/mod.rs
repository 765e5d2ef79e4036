pub mod error;
pub mod validation;
pub mod formats;
pub mod filename;
pub mod logger;

pub use error::{ApiError, ConvertError, ConvertResult, Surface, ValidationError};
pub use validation::{is_accepted_upload, validate_convert_form};
pub use formats::{
    ACCEPTED_EXTENSIONS, ACCEPTED_TYPES, TargetFormat, extension_of, format_bytes,
};
pub use filename::{
    ARCHIVE_NAME,
    DEFAULT_CAPTURE_NAME,
    attachment,
    converted_name,
    editor_download_name,
    filename_from_disposition,
    sanitize_basename,
};
pub use logger::init_logger;
