//! Error types for the conversion service.
//!
//! Provides a hierarchy of error types using `thiserror` for ergonomic error handling,
//! plus the mapping from those errors to HTTP responses.

use std::io;

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Validation errors for uploaded forms and editor settings.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The request carried no `files` parts
    #[error("No files uploaded")]
    NoFiles,
    /// Target format outside webp/jpeg/png
    #[error("Unsupported target format: {0}")]
    UnsupportedFormat(String),
    /// Every uploaded file had an unaccepted type
    #[error("None of the {0} uploaded files is a PNG, JPEG, or WebP image")]
    NoAcceptedFiles(usize),
    /// The editor request carried no `image` part
    #[error("No image uploaded")]
    MissingImage,
    /// Filter string could not be parsed
    #[error("Unsupported filter: {0}")]
    Filter(String),
    /// A form field had a value that could not be parsed
    #[error("Invalid value for field '{field}': {value}")]
    Field { field: &'static str, value: String },
}

impl ValidationError {
    /// Message returned to clients in the JSON error body.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::NoFiles => "No files uploaded.",
            Self::UnsupportedFormat(_) => "Unsupported target format.",
            Self::NoAcceptedFiles(_) => "Use PNG, JPEG, or WebP files.",
            Self::MissingImage => "No image uploaded.",
            Self::Filter(_) => "Unsupported filter.",
            Self::Field { .. } => "Invalid form data.",
        }
    }

    pub fn field(field: &'static str, value: impl Into<String>) -> Self {
        Self::Field { field, value: value.into() }
    }

    pub fn filter(value: impl Into<String>) -> Self {
        Self::Filter(value.into())
    }
}

/// Main error type for the service.
///
/// Every failure inside a handler is converted to this type before it is
/// turned into a response.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Multipart body could not be read
    #[error("Multipart error: {0}")]
    Multipart(String),

    /// Request body exceeded the configured upload limit
    #[error("Upload too large: {0}")]
    TooLarge(String),

    /// Input bytes are not a decodable image
    #[error("Decode error: {0}")]
    Decode(String),

    /// Encoding to the target format failed
    #[error("Encode error: {0}")]
    Encode(String),

    /// Zip packaging failed
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// IO error while writing buffers
    #[error("IO error: {0}")]
    Io(String),

    /// A blocking conversion task panicked or was cancelled
    #[error("Task error: {0}")]
    Task(String),

    /// The download response could not be assembled
    #[error("Response error: {0}")]
    Response(String),
}

/// Convenience result type for service operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

impl ConvertError {
    pub fn decode<T: Into<String>>(msg: T) -> Self {
        Self::Decode(msg.into())
    }

    pub fn response<T: Into<String>>(msg: T) -> Self {
        Self::Response(msg.into())
    }

    pub fn encode<T: Into<String>>(msg: T) -> Self {
        Self::Encode(msg.into())
    }

    /// Whether the failure was caused by the client's request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Multipart(_) | Self::TooLarge(_))
    }
}

impl From<io::Error> for ConvertError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<MultipartError> for ConvertError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::TooLarge(err.body_text())
        } else {
            Self::Multipart(err.body_text())
        }
    }
}

impl From<tokio::task::JoinError> for ConvertError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

/// Which endpoint produced the error; selects the generic failure wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Convert,
    Edit,
}

/// Error wrapper returned by HTTP handlers.
#[derive(Debug)]
pub struct ApiError {
    pub error: ConvertError,
    pub surface: Surface,
}

impl ApiError {
    pub fn edit(error: impl Into<ConvertError>) -> Self {
        Self { error: error.into(), surface: Surface::Edit }
    }

    pub fn status(&self) -> StatusCode {
        if matches!(self.error, ConvertError::TooLarge(_)) {
            StatusCode::PAYLOAD_TOO_LARGE
        } else if self.error.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Message exposed to the client. Server-side details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match (&self.error, self.surface) {
            (ConvertError::Validation(v), _) => v.public_message(),
            (ConvertError::Multipart(_), _) => "Invalid form data.",
            (ConvertError::TooLarge(_), _) => "Upload too large.",
            (_, Surface::Convert) => "Conversion failed.",
            (ConvertError::Decode(_), Surface::Edit) => "Could not render pasted image.",
            (_, Surface::Edit) => "Export failed.",
        }
    }
}

impl<E: Into<ConvertError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self { error: err.into(), surface: Surface::Convert }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            match self.surface {
                Surface::Convert => error!("Image conversion failed: {}", self.error),
                Surface::Edit => error!("Screenshot edit failed: {}", self.error),
            }
        }
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
