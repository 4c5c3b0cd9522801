//! Error types and handling for the path branching library.
//!
//! This module provides structured error responses with unique error codes and
//! automatic HTTP status code mapping. All errors implement `IntoResponse` and
//! automatically serialize to JSON.
//!
//! # Design
//!
//! This module uses an opaque `Error` struct paired with an `ErrorKind` enum,
//! following the `std::io::Error` pattern. This design provides API stability:
//! internal error sources can change without breaking consumers.
//!
//! Two kinds matter most for branching:
//!
//! - [`ErrorKind::InvalidArgument`] is raised while a pipeline is being assembled
//!   (for example a `path_match` ending in `/`). It is fatal to startup.
//! - [`ErrorKind::Handler`] is raised by handlers and wrapped services at request
//!   time. Branch middleware propagates it unchanged.
//!
//! # Example
//!
//! ```rust
//! use axum_mappath::{Error, ErrorKind};
//!
//! let error = Error::invalid_argument("The path must not end with a '/'");
//!
//! match error.kind() {
//!     ErrorKind::InvalidArgument => println!("Startup misconfiguration: {}", error),
//!     ErrorKind::Handler => println!("Request failed: {}", error),
//!     _ => println!("Other error: {}", error),
//! }
//!
//! use axum::http::StatusCode;
//! assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The kind of error that occurred.
///
/// This enum categorizes errors for matching purposes. Use `Error::kind()`
/// to get the kind of an error.
///
/// # Stability
///
/// This enum is marked `#[non_exhaustive]`, so new variants may be added
/// in future versions without breaking existing code. Always include a
/// wildcard arm when matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Pipeline construction misuse (malformed path prefix, late branch).
    #[error("invalid argument")]
    InvalidArgument,

    /// Configuration error (invalid TOML, missing values).
    #[error("configuration error")]
    Configuration,

    /// I/O error (file operations, network).
    #[error("I/O error")]
    Io,

    /// Invalid input (bad URI, header, request data).
    #[error("invalid input")]
    InvalidInput,

    /// A request handler or wrapped service failed.
    #[error("handler error")]
    Handler,

    /// Internal/unexpected error.
    #[error("internal error")]
    Internal,
}

/// An error that can occur in the axum-mappath library.
///
/// This is an opaque error type that wraps an underlying error source.
/// Use [`Error::kind()`] to determine the category of error for matching,
/// and the `Display` implementation to get a human-readable message.
///
/// # Creating Errors
///
/// ```rust
/// use axum_mappath::Error;
///
/// let err = Error::invalid_argument("The path must start with a '/'");
/// let err = Error::handler("upstream closed the connection");
/// let err = Error::config("missing field");
/// ```
///
/// Or use [`Error::new()`] for full control:
///
/// ```rust
/// use axum_mappath::{Error, ErrorKind};
///
/// let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
/// let err = Error::new(ErrorKind::Io, io_err);
/// ```
pub struct Error {
    kind: ErrorKind,
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl Error {
    /// Creates a new error with the given kind and source.
    ///
    /// # Example
    ///
    /// ```rust
    /// use axum_mappath::{Error, ErrorKind};
    ///
    /// let err = Error::new(ErrorKind::Internal, "something went wrong");
    /// assert_eq!(err.kind(), ErrorKind::Internal);
    /// ```
    pub fn new<E>(kind: ErrorKind, error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self {
            kind,
            source: error.into(),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error code string for this error.
    ///
    /// This is a stable identifier suitable for client-side error handling.
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ErrorKind::InvalidArgument => "INVALID_ARGUMENT",
            ErrorKind::Configuration => "CONFIG_ERROR",
            ErrorKind::Io => "IO_ERROR",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::Handler => "HANDLER_ERROR",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            ErrorKind::InvalidArgument => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Io => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::Handler => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into a structured error response.
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.error_code(), self.to_string())
    }

    /// Consumes the error and returns the inner error source.
    pub fn into_inner(self) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self.source
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl Error {
    /// Creates an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, msg.into())
    }

    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, msg.into())
    }

    /// Creates an I/O error from a message.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, msg.into())
    }

    /// Creates an I/O error from a `std::io::Error`.
    pub fn from_io(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, err)
    }

    /// Creates an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, msg.into())
    }

    /// Creates a handler error from a message.
    pub fn handler(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Handler, msg.into())
    }

    /// Creates a handler error wrapping the failure of a tower service.
    pub fn from_service<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self::new(ErrorKind::Handler, err)
    }

    /// Creates an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, msg.into())
    }
}

// ============================================================================
// Trait implementations
// ============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = self.to_error_response();

        tracing::error!(
            error_code = %error_response.error_code,
            message = %error_response.message,
            status = %status.as_u16(),
            "Error occurred"
        );

        (status, Json(error_response)).into_response()
    }
}

// ============================================================================
// From implementations
// ============================================================================

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::new(ErrorKind::Configuration, err)
    }
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Self::new(ErrorKind::Configuration, err)
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::new(ErrorKind::InvalidInput, err)
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::new(ErrorKind::InvalidInput, err)
    }
}

impl From<http::uri::InvalidUriParts> for Error {
    fn from(err: http::uri::InvalidUriParts) -> Self {
        Self::new(ErrorKind::InvalidInput, err)
    }
}

// ============================================================================
// ErrorResponse
// ============================================================================

/// Structured error response with error code and details.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Unique error code for client-side error handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Adds details to the error response.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
