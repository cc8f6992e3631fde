//! Error handling for drawkit
//!
//! Provides error types for the two recoverable failure families:
//! - Format errors (malformed or truncated document files)
//! - Codec errors (raster images that cannot be read or written)
//!
//! Contract violations inside the document core are not represented here;
//! they panic at the call site.
//!
//! All error types use `thiserror` for ergonomic error handling.

use std::path::PathBuf;

use thiserror::Error;

/// Document format error type
///
/// Raised while decoding a document file. Decoding is all-or-nothing, so any
/// of these aborts the open operation without producing a document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The file does not start with the document magic bytes
    #[error("Not a drawkit document (bad magic bytes)")]
    BadMagic,

    /// The file was written by a newer or unknown format revision
    #[error("Unsupported document version {version}")]
    UnsupportedVersion {
        /// The version found in the header.
        version: u32,
    },

    /// The payload ended before all declared data was read
    #[error("Unexpected end of data while reading {context}")]
    Truncated {
        /// What was being read when the data ran out.
        context: &'static str,
    },

    /// The base image dimensions exceed the supported limits
    #[error("Base image too large: {width}x{height}")]
    ImageTooLarge {
        /// Declared image width.
        width: u32,
        /// Declared image height.
        height: u32,
    },

    /// Memory for the declared data could not be reserved
    #[error("Failed to allocate {bytes} bytes")]
    AllocationFailed {
        /// Number of bytes requested.
        bytes: usize,
    },

    /// A shape record carries an unknown type tag
    #[error("Unknown shape type tag {tag}")]
    UnknownShapeType {
        /// The unknown tag.
        tag: u8,
    },

    /// A string field is not valid UTF-8
    #[error("Invalid string in {field}")]
    InvalidString {
        /// The field containing the bad string.
        field: &'static str,
    },

    /// A field holds a value outside its valid range
    #[error("Corrupt document: {reason}")]
    Corrupt {
        /// Description of the inconsistency.
        reason: String,
    },
}

/// Raster codec error type
///
/// Raised by raster codec collaborators when importing or exporting images.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The image file does not exist
    #[error("Image not found: {path}")]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The file exists but could not be decoded
    #[error("Unsupported or unreadable image {path}: {reason}")]
    Unsupported {
        /// Path of the image.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// Encoding the image failed
    #[error("Failed to encode image {path}: {reason}")]
    Encode {
        /// Destination path.
        path: PathBuf,
        /// Encoder message.
        reason: String,
    },

    /// I/O failure while reading or writing the image
    #[error("Image I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// Check if this error means the image file does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            CodecError::NotFound { .. } => true,
            CodecError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Main error type for drawkit
///
/// A unified error type that can represent any recoverable error.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Document format error
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Raster codec error
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Check if this is a format error
    pub fn is_format_error(&self) -> bool {
        matches!(self, Error::Format(_))
    }

    /// Check if this error means a file does not exist
    ///
    /// Lets callers treat "open a file that isn't there yet" as a new
    /// document rather than a failure.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Codec(e) => e.is_not_found(),
            Error::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
