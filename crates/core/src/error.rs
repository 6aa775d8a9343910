//! Error types for deck generation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can abort a generation request.
///
/// Per-image download failures are not part of this enum: they are
/// reported as [`crate::FetchError`] inside an
/// [`crate::ImagePlacement::Skipped`] and never abort a slide.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a local file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The script source returned a payload that does not match the
    /// expected `{"slides": [{"title", "bullets"}]}` shape.
    #[error("Malformed script from upstream at `{field}`: {message}\nPayload:\n{payload}")]
    UpstreamFormat {
        /// Path of the offending field, e.g. `slides[2].bullets`.
        field: String,
        /// What was wrong with it.
        message: String,
        /// The raw payload as received.
        payload: String,
    },

    /// An external service call failed (transport, status or API error).
    #[error("Upstream service error: {0}")]
    Upstream(String),

    /// A request or layout parameter is outside its allowed range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The exported deck could not be written.
    #[error("Failed to persist deck to {path}: {message}")]
    Persistence {
        /// Target path of the export.
        path: PathBuf,
        /// Underlying failure.
        message: String,
    },

    /// The template file could not be used.
    #[error("Template error: {0}")]
    Template(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error (for PPTX).
    #[error("XML parsing error: {0}")]
    XmlError(String),
}

impl Error {
    /// Build an [`Error::UpstreamFormat`] for `field` in `payload`.
    pub fn upstream_format(
        field: impl Into<String>,
        message: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self::UpstreamFormat {
            field: field.into(),
            message: message.into(),
            payload: payload.into(),
        }
    }

    /// Build an [`Error::Persistence`] for `path`.
    pub fn persistence(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Self::Persistence {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
