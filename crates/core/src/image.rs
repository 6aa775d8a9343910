//! Image assets fetched for placement on a slide.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Container format of a fetched image, detected from its signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
}

impl ImageFormat {
    /// Detect format from file magic bytes.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }
        if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }
        if bytes.starts_with(b"II*\0") || bytes.starts_with(b"MM\0*") {
            return Some(Self::Tiff);
        }
        // "BM" alone is too weak; require room for the file header.
        if bytes.len() >= 14 && bytes.starts_with(b"BM") {
            return Some(Self::Bmp);
        }
        None
    }

    /// File extension used for the media part.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
        }
    }

    /// MIME content type of the media part.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
        }
    }

    pub fn all() -> [Self; 5] {
        [Self::Png, Self::Jpeg, Self::Gif, Self::Bmp, Self::Tiff]
    }
}

/// Why one image could not be placed.
///
/// Fetch errors are local to their grid cell and never abort a slide.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request could not be completed (DNS, connect, timeout, body read).
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("server responded with status {0}")]
    Status(u16),

    /// The response had no body.
    #[error("response body was empty")]
    Empty,

    /// The bytes are not a supported image container.
    #[error("unrecognized image format")]
    UnrecognizedFormat,
}

/// Check fetched bytes and detect their format.
pub fn decode(bytes: &[u8]) -> Result<ImageFormat, FetchError> {
    if bytes.is_empty() {
        return Err(FetchError::Empty);
    }
    ImageFormat::from_magic(bytes).ok_or(FetchError::UnrecognizedFormat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_magic() {
        assert_eq!(
            ImageFormat::from_magic(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR"),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_magic(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::from_magic(b"GIF89a...."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::from_magic(b"II*\0rest"), Some(ImageFormat::Tiff));
        assert_eq!(
            ImageFormat::from_magic(b"BM\0\0\0\0\0\0\0\0\0\0\0\0\0\0"),
            Some(ImageFormat::Bmp)
        );
        assert_eq!(ImageFormat::from_magic(b"BM"), None);
        assert_eq!(ImageFormat::from_magic(b"<html>"), None);
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(decode(b""), Err(FetchError::Empty));
        assert_eq!(decode(b"not an image"), Err(FetchError::UnrecognizedFormat));
        assert_eq!(decode(&[0xFF, 0xD8, 0xFF]), Ok(ImageFormat::Jpeg));
    }

    #[test]
    fn test_extensions_are_distinct() {
        let mut exts: Vec<_> = ImageFormat::all().iter().map(|f| f.extension()).collect();
        exts.sort();
        exts.dedup();
        assert_eq!(exts.len(), 5);
    }
}
