//! Error types for pdfmd.

use std::io;
use thiserror::Error;

/// Result type alias for pdfmd operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting a document.
///
/// Only document-level failures surface here. Unmappable glyphs are dropped
/// by the decoder and blank pages are skipped; neither is an error.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The document has no pages at all.
    #[error("Document contains no pages")]
    NoPages,

    /// Text runs could not be extracted from a page.
    #[error("Failed to extract text from page {page}: {reason}")]
    PageExtract { page: u32, reason: String },

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// No converter is registered for the file extension.
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// Error while serializing output.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Wrap any displayable failure as a page extraction error.
    pub fn page_extract(page: u32, reason: impl std::fmt::Display) -> Self {
        Error::PageExtract {
            page,
            reason: reason.to_string(),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NoPages;
        assert_eq!(err.to_string(), "Document contains no pages");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_page_extract_names_page() {
        let err = Error::page_extract(7, "bad content stream");
        assert_eq!(
            err.to_string(),
            "Failed to extract text from page 7: bad content stream"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
