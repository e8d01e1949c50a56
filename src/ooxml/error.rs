//! Error types for OOXML image extraction.

use thiserror::Error;

/// Result type for OOXML operations.
pub type Result<T> = std::result::Result<T, OoxmlError>;

/// Message carried by the FormatError raised when a package has no drawing parts.
pub const NO_DRAWING_FOUND: &str = "no drawing found";

/// Error types for OOXML operations.
///
/// Only fatal conditions are represented here. Per-anchor problems (an
/// unresolved reference, missing media) are recorded as
/// [`Diagnostic`](crate::images::Diagnostic) values and never abort a run.
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// The package is unreadable or a mandatory part is missing
    #[error("Invalid format: {0}")]
    Format(String),

    /// Part not found
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// A referenced media file is absent from the package
    #[error("Media not found: {0}")]
    MediaNotFound(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// ZIP container error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The run was cancelled through its [`CancelToken`](crate::images::CancelToken)
    #[error("Extraction cancelled")]
    Cancelled,
}

impl OoxmlError {
    /// Check whether this is the FormatError raised for a package without drawings.
    ///
    /// Callers importing catalogs usually treat this as "zero images present".
    pub fn is_no_drawing(&self) -> bool {
        matches!(self, OoxmlError::Format(msg) if msg == NO_DRAWING_FOUND)
    }

    /// Check whether this error only concerns a single part.
    #[inline]
    pub fn is_missing_part(&self) -> bool {
        matches!(self, OoxmlError::PartNotFound(_) | OoxmlError::MediaNotFound(_))
    }
}

impl From<quick_xml::Error> for OoxmlError {
    fn from(err: quick_xml::Error) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}

impl From<std::str::Utf8Error> for OoxmlError {
    fn from(err: std::str::Utf8Error) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_drawing_detection() {
        let err = OoxmlError::Format(NO_DRAWING_FOUND.to_string());
        assert!(err.is_no_drawing());
        assert_eq!(err.to_string(), "Invalid format: no drawing found");

        let other = OoxmlError::Format("no worksheet found".to_string());
        assert!(!other.is_no_drawing());
    }

    #[test]
    fn test_missing_part_classification() {
        assert!(OoxmlError::MediaNotFound("xl/media/a.png".into()).is_missing_part());
        assert!(OoxmlError::PartNotFound("xl/workbook.xml".into()).is_missing_part());
        assert!(!OoxmlError::Cancelled.is_missing_part());
    }
}
