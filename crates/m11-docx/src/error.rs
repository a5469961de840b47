//! Error types for DOCX ingestion

use m11_core::M11Error;
use std::io;
use thiserror::Error;

/// Errors that can occur when reading a DOCX package
#[derive(Error, Debug)]
pub enum DocxError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// ZIP archive error
    #[error("ZIP archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Malformed XML in the main document part
    #[error("XML parsing error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Malformed XML in a relationships or styles part
    #[error("XML parsing error in {part}: {source}")]
    PartXml {
        /// Archive path of the part
        part: String,
        /// Underlying parser error
        source: quick_xml::Error,
    },

    /// UTF-8 conversion error
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Missing required file in archive
    #[error("Missing required file: {0}")]
    MissingFile(String),

    /// Invalid document structure
    #[error("Invalid document structure: {0}")]
    InvalidStructure(String),

    /// Error raised while building the section tree
    #[error(transparent)]
    Model(#[from] M11Error),
}

impl DocxError {
    /// Whether the conversion was abandoned because of a table nested in a table cell
    #[inline]
    #[must_use = "returns whether the error is the structural-fatal condition"]
    pub const fn is_structural(&self) -> bool {
        matches!(self, Self::Model(err) if err.is_structural())
    }
}

/// Result type for DOCX operations
pub type Result<T> = std::result::Result<T, DocxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_forwarded() {
        let err = DocxError::from(M11Error::TableWithinTable {
            section: "2.1".to_string(),
        });
        assert!(err.is_structural());
        assert_eq!(err.to_string(), "Table within table detected in section 2.1");
    }

    #[test]
    fn test_missing_file_not_structural() {
        let err = DocxError::MissingFile("word/document.xml".to_string());
        assert!(!err.is_structural());
        assert_eq!(err.to_string(), "Missing required file: word/document.xml");
    }
}
