//! Error types for protocol document conversion.
//!
//! Only one condition aborts a conversion on structural grounds: a table nested
//! inside a table cell. Everything else that is ambiguous in the source document
//! (irregular list nesting, heading jumps, unknown elements) is logged and
//! degraded locally, so it never shows up here.

use std::io;
use thiserror::Error;

/// Errors that can occur while building or consuming a protocol document tree.
///
/// # Examples
///
/// ```
/// use m11_core::M11Error;
///
/// let err = M11Error::TableWithinTable {
///     section: "1.2".to_string(),
/// };
/// assert!(err.is_structural());
/// assert_eq!(err.to_string(), "Table within table detected in section 1.2");
/// ```
#[derive(Error, Debug)]
pub enum M11Error {
    /// File I/O error (reading extracted images, configuration files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A table cell contains another table.
    ///
    /// Downstream schema mapping has no representation for nested tables, so the
    /// whole conversion is abandoned and no partial tree is returned.
    #[error("Table within table detected in section {section}")]
    TableWithinTable {
        /// Number of the section being built, or `root` before the first heading.
        section: String,
    },

    /// Invalid configuration file or value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON serialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl M11Error {
    /// Whether this is the structural-fatal condition (table within table).
    #[inline]
    #[must_use = "returns whether the error is the structural-fatal condition"]
    pub const fn is_structural(&self) -> bool {
        matches!(self, Self::TableWithinTable { .. })
    }
}

impl From<toml::de::Error> for M11Error {
    #[inline]
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for protocol document operations
pub type Result<T> = std::result::Result<T, M11Error>;
