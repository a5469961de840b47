//! Conversion options
//!
//! Options can be built in code with the `with_*` methods or loaded from a TOML
//! file. Every key is optional; missing keys keep their defaults.
//!
//! ```toml
//! image_dir = "/var/uploads/3f2a/images"
//! bullet_styles = ["List Bullet", "CPT_List Bullet"]
//! not_found = "[Not Found]"
//! ```

use crate::error::{M11Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Sentinel returned for title-page fields with no matching row
pub const DEFAULT_NOT_FOUND: &str = "[Not Found]";

/// Paragraph style names treated as bullet list items at level 0
pub const DEFAULT_BULLET_STYLES: &[&str] = &[
    "List Bullet",
    "List Bullet 2",
    "List Bullet 3",
    "CPT_List Bullet",
];

/// Options for a single document conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConversionOptions {
    /// Directory that receives extracted images.
    ///
    /// `None` leaves images inside the archive and records their archive path.
    /// Callers processing several uploads at once must give each its own directory.
    pub image_dir: Option<PathBuf>,

    /// Style names recognized as bullet list paragraphs
    pub bullet_styles: Vec<String>,

    /// Value reported for title-page fields that are not present
    pub not_found: String,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            image_dir: None,
            bullet_styles: DEFAULT_BULLET_STYLES
                .iter()
                .map(ToString::to_string)
                .collect(),
            not_found: DEFAULT_NOT_FOUND.to_string(),
        }
    }
}

impl ConversionOptions {
    /// Create options with an image extraction directory
    #[inline]
    #[must_use = "returns options with image directory configured"]
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = Some(dir.into());
        self
    }

    /// Create options with a custom bullet style set
    #[inline]
    #[must_use = "returns options with bullet styles configured"]
    pub fn with_bullet_styles<I, S>(mut self, styles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bullet_styles = styles.into_iter().map(Into::into).collect();
        self
    }

    /// Create options with a custom not-found sentinel
    #[inline]
    #[must_use = "returns options with not-found sentinel configured"]
    pub fn with_not_found(mut self, sentinel: impl Into<String>) -> Self {
        self.not_found = sentinel.into();
        self
    }

    /// Whether `style_name` is one of the configured bullet list styles
    #[inline]
    #[must_use = "returns whether the style is a bullet list style"]
    pub fn is_bullet_style(&self, style_name: &str) -> bool {
        self.bullet_styles.iter().any(|s| s == style_name)
    }

    /// Parse options from TOML text
    ///
    /// # Errors
    ///
    /// Returns [`M11Error::Config`] if the text is not valid TOML or contains
    /// unknown keys.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load options from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or [`M11Error::Config`]
    /// if its content is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            M11Error::Config(msg) => {
                M11Error::Config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }
}
