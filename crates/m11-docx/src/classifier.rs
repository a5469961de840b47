//! Paragraph classification
//!
//! Decides from a paragraph's style name, numbering marker, leading character
//! and embedded image references what the paragraph is:
//!
//! | Check | Result |
//! |-------|--------|
//! | Style `NN Heading D` (two-digit ordinal, heading depth) | [`BlockKind::Heading`] |
//! | `w:numPr/w:ilvl` present | [`BlockKind::ListItem`] at that level |
//! | Style in the bullet style set | [`BlockKind::ListItem`] at level 0 |
//! | Text starts with `•` (U+2022) | [`BlockKind::ListItem`] at level 0 |
//! | Embedded graphic with a known image relationship | [`BlockKind::Image`] |
//! | Anything else, empty text included | [`BlockKind::PlainText`] |
//!
//! Classification is pure: no logging, no state.

use crate::images::ImageMap;
use crate::reader::ParagraphBlock;
use m11_core::ConversionOptions;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

/// Bullet character that marks a manually bulleted paragraph
pub const BULLET: char = '\u{2022}';

/// Template heading styles: two-digit ordinal, the word `Heading`, heading depth
static HEADING_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}\s*Heading\s*(\d)").expect("Invalid heading style regex"));

/// What a paragraph is, as far as tree building is concerned
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Heading at the given depth
    Heading(usize),
    /// List item at the given nesting level (0 = outermost)
    ListItem(usize),
    /// Image at the given extracted path
    Image(PathBuf),
    /// Plain paragraph
    PlainText,
}

/// Heading depth encoded in a template heading style name
#[must_use = "returns the heading level, if the style is a heading"]
pub fn heading_level(style_name: &str) -> Option<usize> {
    HEADING_STYLE
        .captures(style_name)
        .and_then(|caps| caps.get(1))
        .and_then(|depth| depth.as_str().parse().ok())
}

/// List level, checking the numbering marker, the bullet styles, then the text
#[must_use = "returns the list level, if the paragraph is a list item"]
pub fn list_level(
    marker_level: Option<&str>,
    style_name: Option<&str>,
    text: &str,
    bullet_styles: &[String],
) -> Option<usize> {
    if let Some(raw) = marker_level {
        return Some(raw.trim().parse().unwrap_or(0));
    }
    if style_name.is_some_and(|style| bullet_styles.iter().any(|s| s == style)) {
        return Some(0);
    }
    text.starts_with(BULLET).then_some(0)
}

/// Path of the first embedded graphic whose relationship id is a known image
#[must_use = "returns the image path, if any"]
pub fn image_path(rel_ids: &[String], images: &ImageMap) -> Option<PathBuf> {
    rel_ids
        .iter()
        .find_map(|id| images.get(id))
        .map(std::path::Path::to_path_buf)
}

/// List item text without a leading bullet character and the space after it
#[must_use = "returns the text without its bullet"]
pub fn strip_bullet(text: &str) -> &str {
    text.strip_prefix(BULLET).map_or(text, str::trim_start)
}

/// Classifies paragraphs of one document
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    bullet_styles: &'a [String],
    images: &'a ImageMap,
}

impl<'a> Classifier<'a> {
    /// Create a classifier over the document's extracted images
    #[inline]
    #[must_use = "creates a paragraph classifier"]
    pub fn new(options: &'a ConversionOptions, images: &'a ImageMap) -> Self {
        Self {
            bullet_styles: &options.bullet_styles,
            images,
        }
    }

    /// Classify one paragraph
    #[must_use = "returns the paragraph kind"]
    pub fn classify(&self, paragraph: &ParagraphBlock) -> BlockKind {
        let style = paragraph.style_name.as_deref();
        if let Some(level) = style.and_then(heading_level) {
            return BlockKind::Heading(level);
        }
        if let Some(level) = list_level(
            paragraph.list_level.as_deref(),
            style,
            &paragraph.text,
            self.bullet_styles,
        ) {
            return BlockKind::ListItem(level);
        }
        if let Some(path) = image_path(&paragraph.image_rel_ids, self.images) {
            return BlockKind::Image(path);
        }
        BlockKind::PlainText
    }
}
