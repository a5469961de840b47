//! Sections: one heading and the content it directly owns

use crate::content::{ContentItem, ItemContainer, Paragraph, Table};
use crate::render::ToHtml;
use serde::{Deserialize, Serialize};

/// Read-only view of a numbered section, as consumed by the narrative linearizer
/// and by schema mappers that walk sections directly.
pub trait SectionLike: ToHtml {
    /// Heading depth (1 = top level)
    fn level(&self) -> usize;

    /// Dotted section number, e.g. `"1.2"`
    fn number(&self) -> Option<&str>;

    /// Heading text
    fn title(&self) -> Option<&str>;
}

/// A heading and the items that follow it up to the next heading
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Heading text; `None` for the document root
    pub title: Option<String>,
    /// Number assigned when the section was added; never recomputed
    pub number: Option<String>,
    /// Heading depth
    pub level: usize,
    /// Content in document order
    pub items: Vec<ContentItem>,
}

impl Section {
    /// Create an empty section
    #[inline]
    #[must_use = "creates an empty section"]
    pub const fn new(title: Option<String>, number: Option<String>, level: usize) -> Self {
        Self {
            title,
            number,
            level,
            items: Vec::new(),
        }
    }

    /// Tables directly owned by this section
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.items.iter().filter_map(|item| match item {
            ContentItem::Table(table) => Some(table),
            _ => None,
        })
    }

    /// Paragraphs directly owned by this section
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.items.iter().filter_map(|item| match item {
            ContentItem::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Paragraphs whose text starts with `prefix` (after leading whitespace)
    #[must_use = "returns matching paragraphs"]
    pub fn find_at_start(&self, prefix: &str) -> Vec<&Paragraph> {
        self.paragraphs()
            .filter(|p| p.text.trim_start().starts_with(prefix))
            .collect()
    }

    /// Whether the section owns any non-empty content
    #[must_use = "returns whether the section has content"]
    pub fn has_content(&self) -> bool {
        self.items.iter().any(|item| match item {
            ContentItem::Paragraph(p) => !p.text.trim().is_empty(),
            _ => true,
        })
    }

    /// Plain text of the section's items, one per line
    #[must_use = "returns the section's plain text"]
    pub fn text(&self) -> String {
        self.items
            .iter()
            .map(ContentItem::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ItemContainer for Section {
    #[inline]
    fn items(&self) -> &[ContentItem] {
        &self.items
    }

    #[inline]
    fn items_mut(&mut self) -> &mut Vec<ContentItem> {
        &mut self.items
    }
}

impl SectionLike for Section {
    #[inline]
    fn level(&self) -> usize {
        self.level
    }

    #[inline]
    fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    #[inline]
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}
