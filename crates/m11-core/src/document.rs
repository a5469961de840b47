//! Generic document tree: an ordered list of numbered sections
//!
//! Sections are numbered as they are added. Adding a section at level `L`
//! increments counter `L` and resets every deeper counter, so heading levels
//! `[1, 2, 2, 1, 2]` produce `["1", "1.1", "1.2", "2", "2.1"]`.

use crate::error::Result;
use crate::narrative::{linearize, Narrative};
use crate::render::ToHtml;
use crate::section::Section;
use serde::Serialize;
use std::collections::HashMap;

/// Deepest heading level that gets its own counter slot
pub const MAX_SECTION_LEVEL: usize = 5;

/// Per-document heading counters, slot 0 being the document root
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SectionNumbering {
    counters: [usize; MAX_SECTION_LEVEL + 1],
}

impl SectionNumbering {
    /// Create counters with every slot at zero
    #[inline]
    #[must_use = "creates fresh section numbering"]
    pub const fn new() -> Self {
        Self {
            counters: [0; MAX_SECTION_LEVEL + 1],
        }
    }

    /// Advance the counter for `level` and return the dotted number.
    ///
    /// `level` must already be within `1..=MAX_SECTION_LEVEL`.
    pub fn next_number(&mut self, level: usize) -> String {
        self.counters[level] += 1;
        for counter in &mut self.counters[level + 1..] {
            *counter = 0;
        }
        self.counters[1..=level]
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Document tree owning every section
///
/// The first section is the root: it has no title or number and holds the
/// content that precedes the first heading (typically the title page table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    sections: Vec<Section>,
    #[serde(skip)]
    by_number: HashMap<String, usize>,
    #[serde(skip)]
    by_title: HashMap<String, usize>,
    #[serde(skip)]
    numbering: SectionNumbering,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding only the root section
    #[must_use = "creates an empty document"]
    pub fn new() -> Self {
        Self {
            sections: vec![Section::new(None, None, 1)],
            by_number: HashMap::new(),
            by_title: HashMap::new(),
            numbering: SectionNumbering::new(),
        }
    }

    /// Append a numbered section at `level` and make it the current section.
    ///
    /// Levels outside `1..=MAX_SECTION_LEVEL` are clamped with a warning.
    pub fn add_section(&mut self, title: Option<String>, level: usize) -> &mut Section {
        let clamped = level.clamp(1, MAX_SECTION_LEVEL);
        if clamped != level {
            log::warn!("Heading level {level} out of range for {title:?}, using {clamped}");
        }

        let number = self.numbering.next_number(clamped);
        let index = self.sections.len();
        self.by_number.insert(number.clone(), index);
        if let Some(ref t) = title {
            self.by_title.insert(t.clone(), index);
        }
        log::debug!("Section {number} {title:?} at level {clamped}");

        self.sections.push(Section::new(title, Some(number), clamped));
        &mut self.sections[index]
    }

    /// The root section
    #[inline]
    #[must_use = "returns the root section"]
    pub fn root(&self) -> &Section {
        &self.sections[0]
    }

    /// All sections including the root, in document order
    #[inline]
    #[must_use = "returns the sections"]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Sections after the root, in document order
    #[inline]
    #[must_use = "returns the numbered sections"]
    pub fn numbered_sections(&self) -> &[Section] {
        &self.sections[1..]
    }

    /// The section receiving non-heading content
    #[inline]
    #[must_use = "returns the current section"]
    pub fn current_section(&self) -> &Section {
        // The root section always exists
        &self.sections[self.sections.len() - 1]
    }

    /// Mutable access to the section receiving non-heading content
    #[inline]
    pub fn current_section_mut(&mut self) -> &mut Section {
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }

    /// Look up a section by its dotted number
    #[must_use = "returns the matching section, if any"]
    pub fn section_by_number(&self, number: &str) -> Option<&Section> {
        self.by_number.get(number).map(|&i| &self.sections[i])
    }

    /// Look up a section by heading text; the latest section with that title wins
    #[must_use = "returns the matching section, if any"]
    pub fn section_by_title(&self, title: &str) -> Option<&Section> {
        self.by_title.get(title).map(|&i| &self.sections[i])
    }

    /// Look up a section by 1-based position, the root being ordinal 1
    #[must_use = "returns the section at that position, if any"]
    pub fn section_by_ordinal(&self, ordinal: usize) -> Option<&Section> {
        ordinal
            .checked_sub(1)
            .and_then(|i| self.sections.get(i))
    }

    /// Linearize the numbered sections into narrative content nodes
    #[must_use = "returns the linearized narrative content"]
    pub fn narrative(&self) -> Narrative {
        linearize(self.numbered_sections())
    }

    /// Serialize the section tree to pretty JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl ToHtml for Document {
    fn to_html(&self) -> String {
        self.sections
            .iter()
            .map(ToHtml::to_html)
            .filter(|html| !html.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
