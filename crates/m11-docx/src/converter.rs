//! DOCX → section tree conversion
//!
//! One conversion is a single synchronous pass:
//! 1. Read relationships and styles
//! 2. Extract images (once, before the body is streamed)
//! 3. Stream the body blocks into the tree builder
//!
//! The finished [`Document`] is then handed to the narrative linearizer and the
//! title page extractor, which only read it.

use crate::archive::{
    extract_file_as_string, extract_optional_part, parse_relationships, parse_styles,
    Relationships, StyleMap, DOCUMENT_PART, RELATIONSHIPS_PART, STYLES_PART,
};
use crate::builder::TreeBuilder;
use crate::classifier::Classifier;
use crate::error::{DocxError, Result};
use crate::images::{extract_images, ImageMap};
use crate::reader::{is_w, BlockReader};
use m11_core::{ConversionOptions, Document, Narrative, TitlePage, TitlePageExtractor, ToHtml};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Converts M11 protocol DOCX files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocxConverter {
    options: ConversionOptions,
}

impl DocxConverter {
    /// Create a converter with the given options
    #[inline]
    #[must_use = "creates a DOCX converter"]
    pub const fn new(options: ConversionOptions) -> Self {
        Self { options }
    }

    /// Options used by this converter
    #[inline]
    #[must_use = "returns the conversion options"]
    pub const fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Convert a DOCX file on disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, is not a valid DOCX
    /// package, or contains a table nested inside a table cell.
    pub fn convert_file<P: AsRef<Path>>(&self, path: P) -> Result<Conversion> {
        let path = path.as_ref();
        log::debug!("Converting {}", path.display());
        let file = File::open(path)?;
        self.convert_reader(BufReader::new(file))
    }

    /// Convert DOCX bytes held in memory
    ///
    /// # Errors
    ///
    /// See [`DocxConverter::convert_file`].
    pub fn convert_bytes(&self, bytes: &[u8]) -> Result<Conversion> {
        self.convert_reader(Cursor::new(bytes))
    }

    /// Convert a DOCX package from any seekable reader
    ///
    /// # Errors
    ///
    /// See [`DocxConverter::convert_file`].
    pub fn convert_reader<R: Read + Seek>(&self, reader: R) -> Result<Conversion> {
        let mut archive = ZipArchive::new(reader)?;

        let relationships = extract_optional_part(&mut archive, RELATIONSHIPS_PART)?
            .map(|xml| parse_relationships(&xml))
            .transpose()?
            .unwrap_or_else(Relationships::default);
        let styles = extract_optional_part(&mut archive, STYLES_PART)?
            .map(|xml| parse_styles(&xml))
            .transpose()?
            .unwrap_or_else(StyleMap::default);
        let images = extract_images(
            &mut archive,
            &relationships,
            self.options.image_dir.as_deref(),
        )?;

        let xml = extract_file_as_string(&mut archive, DOCUMENT_PART)?;
        let dom = roxmltree::Document::parse(&xml)?;
        let body = dom
            .root_element()
            .children()
            .find(|n| is_w(n, "body"))
            .ok_or_else(|| DocxError::InvalidStructure("document has no w:body".to_string()))?;

        let classifier = Classifier::new(&self.options, &images);
        let document = TreeBuilder::new(classifier).build(BlockReader::new(body, &styles))?;
        log::debug!(
            "Converted document: {} sections, {} images",
            document.sections().len(),
            images.len()
        );

        Ok(Conversion {
            document,
            images,
            not_found: self.options.not_found.clone(),
        })
    }
}

/// Result of converting one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Section tree
    pub document: Document,
    /// Extracted images by relationship id
    pub images: ImageMap,
    not_found: String,
}

impl Conversion {
    /// Linearize the sections into narrative content nodes
    #[must_use = "returns the linearized narrative content"]
    pub fn narrative(&self) -> Narrative {
        self.document.narrative()
    }

    /// Extractor over the title page table
    #[must_use = "returns a title page extractor"]
    pub fn title_page_extractor(&self) -> TitlePageExtractor<'_> {
        TitlePageExtractor::new(&self.document, &self.not_found)
    }

    /// Every known title page field
    #[must_use = "returns the extracted title page"]
    pub fn title_page(&self) -> TitlePage {
        self.title_page_extractor().extract()
    }

    /// Whole document as HTML
    #[must_use = "returns the document markup"]
    pub fn to_html(&self) -> String {
        self.document.to_html()
    }
}
