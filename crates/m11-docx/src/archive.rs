//! DOCX package access
//!
//! A DOCX file is a ZIP archive of XML parts:
//! - `word/document.xml`: body content (paragraphs, tables, content controls)
//! - `word/styles.xml`: style definitions (style id → display name)
//! - `word/_rels/document.xml.rels`: relationships (images, hyperlinks)
//!
//! Only `word/document.xml` is required; the other parts degrade to empty maps.

use crate::error::{DocxError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Main document part
pub const DOCUMENT_PART: &str = "word/document.xml";
/// Style definitions part
pub const STYLES_PART: &str = "word/styles.xml";
/// Relationships of the main document part
pub const RELATIONSHIPS_PART: &str = "word/_rels/document.xml.rels";

const IMAGE_RELATIONSHIP_SUFFIX: &str = "/image";

/// Extract a file from the ZIP archive
///
/// # Errors
///
/// Returns an error if the file is not found in the archive (`MissingFile`)
/// or if reading the file content fails (I/O error).
#[must_use = "this function returns extracted file bytes that should be processed"]
pub fn extract_file<R: Read + Seek>(archive: &mut ZipArchive<R>, filename: &str) -> Result<Vec<u8>> {
    let mut file = archive
        .by_name(filename)
        .map_err(|_| DocxError::MissingFile(filename.to_string()))?;

    let mut content = Vec::new();
    file.read_to_end(&mut content)?;
    Ok(content)
}

/// Extract a file as a UTF-8 string, without a leading byte-order mark
///
/// # Errors
///
/// Returns an error if the file is not found in the archive (`MissingFile`),
/// if reading the file content fails (I/O error), or if the content is not valid UTF-8.
#[must_use = "this function returns extracted file content that should be processed"]
pub fn extract_file_as_string<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    filename: &str,
) -> Result<String> {
    let bytes = extract_file(archive, filename)?;
    let text = String::from_utf8(bytes)?;
    Ok(match text.strip_prefix('\u{FEFF}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Extract an optional part; `None` when the archive has no such file
///
/// # Errors
///
/// Returns an error if the part exists but cannot be read.
pub fn extract_optional_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    filename: &str,
) -> Result<Option<String>> {
    match extract_file_as_string(archive, filename) {
        Ok(text) => Ok(Some(text)),
        Err(DocxError::MissingFile(_)) => {
            log::debug!("Optional part {filename} not present");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Look up an attribute by qualified name and unescape its value
fn get_attr(e: &BytesStart<'_>, key: &[u8], part: &str) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| DocxError::PartXml {
            part: part.to_string(),
            source: err.into(),
        })?;
        if attr.key.as_ref() == key {
            let value = attr.unescape_value().map_err(|err| DocxError::PartXml {
                part: part.to_string(),
                source: err,
            })?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// One entry of a relationships part
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relationship {
    /// Relationship id, e.g. `rId7`
    pub id: String,
    /// Relationship type URI
    pub kind: String,
    /// Target, relative to the `word/` directory unless external
    pub target: String,
    /// Whether the target lives outside the package (`TargetMode="External"`)
    pub external: bool,
}

impl Relationship {
    /// Whether this relationship points at an image part
    #[inline]
    #[must_use = "returns whether the relationship is an image"]
    pub fn is_image(&self) -> bool {
        self.kind.ends_with(IMAGE_RELATIONSHIP_SUFFIX)
    }
}

/// Relationships of the main document part, keyed by id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships {
    by_id: HashMap<String, Relationship>,
}

impl Relationships {
    /// Relationship with the given id
    #[inline]
    #[must_use = "returns the relationship, if present"]
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id)
    }

    /// Image relationships stored inside the package
    pub fn internal_images(&self) -> impl Iterator<Item = &Relationship> {
        self.by_id.values().filter(|r| r.is_image() && !r.external)
    }

    /// Number of relationships
    #[inline]
    #[must_use = "returns the relationship count"]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether there are no relationships
    #[inline]
    #[must_use = "returns whether there are no relationships"]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Parse `word/_rels/document.xml.rels`
///
/// # Errors
///
/// Returns [`DocxError::PartXml`] if the XML is malformed.
pub fn parse_relationships(xml_content: &str) -> Result<Relationships> {
    let mut relationships = Relationships::default();
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e) | Event::Start(e)) if e.name().as_ref() == b"Relationship" => {
                let id = get_attr(&e, b"Id", RELATIONSHIPS_PART)?;
                let target = get_attr(&e, b"Target", RELATIONSHIPS_PART)?;
                let kind = get_attr(&e, b"Type", RELATIONSHIPS_PART)?.unwrap_or_default();
                let external = get_attr(&e, b"TargetMode", RELATIONSHIPS_PART)?
                    .is_some_and(|mode| mode.eq_ignore_ascii_case("External"));

                if let (Some(id), Some(target)) = (id, target) {
                    relationships.by_id.insert(
                        id.clone(),
                        Relationship {
                            id,
                            kind,
                            target,
                            external,
                        },
                    );
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DocxError::PartXml {
                    part: RELATIONSHIPS_PART.to_string(),
                    source: e,
                })
            }
            _ => {}
        }
        buf.clear();
    }

    log::debug!("Parsed {} relationships", relationships.len());
    Ok(relationships)
}

/// Paragraph style names from `word/styles.xml`
///
/// Paragraphs reference styles by id (`Heading1`, `ListBullet`); classification
/// works on the display name (`heading 1`, `List Bullet`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap {
    names: HashMap<String, String>,
    default_paragraph: Option<String>,
}

impl StyleMap {
    /// Display name for a style id; the id itself when the style is unknown
    #[must_use = "returns the style display name"]
    pub fn name_for<'a>(&'a self, style_id: &'a str) -> &'a str {
        self.names.get(style_id).map_or(style_id, String::as_str)
    }

    /// Style name for a paragraph, falling back to the default paragraph style
    #[must_use = "returns the resolved style name"]
    pub fn resolve(&self, style_id: Option<&str>) -> Option<String> {
        match style_id {
            Some(id) => Some(self.name_for(id).to_string()),
            None => self
                .default_paragraph
                .as_deref()
                .map(|id| self.name_for(id).to_string()),
        }
    }

    /// Number of named styles
    #[inline]
    #[must_use = "returns the style count"]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no style was parsed
    #[inline]
    #[must_use = "returns whether the map is empty"]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Parse `word/styles.xml` into a style id → name map
///
/// # Errors
///
/// Returns [`DocxError::PartXml`] if the XML is malformed.
pub fn parse_styles(xml_content: &str) -> Result<StyleMap> {
    let mut styles = StyleMap::default();
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut current_style_id: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:style" => {
                current_style_id = get_attr(&e, b"w:styleId", STYLES_PART)?;
                let is_paragraph =
                    get_attr(&e, b"w:type", STYLES_PART)?.as_deref() == Some("paragraph");
                let is_default = get_attr(&e, b"w:default", STYLES_PART)?
                    .is_some_and(|v| v == "1" || v == "true");
                if is_paragraph && is_default {
                    styles.default_paragraph.clone_from(&current_style_id);
                }
            }
            Ok(Event::Empty(e)) if e.name().as_ref() == b"w:name" => {
                if let (Some(id), Some(name)) = (
                    current_style_id.as_ref(),
                    get_attr(&e, b"w:val", STYLES_PART)?,
                ) {
                    styles.names.insert(id.clone(), name);
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"w:style" => {
                current_style_id = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DocxError::PartXml {
                    part: STYLES_PART.to_string(),
                    source: e,
                })
            }
            _ => {}
        }
        buf.clear();
    }

    log::debug!(
        "Parsed {} styles (default paragraph style: {:?})",
        styles.len(),
        styles.default_paragraph
    );
    Ok(styles)
}
