//! DOCX ingestion for ICH M11 protocol documents
//!
//! Reads a WordprocessingML package into the [`m11_core::Document`] section
//! tree: paragraphs are classified by style and numbering, headings open
//! numbered sections, lists nest by level, tables keep one level of cells and
//! images are extracted once per document.
//!
//! ## Usage
//!
//! ```no_run
//! use m11_core::ConversionOptions;
//! use m11_docx::DocxConverter;
//!
//! let options = ConversionOptions::default().with_image_dir("uploads/3f2a/images");
//! let conversion = DocxConverter::new(options).convert_file("protocol.docx")?;
//!
//! let title_page = conversion.title_page();
//! println!("{}", title_page.get(m11_core::TitlePageField::FullTitle));
//!
//! for node in conversion.narrative().chain() {
//!     println!("{:?} {:?}", node.section_number, node.section_title);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Implementation Notes
//!
//! - Relationships and styles are read with `quick-xml`
//! - The body is walked as a DOM with `roxmltree`
//! - A table inside a table cell fails the whole conversion
//!   ([`DocxError::is_structural`]); every other irregularity is logged and
//!   degraded locally

pub mod archive;
pub mod builder;
pub mod classifier;
pub mod converter;
pub mod error;
pub mod images;
pub mod reader;

// Re-export main types
pub use builder::TreeBuilder;
pub use classifier::{BlockKind, Classifier};
pub use converter::{Conversion, DocxConverter};
pub use error::{DocxError, Result};
pub use images::ImageMap;
pub use reader::{Block, BlockReader, ParagraphBlock};
