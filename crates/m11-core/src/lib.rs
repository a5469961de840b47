//! # M11 Core - Protocol Document Model
//!
//! Format-agnostic model for clinical-trial protocols authored against the
//! ICH M11 template, plus the two consumers of a finished tree:
//!
//! - **Document tree**: [`Document`] owns numbered [`Section`]s; each section owns
//!   an ordered list of [`ContentItem`]s (paragraph, list, table, image).
//! - **Narrative content**: [`linearize`] flattens the sections into
//!   [`NarrativeContentNode`]s linked both as a tree (`childIds`) and as a
//!   sequence (`previousId` / `nextId`).
//! - **Title page**: [`TitlePageExtractor`] reads the fixed metadata rows of the
//!   first table in the document.
//!
//! Format readers (see the `m11-docx` crate) build the tree through
//! [`Document::add_section`] and the [`ItemContainer`] trait.
//!
//! ## Example
//!
//! ```
//! use m11_core::{ContentItem, Document, ItemContainer, Paragraph};
//!
//! let mut doc = Document::new();
//! doc.add_section(Some("Introduction".to_string()), 1)
//!     .add(ContentItem::Paragraph(Paragraph::new("Background")));
//! doc.add_section(Some("Rationale".to_string()), 2);
//!
//! let narrative = doc.narrative();
//! assert_eq!(narrative.len(), 2);
//! assert_eq!(narrative.nodes[0].child_ids, vec![narrative.nodes[1].id.clone()]);
//! ```
//!
//! ## Rendering
//!
//! | Item | Markup |
//! |------|--------|
//! | Heading | `<h1>1 Introduction</h1>` |
//! | Paragraph | `<p>text</p>` |
//! | List | `<ul><li>…</li></ul>` |
//! | Table | `<table><tr><td>…</td></tr></table>` |
//! | Image | `<img src="data:image/png;base64,…"/>` |

pub mod content;
pub mod document;
pub mod error;
pub mod narrative;
pub mod options;
pub mod render;
pub mod section;
pub mod title_page;

pub use content::*;
pub use document::*;
pub use error::*;
pub use narrative::*;
pub use options::*;
pub use render::*;
pub use section::*;
pub use title_page::*;
