//! Block-item stream reader
//!
//! Walks the direct children of `w:body` (or of a `w:tc` table cell) and yields
//! [`Block`]s in document order. The walk is lazy and single-pass: a
//! [`BlockReader`] is an iterator over borrowed XML nodes and cannot be rewound.
//!
//! - `w:p` → [`Block::Paragraph`] with its text, resolved style name, list
//!   marker level and embedded image relationship ids
//! - `w:tbl` → [`Block::Table`]; rows and cells are read on demand (also
//!   through content controls), and each cell's content is itself a [`BlockReader`]
//! - `w:sdt` → its `w:sdtContent` children are streamed in place
//! - `w:tcPr` → skipped silently (cell properties, read through [`CellBlock::grid_span`])
//! - anything else → skipped with a warning

use crate::archive::StyleMap;
use roxmltree::{Children, Node};

/// WordprocessingML main namespace
pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
/// Office document relationships namespace
pub const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
/// DrawingML main namespace
pub const A_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
/// Legacy VML namespace
pub const VML_NS: &str = "urn:schemas-microsoft-com:vml";

/// Whether `node` is the WordprocessingML element `local`
#[inline]
pub(crate) fn is_w(node: &Node<'_, '_>, local: &str) -> bool {
    node.is_element() && node.tag_name().namespace() == Some(W_NS) && node.tag_name().name() == local
}

/// First WordprocessingML child element named `local`
fn w_child<'a, 'input>(node: &Node<'a, 'input>, local: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| is_w(n, local))
}

/// `w:val` attribute of a WordprocessingML element
fn w_val<'a>(node: &Node<'a, '_>) -> Option<&'a str> {
    node.attribute((W_NS, "val"))
}

/// One paragraph as read from the document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParagraphBlock {
    /// Concatenated run text
    pub text: String,
    /// Style display name (`w:pStyle` resolved through styles.xml)
    pub style_name: Option<String>,
    /// Raw `w:numPr/w:ilvl` value, `"0"` when `w:numPr` has no `w:ilvl`
    pub list_level: Option<String>,
    /// Relationship ids of embedded graphics (`a:blip`, `v:imagedata`)
    pub image_rel_ids: Vec<String>,
}

impl ParagraphBlock {
    fn from_node(node: Node<'_, '_>, styles: &StyleMap) -> Self {
        let properties = w_child(&node, "pPr");
        let style_id = properties
            .and_then(|p| w_child(&p, "pStyle"))
            .and_then(|s| w_val(&s));

        let mut text = String::new();
        collect_text(node, &mut text);

        Self {
            text,
            style_name: styles.resolve(style_id),
            list_level: properties.and_then(|p| numbering_level(&p)),
            image_rel_ids: image_rel_ids(node),
        }
    }
}

/// List level from `w:pPr/w:numPr`; `w:numId w:val="0"` switches numbering off
fn numbering_level(properties: &Node<'_, '_>) -> Option<String> {
    let num_pr = w_child(properties, "numPr")?;
    if w_child(&num_pr, "numId").and_then(|n| w_val(&n)) == Some("0") {
        return None;
    }
    Some(
        w_child(&num_pr, "ilvl")
            .and_then(|l| w_val(&l))
            .unwrap_or("0")
            .to_string(),
    )
}

/// Append the visible text of a paragraph subtree
fn collect_text(node: Node<'_, '_>, out: &mut String) {
    for child in node.children().filter(Node::is_element) {
        if child.tag_name().namespace() != Some(W_NS) {
            // Drawings and VML shapes carry no paragraph text of their own
            continue;
        }
        match child.tag_name().name() {
            "t" => out.push_str(child.text().unwrap_or_default()),
            "tab" => out.push('\t'),
            "br" | "cr" => out.push('\n'),
            "noBreakHyphen" => out.push('-'),
            // Properties, deleted runs and text boxes
            "pPr" | "rPr" | "del" | "txbxContent" => {}
            _ => collect_text(child, out),
        }
    }
}

/// Relationship ids of every embedded graphic in a paragraph
fn image_rel_ids(node: Node<'_, '_>) -> Vec<String> {
    node.descendants()
        .filter(Node::is_element)
        .filter_map(|n| {
            let name = n.tag_name();
            match (name.namespace(), name.name()) {
                (Some(A_NS), "blip") => n.attribute((R_NS, "embed")),
                (Some(VML_NS), "imagedata") => n.attribute((R_NS, "id")),
                _ => None,
            }
        })
        .map(ToString::to_string)
        .collect()
}

/// Table and row property elements, read elsewhere or not at all
const TABLE_PROPERTIES: [&str; 4] = ["tblPr", "tblGrid", "trPr", "tblPrEx"];

/// Child elements named `wanted` (`w:tr` or `w:tc`), looking through content controls
fn table_parts<'a, 'input>(container: Node<'a, 'input>, wanted: &str) -> Vec<Node<'a, 'input>> {
    let mut parts = Vec::new();
    collect_table_parts(container, wanted, &mut parts);
    parts
}

fn collect_table_parts<'a, 'input>(
    container: Node<'a, 'input>,
    wanted: &str,
    parts: &mut Vec<Node<'a, 'input>>,
) {
    for child in container.children().filter(Node::is_element) {
        if is_w(&child, wanted) {
            parts.push(child);
        } else if is_w(&child, "sdt") {
            if let Some(content) = w_child(&child, "sdtContent") {
                collect_table_parts(content, wanted, parts);
            }
        } else if !TABLE_PROPERTIES.iter().any(|local| is_w(&child, local)) {
            log::warn!(
                "Ignoring unexpected element <{}> while reading <w:{wanted}> elements",
                child.tag_name().name()
            );
        }
    }
}

/// One table, read lazily
#[derive(Debug, Clone, Copy)]
pub struct TableBlock<'a, 'input> {
    node: Node<'a, 'input>,
    styles: &'a StyleMap,
}

impl<'a, 'input> TableBlock<'a, 'input> {
    /// Rows in document order
    pub fn rows(&self) -> impl Iterator<Item = RowBlock<'a, 'input>> + 'a {
        let styles = self.styles;
        table_parts(self.node, "tr")
            .into_iter()
            .map(move |node| RowBlock { node, styles })
    }
}

/// One table row
#[derive(Debug, Clone, Copy)]
pub struct RowBlock<'a, 'input> {
    node: Node<'a, 'input>,
    styles: &'a StyleMap,
}

impl<'a, 'input> RowBlock<'a, 'input> {
    /// Cells in document order
    pub fn cells(&self) -> impl Iterator<Item = CellBlock<'a, 'input>> + 'a {
        let styles = self.styles;
        table_parts(self.node, "tc")
            .into_iter()
            .map(move |node| CellBlock { node, styles })
    }
}

/// One table cell
#[derive(Debug, Clone, Copy)]
pub struct CellBlock<'a, 'input> {
    node: Node<'a, 'input>,
    styles: &'a StyleMap,
}

impl<'a, 'input> CellBlock<'a, 'input> {
    /// Number of grid columns spanned (`w:tcPr/w:gridSpan`, default 1)
    #[must_use = "returns the cell's column span"]
    pub fn grid_span(&self) -> usize {
        w_child(&self.node, "tcPr")
            .and_then(|p| w_child(&p, "gridSpan"))
            .and_then(|g| w_val(&g))
            .and_then(|v| v.parse().ok())
            .filter(|&span| span > 0)
            .unwrap_or(1)
    }

    /// Content of the cell as a block stream
    #[must_use = "returns a reader over the cell's blocks"]
    pub fn blocks(&self) -> BlockReader<'a, 'input> {
        BlockReader::new(self.node, self.styles)
    }
}

/// One body-level or cell-level block
#[derive(Debug, Clone)]
pub enum Block<'a, 'input> {
    /// `w:p`
    Paragraph(ParagraphBlock),
    /// `w:tbl`
    Table(TableBlock<'a, 'input>),
}

/// Lazy iterator over the blocks of a container (`w:body`, `w:tc`)
pub struct BlockReader<'a, 'input> {
    styles: &'a StyleMap,
    // Children of the container, then of any open content controls
    stack: Vec<Children<'a, 'input>>,
}

impl<'a, 'input> BlockReader<'a, 'input> {
    /// Read the direct children of `container`
    #[must_use = "returns a reader over the container's blocks"]
    pub fn new(container: Node<'a, 'input>, styles: &'a StyleMap) -> Self {
        Self {
            styles,
            stack: vec![container.children()],
        }
    }
}

impl<'a, 'input> Iterator for BlockReader<'a, 'input> {
    type Item = Block<'a, 'input>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = match self.stack.last_mut()?.next() {
                Some(node) => node,
                None => {
                    self.stack.pop();
                    continue;
                }
            };
            if !node.is_element() {
                continue;
            }

            if is_w(&node, "p") {
                return Some(Block::Paragraph(ParagraphBlock::from_node(node, self.styles)));
            }
            if is_w(&node, "tbl") {
                return Some(Block::Table(TableBlock {
                    node,
                    styles: self.styles,
                }));
            }
            if is_w(&node, "sdt") {
                if let Some(content) = w_child(&node, "sdtContent") {
                    self.stack.push(content.children());
                }
                continue;
            }
            if is_w(&node, "tcPr") {
                continue;
            }
            log::warn!(
                "Ignoring unexpected element <{}> in block stream",
                node.tag_name().name()
            );
        }
    }
}
