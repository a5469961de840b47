//! Section tree construction from a block stream
//!
//! Per container (the current section, or a table cell):
//!
//! | Block | Action |
//! |-------|--------|
//! | Heading | start a new numbered section (ends any open list) |
//! | List item | continue the open list or start one |
//! | Image | append an image item |
//! | Plain text | append a paragraph (ends any open list) |
//! | Table | build rows and cells; each cell runs the same rules |
//!
//! A table inside a table cell aborts the build with
//! [`M11Error::TableWithinTable`]; nothing else does.

use crate::classifier::{strip_bullet, BlockKind, Classifier};
use crate::reader::{Block, ParagraphBlock, TableBlock};
use m11_core::{
    ContentItem, Document, Image, ItemContainer, ListItem, M11Error, Paragraph, Result, Table,
    TableCell, TableRow,
};

/// Label used in errors raised before the first heading
const ROOT_LABEL: &str = "root";

/// Builds a [`Document`] from body blocks
#[derive(Debug)]
pub struct TreeBuilder<'c> {
    classifier: Classifier<'c>,
    document: Document,
}

impl<'c> TreeBuilder<'c> {
    /// Create a builder over an empty document
    #[must_use = "creates a tree builder"]
    pub fn new(classifier: Classifier<'c>) -> Self {
        Self {
            classifier,
            document: Document::new(),
        }
    }

    /// Consume the body blocks and return the finished document
    ///
    /// # Errors
    ///
    /// Returns [`M11Error::TableWithinTable`] if a table cell contains a table.
    /// No partial document is returned.
    pub fn build<'a, 'input, I>(mut self, blocks: I) -> Result<Document>
    where
        I: IntoIterator<Item = Block<'a, 'input>>,
        'input: 'a,
    {
        for block in blocks {
            match block {
                Block::Paragraph(paragraph) => self.add_paragraph(&paragraph),
                Block::Table(table) => {
                    let table = self.build_table(&table)?;
                    self.document
                        .current_section_mut()
                        .add(ContentItem::Table(table));
                }
            }
        }
        log::debug!(
            "Built document with {} numbered sections",
            self.document.numbered_sections().len()
        );
        Ok(self.document)
    }

    fn add_paragraph(&mut self, paragraph: &ParagraphBlock) {
        match self.classifier.classify(paragraph) {
            BlockKind::Heading(level) => {
                let title = paragraph.text.trim();
                let title = (!title.is_empty()).then(|| title.to_string());
                self.document.add_section(title, level);
            }
            kind => add_content(self.document.current_section_mut(), kind, paragraph),
        }
    }

    fn build_table(&self, block: &TableBlock<'_, '_>) -> Result<Table> {
        let mut table = Table::new();
        for row_block in block.rows() {
            let mut row = TableRow::default();
            for cell_block in row_block.cells() {
                let mut cell = TableCell::new(cell_block.grid_span());
                for block in cell_block.blocks() {
                    match block {
                        Block::Paragraph(paragraph) => self.add_cell_paragraph(&mut cell, &paragraph),
                        Block::Table(_) => {
                            let section = self
                                .document
                                .current_section()
                                .number
                                .clone()
                                .unwrap_or_else(|| ROOT_LABEL.to_string());
                            log::error!("Table within table detected in section {section}");
                            return Err(M11Error::TableWithinTable { section });
                        }
                    }
                }
                row.cells.push(cell);
            }
            table.rows.push(row);
        }
        Ok(table)
    }

    fn add_cell_paragraph(&self, cell: &mut TableCell, paragraph: &ParagraphBlock) {
        match self.classifier.classify(paragraph) {
            BlockKind::Heading(level) => {
                log::debug!(
                    "Heading level {level} inside table cell kept as paragraph: {:?}",
                    paragraph.text
                );
                add_content(cell, BlockKind::PlainText, paragraph);
            }
            kind => add_content(cell, kind, paragraph),
        }
    }
}

/// Append a non-heading paragraph to a section or cell
fn add_content<C: ItemContainer>(container: &mut C, kind: BlockKind, paragraph: &ParagraphBlock) {
    match kind {
        BlockKind::ListItem(level) => {
            container.add_list_item(ListItem::new(strip_bullet(&paragraph.text), level));
        }
        BlockKind::Image(path) => container.add(ContentItem::Image(Image::new(path))),
        BlockKind::PlainText | BlockKind::Heading(_) => {
            container.add(ContentItem::Paragraph(Paragraph::new(paragraph.text.as_str())));
        }
    }
}
