//! Content items owned by sections and table cells
//!
//! A [`Section`](crate::Section) and a [`TableCell`] both hold an ordered list of
//! [`ContentItem`]s and share the same append rules through [`ItemContainer`].
//!
//! Lists are self-similar: items at the same level are siblings in one [`List`],
//! and each deeper level is a nested [`List`] stored as an entry of its parent.
//!
//! ```text
//! List(level 0)
//! ├── Item "a"
//! ├── List(level 1)
//! │   ├── Item "a.1"
//! │   └── Item "a.2"
//! └── Item "b"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Deepest list level kept as a distinct nesting level (Word supports 0..=8)
pub const MAX_LIST_LEVEL: usize = 8;

/// A block of content inside a section or table cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    /// Plain paragraph (possibly empty)
    Paragraph(Paragraph),
    /// Bulleted or numbered list
    List(List),
    /// Table of rows and cells
    Table(Table),
    /// Reference to an extracted image
    Image(Image),
}

impl ContentItem {
    /// Plain text of this item; lists and tables join their parts with newlines
    #[must_use = "returns the item's plain text"]
    pub fn text(&self) -> String {
        match self {
            Self::Paragraph(p) => p.text.clone(),
            Self::List(list) => list.text(),
            Self::Table(table) => table.text(),
            Self::Image(_) => String::new(),
        }
    }
}

/// Paragraph of plain text
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Paragraph {
    /// Paragraph text
    pub text: String,
}

impl Paragraph {
    /// Create a paragraph
    #[inline]
    #[must_use = "creates a paragraph"]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Single list entry text at a nesting level
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListItem {
    /// Item text
    pub text: String,
    /// Nesting level (0 = outermost)
    pub level: usize,
}

impl ListItem {
    /// Create a list item
    #[inline]
    #[must_use = "creates a list item"]
    pub fn new(text: impl Into<String>, level: usize) -> Self {
        Self {
            text: text.into(),
            level,
        }
    }
}

/// Entry of a [`List`]: either an item or a nested list one level deeper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ListEntry {
    /// List item at the owning list's level
    Item(ListItem),
    /// Nested list at the owning list's level + 1
    List(List),
}

/// Ordered list of items at one level, with nested lists for deeper levels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    /// Level of the items directly owned by this list
    pub level: usize,
    /// Items and nested lists in document order
    pub items: Vec<ListEntry>,
}

impl List {
    /// Create an empty list at `level`
    #[inline]
    #[must_use = "creates an empty list"]
    pub const fn new(level: usize) -> Self {
        Self {
            level,
            items: Vec::new(),
        }
    }

    /// Append an item, descending into (or creating) nested lists as needed.
    ///
    /// - Same level as this list: appended as a sibling.
    /// - Deeper: appended to the trailing nested list, which is created when
    ///   absent. A jump of more than one level creates each intermediate list and
    ///   logs a warning.
    /// - Shallower than this list: no open list matches, so the item is logged as
    ///   an error and attached to this list, the closest level available.
    pub fn add(&mut self, mut item: ListItem) {
        if item.level > MAX_LIST_LEVEL {
            log::warn!(
                "List item level {} exceeds maximum {MAX_LIST_LEVEL}, clamping",
                item.level
            );
            item.level = MAX_LIST_LEVEL;
        }

        if item.level < self.level {
            log::error!(
                "Failed to place list item at level {} in list rooted at level {}; attaching at level {}: {:?}",
                item.level,
                self.level,
                self.level,
                item.text
            );
            self.items.push(ListEntry::Item(item));
            return;
        }

        let innermost = self.innermost_level();
        if item.level > innermost + 1 {
            log::warn!(
                "List level jump from {innermost} to {} for item {:?}",
                item.level,
                item.text
            );
        }
        self.insert(item);
    }

    fn insert(&mut self, item: ListItem) {
        if item.level == self.level {
            self.items.push(ListEntry::Item(item));
            return;
        }
        if !matches!(self.items.last(), Some(ListEntry::List(_))) {
            self.items.push(ListEntry::List(Self::new(self.level + 1)));
        }
        if let Some(ListEntry::List(nested)) = self.items.last_mut() {
            nested.insert(item);
        }
    }

    /// Level of the deepest list reachable through trailing nested lists
    #[must_use = "returns the deepest open list level"]
    pub fn innermost_level(&self) -> usize {
        match self.items.last() {
            Some(ListEntry::List(nested)) => nested.innermost_level(),
            _ => self.level,
        }
    }

    /// Number of items in this list and all nested lists
    #[must_use = "returns the total item count"]
    pub fn item_count(&self) -> usize {
        self.items
            .iter()
            .map(|entry| match entry {
                ListEntry::Item(_) => 1,
                ListEntry::List(nested) => nested.item_count(),
            })
            .sum()
    }

    /// Item texts in document order, one per line
    #[must_use = "returns the list's plain text"]
    pub fn text(&self) -> String {
        self.items
            .iter()
            .map(|entry| match entry {
                ListEntry::Item(item) => item.text.clone(),
                ListEntry::List(nested) => nested.text(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Table of rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Rows in document order
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Create an empty table
    #[inline]
    #[must_use = "creates an empty table"]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Text of the cell at `row`/`col`, if present
    #[must_use = "returns the cell text"]
    pub fn cell_text(&self, row: usize, col: usize) -> Option<String> {
        self.rows
            .get(row)
            .and_then(|r| r.cells.get(col))
            .map(TableCell::text)
    }

    /// Table text with cells separated by tabs and rows by newlines
    #[must_use = "returns the table's plain text"]
    pub fn text(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.cells
                    .iter()
                    .map(TableCell::text)
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Table row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in document order
    pub cells: Vec<TableCell>,
}

/// Table cell holding its own content items (never a table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCell {
    /// Number of grid columns this cell spans
    pub col_span: usize,
    /// Paragraphs, lists and images in document order
    pub items: Vec<ContentItem>,
}

impl Default for TableCell {
    fn default() -> Self {
        Self::new(1)
    }
}

impl TableCell {
    /// Create an empty cell spanning `col_span` columns
    #[inline]
    #[must_use = "creates an empty table cell"]
    pub const fn new(col_span: usize) -> Self {
        Self {
            col_span,
            items: Vec::new(),
        }
    }

    /// Cell text: item texts joined by newlines
    #[must_use = "returns the cell's plain text"]
    pub fn text(&self) -> String {
        self.items
            .iter()
            .map(ContentItem::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Image extracted from the document package
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Image {
    /// Location of the extracted image file
    pub path: PathBuf,
}

impl Image {
    /// Create an image reference
    #[inline]
    #[must_use = "creates an image reference"]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Shared append behaviour for anything that owns content items
pub trait ItemContainer {
    /// Items in document order
    fn items(&self) -> &[ContentItem];

    /// Mutable access to the items
    fn items_mut(&mut self) -> &mut Vec<ContentItem>;

    /// Whether the last item is an open list
    fn is_in_list(&self) -> bool {
        matches!(self.items().last(), Some(ContentItem::List(_)))
    }

    /// The trailing list, if the container is in a list
    fn current_list_mut(&mut self) -> Option<&mut List> {
        match self.items_mut().last_mut() {
            Some(ContentItem::List(list)) => Some(list),
            _ => None,
        }
    }

    /// Append any item; a non-list item closes an open list
    fn add(&mut self, item: ContentItem) {
        self.items_mut().push(item);
    }

    /// Append a list item, continuing the open list or starting a new one at
    /// the item's level
    fn add_list_item(&mut self, item: ListItem) {
        if let Some(list) = self.current_list_mut() {
            list.add(item);
            return;
        }
        let mut list = List::new(item.level.min(MAX_LIST_LEVEL));
        list.add(item);
        self.add(ContentItem::List(list));
    }
}

impl ItemContainer for TableCell {
    #[inline]
    fn items(&self) -> &[ContentItem] {
        &self.items
    }

    #[inline]
    fn items_mut(&mut self) -> &mut Vec<ContentItem> {
        &mut self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(text: &str, level: usize) -> ListItem {
        ListItem::new(text, level)
    }

    #[test]
    fn test_list_siblings_stay_flat() {
        let mut list = List::new(0);
        list.add(item("a", 0));
        list.add(item("b", 0));
        assert_eq!(list.items.len(), 2);
        assert!(list
            .items
            .iter()
            .all(|e| matches!(e, ListEntry::Item(_))));
    }

    #[test]
    fn test_list_nests_one_level() {
        let mut list = List::new(0);
        list.add(item("a", 0));
        list.add(item("a.1", 1));
        list.add(item("a.2", 1));
        list.add(item("b", 0));

        assert_eq!(list.items.len(), 3);
        let ListEntry::List(nested) = &list.items[1] else {
            panic!("expected nested list, got {:?}", list.items[1]);
        };
        assert_eq!(nested.level, 1);
        assert_eq!(nested.items.len(), 2);
        assert!(matches!(&list.items[2], ListEntry::Item(i) if i.text == "b"));
    }

    #[test]
    fn test_list_jump_creates_intermediate_levels() {
        let mut list = List::new(0);
        list.add(item("a", 0));
        list.add(item("deep", 2));

        let ListEntry::List(level1) = &list.items[1] else {
            panic!("expected level 1 list");
        };
        assert_eq!(level1.level, 1);
        assert_eq!(level1.items.len(), 1);
        let ListEntry::List(level2) = &level1.items[0] else {
            panic!("expected level 2 list");
        };
        assert_eq!(level2.level, 2);
        assert!(matches!(&level2.items[0], ListEntry::Item(i) if i.text == "deep"));
        assert_eq!(list.innermost_level(), 2);
    }

    #[test]
    fn test_list_returns_to_intermediate_level() {
        let mut list = List::new(0);
        list.add(item("a", 0));
        list.add(item("a.1", 1));
        list.add(item("a.1.1", 2));
        list.add(item("a.2", 1));

        let ListEntry::List(level1) = &list.items[1] else {
            panic!("expected level 1 list");
        };
        assert_eq!(level1.items.len(), 3);
        assert!(matches!(&level1.items[2], ListEntry::Item(i) if i.text == "a.2"));
        assert_eq!(list.innermost_level(), 1);
    }

    #[test]
    fn test_list_shallower_than_root_attaches_at_root() {
        let mut list = List::new(1);
        list.add(item("x", 1));
        list.add(item("y", 0));
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.item_count(), 2);
    }

    #[test]
    fn test_list_level_clamped() {
        let mut list = List::new(0);
        list.add(item("huge", 10_000));
        assert_eq!(list.innermost_level(), MAX_LIST_LEVEL);
        assert_eq!(list.item_count(), 1);
    }

    #[test]
    fn test_container_continues_open_list() {
        let mut cell = TableCell::default();
        cell.add_list_item(item("a", 0));
        cell.add_list_item(item("b", 0));
        assert_eq!(cell.items.len(), 1);
        assert!(cell.is_in_list());

        cell.add(ContentItem::Paragraph(Paragraph::new("break")));
        assert!(!cell.is_in_list());

        cell.add_list_item(item("c", 0));
        assert_eq!(cell.items.len(), 3);
    }

    #[test]
    fn test_container_new_list_rooted_at_first_level() {
        let mut cell = TableCell::default();
        cell.add_list_item(item("indented", 2));
        let Some(ContentItem::List(list)) = cell.items.first() else {
            panic!("expected list");
        };
        assert_eq!(list.level, 2);
    }

    #[test]
    fn test_cell_text_joins_items() {
        let mut cell = TableCell::new(2);
        cell.add(ContentItem::Paragraph(Paragraph::new("Sponsor Ltd")));
        cell.add(ContentItem::Paragraph(Paragraph::new("1 Main Street")));
        assert_eq!(cell.text(), "Sponsor Ltd\n1 Main Street");
        assert_eq!(cell.col_span, 2);
    }

    #[test]
    fn test_table_cell_text_lookup() {
        let mut label = TableCell::default();
        label.add(ContentItem::Paragraph(Paragraph::new("Full Title")));
        let mut value = TableCell::default();
        value.add(ContentItem::Paragraph(Paragraph::new("My Study")));
        let table = Table {
            rows: vec![TableRow {
                cells: vec![label, value],
            }],
        };
        assert_eq!(table.cell_text(0, 1).as_deref(), Some("My Study"));
        assert_eq!(table.cell_text(1, 0), None);
        assert_eq!(table.text(), "Full Title\tMy Study");
    }

    #[test]
    fn test_content_item_serde_tag() {
        let item = ContentItem::Paragraph(Paragraph::new("hi"));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "paragraph");
        assert_eq!(json["text"], "hi");
    }
}
