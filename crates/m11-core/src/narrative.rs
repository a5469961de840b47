//! Narrative content linearization
//!
//! Flattens the section list into [`NarrativeContentNode`]s that carry both
//! tree links (`child_ids`) and sequence links (`previous_id` / `next_id`).
//!
//! # Algorithm
//!
//! 1. **Tree emission**: a recursive walk over the sections with an expected
//!    level, starting at level 1 under a synthetic root. A section at the
//!    expected level is emitted and attached to the current parent; a deeper
//!    section recurses under the previously emitted sibling; a shallower section
//!    ends the current subtree. Each call returns how many sections it consumed
//!    together with the ids it attached, so no cursor is shared between calls.
//! 2. **Sequential linking**: nodes are linked in emission order, which is the
//!    pre-order of the tree.
//!
//! A section deeper than expected with no previous sibling to hang from is
//! logged and skipped.

use crate::error::Result;
use crate::section::SectionLike;
use serde::{Deserialize, Serialize};

/// Id given to the synthetic root node
pub const ROOT_ID: &str = "NarrativeContent_Root";

const ID_PREFIX: &str = "NarrativeContent_";

/// One narrative content record derived from a section
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeContentNode {
    /// Unique id within one linearization
    pub id: String,
    /// Section number copied from the source section
    pub section_number: Option<String>,
    /// Section title copied from the source section
    pub section_title: Option<String>,
    /// Rendered heading and items of the section
    pub text: String,
    /// Ids of direct children, in document order
    pub child_ids: Vec<String>,
    /// Id of the preceding node in emission order
    pub previous_id: Option<String>,
    /// Id of the following node in emission order
    pub next_id: Option<String>,
}

/// Synthetic root that parents the top-level nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeRoot {
    /// Always [`ROOT_ID`]
    pub id: String,
    /// Ids of the top-level nodes
    pub child_ids: Vec<String>,
}

/// Result of linearizing a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    /// Synthetic root
    pub root: NarrativeRoot,
    /// Nodes in emission (pre-order) order, doubly linked
    pub nodes: Vec<NarrativeContentNode>,
}

impl Narrative {
    /// Number of emitted nodes (the synthetic root excluded)
    #[inline]
    #[must_use = "returns the node count"]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no section was emitted
    #[inline]
    #[must_use = "returns whether the narrative is empty"]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node with the given id
    #[must_use = "returns the node, if present"]
    pub fn get(&self, id: &str) -> Option<&NarrativeContentNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Node emitted for the section with the given number
    #[must_use = "returns the node, if present"]
    pub fn by_section_number(&self, number: &str) -> Option<&NarrativeContentNode> {
        self.nodes
            .iter()
            .find(|n| n.section_number.as_deref() == Some(number))
    }

    /// Walk the `next_id` chain from the first node
    ///
    /// Linked nodes are normally adjacent in `nodes`; a link to any other
    /// position falls back to an id search.
    pub fn chain(&self) -> impl Iterator<Item = &NarrativeContentNode> {
        let mut index = 0;
        let mut current = self.nodes.first();
        std::iter::from_fn(move || {
            let node = current?;
            current = node.next_id.as_deref().and_then(|id| {
                index = match self.nodes.get(index + 1) {
                    Some(next) if next.id == id => index + 1,
                    _ => self.nodes.iter().position(|n| n.id == id)?,
                };
                self.nodes.get(index)
            });
            Some(node)
        })
    }

    /// Serialize to pretty JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Sequential id source scoped to one linearization
#[derive(Debug, Default)]
struct IdGenerator {
    next: usize,
}

impl IdGenerator {
    fn next_id(&mut self) -> String {
        self.next += 1;
        format!("{ID_PREFIX}{}", self.next)
    }
}

struct Linearizer<'a, S> {
    sections: &'a [S],
    ids: IdGenerator,
    nodes: Vec<NarrativeContentNode>,
}

impl<'a, S: SectionLike> Linearizer<'a, S> {
    fn new(sections: &'a [S]) -> Self {
        Self {
            sections,
            ids: IdGenerator::default(),
            nodes: Vec::with_capacity(sections.len()),
        }
    }

    /// Emit the subtree starting at `start` whose members sit at `level`.
    ///
    /// Returns the number of sections consumed and the ids attached at this level.
    fn walk(&mut self, start: usize, level: usize) -> (usize, Vec<String>) {
        let sections = self.sections;
        let mut cursor = start;
        let mut child_ids = Vec::new();
        let mut previous: Option<usize> = None;

        while let Some(section) = sections.get(cursor) {
            let section_level = section.level();
            if section_level == level {
                let index = self.emit(section);
                child_ids.push(self.nodes[index].id.clone());
                previous = Some(index);
                cursor += 1;
            } else if section_level > level {
                if let Some(parent) = previous {
                    let (consumed, ids) = self.walk(cursor, level + 1);
                    self.nodes[parent].child_ids.extend(ids);
                    cursor += consumed;
                } else {
                    log::error!(
                        "Section {:?} {:?} at level {section_level} has no parent at level {level}, skipping",
                        section.number(),
                        section.title()
                    );
                    cursor += 1;
                }
            } else {
                break;
            }
        }

        (cursor - start, child_ids)
    }

    fn emit(&mut self, section: &S) -> usize {
        self.nodes.push(NarrativeContentNode {
            id: self.ids.next_id(),
            section_number: section.number().map(ToString::to_string),
            section_title: section.title().map(ToString::to_string),
            text: section.to_html(),
            child_ids: Vec::new(),
            previous_id: None,
            next_id: None,
        });
        self.nodes.len() - 1
    }
}

/// Assign `previous_id`/`next_id` in slice order
fn link(nodes: &mut [NarrativeContentNode]) {
    let ids: Vec<String> = nodes.iter().map(|n| n.id.clone()).collect();
    for (i, node) in nodes.iter_mut().enumerate() {
        node.previous_id = i.checked_sub(1).map(|p| ids[p].clone());
        node.next_id = ids.get(i + 1).cloned();
    }
}

/// Linearize `sections` (the document root excluded) into linked narrative nodes
#[must_use = "returns the linearized narrative content"]
pub fn linearize<S: SectionLike>(sections: &[S]) -> Narrative {
    let mut linearizer = Linearizer::new(sections);
    let mut cursor = 0;
    let mut root_children = Vec::new();

    // A shallower section ends the level-1 walk early; restart there so the
    // whole list is consumed.
    while cursor < sections.len() {
        let (consumed, ids) = linearizer.walk(cursor, 1);
        root_children.extend(ids);
        if consumed == 0 {
            log::error!(
                "Section {:?} at level {} is above the top level, skipping",
                sections[cursor].number(),
                sections[cursor].level()
            );
            cursor += 1;
        } else {
            cursor += consumed;
        }
    }

    let mut nodes = linearizer.nodes;
    link(&mut nodes);
    log::debug!("Linearized {} sections into {} nodes", sections.len(), nodes.len());

    Narrative {
        root: NarrativeRoot {
            id: ROOT_ID.to_string(),
            child_ids: root_children,
        },
        nodes,
    }
}
