//! Structure outline model and extraction stages
//!
//! An outline is an ordered list of root [`StructureNode`]s built from two
//! sources: the symbols reported by a [`crate::provider::SymbolProvider`]
//! and the TODO/FIXME style annotations found in comments.
//!
//! ```text
//! provider symbols ─→ classify_symbols ─┐
//!                                       ├─→ merge_outline ─→ roots
//! buffer text ─────→ scan_annotations ──┘
//! ```

mod annotations;
mod classify;
mod merge;
mod render;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use annotations::{scan_annotations, AnnotationTag};
pub use classify::{classify_symbols, ClassifyOptions, DroppedChildren};
pub use merge::merge_outline;
pub use render::{render_tree, visible_rows, VisibleRow};

/// Node kind for display and categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureKind {
    Class,
    Function,
    Interface,
    Variable,
    Namespace,
    Enum,
    Todo,
    Fixme,
    Note,
}

impl StructureKind {
    /// Lowercase kind name, as shown in descriptions and tooltips
    pub fn name(&self) -> &'static str {
        match self {
            StructureKind::Class => "class",
            StructureKind::Function => "function",
            StructureKind::Interface => "interface",
            StructureKind::Variable => "variable",
            StructureKind::Namespace => "namespace",
            StructureKind::Enum => "enum",
            StructureKind::Todo => "todo",
            StructureKind::Fixme => "fixme",
            StructureKind::Note => "note",
        }
    }

    /// Short label for rendering in the outline tree
    pub fn label(&self) -> &'static str {
        match self {
            StructureKind::Class => "class",
            StructureKind::Function => "fn",
            StructureKind::Interface => "iface",
            StructureKind::Variable => "var",
            StructureKind::Namespace => "ns",
            StructureKind::Enum => "enum",
            StructureKind::Todo => "TODO",
            StructureKind::Fixme => "FIXME",
            StructureKind::Note => "NOTE",
        }
    }

    /// Theme icon identifier used by tree-view hosts
    pub fn icon(&self) -> &'static str {
        match self {
            StructureKind::Class => "symbol-class",
            StructureKind::Function => "symbol-method",
            StructureKind::Interface => "symbol-interface",
            StructureKind::Variable => "symbol-variable",
            StructureKind::Namespace => "symbol-namespace",
            StructureKind::Enum => "symbol-enum",
            StructureKind::Todo | StructureKind::Fixme | StructureKind::Note => "symbol-misc",
        }
    }

    /// Whether this kind comes from a comment annotation rather than a symbol
    pub fn is_annotation(&self) -> bool {
        matches!(
            self,
            StructureKind::Todo | StructureKind::Fixme | StructureKind::Note
        )
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A position in the buffer (line and column are 0-based, column in chars)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Create a new position
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Half-open `[start, end)` range over a buffer snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutlineRange {
    pub start: Position,
    pub end: Position,
}

impl OutlineRange {
    /// Create a range, swapping the endpoints if they arrive reversed
    pub fn new(start: Position, end: Position) -> Self {
        if end < start {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    /// Range confined to a single line
    pub fn on_line(line: usize, start_col: usize, end_col: usize) -> Self {
        Self::new(Position::new(line, start_col), Position::new(line, end_col))
    }

    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }

    /// Whether `other` lies entirely within this range
    pub fn contains(&self, other: &OutlineRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// A single node in the outline tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureNode {
    pub name: String,
    pub kind: StructureKind,
    pub range: OutlineRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<StructureNode>,
}

impl StructureNode {
    /// Create a leaf node without detail
    pub fn new(name: impl Into<String>, kind: StructureKind, range: OutlineRange) -> Self {
        Self {
            name: name.into(),
            kind,
            range,
            detail: None,
            children: Vec::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_children(mut self, children: Vec<StructureNode>) -> Self {
        self.children = children;
        self
    }

    /// Whether this node has children (can be expanded/collapsed)
    pub fn is_collapsible(&self) -> bool {
        !self.children.is_empty()
    }

    /// One-line description: `kind - detail - Line N` (1-based line)
    pub fn description(&self) -> String {
        let line = format!("Line {}", self.range.start.line + 1);
        let mut parts = vec![self.kind.name()];
        if let Some(detail) = self.detail.as_deref().filter(|d| !d.is_empty()) {
            parts.push(detail);
        }
        parts.push(&line);
        parts.join(" - ")
    }

    /// Hover text: `kind: name` followed by the 1-based line
    pub fn tooltip(&self) -> String {
        format!(
            "{}: {}\nLine {}",
            self.kind.name(),
            self.name,
            self.range.start.line + 1
        )
    }

    /// Number of nodes in this subtree, including self
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(StructureNode::node_count).sum::<usize>()
    }

    /// Depth of this subtree (a leaf has depth 1)
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(StructureNode::depth)
            .max()
            .unwrap_or(0)
    }
}

/// Identity of an open buffer (typically its URI or path)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BufferId(pub String);

impl BufferId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BufferId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for BufferId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Complete outline for a buffer at one generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineSnapshot {
    pub buffer: BufferId,
    pub generation: u64,
    pub roots: Vec<StructureNode>,
}

impl OutlineSnapshot {
    /// Create an empty outline
    pub fn empty(buffer: BufferId, generation: u64) -> Self {
        Self {
            buffer,
            generation,
            roots: Vec::new(),
        }
    }

    /// Check if the outline has any nodes
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes across all roots
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(StructureNode::node_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_new_orders_endpoints() {
        let range = OutlineRange::new(Position::new(4, 2), Position::new(1, 0));
        assert_eq!(range.start, Position::new(1, 0));
        assert_eq!(range.end, Position::new(4, 2));
    }

    #[test]
    fn test_position_orders_by_line_then_column() {
        assert!(Position::new(1, 9) < Position::new(2, 0));
        assert!(Position::new(2, 1) < Position::new(2, 3));
    }

    #[test]
    fn test_description_and_tooltip() {
        let node = StructureNode::new(
            "fetchUser",
            StructureKind::Function,
            OutlineRange::on_line(9, 0, 20),
        )
        .with_detail("(function)");

        assert_eq!(node.description(), "function - (function) - Line 10");
        assert_eq!(node.tooltip(), "function: fetchUser\nLine 10");
    }

    #[test]
    fn test_description_skips_missing_detail() {
        let node =
            StructureNode::new("Shape", StructureKind::Class, OutlineRange::on_line(0, 0, 5));
        assert_eq!(node.description(), "class - Line 1");
    }

    #[test]
    fn test_node_count_and_depth() {
        let leaf = StructureNode::new("x", StructureKind::Variable, OutlineRange::on_line(2, 4, 5));
        let method =
            StructureNode::new("run", StructureKind::Function, OutlineRange::on_line(1, 2, 30))
                .with_children(vec![leaf]);
        let class =
            StructureNode::new("Runner", StructureKind::Class, OutlineRange::on_line(0, 0, 40))
                .with_children(vec![method]);

        assert_eq!(class.node_count(), 3);
        assert_eq!(class.depth(), 3);
        assert!(class.is_collapsible());
    }

    #[test]
    fn test_annotation_kinds() {
        assert!(StructureKind::Todo.is_annotation());
        assert!(StructureKind::Note.is_annotation());
        assert!(!StructureKind::Function.is_annotation());
    }
}
