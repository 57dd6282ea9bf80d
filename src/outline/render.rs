//! Text rendering and row flattening for outline consumers

use std::fmt::Write;

use super::StructureNode;

/// A node as it appears in a flattened, partially expanded tree
#[derive(Debug, Clone, Copy)]
pub struct VisibleRow<'a> {
    pub depth: usize,
    pub node: &'a StructureNode,
}

/// Flatten the tree into rows, skipping children of collapsed nodes
///
/// Row indices match what a list-style tree view shows, so a sink can map a
/// selected row back to its node.
pub fn visible_rows<'a>(
    roots: &'a [StructureNode],
    is_collapsed: impl Fn(&StructureNode) -> bool,
) -> Vec<VisibleRow<'a>> {
    fn walk<'a>(
        nodes: &'a [StructureNode],
        depth: usize,
        is_collapsed: &dyn Fn(&StructureNode) -> bool,
        rows: &mut Vec<VisibleRow<'a>>,
    ) {
        for node in nodes {
            rows.push(VisibleRow { depth, node });
            if node.is_collapsible() && !is_collapsed(node) {
                walk(&node.children, depth + 1, is_collapsed, rows);
            }
        }
    }

    let mut rows = Vec::new();
    walk(roots, 0, &is_collapsed, &mut rows);
    rows
}

/// Render the full tree as indented text, one node per line
///
/// ```text
/// class Widget (class) L3
///   fn draw (method) L4
/// TODO fix this L12
/// ```
pub fn render_tree(roots: &[StructureNode]) -> String {
    let mut out = String::new();
    for row in visible_rows(roots, |_| false) {
        let node = row.node;
        let _ = write!(out, "{}{} {}", "  ".repeat(row.depth), node.kind.label(), node.name);
        // Annotation detail is the tag itself, already shown by the label
        if let Some(detail) = node.detail.as_deref().filter(|_| !node.kind.is_annotation()) {
            let _ = write!(out, " {}", detail);
        }
        let _ = writeln!(out, " L{}", node.range.start.line + 1);
    }
    out
}
