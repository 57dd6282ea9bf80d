//! Outline merging
//!
//! Annotations are buffer-level facts: they always become roots, even when
//! their range falls inside a symbol. Only the root level is ordered here;
//! children keep the order classification gave them.

use super::StructureNode;

/// Merge classified symbol roots and annotation nodes into one root list
///
/// Stable sort by start position, so on equal starts symbols stay ahead of
/// annotations and each input keeps its own relative order.
pub fn merge_outline(
    symbols: Vec<StructureNode>,
    annotations: Vec<StructureNode>,
) -> Vec<StructureNode> {
    let mut roots = symbols;
    roots.extend(annotations);
    roots.sort_by_key(|node| node.range.start);
    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::{OutlineRange, Position, StructureKind};

    fn node(name: &str, kind: StructureKind, line: usize, col: usize) -> StructureNode {
        StructureNode::new(
            name,
            kind,
            OutlineRange::new(Position::new(line, col), Position::new(line + 2, 0)),
        )
    }

    fn names(nodes: &[StructureNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn test_interleaves_by_start() {
        let symbols = vec![
            node("Widget", StructureKind::Class, 2, 0),
            node("main", StructureKind::Function, 10, 0),
        ];
        let annotations = vec![
            node("later", StructureKind::Todo, 12, 3),
            node("first", StructureKind::Note, 0, 3),
            node("inside widget", StructureKind::Fixme, 4, 7),
        ];

        let merged = merge_outline(symbols, annotations);
        assert_eq!(
            names(&merged),
            vec!["first", "Widget", "inside widget", "main", "later"]
        );
    }

    #[test]
    fn test_annotations_never_nest() {
        let class = node("Widget", StructureKind::Class, 0, 0)
            .with_children(vec![node("draw", StructureKind::Function, 1, 4)]);
        let merged = merge_outline(vec![class], vec![node("inner", StructureKind::Todo, 1, 8)]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].children.len(), 1);
        assert_eq!(merged[1].kind, StructureKind::Todo);
    }

    #[test]
    fn test_ties_keep_symbols_first() {
        let merged = merge_outline(
            vec![node("sym", StructureKind::Variable, 3, 0)],
            vec![node("ann", StructureKind::Todo, 3, 0)],
        );
        assert_eq!(names(&merged), vec!["sym", "ann"]);
    }

    #[test]
    fn test_children_are_not_resorted() {
        let class = node("Widget", StructureKind::Class, 0, 0).with_children(vec![
            node("b", StructureKind::Function, 5, 0),
            node("a", StructureKind::Function, 1, 0),
        ]);
        let merged = merge_outline(vec![class], Vec::new());
        assert_eq!(names(&merged[0].children), vec!["b", "a"]);
    }

    #[test]
    fn test_is_deterministic() {
        let symbols = vec![
            node("x", StructureKind::Variable, 1, 0),
            node("y", StructureKind::Variable, 1, 0),
        ];
        let annotations = vec![node("t", StructureKind::Todo, 0, 0)];

        let first = merge_outline(symbols.clone(), annotations.clone());
        let second = merge_outline(symbols, annotations);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_empty_inputs() {
        assert!(merge_outline(Vec::new(), Vec::new()).is_empty());
    }
}
