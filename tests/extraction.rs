//! End-to-end extraction tests
//!
//! Run the full pipeline (provider, annotation scan, classification, merge)
//! against the built-in providers.

use futures::executor::block_on;

use structure_outline::config::OutlineConfig;
use structure_outline::extract::{extract_outline, ExtractionRequest, ExtractionSettings};
use structure_outline::outline::{DroppedChildren, StructureNode};
use structure_outline::provider::{NativeKind, StaticSymbolProvider, TreeSitterProvider};
use structure_outline::{BufferId, StructureKind};

fn request(buffer: &str, language: &str, content: &str) -> ExtractionRequest {
    ExtractionRequest {
        buffer: BufferId::new(buffer),
        language: language.to_string(),
        content: content.to_string(),
        generation: 1,
    }
}

fn names(nodes: &[StructureNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.name.as_str()).collect()
}

const TSX_SAMPLE: &str = r#"// NOTE: user widgets
export function UserCard() {
  return null;
}

export function useFetchData() {
  return null;
}

const limit = 10;

/* FIXME: remove
 * after migration */
"#;

#[test]
fn test_tsx_outline_with_heuristics_and_annotations() {
    let provider = TreeSitterProvider::new();
    let roots = block_on(extract_outline(
        &provider,
        &request("widgets.tsx", "typescriptreact", TSX_SAMPLE),
        &ExtractionSettings::default(),
    ));

    assert_eq!(
        names(&roots),
        vec![
            "user widgets",
            "UserCard",
            "useFetchData",
            "limit",
            "remove after migration"
        ]
    );
    assert_eq!(roots[0].kind, StructureKind::Note);
    assert_eq!(roots[1].detail.as_deref(), Some("(component)"));
    assert_eq!(roots[2].detail.as_deref(), Some("(hook)"));
    assert_eq!(roots[3].kind, StructureKind::Variable);
    assert_eq!(roots[3].detail.as_deref(), Some("(variable)"));
    assert_eq!(roots[4].kind, StructureKind::Fixme);
    assert_eq!(roots[4].range.start.line, 11);
    assert_eq!(roots[4].range.end.line, 12);
}

#[test]
fn test_python_class_nests_methods() {
    let source = "class Repo:\n    # TODO: cache results\n    def load(self):\n        pass\n";
    let provider = TreeSitterProvider::new();
    let roots = block_on(extract_outline(
        &provider,
        &request("repo.py", "python", source),
        &ExtractionSettings::default(),
    ));

    assert_eq!(names(&roots), vec!["Repo", "cache results"]);
    assert_eq!(roots[0].kind, StructureKind::Class);
    assert_eq!(names(&roots[0].children), vec!["load"]);
    assert_eq!(roots[0].children[0].detail.as_deref(), Some("(method)"));
}

#[test]
fn test_todo_range_stays_on_its_line() {
    let source = "let a = 1;\nlet b = 2;\n// TODO: fix this\nlet c = 3;\n";
    let roots = block_on(extract_outline(
        &StaticSymbolProvider::absent(),
        &request("a.js", "javascript", source),
        &ExtractionSettings::default(),
    ));

    assert_eq!(roots.len(), 1);
    let todo = &roots[0];
    assert_eq!(todo.kind, StructureKind::Todo);
    assert_eq!(todo.name, "fix this");
    assert_eq!(todo.detail.as_deref(), Some("TODO"));
    assert_eq!(todo.range.start.line, 2);
    assert_eq!(todo.range.end.line, 2);
}

const SYMBOLS_JSON: &str = r#"[
  { "name": "UserCard", "kind": "function",
    "range": { "start": { "line": 0, "column": 0 }, "end": { "line": 3, "column": 1 } } },
  { "name": "helper", "kind": "function",
    "range": { "start": { "line": 5, "column": 0 }, "end": { "line": 7, "column": 1 } } },
  { "name": "CONFIG", "kind": "constant",
    "range": { "start": { "line": 9, "column": 0 }, "end": { "line": 12, "column": 2 } },
    "children": [
      { "name": "port", "kind": "property",
        "range": { "start": { "line": 10, "column": 2 }, "end": { "line": 10, "column": 12 } } }
    ] }
]"#;

fn static_provider() -> StaticSymbolProvider {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("symbols.json");
    std::fs::write(&path, SYMBOLS_JSON).unwrap();
    StaticSymbolProvider::from_file(&path).unwrap()
}

#[test]
fn test_component_survives_function_exclusion() {
    let config = OutlineConfig {
        excluded_kinds: vec![NativeKind::Function],
        ..OutlineConfig::default()
    };
    let roots = block_on(extract_outline(
        &static_provider(),
        &request("app.jsx", "javascriptreact", ""),
        &ExtractionSettings::from(&config),
    ));

    assert_eq!(names(&roots), vec!["UserCard"]);
    assert_eq!(roots[0].detail.as_deref(), Some("(component)"));
}

#[test]
fn test_dropped_parent_policy() {
    let provider = static_provider();
    let req = request("app.jsx", "javascriptreact", "");

    let discard = block_on(extract_outline(&provider, &req, &ExtractionSettings::default()));
    assert_eq!(names(&discard), vec!["UserCard", "helper"]);

    let config = OutlineConfig {
        dropped_children: DroppedChildren::Promote,
        ..OutlineConfig::default()
    };
    let promote = block_on(extract_outline(&provider, &req, &ExtractionSettings::from(&config)));
    assert_eq!(names(&promote), vec!["UserCard", "helper", "port"]);
}

#[test]
fn test_extraction_is_deterministic() {
    let provider = TreeSitterProvider::new();
    let req = request("widgets.tsx", "typescriptreact", TSX_SAMPLE);
    let settings = ExtractionSettings::default();

    let first = block_on(extract_outline(&provider, &req, &settings));
    let second = block_on(extract_outline(&provider, &req, &settings));
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
