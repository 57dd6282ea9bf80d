//! Built-in symbol provider backed by tree-sitter
//!
//! Walks the syntax tree to collect declarations, then nests them by byte
//! range containment. Kinds are reported the way a language server would
//! report them, so the result goes through the same classification as any
//! external provider.
//!
//! Struct-like declarations (Rust/Go structs) are reported as `class` since
//! the outline vocabulary has no struct kind; Rust impl blocks are reported as
//! namespaces so their methods keep a parent.

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use tree_sitter::{Language, Node, Parser};

use super::{NativeKind, ProviderError, ProviderSymbol, SymbolProvider, SymbolQuery};
use crate::outline::{OutlineRange, Position};

/// Grammars this provider can parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Grammar {
    JavaScript,
    TypeScript,
    Tsx,
    Python,
    Rust,
    Go,
    Java,
}

impl Grammar {
    fn from_language_id(language: &str) -> Option<Self> {
        match language {
            "javascript" | "javascriptreact" => Some(Grammar::JavaScript),
            "typescript" => Some(Grammar::TypeScript),
            "typescriptreact" => Some(Grammar::Tsx),
            "python" => Some(Grammar::Python),
            "rust" => Some(Grammar::Rust),
            "go" => Some(Grammar::Go),
            "java" => Some(Grammar::Java),
            _ => None,
        }
    }

    fn language(&self) -> Language {
        match self {
            Grammar::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Grammar::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Grammar::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Grammar::Python => tree_sitter_python::LANGUAGE.into(),
            Grammar::Rust => tree_sitter_rust::LANGUAGE.into(),
            Grammar::Go => tree_sitter_go::LANGUAGE.into(),
            Grammar::Java => tree_sitter_java::LANGUAGE.into(),
        }
    }
}

/// Parses buffers with tree-sitter and reports their declarations
///
/// Parsers are created lazily per grammar and reused across queries.
#[derive(Default)]
pub struct TreeSitterProvider {
    parsers: RefCell<HashMap<Grammar, Parser>>,
}

impl TreeSitterProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a language identifier has a grammar here
    pub fn supports(language: &str) -> bool {
        Grammar::from_language_id(language).is_some()
    }

    /// Parse `source` and return its symbol tree
    pub fn symbols(
        &self,
        language: &str,
        source: &str,
    ) -> Result<Vec<ProviderSymbol>, ProviderError> {
        let grammar = Grammar::from_language_id(language)
            .ok_or_else(|| ProviderError::UnsupportedLanguage(language.to_string()))?;

        let mut parsers = self.parsers.borrow_mut();
        let parser = match parsers.entry(grammar) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => {
                let mut parser = Parser::new();
                parser
                    .set_language(&grammar.language())
                    .map_err(|e| ProviderError::Parse(format!("{:?}: {}", grammar, e)))?;
                entry.insert(parser)
            }
        };

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ProviderError::Parse(format!("{:?} parser returned no tree", grammar)))?;

        let mut flat = Vec::new();
        let root = tree.root_node();
        match grammar {
            Grammar::JavaScript | Grammar::TypeScript | Grammar::Tsx => {
                collect_js_ts_symbols(root, source, &mut flat)
            }
            Grammar::Python => collect_python_symbols(root, source, &mut flat),
            Grammar::Rust => collect_rust_symbols(root, source, &mut flat),
            Grammar::Go => collect_go_symbols(root, source, &mut flat),
            Grammar::Java => collect_java_symbols(root, source, &mut flat),
        }

        tracing::trace!("tree-sitter found {} {:?} declarations", flat.len(), grammar);
        Ok(build_tree_by_containment(flat))
    }
}

#[async_trait(?Send)]
impl SymbolProvider for TreeSitterProvider {
    async fn document_symbols(
        &self,
        query: SymbolQuery<'_>,
    ) -> Result<Option<Vec<ProviderSymbol>>, ProviderError> {
        self.symbols(query.language, query.content).map(Some)
    }
}

// =============================================================================
// Flat symbol for pre-nesting
// =============================================================================

struct FlatSymbol {
    kind: NativeKind,
    name: String,
    start_byte: usize,
    end_byte: usize,
    range: OutlineRange,
}

/// Byte position → char column on the same line
fn char_position(source: &str, byte: usize, row: usize) -> Position {
    let byte = byte.min(source.len());
    let line_start = source[..byte].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = source
        .get(line_start..byte)
        .map(|s| s.chars().count())
        .unwrap_or(0);
    Position::new(row, column)
}

fn node_range(node: &Node, source: &str) -> OutlineRange {
    OutlineRange::new(
        char_position(source, node.start_byte(), node.start_position().row),
        char_position(source, node.end_byte(), node.end_position().row),
    )
}

fn node_text<'a>(node: &Node, source: &'a str) -> Option<&'a str> {
    node.utf8_text(source.as_bytes()).ok()
}

fn flat_sym(kind: NativeKind, name: &str, node: &Node, source: &str) -> FlatSymbol {
    FlatSymbol {
        kind,
        name: name.to_string(),
        start_byte: node.start_byte(),
        end_byte: node.end_byte(),
        range: node_range(node, source),
    }
}

/// Push `node` under the name found in its `name` field
fn push_named(symbols: &mut Vec<FlatSymbol>, kind: NativeKind, node: &Node, source: &str) {
    if let Some(name) = node
        .child_by_field_name("name")
        .and_then(|n| node_text(&n, source))
    {
        symbols.push(flat_sym(kind, name, node, source));
    }
}

/// Whether `node` sits in the body of one of `owners` (body node, then owner)
fn in_body_of(node: &Node, owners: &[&str]) -> bool {
    node.parent()
        .and_then(|body| body.parent())
        .map(|owner| owners.contains(&owner.kind()))
        .unwrap_or(false)
}

fn recurse_children(
    node: Node,
    source: &str,
    symbols: &mut Vec<FlatSymbol>,
    collect: fn(Node, &str, &mut Vec<FlatSymbol>),
) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect(child, source, symbols);
    }
}

// =============================================================================
// Tree building
// =============================================================================

/// Nest flat symbols by byte containment, parents before children
fn build_tree_by_containment(mut symbols: Vec<FlatSymbol>) -> Vec<ProviderSymbol> {
    if symbols.is_empty() {
        return Vec::new();
    }

    symbols.sort_by(|a, b| {
        a.start_byte
            .cmp(&b.start_byte)
            .then(b.end_byte.cmp(&a.end_byte))
    });

    let mut roots: Vec<ProviderSymbol> = Vec::new();
    // Stack: (end_byte, symbol)
    let mut stack: Vec<(usize, ProviderSymbol)> = Vec::new();

    fn attach(
        stack: &mut [(usize, ProviderSymbol)],
        roots: &mut Vec<ProviderSymbol>,
        finished: ProviderSymbol,
    ) {
        match stack.last_mut() {
            Some((_, parent)) => parent.children.push(finished),
            None => roots.push(finished),
        }
    }

    for sym in symbols {
        let node = ProviderSymbol::new(sym.name, sym.kind, sym.range);

        while let Some((top_end, _)) = stack.last() {
            if *top_end > sym.start_byte {
                break;
            }
            if let Some((_, finished)) = stack.pop() {
                attach(&mut stack, &mut roots, finished);
            }
        }

        stack.push((sym.end_byte, node));
    }

    while let Some((_, finished)) = stack.pop() {
        attach(&mut stack, &mut roots, finished);
    }

    roots
}

// =============================================================================
// TypeScript/JavaScript
// =============================================================================

fn collect_js_ts_symbols(node: Node, source: &str, symbols: &mut Vec<FlatSymbol>) {
    match node.kind() {
        "function_declaration" | "generator_function_declaration" => {
            push_named(symbols, NativeKind::Function, &node, source);
        }
        "class_declaration" | "abstract_class_declaration" => {
            push_named(symbols, NativeKind::Class, &node, source);
        }
        "method_definition" => {
            let kind = match node
                .child_by_field_name("name")
                .and_then(|n| node_text(&n, source))
            {
                Some("constructor") => NativeKind::Constructor,
                _ => NativeKind::Method,
            };
            push_named(symbols, kind, &node, source);
        }
        "interface_declaration" | "type_alias_declaration" => {
            push_named(symbols, NativeKind::Interface, &node, source);
        }
        "enum_declaration" => {
            push_named(symbols, NativeKind::Enum, &node, source);
        }
        "internal_module" | "module" => {
            push_named(symbols, NativeKind::Namespace, &node, source);
        }
        "public_field_definition" | "field_definition" | "property_signature" => {
            let name_node = node
                .child_by_field_name("name")
                .or_else(|| node.child_by_field_name("property"));
            if let Some(name) = name_node.and_then(|n| node_text(&n, source)) {
                symbols.push(flat_sym(NativeKind::Property, name, &node, source));
            }
        }
        "lexical_declaration" | "variable_declaration" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.kind() != "variable_declarator" {
                    continue;
                }
                let Some(name) = child
                    .child_by_field_name("name")
                    .and_then(|n| node_text(&n, source))
                else {
                    continue;
                };
                let is_function = child
                    .child_by_field_name("value")
                    .map(|v| {
                        matches!(
                            v.kind(),
                            "arrow_function" | "function_expression" | "function"
                        )
                    })
                    .unwrap_or(false);
                let kind = if is_function {
                    NativeKind::Function
                } else {
                    NativeKind::Variable
                };
                // One declaration can name several variables; each spans its own declarator
                symbols.push(flat_sym(kind, name, &child, source));
            }
        }
        "export_statement" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.kind() != "export_statement" {
                    collect_js_ts_symbols(child, source, symbols);
                }
            }
            return;
        }
        _ => {}
    }

    recurse_children(node, source, symbols, collect_js_ts_symbols);
}

// =============================================================================
// Python
// =============================================================================

fn collect_python_symbols(node: Node, source: &str, symbols: &mut Vec<FlatSymbol>) {
    match node.kind() {
        "function_definition" => {
            let owner = match node.parent() {
                Some(parent) if parent.kind() == "decorated_definition" => parent,
                _ => node,
            };
            let kind = if in_body_of(&owner, &["class_definition"]) {
                NativeKind::Method
            } else {
                NativeKind::Function
            };
            push_named(symbols, kind, &node, source);
        }
        "class_definition" => {
            push_named(symbols, NativeKind::Class, &node, source);
        }
        "decorated_definition" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.kind() == "function_definition" || child.kind() == "class_definition" {
                    collect_python_symbols(child, source, symbols);
                }
            }
            return;
        }
        _ => {}
    }

    recurse_children(node, source, symbols, collect_python_symbols);
}

// =============================================================================
// Rust
// =============================================================================

fn collect_rust_symbols(node: Node, source: &str, symbols: &mut Vec<FlatSymbol>) {
    match node.kind() {
        "function_item" | "function_signature_item" => {
            let kind = if in_body_of(&node, &["impl_item", "trait_item"]) {
                NativeKind::Method
            } else {
                NativeKind::Function
            };
            push_named(symbols, kind, &node, source);
        }
        "struct_item" | "union_item" => {
            push_named(symbols, NativeKind::Class, &node, source);
        }
        "enum_item" => {
            push_named(symbols, NativeKind::Enum, &node, source);
        }
        "enum_variant" => {
            push_named(symbols, NativeKind::EnumMember, &node, source);
        }
        "trait_item" => {
            push_named(symbols, NativeKind::Interface, &node, source);
        }
        "impl_item" => {
            if let Some(type_name) = node
                .child_by_field_name("type")
                .and_then(|n| node_text(&n, source))
            {
                let label = match node
                    .child_by_field_name("trait")
                    .and_then(|n| node_text(&n, source))
                {
                    Some(trait_name) => format!("impl {} for {}", trait_name, type_name),
                    None => format!("impl {}", type_name),
                };
                symbols.push(flat_sym(NativeKind::Namespace, &label, &node, source));
            }
        }
        "const_item" | "static_item" => {
            push_named(symbols, NativeKind::Variable, &node, source);
        }
        "mod_item" => {
            push_named(symbols, NativeKind::Module, &node, source);
        }
        "field_declaration" => {
            push_named(symbols, NativeKind::Field, &node, source);
        }
        _ => {}
    }

    recurse_children(node, source, symbols, collect_rust_symbols);
}

// =============================================================================
// Go
// =============================================================================

fn collect_go_symbols(node: Node, source: &str, symbols: &mut Vec<FlatSymbol>) {
    match node.kind() {
        "function_declaration" => {
            push_named(symbols, NativeKind::Function, &node, source);
        }
        "method_declaration" => {
            push_named(symbols, NativeKind::Method, &node, source);
        }
        "type_spec" => {
            let kind = match node.child_by_field_name("type").map(|n| n.kind()) {
                Some("interface_type") => NativeKind::Interface,
                Some("struct_type") => NativeKind::Class,
                _ => NativeKind::TypeParameter,
            };
            push_named(symbols, kind, &node, source);
        }
        "const_spec" | "var_spec" => {
            let mut cursor = node.walk();
            let names: Vec<Node> = node.children_by_field_name("name", &mut cursor).collect();
            for name_node in &names {
                let Some(name) = node_text(name_node, source) else {
                    continue;
                };
                let range_node = if names.len() == 1 { &node } else { name_node };
                symbols.push(flat_sym(NativeKind::Variable, name, range_node, source));
            }
        }
        _ => {}
    }

    recurse_children(node, source, symbols, collect_go_symbols);
}

// =============================================================================
// Java
// =============================================================================

fn collect_java_symbols(node: Node, source: &str, symbols: &mut Vec<FlatSymbol>) {
    match node.kind() {
        "class_declaration" | "record_declaration" => {
            push_named(symbols, NativeKind::Class, &node, source);
        }
        "interface_declaration" => {
            push_named(symbols, NativeKind::Interface, &node, source);
        }
        "enum_declaration" => {
            push_named(symbols, NativeKind::Enum, &node, source);
        }
        "method_declaration" => {
            push_named(symbols, NativeKind::Method, &node, source);
        }
        "constructor_declaration" => {
            push_named(symbols, NativeKind::Constructor, &node, source);
        }
        "field_declaration" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.kind() == "variable_declarator" {
                    if let Some(name) = child
                        .child_by_field_name("name")
                        .and_then(|n| node_text(&n, source))
                    {
                        symbols.push(flat_sym(NativeKind::Field, name, &child, source));
                    }
                }
            }
        }
        _ => {}
    }

    recurse_children(node, source, symbols, collect_java_symbols);
}
