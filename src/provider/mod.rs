//! Symbol provider interface
//!
//! The language analysis that reports raw symbols lives outside this crate.
//! The extraction pipeline only talks to it through [`SymbolProvider`], once
//! per extraction; that call is the only place an extraction suspends.

mod static_symbols;
mod tree_sitter_symbols;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::outline::{BufferId, OutlineRange};

pub use static_symbols::StaticSymbolProvider;
pub use tree_sitter_symbols::TreeSitterProvider;

/// Symbol kinds as reported by language servers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NativeKind {
    File,
    Module,
    Namespace,
    Package,
    Class,
    Method,
    Property,
    Field,
    Constructor,
    Enum,
    Interface,
    Function,
    Variable,
    Constant,
    String,
    Number,
    Boolean,
    Array,
    Object,
    Key,
    Null,
    EnumMember,
    Struct,
    Event,
    Operator,
    TypeParameter,
}

impl NativeKind {
    /// Lowercase kind name (e.g. "function", "enummember")
    pub fn name(&self) -> &'static str {
        match self {
            NativeKind::File => "file",
            NativeKind::Module => "module",
            NativeKind::Namespace => "namespace",
            NativeKind::Package => "package",
            NativeKind::Class => "class",
            NativeKind::Method => "method",
            NativeKind::Property => "property",
            NativeKind::Field => "field",
            NativeKind::Constructor => "constructor",
            NativeKind::Enum => "enum",
            NativeKind::Interface => "interface",
            NativeKind::Function => "function",
            NativeKind::Variable => "variable",
            NativeKind::Constant => "constant",
            NativeKind::String => "string",
            NativeKind::Number => "number",
            NativeKind::Boolean => "boolean",
            NativeKind::Array => "array",
            NativeKind::Object => "object",
            NativeKind::Key => "key",
            NativeKind::Null => "null",
            NativeKind::EnumMember => "enummember",
            NativeKind::Struct => "struct",
            NativeKind::Event => "event",
            NativeKind::Operator => "operator",
            NativeKind::TypeParameter => "typeparameter",
        }
    }
}

impl fmt::Display for NativeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A symbol as reported by the provider, before classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSymbol {
    pub name: String,
    pub kind: NativeKind,
    pub range: OutlineRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ProviderSymbol>,
}

impl ProviderSymbol {
    pub fn new(name: impl Into<String>, kind: NativeKind, range: OutlineRange) -> Self {
        Self {
            name: name.into(),
            kind,
            range,
            detail: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<ProviderSymbol>) -> Self {
        self.children = children;
        self
    }
}

/// What an extraction asks the provider about
///
/// Borrowed for the duration of the call only.
#[derive(Debug, Clone, Copy)]
pub struct SymbolQuery<'a> {
    pub buffer: &'a BufferId,
    /// Source-kind hint (language identifier such as "typescript")
    pub language: &'a str,
    pub content: &'a str,
}

/// Failures a provider may report
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("no symbol support for language `{0}`")]
    UnsupportedLanguage(String),
    #[error("failed to parse buffer: {0}")]
    Parse(String),
    #[error("symbol provider unavailable: {0}")]
    Unavailable(String),
}

/// Source of raw document symbols
///
/// `Ok(None)` means the provider has no data for this buffer; it is treated
/// the same as an empty list.
#[async_trait(?Send)]
pub trait SymbolProvider {
    async fn document_symbols(
        &self,
        query: SymbolQuery<'_>,
    ) -> Result<Option<Vec<ProviderSymbol>>, ProviderError>;
}
