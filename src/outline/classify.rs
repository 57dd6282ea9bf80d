//! Symbol classification
//!
//! Maps provider symbols onto the outline vocabulary. The base mapping keeps
//! classes, interfaces, namespaces, enums, callables and variables; two name
//! heuristics can keep a symbol the base mapping would drop:
//!
//! 1. component: function/variable/class named like `UserCard`
//! 2. hook: function named like `useFetchData` (checked after 1, wins on detail)

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{StructureKind, StructureNode};
use crate::provider::{NativeKind, ProviderSymbol};

/// What happens to the children of a symbol that classification drops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DroppedChildren {
    /// Drop the whole subtree
    #[default]
    Discard,
    /// Lift the classified children to the dropped symbol's level
    Promote,
}

/// Classification settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyOptions {
    /// Native kinds removed from the base mapping (heuristics still apply)
    pub excluded: HashSet<NativeKind>,
    pub dropped_children: DroppedChildren,
    /// Levels below this depth are truncated
    pub max_depth: usize,
    pub component_marker: String,
    pub hook_marker: String,
}

pub const DEFAULT_MAX_DEPTH: usize = 64;
pub const COMPONENT_MARKER: &str = "(component)";
pub const HOOK_MARKER: &str = "(hook)";

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            excluded: HashSet::new(),
            dropped_children: DroppedChildren::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            component_marker: COMPONENT_MARKER.to_string(),
            hook_marker: HOOK_MARKER.to_string(),
        }
    }
}

/// Classify a provider symbol list into outline nodes
///
/// Each level is returned in source order (stable by start position).
pub fn classify_symbols(
    symbols: &[ProviderSymbol],
    options: &ClassifyOptions,
) -> Vec<StructureNode> {
    classify_level(symbols, options, 0)
}

fn classify_level(
    symbols: &[ProviderSymbol],
    options: &ClassifyOptions,
    depth: usize,
) -> Vec<StructureNode> {
    if symbols.is_empty() {
        return Vec::new();
    }
    if depth >= options.max_depth {
        tracing::warn!(
            "Symbol tree deeper than {} levels, truncating {} symbols",
            options.max_depth,
            symbols.len()
        );
        return Vec::new();
    }

    let mut nodes = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let children = classify_level(&symbol.children, options, depth + 1);
        match classify_one(symbol, options) {
            Some((kind, detail)) => nodes.push(
                StructureNode::new(symbol.name.trim(), kind, symbol.range)
                    .with_detail(detail)
                    .with_children(children),
            ),
            None => match options.dropped_children {
                DroppedChildren::Discard => {
                    tracing::trace!(
                        "Dropping {} `{}` with {} classified children",
                        symbol.kind,
                        symbol.name,
                        children.len()
                    );
                }
                DroppedChildren::Promote => nodes.extend(children),
            },
        }
    }

    nodes.sort_by_key(|node| node.range.start);
    nodes
}

/// Kind and detail for a kept symbol, `None` if it is dropped
fn classify_one(
    symbol: &ProviderSymbol,
    options: &ClassifyOptions,
) -> Option<(StructureKind, String)> {
    if symbol.name.trim().is_empty() {
        return None;
    }

    let component = is_component_like(symbol);
    let hook = is_hook_like(symbol);

    let kind = mapped_kind(symbol.kind, options).or_else(|| {
        if component || hook {
            promoted_kind(symbol.kind)
        } else {
            None
        }
    })?;

    let detail = if hook {
        options.hook_marker.clone()
    } else if component {
        options.component_marker.clone()
    } else {
        format!("({})", symbol.kind.name())
    };

    Some((kind, detail))
}

/// Base mapping, honoring the exclusion list
fn mapped_kind(kind: NativeKind, options: &ClassifyOptions) -> Option<StructureKind> {
    if options.excluded.contains(&kind) {
        return None;
    }
    base_kind(kind)
}

/// Native kind → outline kind; `None` for kinds the outline does not show
pub fn base_kind(kind: NativeKind) -> Option<StructureKind> {
    match kind {
        NativeKind::Class => Some(StructureKind::Class),
        NativeKind::Interface => Some(StructureKind::Interface),
        NativeKind::Namespace | NativeKind::Module => Some(StructureKind::Namespace),
        NativeKind::Enum => Some(StructureKind::Enum),
        NativeKind::Method | NativeKind::Function | NativeKind::Constructor => {
            Some(StructureKind::Function)
        }
        NativeKind::Variable | NativeKind::Property | NativeKind::Field => {
            Some(StructureKind::Variable)
        }
        _ => None,
    }
}

/// Outline kind for a symbol kept only by a heuristic
fn promoted_kind(kind: NativeKind) -> Option<StructureKind> {
    match kind {
        NativeKind::Function => Some(StructureKind::Function),
        NativeKind::Variable => Some(StructureKind::Variable),
        NativeKind::Class => Some(StructureKind::Class),
        _ => None,
    }
}

/// `^[A-Z][A-Za-z0-9]*$` on a function, variable or class
pub fn is_component_like(symbol: &ProviderSymbol) -> bool {
    if !matches!(
        symbol.kind,
        NativeKind::Function | NativeKind::Variable | NativeKind::Class
    ) {
        return false;
    }
    let mut chars = symbol.name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// `^use[A-Z]` on a function
pub fn is_hook_like(symbol: &ProviderSymbol) -> bool {
    symbol.kind == NativeKind::Function
        && symbol
            .name
            .strip_prefix("use")
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_uppercase())
}
