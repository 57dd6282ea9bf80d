//! Language identification and the extraction allowlist
//!
//! Buffers carry a language identifier (the host's "source kind" string, e.g.
//! `typescriptreact`). Only identifiers on the allowlist are extracted; all
//! others publish an empty outline without asking the provider.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Identifiers every policy accepts
pub const MINIMAL_LANGUAGES: &[&str] = &[
    "typescript",
    "typescriptreact",
    "javascript",
    "javascriptreact",
];

/// Identifiers the extended policy adds on top of the minimal set
pub const EXTENDED_LANGUAGES: &[&str] = &[
    "python", "java", "csharp", "cpp", "c", "ruby", "php", "go", "rust", "swift", "kotlin",
];

/// Which built-in set of languages is extracted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguagePolicy {
    Minimal,
    #[default]
    Extended,
}

/// Resolved allowlist: a policy plus configured extra identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageAllowlist {
    policy: LanguagePolicy,
    extra: Vec<String>,
}

impl LanguageAllowlist {
    pub fn new(policy: LanguagePolicy, extra: impl IntoIterator<Item = String>) -> Self {
        Self {
            policy,
            extra: extra
                .into_iter()
                .map(|id| id.trim().to_lowercase())
                .filter(|id| !id.is_empty())
                .collect(),
        }
    }

    pub fn policy(&self) -> LanguagePolicy {
        self.policy
    }

    /// Whether buffers of this language are extracted
    pub fn is_supported(&self, language: &str) -> bool {
        let language = language.trim().to_lowercase();
        if MINIMAL_LANGUAGES.contains(&language.as_str()) {
            return true;
        }
        if self.policy == LanguagePolicy::Extended
            && EXTENDED_LANGUAGES.contains(&language.as_str())
        {
            return true;
        }
        self.extra.iter().any(|id| *id == language)
    }
}

/// Detect a language identifier from a file extension
///
/// Returns `None` for extensions with no known identifier.
pub fn from_extension(ext: &str) -> Option<&'static str> {
    let id = match ext.to_lowercase().as_str() {
        "ts" | "mts" | "cts" => "typescript",
        "tsx" => "typescriptreact",
        "js" | "mjs" | "cjs" => "javascript",
        "jsx" => "javascriptreact",
        "py" | "pyi" => "python",
        "java" => "java",
        "cs" => "csharp",
        "cpp" | "cc" | "cxx" | "hpp" | "hh" => "cpp",
        "c" | "h" => "c",
        "rb" => "ruby",
        "php" => "php",
        "go" => "go",
        "rs" => "rust",
        "swift" => "swift",
        "kt" | "kts" => "kotlin",
        _ => return None,
    };
    Some(id)
}

/// Detect a language identifier from a file path
pub fn from_path(path: &Path) -> Option<&'static str> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(from_extension)
}
