//! Provider serving a fixed symbol list
//!
//! Used by the CLI's `--symbols` option, where the symbols come from a JSON
//! dump of another tool's document-symbol response.

use std::cell::Cell;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::{ProviderError, ProviderSymbol, SymbolProvider, SymbolQuery};

/// Answers every query with the same symbols
#[derive(Debug, Default)]
pub struct StaticSymbolProvider {
    symbols: Option<Vec<ProviderSymbol>>,
    calls: Cell<usize>,
}

impl StaticSymbolProvider {
    pub fn new(symbols: Vec<ProviderSymbol>) -> Self {
        Self {
            symbols: Some(symbols),
            calls: Cell::new(0),
        }
    }

    /// A provider that never has data (`Ok(None)`)
    pub fn absent() -> Self {
        Self::default()
    }

    /// Parse a JSON array of symbols
    pub fn from_json_str(json: &str) -> Result<Self> {
        let symbols: Vec<ProviderSymbol> =
            serde_json::from_str(json).context("Failed to parse symbol JSON")?;
        Ok(Self::new(symbols))
    }

    /// Load a JSON array of symbols from disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read symbols from {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("Invalid symbol file {}", path.display()))
    }

    /// Number of queries answered so far
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

#[async_trait(?Send)]
impl SymbolProvider for StaticSymbolProvider {
    async fn document_symbols(
        &self,
        query: SymbolQuery<'_>,
    ) -> Result<Option<Vec<ProviderSymbol>>, ProviderError> {
        self.calls.set(self.calls.get() + 1);
        tracing::trace!(
            "Static symbols requested for {} ({})",
            query.buffer,
            query.language
        );
        Ok(self.symbols.clone())
    }
}
