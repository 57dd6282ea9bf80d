//! Outline extraction pipeline
//!
//! One extraction = one provider call (the only await) joined with the
//! annotation scan, then classification and merging. Provider failures never
//! escape: they degrade to an empty symbol list and the annotations are still
//! published.

use crate::config::OutlineConfig;
use crate::error::OutlineError;
use crate::outline::{
    classify_symbols, merge_outline, scan_annotations, BufferId, ClassifyOptions, StructureNode,
};
use crate::provider::{ProviderSymbol, SymbolProvider, SymbolQuery};

/// A generation-tagged request to extract one buffer snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub buffer: BufferId,
    pub language: String,
    pub content: String,
    pub generation: u64,
}

/// Settings applied to every extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionSettings {
    pub classify: ClassifyOptions,
    /// Scan comments for annotations
    pub annotations: bool,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            classify: ClassifyOptions::default(),
            annotations: true,
        }
    }
}

impl From<&OutlineConfig> for ExtractionSettings {
    fn from(config: &OutlineConfig) -> Self {
        Self {
            classify: config.classify_options(),
            annotations: config.annotations,
        }
    }
}

/// Extract the merged outline roots for a request
pub async fn extract_outline<P>(
    provider: &P,
    request: &ExtractionRequest,
    settings: &ExtractionSettings,
) -> Vec<StructureNode>
where
    P: SymbolProvider + ?Sized,
{
    let query = SymbolQuery {
        buffer: &request.buffer,
        language: &request.language,
        content: &request.content,
    };

    let (symbols, annotations) = futures::join!(provider_symbols(provider, query), async {
        if settings.annotations {
            scan_annotations(&request.content)
        } else {
            Vec::new()
        }
    });

    let classified = classify_symbols(&symbols, &settings.classify);
    merge_outline(classified, annotations)
}

async fn provider_symbols<P>(provider: &P, query: SymbolQuery<'_>) -> Vec<ProviderSymbol>
where
    P: SymbolProvider + ?Sized,
{
    match provider.document_symbols(query).await {
        Ok(Some(symbols)) => symbols,
        Ok(None) => {
            tracing::debug!("Provider has no symbols for {}", query.buffer);
            Vec::new()
        }
        Err(source) => {
            let err = OutlineError::ProviderUnavailable {
                buffer: query.buffer.clone(),
                source,
            };
            // The scanned annotations still publish, as a partial outline
            tracing::warn!("{}", err);
            Vec::new()
        }
    }
}
