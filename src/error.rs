//! Degradation taxonomy for outline extraction
//!
//! None of these stop synchronization. They are logged where they happen and
//! the affected extraction publishes an empty or partial outline instead.

use thiserror::Error;

use crate::outline::BufferId;
use crate::provider::ProviderError;

#[derive(Debug, Error)]
pub enum OutlineError {
    /// Provider failed or had nothing; symbols degrade to an empty list
    #[error("symbol provider unavailable for {buffer}: {source}")]
    ProviderUnavailable {
        buffer: BufferId,
        #[source]
        source: ProviderError,
    },

    /// A tag matched but carried no text; the match is skipped
    #[error("malformed {tag} annotation on line {line}")]
    MalformedAnnotation { tag: &'static str, line: usize },

    /// A result arrived after a newer generation was issued; it is discarded
    #[error("stale outline for {buffer}: generation {generation}, current {current}")]
    StaleResult {
        buffer: BufferId,
        generation: u64,
        current: u64,
    },

    /// Language is not on the allowlist; the outline is empty
    #[error("unsupported source kind `{language}` for {buffer}")]
    UnsupportedSource { buffer: BufferId, language: String },
}
