//! Command types for the Elm-style architecture
//!
//! Commands represent side effects the runtime performs after an update.

use crate::extract::ExtractionRequest;
use crate::outline::BufferId;

/// Side effects requested by the synchronization controller
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Start an extraction; sends `OutlineMsg::ExtractionCompleted` when done
    RunExtraction(ExtractionRequest),
    /// Hand the current snapshot to the presentation sink
    Publish { buffer: BufferId, generation: u64 },
    /// Tell the presentation sink the buffer's outline is gone
    Clear { buffer: BufferId },
    /// Execute multiple commands in order
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Whether this command (or any batched one) starts an extraction
    pub fn starts_extraction(&self) -> bool {
        match self {
            Cmd::RunExtraction(_) => true,
            Cmd::Batch(cmds) => cmds.iter().any(Cmd::starts_extraction),
            _ => false,
        }
    }
}
