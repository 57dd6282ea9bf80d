//! Message types for the Elm-style architecture
//!
//! All outline state changes flow through these message types.

use crate::outline::{BufferId, StructureNode};

/// Inbound events for the synchronization controller
#[derive(Debug, Clone, PartialEq)]
pub enum OutlineMsg {
    /// A buffer became the active one (or was re-focused)
    BufferFocused {
        buffer: BufferId,
        language: String,
        content: String,
    },
    /// The content of a buffer changed
    BufferEdited { buffer: BufferId, content: String },
    /// A buffer was closed
    BufferClosed { buffer: BufferId },
    /// No buffer is active anymore
    EditorLostFocus,
    /// Re-extract the current buffer from its last known content
    Refresh,
    /// An extraction finished (sent by the runtime, never by hosts)
    ExtractionCompleted {
        buffer: BufferId,
        generation: u64,
        roots: Vec<StructureNode>,
    },
}

impl OutlineMsg {
    pub fn focused(
        buffer: impl Into<BufferId>,
        language: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        OutlineMsg::BufferFocused {
            buffer: buffer.into(),
            language: language.into(),
            content: content.into(),
        }
    }

    pub fn edited(buffer: impl Into<BufferId>, content: impl Into<String>) -> Self {
        OutlineMsg::BufferEdited {
            buffer: buffer.into(),
            content: content.into(),
        }
    }

    pub fn closed(buffer: impl Into<BufferId>) -> Self {
        OutlineMsg::BufferClosed {
            buffer: buffer.into(),
        }
    }
}
