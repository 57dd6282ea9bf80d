//! structure-outline - incremental structure outlines for source buffers
//!
//! Builds a hierarchical outline (classes, functions, variables, TODO/FIXME
//! annotations) from a symbol provider and the buffer text, and keeps it in
//! sync with edits through an Elm-style controller.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod error;
pub mod extract;
pub mod language;
pub mod messages;
pub mod model;
pub mod outline;
pub mod provider;
pub mod runtime;
pub mod sink;
pub mod tracing;
pub mod update;
pub mod watch;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::OutlineConfig;
pub use error::OutlineError;
pub use messages::OutlineMsg;
pub use model::{OutlineModel, SyncState};
pub use outline::{BufferId, OutlineSnapshot, StructureKind, StructureNode};
pub use provider::{SymbolProvider, SymbolQuery};
pub use runtime::{BufferSubscription, EventSender, OutlineRuntime};
pub use sink::PresentationSink;
