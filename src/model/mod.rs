//! Outline model - the complete state of the synchronization controller
//!
//! Only `update_outline` mutates this; the runtime and sinks read it.

use std::collections::HashMap;

use crate::language::LanguageAllowlist;
use crate::outline::{BufferId, OutlineSnapshot};

/// Where the controller is in the extraction lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncState {
    /// No current buffer
    #[default]
    Idle,
    /// An extraction for `generation` is outstanding
    Extracting { generation: u64 },
    /// The snapshot for `generation` has been accepted
    HasSnapshot { generation: u64 },
}

/// The buffer the controller is tracking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentBuffer {
    pub id: BufferId,
    /// Source-kind identifier, e.g. "typescriptreact"
    pub language: String,
    /// Last known content, used by refreshes
    pub content: String,
}

/// Controller state
#[derive(Debug, Default)]
pub struct OutlineModel {
    pub allowlist: LanguageAllowlist,
    pub(crate) state: SyncState,
    pub(crate) current: Option<CurrentBuffer>,
    /// Last generation issued per buffer; entries outlive close
    pub(crate) generations: HashMap<BufferId, u64>,
    pub(crate) snapshot: Option<OutlineSnapshot>,
}

impl OutlineModel {
    pub fn new(allowlist: LanguageAllowlist) -> Self {
        Self {
            allowlist,
            ..Self::default()
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn current(&self) -> Option<&CurrentBuffer> {
        self.current.as_ref()
    }

    /// The last accepted outline, if the current buffer has one
    pub fn snapshot(&self) -> Option<&OutlineSnapshot> {
        self.snapshot.as_ref()
    }

    /// Last generation issued for `buffer` (0 if none was ever issued)
    pub fn generation(&self, buffer: &BufferId) -> u64 {
        self.generations.get(buffer).copied().unwrap_or(0)
    }

    /// Whether a result for (`buffer`, `generation`) would be accepted now
    pub fn is_current(&self, buffer: &BufferId, generation: u64) -> bool {
        self.current.as_ref().is_some_and(|c| c.id == *buffer)
            && self.generation(buffer) == generation
    }

    /// Issue the next generation for `buffer`
    pub(crate) fn next_generation(&mut self, buffer: &BufferId) -> u64 {
        let generation = self.generations.entry(buffer.clone()).or_insert(0);
        *generation += 1;
        *generation
    }

    /// Forget the current buffer and its snapshot, returning its id
    pub(crate) fn release(&mut self) -> Option<BufferId> {
        self.snapshot = None;
        self.state = SyncState::Idle;
        self.current.take().map(|c| c.id)
    }
}
