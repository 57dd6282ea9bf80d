//! File watching for `--watch`
//!
//! Uses the `notify` crate with debouncing. The parent directory is watched
//! rather than the file itself, so editors that save by renaming a temp file
//! over the original keep being picked up.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use notify::Watcher;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, DebouncedEventKind, Debouncer};

use crate::messages::OutlineMsg;
use crate::outline::BufferId;
use crate::runtime::EventSender;

/// Debounce delay for file changes
pub const WATCH_DEBOUNCE_MS: u64 = 200;

/// Watches one file and reports each debounced change as a buffer edit
pub struct FileWatcher {
    _debouncer: Debouncer<notify::RecommendedWatcher>,
    path: PathBuf,
}

impl FileWatcher {
    pub fn new(path: &Path, buffer: BufferId, events: EventSender) -> Result<Self> {
        let path = path
            .canonicalize()
            .with_context(|| format!("Cannot watch {}", path.display()))?;
        let dir = path
            .parent()
            .with_context(|| format!("{} has no parent directory", path.display()))?
            .to_path_buf();

        let target = path.clone();
        let handler = move |result: DebounceEventResult| match result {
            Ok(debounced) => {
                let changed = debounced.iter().any(|event| {
                    event.kind == DebouncedEventKind::Any && is_target(&event.path, &target)
                });
                if !changed {
                    return;
                }
                match std::fs::read_to_string(&target) {
                    Ok(content) => {
                        tracing::debug!("{} changed, re-extracting", target.display());
                        events.send(OutlineMsg::BufferEdited {
                            buffer: buffer.clone(),
                            content,
                        });
                    }
                    Err(e) => tracing::warn!("Failed to re-read {}: {}", target.display(), e),
                }
            }
            Err(e) => tracing::warn!("File watcher error: {:?}", e),
        };

        let mut debouncer = new_debouncer(Duration::from_millis(WATCH_DEBOUNCE_MS), handler)
            .context("Failed to start file watcher")?;
        debouncer
            .watcher()
            .watch(&dir, notify::RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", dir.display()))?;

        tracing::info!("Watching {}", path.display());
        Ok(Self {
            _debouncer: debouncer,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Whether an event path refers to the watched file
fn is_target(event_path: &Path, target: &Path) -> bool {
    event_path == target
        || event_path
            .canonicalize()
            .map(|p| p == target)
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_target() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("app.ts");
        std::fs::write(&file, "").unwrap();
        let target = file.canonicalize().unwrap();

        assert!(is_target(&target, &target));
        assert!(is_target(&dir.path().join("app.ts"), &target));
        assert!(!is_target(&dir.path().join("other.ts"), &target));
    }
}
