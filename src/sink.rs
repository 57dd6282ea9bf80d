//! Presentation sinks
//!
//! The controller owns the snapshot; sinks get a borrow at publish time and
//! copy whatever they need to keep.

use tokio::sync::mpsc;

use crate::outline::{BufferId, OutlineSnapshot};
use crate::tracing::OutlineSummary;

/// Receives accepted outlines
///
/// `publish` is called at most once per accepted extraction and never
/// concurrently.
pub trait PresentationSink {
    fn publish(&mut self, snapshot: &OutlineSnapshot);

    /// The controller released `buffer`; anything shown for it is stale
    fn clear(&mut self, _buffer: &BufferId) {}
}

impl<S: PresentationSink + ?Sized> PresentationSink for &mut S {
    fn publish(&mut self, snapshot: &OutlineSnapshot) {
        (**self).publish(snapshot)
    }

    fn clear(&mut self, buffer: &BufferId) {
        (**self).clear(buffer)
    }
}

impl<S: PresentationSink + ?Sized> PresentationSink for Box<S> {
    fn publish(&mut self, snapshot: &OutlineSnapshot) {
        (**self).publish(snapshot)
    }

    fn clear(&mut self, buffer: &BufferId) {
        (**self).clear(buffer)
    }
}

/// Logs a summary of each publish, with what changed since the last one
#[derive(Debug, Default)]
pub struct LogSink {
    last: Option<OutlineSummary>,
}

impl PresentationSink for LogSink {
    fn publish(&mut self, snapshot: &OutlineSnapshot) {
        let summary = OutlineSummary::from_snapshot(snapshot);
        let changes = self
            .last
            .as_ref()
            .and_then(|last| last.diff(&summary))
            .unwrap_or_else(|| "unchanged".to_string());
        tracing::info!(
            "Outline for {} generation {}: {} nodes ({})",
            snapshot.buffer,
            snapshot.generation,
            snapshot.node_count(),
            changes
        );
        self.last = Some(summary);
    }

    fn clear(&mut self, buffer: &BufferId) {
        tracing::info!("Outline for {} cleared", buffer);
        self.last = None;
    }
}

/// What a [`ChannelSink`] forwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Published(OutlineSnapshot),
    Cleared(BufferId),
}

/// Forwards owned copies of every publish and clear over a channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SinkEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SinkEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: SinkEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("Sink receiver dropped, discarding outline event");
        }
    }
}

impl PresentationSink for ChannelSink {
    fn publish(&mut self, snapshot: &OutlineSnapshot) {
        self.send(SinkEvent::Published(snapshot.clone()));
    }

    fn clear(&mut self, buffer: &BufferId) {
        self.send(SinkEvent::Cleared(buffer.clone()));
    }
}
