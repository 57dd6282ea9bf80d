//! Event handles for hosts
//!
//! A host focuses a buffer through [`EventSender::focus`] and gets back a
//! [`BufferSubscription`]. Edits go through the subscription; dropping it is
//! how the buffer gets closed.

use tokio::sync::mpsc;

use crate::messages::OutlineMsg;
use crate::outline::BufferId;

/// Cloneable sender for controller events
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<OutlineMsg>,
}

impl EventSender {
    pub(super) fn new(tx: mpsc::UnboundedSender<OutlineMsg>) -> Self {
        Self { tx }
    }

    /// Send a raw message; returns false if the runtime has stopped
    pub fn send(&self, msg: OutlineMsg) -> bool {
        match self.tx.send(msg) {
            Ok(()) => true,
            Err(_) => {
                tracing::debug!("Outline runtime stopped, dropping event");
                false
            }
        }
    }

    /// Make `buffer` the current buffer
    pub fn focus(
        &self,
        buffer: impl Into<BufferId>,
        language: impl Into<String>,
        content: impl Into<String>,
    ) -> BufferSubscription {
        let buffer = buffer.into();
        self.send(OutlineMsg::BufferFocused {
            buffer: buffer.clone(),
            language: language.into(),
            content: content.into(),
        });
        BufferSubscription {
            buffer,
            events: self.clone(),
        }
    }

    pub fn refresh(&self) -> bool {
        self.send(OutlineMsg::Refresh)
    }

    pub fn lost_focus(&self) -> bool {
        self.send(OutlineMsg::EditorLostFocus)
    }
}

/// Live handle on a focused buffer
///
/// Dropping it sends `BufferClosed`.
#[derive(Debug)]
pub struct BufferSubscription {
    buffer: BufferId,
    events: EventSender,
}

impl BufferSubscription {
    pub fn buffer(&self) -> &BufferId {
        &self.buffer
    }

    /// Report new content for this buffer
    pub fn edit(&self, content: impl Into<String>) -> bool {
        self.events.send(OutlineMsg::BufferEdited {
            buffer: self.buffer.clone(),
            content: content.into(),
        })
    }

    /// Re-focus this buffer with (possibly new) content
    pub fn refocus(&self, language: impl Into<String>, content: impl Into<String>) -> bool {
        self.events.send(OutlineMsg::BufferFocused {
            buffer: self.buffer.clone(),
            language: language.into(),
            content: content.into(),
        })
    }
}

impl Drop for BufferSubscription {
    fn drop(&mut self) {
        self.events.send(OutlineMsg::BufferClosed {
            buffer: self.buffer.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_lifecycle_messages() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sender = EventSender::new(tx);

        let subscription = sender.focus("a.ts", "typescript", "x");
        assert!(subscription.edit("y"));
        drop(subscription);

        assert_eq!(
            rx.try_recv().ok(),
            Some(OutlineMsg::focused("a.ts", "typescript", "x"))
        );
        assert_eq!(rx.try_recv().ok(), Some(OutlineMsg::edited("a.ts", "y")));
        assert_eq!(rx.try_recv().ok(), Some(OutlineMsg::closed("a.ts")));
    }

    #[test]
    fn test_send_after_runtime_stops() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sender = EventSender::new(tx);
        drop(rx);
        assert!(!sender.refresh());
        drop(sender.focus("a.ts", "typescript", ""));
    }
}
