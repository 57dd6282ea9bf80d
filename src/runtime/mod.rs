//! Runtime module - drives the controller on a single-threaded async executor
//!
//! - `OutlineRuntime` owns the model, runs the update loop and performs `Cmd`s
//! - `subscription` - the handles hosts use to feed events in

mod subscription;

use std::rc::Rc;

use futures::future::{AbortHandle, Abortable, Aborted, LocalBoxFuture};
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;

use crate::commands::Cmd;
use crate::config::OutlineConfig;
use crate::extract::{extract_outline, ExtractionSettings};
use crate::messages::OutlineMsg;
use crate::model::{OutlineModel, SyncState};
use crate::outline::BufferId;
use crate::provider::SymbolProvider;
use crate::sink::PresentationSink;
use crate::update::update;

pub use subscription::{BufferSubscription, EventSender};

/// Event loop for one outline view
///
/// Extractions run as futures on the runtime's own task and each reports
/// back as `OutlineMsg::ExtractionCompleted` through the same update path as
/// host events. Issuing a new generation never cancels older ones; they are
/// only dropped once a newer snapshot is published or the buffer is released,
/// at which point they can no longer be accepted.
pub struct OutlineRuntime<P: ?Sized, S> {
    model: OutlineModel,
    provider: Rc<P>,
    settings: Rc<ExtractionSettings>,
    sink: S,
    msg_rx: mpsc::UnboundedReceiver<OutlineMsg>,
    in_flight: FuturesUnordered<LocalBoxFuture<'static, Result<OutlineMsg, Aborted>>>,
    pending: Vec<PendingExtraction>,
}

/// Abort handle for one extraction still in `in_flight`
struct PendingExtraction {
    buffer: BufferId,
    generation: u64,
    handle: AbortHandle,
}

impl<P, S> OutlineRuntime<P, S>
where
    P: SymbolProvider + ?Sized + 'static,
    S: PresentationSink,
{
    /// Create a runtime and the sender hosts use to reach it
    ///
    /// The runtime keeps no sender of its own: `run` returns once every
    /// `EventSender` (and `BufferSubscription`) is dropped.
    pub fn new(
        provider: Rc<P>,
        sink: S,
        model: OutlineModel,
        settings: ExtractionSettings,
    ) -> (Self, EventSender) {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let runtime = Self {
            model,
            provider,
            settings: Rc::new(settings),
            sink,
            msg_rx,
            in_flight: FuturesUnordered::new(),
            pending: Vec::new(),
        };
        (runtime, EventSender::new(msg_tx))
    }

    pub fn from_config(provider: Rc<P>, sink: S, config: &OutlineConfig) -> (Self, EventSender) {
        Self::new(
            provider,
            sink,
            OutlineModel::new(config.allowlist()),
            ExtractionSettings::from(config),
        )
    }

    pub fn model(&self) -> &OutlineModel {
        &self.model
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Extractions started, not yet reported back and not dropped as superseded
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    /// Apply one message and perform the resulting commands
    pub fn handle(&mut self, msg: OutlineMsg) {
        if let Some(cmd) = update(&mut self.model, msg) {
            self.process_cmd(cmd);
        }
    }

    /// Run until every sender is gone, then return the sink
    ///
    /// After the channel closes, in-flight work is awaited only while the
    /// current generation is still outstanding; anything else could only
    /// produce stale results.
    pub async fn run(mut self) -> S {
        loop {
            // Completions first, so a finished extraction is seen before later events
            tokio::select! {
                biased;
                Some(done) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    self.complete(done);
                }
                msg = self.msg_rx.recv() => match msg {
                    Some(msg) => self.handle(msg),
                    None => break,
                },
            }
        }

        tracing::debug!(
            "Event channel closed, {} extractions in flight",
            self.pending.len()
        );
        while matches!(self.model.state(), SyncState::Extracting { .. }) {
            match self.in_flight.next().await {
                Some(done) => self.complete(done),
                None => break,
            }
        }
        self.sink
    }

    fn complete(&mut self, done: Result<OutlineMsg, Aborted>) {
        let Ok(msg) = done else {
            return;
        };
        if let OutlineMsg::ExtractionCompleted {
            buffer, generation, ..
        } = &msg
        {
            self.pending
                .retain(|p| !(p.buffer == *buffer && p.generation == *generation));
        }
        self.handle(msg);
    }

    /// Abort every extraction the model can no longer accept
    fn drop_superseded(&mut self) {
        let live = match (self.model.state(), self.model.current()) {
            (SyncState::Extracting { generation }, Some(current)) => {
                Some((current.id.clone(), generation))
            }
            _ => None,
        };
        let before = self.pending.len();
        self.pending.retain(|p| {
            let keep = live.as_ref().is_some_and(|(buffer, generation)| {
                *buffer == p.buffer && *generation == p.generation
            });
            if !keep {
                p.handle.abort();
            }
            keep
        });
        let dropped = before - self.pending.len();
        if dropped > 0 {
            tracing::debug!("Dropped {} superseded extractions", dropped);
        }
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::RunExtraction(request) => {
                let provider = Rc::clone(&self.provider);
                let settings = Rc::clone(&self.settings);
                let (handle, registration) = AbortHandle::new_pair();
                self.pending.push(PendingExtraction {
                    buffer: request.buffer.clone(),
                    generation: request.generation,
                    handle,
                });
                let extraction = async move {
                    let roots = extract_outline(&*provider, &request, &settings).await;
                    OutlineMsg::ExtractionCompleted {
                        buffer: request.buffer,
                        generation: request.generation,
                        roots,
                    }
                };
                self.in_flight
                    .push(Abortable::new(extraction, registration).boxed_local());
            }
            Cmd::Publish { buffer, generation } => match self.model.snapshot() {
                Some(snapshot)
                    if snapshot.buffer == buffer && snapshot.generation == generation =>
                {
                    self.sink.publish(snapshot);
                    self.drop_superseded();
                }
                _ => tracing::debug!(
                    "Snapshot for {} generation {} superseded before publish",
                    buffer,
                    generation
                ),
            },
            Cmd::Clear { buffer } => {
                self.sink.clear(&buffer);
                self.drop_superseded();
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
        }
    }
}
