//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use structure_outline::extract::ExtractionSettings;
use structure_outline::language::{LanguageAllowlist, LanguagePolicy};
use structure_outline::outline::{OutlineRange, OutlineSnapshot};
use structure_outline::provider::{
    NativeKind, ProviderError, ProviderSymbol, SymbolProvider, SymbolQuery,
};
use structure_outline::runtime::{EventSender, OutlineRuntime};
use structure_outline::sink::{ChannelSink, SinkEvent};
use structure_outline::OutlineModel;

/// One `function NAME` line becomes one function symbol on that line
pub fn symbols_for(content: &str) -> Vec<ProviderSymbol> {
    content
        .lines()
        .enumerate()
        .filter_map(|(line, text)| {
            let rest = text.trim_start().strip_prefix("function ")?;
            let name: String = rest
                .chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_')
                .collect();
            let column = text.len() - text.trim_start().len();
            Some(ProviderSymbol::new(
                name,
                NativeKind::Function,
                OutlineRange::on_line(line, column, text.chars().count()),
            ))
        })
        .collect()
}

/// Provider whose answers are held until the test releases them
///
/// Gates are numbered in call order.
#[derive(Default)]
pub struct GatedProvider {
    gates: RefCell<Vec<Option<oneshot::Sender<()>>>>,
    calls: Cell<usize>,
}

impl GatedProvider {
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Whether the `index`-th call was dropped while still waiting on its gate
    pub fn is_abandoned(&self, index: usize) -> bool {
        self.gates
            .borrow()
            .get(index)
            .and_then(Option::as_ref)
            .is_some_and(oneshot::Sender::is_closed)
    }

    /// Let the `index`-th call return
    pub fn release(&self, index: usize) {
        let gate = self
            .gates
            .borrow_mut()
            .get_mut(index)
            .and_then(Option::take);
        match gate {
            Some(tx) => {
                let _ = tx.send(());
            }
            None => panic!("no pending call #{}", index),
        }
    }
}

#[async_trait(?Send)]
impl SymbolProvider for GatedProvider {
    async fn document_symbols(
        &self,
        query: SymbolQuery<'_>,
    ) -> Result<Option<Vec<ProviderSymbol>>, ProviderError> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().push(Some(tx));
        self.calls.set(self.calls.get() + 1);

        let symbols = symbols_for(query.content);
        let _ = rx.await;
        Ok(Some(symbols))
    }
}

/// Provider that always fails
pub struct FailingProvider;

#[async_trait(?Send)]
impl SymbolProvider for FailingProvider {
    async fn document_symbols(
        &self,
        _query: SymbolQuery<'_>,
    ) -> Result<Option<Vec<ProviderSymbol>>, ProviderError> {
        Err(ProviderError::Unavailable("language server exited".into()))
    }
}

pub type TestRuntime<P> = OutlineRuntime<P, ChannelSink>;

/// Runtime with the extended allowlist and a channel sink
pub fn runtime_with<P: SymbolProvider + 'static>(
    provider: Rc<P>,
) -> (TestRuntime<P>, EventSender, mpsc::UnboundedReceiver<SinkEvent>) {
    runtime_with_policy(provider, LanguagePolicy::Extended)
}

pub fn runtime_with_policy<P: SymbolProvider + 'static>(
    provider: Rc<P>,
    policy: LanguagePolicy,
) -> (TestRuntime<P>, EventSender, mpsc::UnboundedReceiver<SinkEvent>) {
    let (sink, events) = ChannelSink::new();
    let (runtime, sender) = OutlineRuntime::new(
        provider,
        sink,
        OutlineModel::new(LanguageAllowlist::new(policy, Vec::new())),
        ExtractionSettings::default(),
    );
    (runtime, sender, events)
}

/// Give the runtime a chance to process everything that is ready
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Everything the sink has received so far
pub fn drain(events: &mut mpsc::UnboundedReceiver<SinkEvent>) -> Vec<SinkEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

/// Only the published snapshots, in order
pub fn published(events: &[SinkEvent]) -> Vec<&OutlineSnapshot> {
    events
        .iter()
        .filter_map(|event| match event {
            SinkEvent::Published(snapshot) => Some(snapshot),
            SinkEvent::Cleared(_) => None,
        })
        .collect()
}

/// Root names of a snapshot
pub fn root_names(snapshot: &OutlineSnapshot) -> Vec<&str> {
    snapshot.roots.iter().map(|n| n.name.as_str()).collect()
}
