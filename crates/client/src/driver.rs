//! Tokio host for the [`Engine`].
//!
//! One loop owns the document and the engine. Interval timers, fetches
//! and clicks run as separate tasks or callers and report back through a
//! single channel, so every DOM mutation happens on the loop. Fetches are
//! not de-duplicated: when a round trip outlives its interval the next
//! tick starts another, and whichever answer arrives last wins the swap.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::dom::Dom;
use crate::engine::{Effect, Engine, FetchRequest};
use crate::fetch::{FetchError, Fetcher};

/// Inputs to the driver loop.
#[derive(Debug)]
pub enum HostEvent<N> {
    Click(N),
    Tick(N),
    Fetched {
        request: FetchRequest<N>,
        result: Result<String, FetchError>,
    },
}

/// Cloneable handle for feeding user input to a running [`Driver`].
#[derive(Debug, Clone)]
pub struct DriverHandle<N> {
    tx: mpsc::UnboundedSender<HostEvent<N>>,
}

impl<N> DriverHandle<N> {
    /// Report a click on `node`. Returns `false` once the driver stopped.
    pub fn click(&self, node: N) -> bool {
        self.tx.send(HostEvent::Click(node)).is_ok()
    }
}

pub struct Driver<D: Dom, F> {
    dom: D,
    engine: Engine<D::Node>,
    fetcher: Arc<F>,
    tx: mpsc::UnboundedSender<HostEvent<D::Node>>,
    rx: mpsc::UnboundedReceiver<HostEvent<D::Node>>,
    listeners: HashSet<D::Node>,
    intervals: HashMap<D::Node, JoinHandle<()>>,
    cancel: CancellationToken,
}

impl<D: Dom, F: Fetcher> Driver<D, F> {
    pub fn new(dom: D, fetcher: F, cancel: CancellationToken) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            dom,
            engine: Engine::new(),
            fetcher: Arc::new(fetcher),
            tx,
            rx,
            listeners: HashSet::new(),
            intervals: HashMap::new(),
            cancel,
        }
    }

    pub fn handle(&self) -> DriverHandle<D::Node> {
        DriverHandle {
            tx: self.tx.clone(),
        }
    }

    /// Scan the whole document, then process events until `cancel`
    /// fires. Returns the document for inspection.
    pub async fn run(mut self) -> D {
        let document = self.dom.document();
        let effects = self.engine.scan(&self.dom, document);
        tracing::debug!(bound = self.engine.bound_count(), "Initial scan finished");
        self.apply(effects);

        loop {
            let event = tokio::select! {
                _ = self.cancel.cancelled() => None,
                event = self.rx.recv() => event,
            };
            match event {
                Some(event) => self.dispatch(event),
                None => break,
            }
        }

        self.shutdown().await;
        self.dom
    }

    fn dispatch(&mut self, event: HostEvent<D::Node>) {
        let effects = match event {
            HostEvent::Click(node) => {
                if !self.listeners.contains(&node) {
                    return;
                }
                let effects = self.engine.click(&self.dom, node);
                if !self.engine.is_bound(node) {
                    self.listeners.remove(&node);
                }
                effects
            }
            HostEvent::Tick(node) => self.engine.tick(&self.dom, node),
            HostEvent::Fetched { request, result } => {
                self.engine.complete(&mut self.dom, &request, result)
            }
        };
        self.apply(effects);
    }

    fn apply(&mut self, effects: Vec<Effect<D::Node>>) {
        for effect in effects {
            match effect {
                Effect::ListenClick(node) => {
                    self.listeners.insert(node);
                }
                Effect::StartInterval { node, period } => self.start_interval(node, period),
                Effect::StopInterval(node) => {
                    self.listeners.remove(&node);
                    if let Some(handle) = self.intervals.remove(&node) {
                        handle.abort();
                        tracing::debug!(?node, "Stopped interval");
                    }
                }
                Effect::Fetch(request) => self.spawn_fetch(request),
            }
        }
    }

    fn start_interval(&mut self, node: D::Node, period: Duration) {
        let tx = self.tx.clone();
        let cancel = self.cancel.child_token();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the first fetch is due
            // one period after binding.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        if tx.send(HostEvent::Tick(node)).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        tracing::debug!(?node, period_ms = period.as_millis() as u64, "Started interval");
        if let Some(previous) = self.intervals.insert(node, handle) {
            previous.abort();
        }
    }

    fn spawn_fetch(&self, request: FetchRequest<D::Node>) {
        let tx = self.tx.clone();
        let fetcher = Arc::clone(&self.fetcher);
        let cancel = self.cancel.child_token();

        tokio::spawn(async move {
            let url = request.url.clone();
            let result = tokio::select! {
                _ = cancel.cancelled() => return,
                result = fetcher.fetch(&url) => result,
            };
            let _ = tx.send(HostEvent::Fetched { request, result });
        });
    }

    async fn shutdown(&mut self) {
        let handles: Vec<_> = self.intervals.drain().map(|(_, handle)| handle).collect();
        for handle in &handles {
            handle.abort();
        }
        futures::future::join_all(handles).await;
        tracing::debug!("Driver stopped");
    }
}
