//! Polling trigger engine and fetch-and-swap executor.
//!
//! The engine never performs I/O. Every entry point takes the document,
//! updates its binding table and returns the [`Effect`]s the host must
//! carry out: attach a click listener, start or stop an interval timer,
//! or fetch a fragment. Fetch results come back through
//! [`Engine::complete`], which swaps the fragment in and rescans the
//! inserted markup so nested reactive elements come alive.

use std::hash::Hash;
use std::time::Duration;

use crate::attrs;
use crate::binding::Bindings;
use crate::dom::Dom;
use crate::fetch::FetchError;
use crate::trigger::{SwapMode, Trigger};

/// Work the host must perform on behalf of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect<N> {
    /// Call [`Engine::click`] when `node` is clicked, suppressing the
    /// default action.
    ListenClick(N),
    /// Call [`Engine::tick`] for `node` every `period`.
    StartInterval { node: N, period: Duration },
    /// Cancel the interval started for `node`.
    StopInterval(N),
    /// Fetch `request.url` and pass the outcome to [`Engine::complete`].
    Fetch(FetchRequest<N>),
}

/// A fragment fetch issued for `source`, to be swapped into `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest<N> {
    pub source: N,
    pub target: N,
    pub url: String,
    pub swap: SwapMode,
}

#[derive(Debug)]
pub struct Engine<N> {
    bindings: Bindings<N>,
}

impl<N: Copy + Eq + Hash + std::fmt::Debug> Engine<N> {
    pub fn new() -> Self {
        Self {
            bindings: Bindings::new(),
        }
    }

    pub fn is_bound(&self, node: N) -> bool {
        self.bindings.is_bound(node)
    }

    pub fn bound_count(&self) -> usize {
        self.bindings.len()
    }

    /// Bind every unbound element under `root` (inclusive) that names a
    /// fetch URL. Elements bound by an earlier scan are skipped.
    pub fn scan<D: Dom<Node = N>>(&mut self, dom: &D, root: N) -> Vec<Effect<N>> {
        let mut effects = Vec::new();
        for node in dom.find_with_attribute(root, attrs::GET) {
            if !self.bindings.bind(node) {
                continue;
            }
            let trigger = Trigger::parse(dom.attribute(node, attrs::TRIGGER).as_deref());
            tracing::trace!(?node, ?trigger, "Bound element");

            if trigger.click {
                effects.push(Effect::ListenClick(node));
            }
            if trigger.load {
                effects.extend(self.request(dom, node));
            }
            if let Some(period) = trigger.every {
                effects.push(Effect::StartInterval { node, period });
            }
        }
        effects
    }

    /// Build the fetch for `node`, or nothing when it has no URL or its
    /// target selector matches nothing.
    pub fn request<D: Dom<Node = N>>(&self, dom: &D, node: N) -> Option<Effect<N>> {
        let url = dom.attribute(node, attrs::GET).filter(|url| !url.is_empty())?;
        let target = match dom.attribute(node, attrs::TARGET) {
            Some(selector) if !selector.is_empty() => dom.query_selector(&selector)?,
            _ => node,
        };
        let swap = SwapMode::parse(dom.attribute(node, attrs::SWAP).as_deref());

        Some(Effect::Fetch(FetchRequest {
            source: node,
            target,
            url,
            swap,
        }))
    }

    /// A bound element was clicked.
    pub fn click<D: Dom<Node = N>>(&mut self, dom: &D, node: N) -> Vec<Effect<N>> {
        if !self.bindings.is_bound(node) {
            return Vec::new();
        }
        if !dom.is_connected(node) {
            return self.detach(node);
        }
        self.request(dom, node).into_iter().collect()
    }

    /// The interval timer of `node` fired.
    pub fn tick<D: Dom<Node = N>>(&mut self, dom: &D, node: N) -> Vec<Effect<N>> {
        if !self.bindings.is_bound(node) || !dom.is_connected(node) {
            return self.detach(node);
        }
        self.request(dom, node).into_iter().collect()
    }

    /// Apply the outcome of a fetch.
    ///
    /// Transport failures are dropped; the next click or tick is the only
    /// retry. A successful body replaces the target per the swap mode and
    /// the inserted markup is scanned. Bound elements removed by the swap
    /// are unbound first, so their listeners and timers go with them.
    pub fn complete<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
        request: &FetchRequest<N>,
        result: Result<String, FetchError>,
    ) -> Vec<Effect<N>> {
        let html = match result {
            Ok(html) => html,
            Err(err) => {
                tracing::debug!(url = %request.url, error = %err, "Fragment fetch failed");
                return Vec::new();
            }
        };

        if !dom.is_connected(request.target) {
            tracing::trace!(url = %request.url, "Dropping fragment for detached target");
            if dom.is_connected(request.source) {
                return Vec::new();
            }
            return self.detach(request.source);
        }

        match request.swap {
            SwapMode::Inner => {
                let mut effects = self.detach_subtree(&*dom, request.target, false);
                dom.set_inner_html(request.target, &html);
                effects.extend(self.scan(&*dom, request.target));
                effects
            }
            SwapMode::Outer => {
                let mut effects = self.detach_subtree(&*dom, request.target, true);
                let roots = dom.set_outer_html(request.target, &html);
                for root in roots {
                    effects.extend(self.scan(&*dom, root));
                }
                effects
            }
        }
    }

    /// Unbind every bound element under `root`, and `root` itself when
    /// `inclusive`.
    fn detach_subtree<D: Dom<Node = N>>(
        &mut self,
        dom: &D,
        root: N,
        inclusive: bool,
    ) -> Vec<Effect<N>> {
        let mut effects = Vec::new();
        for node in dom.find_with_attribute(root, attrs::GET) {
            if node != root || inclusive {
                effects.extend(self.detach(node));
            }
        }
        effects
    }

    fn detach(&mut self, node: N) -> Vec<Effect<N>> {
        if self.bindings.forget(node) {
            tracing::trace!(?node, "Unbound detached element");
            vec![Effect::StopInterval(node)]
        } else {
            Vec::new()
        }
    }
}

impl<N: Copy + Eq + Hash + std::fmt::Debug> Default for Engine<N> {
    fn default() -> Self {
        Self::new()
    }
}
