//! Client-side engine for the bridge dashboard.
//!
//! Elements carrying [`attrs::GET`] are wired to fetch an HTML fragment
//! and swap it into the page, on click, on load, or on a recurring
//! interval. The [`engine::Engine`] is pure: it works against the [`Dom`]
//! trait and answers with [`Effect`]s. The [`driver::Driver`] runs it on
//! tokio with a [`fetch::Fetcher`] doing the network round trips.

pub mod binding;
pub mod confirm;
pub mod dom;
pub mod driver;
pub mod engine;
pub mod fetch;
pub mod tabs;
pub mod theme;
pub mod trigger;

pub use dom::Dom;
pub use engine::{Effect, Engine, FetchRequest};
pub use fetch::{FetchError, Fetcher, HttpFetcher};
pub use trigger::{SwapMode, Trigger};

/// Declarative attributes read by the engine.
pub mod attrs {
    /// URL of the fragment to fetch.
    pub const GET: &str = "hx-get";
    /// Trigger specification, e.g. `load, every 3s`.
    pub const TRIGGER: &str = "hx-trigger";
    /// Selector of the element receiving the fragment.
    pub const TARGET: &str = "hx-target";
    /// `innerHTML` (default) or `outerHTML`.
    pub const SWAP: &str = "hx-swap";
}

/// Header marking a request as a fragment fetch.
pub const FRAGMENT_HEADER: &str = "HX-Request";
