//! Server-rendered HTML.
//!
//! Full pages are wrapped in [`layout::layout`]; fragments polled by the
//! client engine are returned bare.

pub mod layout;
pub mod pages;
pub mod tools;

pub use layout::{encode, escape_html, layout, Nav};
