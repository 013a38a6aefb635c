//! Host document abstraction.

use std::fmt::Debug;
use std::hash::Hash;

/// The document the engine reads and mutates.
///
/// Node handles are identities: two handles compare equal only when they
/// refer to the same element. A handle may outlive its element's place in
/// the document, so [`Dom::is_connected`] is consulted before touching it.
pub trait Dom {
    type Node: Copy + Eq + Hash + Debug + Send + 'static;

    /// Root of the document.
    fn document(&self) -> Self::Node;

    /// Attribute value, `None` when the attribute is absent.
    fn attribute(&self, node: Self::Node, name: &str) -> Option<String>;

    /// Elements in the subtree at `root`, `root` included, carrying
    /// attribute `name`, in document order.
    fn find_with_attribute(&self, root: Self::Node, name: &str) -> Vec<Self::Node>;

    /// First element in the document matching `selector`.
    fn query_selector(&self, selector: &str) -> Option<Self::Node>;

    /// Replace the children of `node` with `html`. Returns the new
    /// top-level elements.
    fn set_inner_html(&mut self, node: Self::Node, html: &str) -> Vec<Self::Node>;

    /// Replace `node` itself with `html`. Returns the elements that took
    /// its place.
    fn set_outer_html(&mut self, node: Self::Node, html: &str) -> Vec<Self::Node>;

    /// Whether `node` is still attached to the document.
    fn is_connected(&self, node: Self::Node) -> bool;
}
