//! Side-table of elements that already carry listeners and timers.

use std::collections::HashSet;
use std::hash::Hash;

#[derive(Debug)]
pub struct Bindings<N> {
    bound: HashSet<N>,
}

impl<N: Copy + Eq + Hash> Bindings<N> {
    pub fn new() -> Self {
        Self {
            bound: HashSet::new(),
        }
    }

    /// Mark `node` bound. Returns `false` if it already was.
    pub fn bind(&mut self, node: N) -> bool {
        self.bound.insert(node)
    }

    pub fn is_bound(&self, node: N) -> bool {
        self.bound.contains(&node)
    }

    /// Drop the binding. Returns `true` if `node` was bound.
    pub fn forget(&mut self, node: N) -> bool {
        self.bound.remove(&node)
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

impl<N: Copy + Eq + Hash> Default for Bindings<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_is_idempotent() {
        let mut bindings = Bindings::new();
        assert!(bindings.bind(7));
        assert!(!bindings.bind(7));
        assert_eq!(bindings.len(), 1);
    }

    #[test]
    fn forget_allows_rebinding() {
        let mut bindings = Bindings::new();
        bindings.bind(1);
        assert!(bindings.forget(1));
        assert!(!bindings.forget(1));
        assert!(!bindings.is_bound(1));
        assert!(bindings.bind(1));
    }
}
