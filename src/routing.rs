//! Window handle to owner routing
//!
//! The window procedure is a bare function with no context pointer of its
//! own. Before a window is created its owner is staged here; the first
//! message for the new handle binds the staged owner to it, and every later
//! message looks the owner up by handle.

use std::collections::HashMap;
use std::hash::Hash;

/// Table mapping live window handles to their owners
#[derive(Debug)]
pub struct HandleTable<H, T> {
    staged: Option<T>,
    bound: HashMap<H, T>,
}

impl<H, T> HandleTable<H, T>
where
    H: Copy + Eq + Hash,
    T: Clone,
{
    pub fn new() -> Self {
        Self {
            staged: None,
            bound: HashMap::new(),
        }
    }

    /// Stage the owner of the window about to be created
    pub fn stage(&mut self, owner: T) {
        self.staged = Some(owner);
    }

    /// Discard a staged owner that was never bound (creation failed)
    pub fn clear_staged(&mut self) -> Option<T> {
        self.staged.take()
    }

    /// Bind the staged owner to `handle`, returning it
    pub fn bind(&mut self, handle: H) -> Option<T> {
        let owner = self.staged.take()?;
        self.bound.insert(handle, owner.clone());
        Some(owner)
    }

    /// Look up the owner of `handle`
    pub fn get(&self, handle: H) -> Option<T> {
        self.bound.get(&handle).cloned()
    }

    /// Forget `handle`, returning its owner
    pub fn unbind(&mut self, handle: H) -> Option<T> {
        self.bound.remove(&handle)
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

impl<H, T> Default for HandleTable<H, T>
where
    H: Copy + Eq + Hash,
    T: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_then_bind() {
        let mut table: HandleTable<usize, &str> = HandleTable::new();
        table.stage("owner");

        assert_eq!(table.get(7), None);
        assert_eq!(table.bind(7), Some("owner"));
        assert_eq!(table.get(7), Some("owner"));
        assert_eq!(table.clear_staged(), None);
    }

    #[test]
    fn test_bind_without_staged_owner() {
        let mut table: HandleTable<usize, &str> = HandleTable::new();
        assert_eq!(table.bind(1), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_staged_owner_binds_once() {
        let mut table: HandleTable<usize, &str> = HandleTable::new();
        table.stage("owner");
        table.bind(1);

        // A second window created without staging gets no owner
        assert_eq!(table.bind(2), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_unbind() {
        let mut table: HandleTable<usize, &str> = HandleTable::new();
        table.stage("a");
        table.bind(1);
        table.stage("b");
        table.bind(2);

        assert_eq!(table.unbind(1), Some("a"));
        assert_eq!(table.get(1), None);
        assert_eq!(table.get(2), Some("b"));
        assert_eq!(table.unbind(1), None);
    }

    #[test]
    fn test_clear_staged_after_failed_create() {
        let mut table: HandleTable<usize, &str> = HandleTable::new();
        table.stage("owner");
        assert_eq!(table.clear_staged(), Some("owner"));
        assert_eq!(table.bind(3), None);
    }
}
