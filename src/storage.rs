//! Arena storage for heap nodes
//!
//! Nodes live in a [`SlotMap`] and reference each other by [`NodeKey`], so the
//! cyclic sibling rings and parent/child back-references of the forest are plain
//! key fields instead of pointers.
//!
//! # Handle validation
//!
//! Slotmap keys are generational: a key whose node has been removed never
//! resolves again, even if the slot is reused. That alone cannot tell two arenas
//! apart, so every [`NodeArena`] is also tagged with a process-unique [`HeapId`].
//! A handle carries both, and [`NodeArena::resolve`] rejects handles minted by
//! another arena ([`HeapError::ForeignHandle`]) or pointing at a removed node
//! ([`HeapError::StaleHandle`]).

use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

use slotmap::{new_key_type, SlotMap};

use crate::traits::HeapError;

new_key_type! {
    /// Arena key addressing one node
    pub(crate) struct NodeKey;
}

static NEXT_HEAP_ID: AtomicU64 = AtomicU64::new(1);

/// Identity tag of one arena instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct HeapId(u64);

impl HeapId {
    fn fresh() -> Self {
        HeapId(NEXT_HEAP_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Slotmap-backed node arena tagged with its owning heap's identity
#[derive(Debug, Clone)]
pub(crate) struct NodeArena<N> {
    owner: HeapId,
    nodes: SlotMap<NodeKey, N>,
}

impl<N> NodeArena<N> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            owner: HeapId::fresh(),
            nodes: SlotMap::with_capacity_and_key(capacity),
        }
    }

    #[inline]
    pub(crate) fn owner(&self) -> HeapId {
        self.owner
    }

    /// Inserts a node built from its own key (needed for self-referencing rings)
    #[inline]
    pub(crate) fn insert_with_key(&mut self, f: impl FnOnce(NodeKey) -> N) -> NodeKey {
        self.nodes.insert_with_key(f)
    }

    #[inline]
    pub(crate) fn remove(&mut self, key: NodeKey) -> Option<N> {
        self.nodes.remove(key)
    }

    #[inline]
    pub(crate) fn get(&self, key: NodeKey) -> Option<&N> {
        self.nodes.get(key)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Drains every node out of the arena, in unspecified order
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (NodeKey, N)> + '_ {
        self.nodes.drain()
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Drops every node and re-tags the arena so that previously issued handles
    /// can never resolve against the new contents. The new storage is
    /// pre-allocated for `capacity` nodes.
    pub(crate) fn reset(&mut self, capacity: usize) {
        self.owner = HeapId::fresh();
        self.nodes = SlotMap::with_capacity_and_key(capacity);
    }

    /// Maps an `(owner, key)` pair from a handle to a live key of this arena
    pub(crate) fn resolve(&self, owner: HeapId, key: NodeKey) -> Result<NodeKey, HeapError> {
        if owner != self.owner {
            return Err(HeapError::ForeignHandle);
        }
        if !self.nodes.contains_key(key) {
            return Err(HeapError::StaleHandle);
        }
        Ok(key)
    }
}

impl<N> Index<NodeKey> for NodeArena<N> {
    type Output = N;

    #[inline]
    fn index(&self, key: NodeKey) -> &N {
        &self.nodes[key]
    }
}

impl<N> IndexMut<NodeKey> for NodeArena<N> {
    #[inline]
    fn index_mut(&mut self, key: NodeKey) -> &mut N {
        &mut self.nodes[key]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_basic() {
        let mut arena: NodeArena<i32> = NodeArena::with_capacity(4);

        let key = arena.insert_with_key(|_| 42);
        assert_eq!(arena.get(key), Some(&42));

        arena[key] = 100;
        assert_eq!(arena[key], 100);
        assert_eq!(arena.len(), 1);

        assert_eq!(arena.remove(key), Some(100));
        assert!(arena.get(key).is_none());
    }

    #[test]
    fn test_resolve_rejects_removed_key() {
        let mut arena: NodeArena<i32> = NodeArena::with_capacity(0);
        let key = arena.insert_with_key(|_| 1);
        let owner = arena.owner();

        assert_eq!(arena.resolve(owner, key), Ok(key));
        arena.remove(key);
        assert_eq!(arena.resolve(owner, key), Err(HeapError::StaleHandle));

        // Slot reuse must not revive the old key
        let reused = arena.insert_with_key(|_| 2);
        assert_ne!(reused, key);
        assert_eq!(arena.resolve(owner, key), Err(HeapError::StaleHandle));
    }

    #[test]
    fn test_resolve_rejects_other_arena() {
        let mut a: NodeArena<i32> = NodeArena::with_capacity(0);
        let b: NodeArena<i32> = NodeArena::with_capacity(0);
        let key = a.insert_with_key(|_| 1);

        assert_ne!(a.owner(), b.owner());
        assert_eq!(b.resolve(a.owner(), key), Err(HeapError::ForeignHandle));
    }

    #[test]
    fn test_reset_retags_arena() {
        let mut arena: NodeArena<i32> = NodeArena::with_capacity(0);
        let key = arena.insert_with_key(|_| 1);
        let old_owner = arena.owner();

        arena.reset(0);
        assert_eq!(arena.len(), 0);
        assert_ne!(arena.owner(), old_owner);
        assert_eq!(arena.resolve(old_owner, key), Err(HeapError::ForeignHandle));
    }

    #[test]
    fn test_reset_keeps_requested_capacity() {
        let mut arena: NodeArena<i32> = NodeArena::with_capacity(128);
        for i in 0..10 {
            arena.insert_with_key(|_| i);
        }
        arena.reset(128);
        assert_eq!(arena.len(), 0);
        assert!(arena.capacity() >= 128);
    }

    #[test]
    fn test_self_referencing_insert() {
        let mut arena: NodeArena<NodeKey> = NodeArena::with_capacity(0);
        let key = arena.insert_with_key(|k| k);
        assert_eq!(arena[key], key);
    }
}
