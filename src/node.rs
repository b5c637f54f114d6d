//! Forest nodes and the linkage primitives that rearrange them
//!
//! Every node sits in exactly one circular doubly-linked sibling ring: the
//! root ring, or the child ring of its parent. A node alone in its ring points
//! at itself in both directions.
//!
//! The ring operations mirror a classic intrusive circular list (insert after,
//! remove, splice two rings in O(1)), but links are arena keys rather than
//! pointers, so every primitive is safe code over a [`NodeArena`].

use std::fmt;

use crate::storage::{NodeArena, NodeKey};

/// A heap element while it is part of the forest
#[derive(Debug, Clone)]
pub(crate) struct Node<K> {
    pub(crate) key: K,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) child: Option<NodeKey>,
    pub(crate) left: NodeKey,
    pub(crate) right: NodeKey,
    pub(crate) degree: usize,
    /// Lost a child since becoming a child of its current parent; false on roots
    pub(crate) marked: bool,
}

impl<K> Node<K> {
    /// A parentless, childless node forming a ring of one
    pub(crate) fn singleton(this: NodeKey, key: K) -> Self {
        Node {
            key,
            parent: None,
            child: None,
            left: this,
            right: this,
            degree: 0,
            marked: false,
        }
    }
}

impl<K: fmt::Display> fmt::Display for Node<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Node[Degree:{} Key:{} Marked:{}]",
            self.degree, self.key, self.marked
        )
    }
}

/// A node outside of any heap, owned by the caller
///
/// Returned by [`extract_minimum`](crate::FibonacciHeap::extract_minimum) and
/// [`delete`](crate::FibonacciHeap::delete); can be built up front and handed to
/// [`insert_node`](crate::FibonacciHeap::insert_node).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeapNode<K> {
    key: K,
}

impl<K> HeapNode<K> {
    /// Wraps a key for [`insert_node`](crate::FibonacciHeap::insert_node)
    pub fn new(key: K) -> Self {
        HeapNode { key }
    }

    /// The key the node carries
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Replaces the key, e.g. before re-inserting a node taken out of a heap
    pub fn set_key(&mut self, key: K) {
        self.key = key;
    }

    /// Consumes the node, returning its key
    pub fn into_key(self) -> K {
        self.key
    }
}

/// Iterator over one sibling ring, starting at a given member
pub(crate) struct Ring<'a, K> {
    arena: &'a NodeArena<Node<K>>,
    start: NodeKey,
    next: Option<NodeKey>,
}

impl<K> Iterator for Ring<'_, K> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        let current = self.next?;
        let right = self.arena[current].right;
        self.next = if right == self.start { None } else { Some(right) };
        Some(current)
    }
}

impl<K> NodeArena<Node<K>> {
    /// Iterates the ring containing `start`, beginning with `start`
    pub(crate) fn ring(&self, start: NodeKey) -> Ring<'_, K> {
        Ring {
            arena: self,
            start,
            next: Some(start),
        }
    }

    /// Inserts the singleton `new` to the right of `at`
    pub(crate) fn insert_after(&mut self, at: NodeKey, new: NodeKey) {
        debug_assert!(self[new].left == new && self[new].right == new, "new is already linked");

        let next = self[at].right;
        self[at].right = new;
        self[new].left = at;
        self[new].right = next;
        self[next].left = new;
    }

    /// Removes `node` from its ring, leaving it a singleton
    ///
    /// Returns a remaining member of the old ring, or `None` if `node` was alone.
    pub(crate) fn unlink(&mut self, node: NodeKey) -> Option<NodeKey> {
        let left = self[node].left;
        let right = self[node].right;
        if right == node {
            return None;
        }
        self[left].right = right;
        self[right].left = left;
        self[node].left = node;
        self[node].right = node;
        Some(right)
    }

    /// Splices the ring containing `b` into the ring containing `a`
    ///
    /// Before: `a_prev <-> a` and `b_prev <-> b`. After:
    /// `a_prev <-> b <-> ... <-> b_prev <-> a`.
    pub(crate) fn splice(&mut self, a: NodeKey, b: NodeKey) {
        let a_prev = self[a].left;
        let b_prev = self[b].left;

        self[a_prev].right = b;
        self[b].left = a_prev;

        self[b_prev].right = a;
        self[a].left = b_prev;
    }

    /// Makes root `child` a child of root `parent`
    pub(crate) fn link(&mut self, child: NodeKey, parent: NodeKey) {
        debug_assert_ne!(child, parent, "cannot link a node to itself");

        self.unlink(child);
        let first_child = self[parent].child;
        match first_child {
            Some(first) => self.insert_after(first, child),
            None => self[parent].child = Some(child),
        }
        self[child].parent = Some(parent);
        self[child].marked = false;
        self[parent].degree += 1;
    }

    /// Removes `child` from `parent`'s child ring and splices it into the ring
    /// containing `root` (the root ring, next to the minimum)
    pub(crate) fn cut(&mut self, child: NodeKey, parent: NodeKey, root: NodeKey) {
        debug_assert_eq!(self[child].parent, Some(parent));

        let remaining = self.unlink(child);
        if self[parent].child == Some(child) {
            self[parent].child = remaining;
        }
        self[parent].degree -= 1;

        self[child].parent = None;
        self[child].marked = false;
        self.insert_after(root, child);
    }

    /// Detaches the child ring of `node`, turning its members into
    /// parentless, unmarked nodes
    ///
    /// Returns an entry point into the detached ring. The ring itself is left
    /// intact for the caller to splice somewhere.
    pub(crate) fn take_children(&mut self, node: NodeKey) -> Option<NodeKey> {
        let first = self[node].child.take()?;
        self[node].degree = 0;

        let mut current = first;
        loop {
            let entry = &mut self[current];
            entry.parent = None;
            entry.marked = false;
            current = entry.right;
            if current == first {
                break;
            }
        }
        Some(first)
    }
}
