//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) amortized insert and decrease_key
//! - O(log n) amortized extract_minimum and delete
//!
//! The structure is a collection of heap-ordered trees. Roots are linked in a
//! circular doubly linked list, and so are the children of every node. The heap
//! keeps the root with the smallest key as its minimum.
//!
//! Nodes live in a generational slotmap arena, so the cyclic
//! links are arena keys and no unsafe code is involved. Handles carry the
//! identity of the heap that issued them; using a handle with the wrong heap or
//! after its element was removed is reported as an error.
//!
//! # Consolidation
//!
//! `extract_minimum` always consolidates: trees of equal degree are linked
//! until every root has a distinct degree. In addition, insert consolidates
//! whenever the size reaches a multiple of a Fibonacci-indexed threshold
//! (see [`crate::threshold`]), which keeps the root list short under insert-heavy
//! workloads. This can be turned off through [`HeapConfig`].

use std::fmt;

use slotmap::SecondaryMap;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::node::{HeapNode, Node, Ring};
use crate::storage::{HeapId, NodeArena, NodeKey};
use crate::threshold::ConsolidationThreshold;
use crate::traits::{DecreaseKeyHeap, Handle, Heap, HeapError};

/// Golden ratio; a root of degree d holds at least phi^d nodes
const PHI: f64 = 1.618_033_988_749_895;

/// Handle to an element in a Fibonacci heap
///
/// The handle stays valid until its element is extracted, deleted or the heap
/// is cleared. Afterwards every operation taking it fails with a
/// [`HeapError`] instead of touching another element.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FibonacciHandle {
    heap: HeapId,
    node: NodeKey,
}

impl Handle for FibonacciHandle {}

/// Construction-time tunables for [`FibonacciHeap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapConfig {
    /// Consolidate during insert when the size crosses the Fibonacci threshold
    pub proactive_consolidation: bool,
    /// Number of nodes to pre-allocate in the arena
    pub capacity: usize,
}

impl Default for HeapConfig {
    fn default() -> Self {
        HeapConfig {
            proactive_consolidation: true,
            capacity: 0,
        }
    }
}

impl HeapConfig {
    /// Proactive consolidation on, no pre-allocation
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_proactive_consolidation(mut self, enabled: bool) -> Self {
        self.proactive_consolidation = enabled;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

/// Running counters of the structural work a heap has done
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapStats {
    /// Roots made children of other roots during consolidation
    pub links: u64,
    /// Nodes moved to the root list by decrease_key, delete or cascading cuts
    pub cuts: u64,
    /// Cuts of marked ancestors (a subset of `cuts`)
    pub cascading_cuts: u64,
    /// Consolidation passes of any origin
    pub consolidations: u64,
    /// Consolidation passes triggered by the insert threshold
    pub proactive_consolidations: u64,
}

/// Fibonacci Heap
///
/// `K` is the key type. The heap is built around a caller-supplied sentinel
/// key, which [`peek_minimum`](Self::peek_minimum) reports for an empty heap.
/// The sentinel must compare less than or equal to every key ever inserted or
/// decreased to; this is checked only in debug builds.
///
/// # Example
///
/// ```rust
/// use rust_fibonacci_heap::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new(i32::MIN);
/// let five = heap.insert(5);
/// heap.insert(3);
/// heap.decrease_key(&five, 1).unwrap();
/// assert_eq!(*heap.peek_minimum(), 1);
/// assert_eq!(heap.pop(), Some(1));
/// assert_eq!(heap.pop(), Some(3));
/// assert_eq!(*heap.peek_minimum(), i32::MIN);
/// ```
pub struct FibonacciHeap<K: Ord> {
    nodes: NodeArena<Node<K>>,
    min: Option<NodeKey>,
    len: usize,
    sentinel: K,
    threshold: ConsolidationThreshold,
    config: HeapConfig,
    stats: HeapStats,
}

impl<K: Ord> FibonacciHeap<K> {
    /// Creates an empty heap with the default configuration
    pub fn new(sentinel: K) -> Self {
        Self::with_config(sentinel, HeapConfig::default())
    }

    /// Creates an empty heap with explicit tunables
    pub fn with_config(sentinel: K, config: HeapConfig) -> Self {
        FibonacciHeap {
            nodes: NodeArena::with_capacity(config.capacity),
            min: None,
            len: 0,
            sentinel,
            threshold: ConsolidationThreshold::default(),
            config,
            stats: HeapStats::default(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// The key reported by [`peek_minimum`](Self::peek_minimum) on an empty heap
    pub fn sentinel(&self) -> &K {
        &self.sentinel
    }

    /// The configuration the heap was built with
    pub fn config(&self) -> &HeapConfig {
        &self.config
    }

    /// Snapshot of the structural work counters
    pub fn stats(&self) -> HeapStats {
        self.stats
    }

    /// Size at which the next proactive consolidation fires (given no removals)
    pub fn consolidation_threshold(&self) -> usize {
        self.threshold.current()
    }

    /// Number of trees in the root list. O(number of roots).
    pub fn root_count(&self) -> usize {
        self.min.map_or(0, |min| self.nodes.ring(min).count())
    }

    /// Inserts a key and returns a handle to it
    ///
    /// # Time Complexity
    /// O(1) amortized
    pub fn insert(&mut self, key: K) -> FibonacciHandle {
        self.insert_node(HeapNode::new(key))
    }

    /// Inserts a node built by the caller, e.g. one previously returned by
    /// [`extract_minimum`](Self::extract_minimum)
    pub fn insert_node(&mut self, node: HeapNode<K>) -> FibonacciHandle {
        let key = node.into_key();
        debug_assert!(self.sentinel <= key, "key is below the heap's sentinel");

        let new = self.nodes.insert_with_key(|this| Node::singleton(this, key));
        self.add_root(new);
        self.len += 1;

        if self.threshold.on_insert(self.len) && self.config.proactive_consolidation {
            self.stats.proactive_consolidations += 1;
            self.consolidate();
        }

        FibonacciHandle {
            heap: self.nodes.owner(),
            node: new,
        }
    }

    /// Returns the minimum key, or the sentinel if the heap is empty
    ///
    /// # Time Complexity
    /// O(1)
    pub fn peek_minimum(&self) -> &K {
        self.find_min().unwrap_or(&self.sentinel)
    }

    /// Returns the minimum key, or `None` if the heap is empty
    pub fn find_min(&self) -> Option<&K> {
        self.min.map(|min| &self.nodes[min].key)
    }

    /// Returns the current key of a live element
    pub fn get(&self, handle: &FibonacciHandle) -> Option<&K> {
        let node = self.nodes.resolve(handle.heap, handle.node).ok()?;
        Some(&self.nodes[node].key)
    }

    /// Returns true if the handle addresses a live element of this heap
    pub fn contains(&self, handle: &FibonacciHandle) -> bool {
        self.nodes.resolve(handle.heap, handle.node).is_ok()
    }

    /// Removes the minimum element and hands its node back to the caller
    ///
    /// Returns `None` on an empty heap.
    ///
    /// # Time Complexity
    /// O(log n) amortized
    pub fn extract_minimum(&mut self) -> Option<HeapNode<K>> {
        let min = self.min?;
        self.remove_root(min)
    }

    /// Removes the minimum element and returns its key
    pub fn pop(&mut self) -> Option<K> {
        self.extract_minimum().map(HeapNode::into_key)
    }

    /// Lowers the key of the element behind `handle`
    ///
    /// # Errors
    /// - [`HeapError::InvalidKeyOrder`] if `new_key` is greater than the current
    ///   key; the heap is left unmodified
    /// - [`HeapError::ForeignHandle`] / [`HeapError::StaleHandle`] if the handle
    ///   does not address a live element of this heap
    ///
    /// # Time Complexity
    /// O(1) amortized
    pub fn decrease_key(&mut self, handle: &FibonacciHandle, new_key: K) -> Result<(), HeapError> {
        let node = self.nodes.resolve(handle.heap, handle.node)?;
        if new_key > self.nodes[node].key {
            return Err(HeapError::InvalidKeyOrder);
        }
        debug_assert!(self.sentinel <= new_key, "key is below the heap's sentinel");
        self.nodes[node].key = new_key;

        let parent = self.nodes[node].parent;
        if let Some(parent) = parent {
            if self.nodes[node].key < self.nodes[parent].key {
                self.cut(node, parent);
                self.cascading_cut(parent);
            }
        }

        if let Some(min) = self.min {
            if self.nodes[node].key < self.nodes[min].key {
                self.min = Some(node);
            }
        }
        Ok(())
    }

    /// Removes the element behind `handle`, wherever it sits in the forest
    ///
    /// The node is cut to the root list (cascading to its former ancestors)
    /// and then removed exactly like the minimum would be, so no key
    /// comparison against the sentinel is involved.
    ///
    /// # Errors
    /// [`HeapError::ForeignHandle`] / [`HeapError::StaleHandle`] if the handle
    /// does not address a live element of this heap.
    ///
    /// # Time Complexity
    /// O(log n) amortized
    pub fn delete(&mut self, handle: &FibonacciHandle) -> Result<HeapNode<K>, HeapError> {
        let node = self.nodes.resolve(handle.heap, handle.node)?;
        let parent = self.nodes[node].parent;
        if let Some(parent) = parent {
            self.cut(node, parent);
            self.cascading_cut(parent);
        }
        self.remove_root(node).ok_or(HeapError::StaleHandle)
    }

    /// Empties the heap in O(1) without walking the forest
    ///
    /// Every handle issued so far stops resolving. Statistics are kept and the
    /// arena is pre-allocated again for [`HeapConfig::capacity`] nodes.
    pub fn clear(&mut self) {
        self.nodes.reset(self.config.capacity);
        self.min = None;
        self.len = 0;
        self.threshold = ConsolidationThreshold::default();
    }

    /// Moves every element of `other` into this heap
    ///
    /// The other forest is copied into this arena with its shape intact and its
    /// root list spliced next to ours. Handles issued by `other` become foreign.
    /// The sentinel of `self` is kept.
    ///
    /// # Time Complexity
    /// O(m) for m elements in `other`; no consolidation is performed.
    pub fn merge(&mut self, mut other: Self) {
        let Some(other_min) = other.min else {
            return;
        };

        let moved: Vec<(NodeKey, Node<K>)> = other.nodes.drain().collect();
        let mut remap: SecondaryMap<NodeKey, NodeKey> = SecondaryMap::with_capacity(moved.len());
        for (old, node) in moved {
            let new = self.nodes.insert_with_key(|_| node);
            remap.insert(old, new);
        }
        for (_, &new) in remap.iter() {
            let node = &mut self.nodes[new];
            node.left = remap[node.left];
            node.right = remap[node.right];
            node.parent = node.parent.map(|p| remap[p]);
            node.child = node.child.map(|c| remap[c]);
        }

        let other_min = remap[other_min];
        match self.min {
            Some(min) => {
                self.nodes.splice(min, other_min);
                if self.nodes[other_min].key < self.nodes[min].key {
                    self.min = Some(other_min);
                }
            }
            None => self.min = Some(other_min),
        }

        self.len += other.len;
        self.threshold = ConsolidationThreshold::for_len(self.len);
        trace!(moved = other.len, len = self.len, "merged heap");
    }

    /// Links roots of equal degree until all root degrees are distinct, then
    /// re-scans the root list for the minimum
    ///
    /// Runs automatically on every extract and, when enabled, on insert
    /// thresholds. Calling it directly after a bulk load front-loads that work.
    pub fn consolidate(&mut self) {
        let Some(start) = self.min else {
            return;
        };
        self.stats.consolidations += 1;
        let links_before = self.stats.links;

        // Links rewrite the ring while we walk it, so snapshot it first
        let roots: SmallVec<[NodeKey; 32]> = self.nodes.ring(start).collect();
        let root_count = roots.len();
        let mut by_degree: SmallVec<[Option<NodeKey>; 64]> = SmallVec::new();

        for root in roots {
            let mut current = root;
            let mut degree = self.nodes[current].degree;
            loop {
                if degree >= by_degree.len() {
                    by_degree.resize(degree + 1, None);
                }
                let other = match by_degree[degree] {
                    Some(other) if other != current => other,
                    _ => break,
                };
                let (parent, child) = if self.nodes[other].key < self.nodes[current].key {
                    (other, current)
                } else {
                    (current, other)
                };
                self.nodes.link(child, parent);
                self.stats.links += 1;
                by_degree[degree] = None;
                current = parent;
                degree += 1;
            }
            by_degree[degree] = Some(current);
        }

        let Some(first) = by_degree.iter().flatten().copied().next() else {
            return;
        };
        let nodes = &self.nodes;
        let new_min = nodes
            .ring(first)
            .reduce(|best, n| if nodes[n].key < nodes[best].key { n } else { best });
        self.min = new_min;

        trace!(
            roots_before = root_count,
            links = self.stats.links - links_before,
            "consolidated root list"
        );
    }

    /// Checks every structural invariant by walking the whole forest
    ///
    /// Verifies sibling ring symmetry, parent back-links, degree counts, heap
    /// order, unmarked roots, the minimum pointer, the logarithmic degree bound
    /// and that `len()` matches the number of reachable nodes.
    pub fn verify_internal_structure(&self) -> bool {
        match self.check_structure() {
            Ok(()) => true,
            Err(reason) => {
                debug!(reason, len = self.len, "heap invariant violated");
                false
            }
        }
    }

    fn check_structure(&self) -> Result<(), &'static str> {
        let Some(min) = self.min else {
            return if self.len == 0 && self.nodes.len() == 0 {
                Ok(())
            } else {
                Err("heap without minimum holds elements")
            };
        };
        if self.nodes.get(min).is_none() {
            return Err("minimum is not a live node");
        }

        let degree_bound = (self.len as f64).ln() / PHI.ln() + 1e-9;
        let mut reached = 0usize;
        let mut pending: Vec<(NodeKey, Option<NodeKey>)> = vec![(min, None)];

        while let Some((start, parent)) = pending.pop() {
            let mut siblings = 0usize;
            for node in self.nodes.ring(start) {
                reached += 1;
                siblings += 1;
                if reached > self.len {
                    return Err("more reachable nodes than len");
                }

                let entry = &self.nodes[node];
                if self.nodes[entry.right].left != node || self.nodes[entry.left].right != node {
                    return Err("sibling ring is not symmetric");
                }
                if entry.parent != parent {
                    return Err("parent link does not match enclosing ring");
                }
                match parent {
                    None => {
                        if entry.marked {
                            return Err("root is marked");
                        }
                        if entry.key < self.nodes[min].key {
                            return Err("minimum is not the smallest root");
                        }
                    }
                    Some(p) => {
                        if entry.key < self.nodes[p].key {
                            return Err("heap order violated");
                        }
                    }
                }
                if entry.degree as f64 > degree_bound {
                    return Err("degree exceeds logarithmic bound");
                }
                match entry.child {
                    Some(child) => pending.push((child, Some(node))),
                    None if entry.degree != 0 => return Err("nonzero degree without children"),
                    None => {}
                }
            }
            if let Some(p) = parent {
                if siblings != self.nodes[p].degree {
                    return Err("degree does not match child count");
                }
            }
        }

        if reached != self.len || self.nodes.len() != self.len {
            return Err("len does not match reachable nodes");
        }
        Ok(())
    }

    pub(crate) fn min_node(&self) -> Option<NodeKey> {
        self.min
    }

    pub(crate) fn node(&self, key: NodeKey) -> &Node<K> {
        &self.nodes[key]
    }

    pub(crate) fn handle_for(&self, key: NodeKey) -> FibonacciHandle {
        FibonacciHandle {
            heap: self.nodes.owner(),
            node: key,
        }
    }

    pub(crate) fn ring(&self, start: NodeKey) -> Ring<'_, K> {
        self.nodes.ring(start)
    }

    fn add_root(&mut self, node: NodeKey) {
        match self.min {
            Some(min) => {
                self.nodes.insert_after(min, node);
                if self.nodes[node].key < self.nodes[min].key {
                    self.min = Some(node);
                }
            }
            None => self.min = Some(node),
        }
    }

    /// Removes a root from the forest, promoting its children to roots
    fn remove_root(&mut self, node: NodeKey) -> Option<HeapNode<K>> {
        debug_assert!(self.nodes[node].parent.is_none(), "only roots can be removed");

        if let Some(children) = self.nodes.take_children(node) {
            self.nodes.splice(node, children);
        }
        match self.nodes.unlink(node) {
            None => self.min = None,
            Some(next) => {
                self.min = Some(next);
                self.consolidate();
            }
        }

        self.len -= 1;
        self.threshold.on_remove(self.len);
        let removed = self.nodes.remove(node)?;
        Some(HeapNode::new(removed.key))
    }

    /// Moves `node` from under `parent` to the root list
    fn cut(&mut self, node: NodeKey, parent: NodeKey) {
        debug_assert!(self.min.is_some(), "cut on an empty heap");
        if let Some(root) = self.min {
            self.nodes.cut(node, parent, root);
            self.stats.cuts += 1;
        }
    }

    /// Walks up from `node`, cutting marked ancestors until it reaches an
    /// unmarked one (which gets marked) or a root
    fn cascading_cut(&mut self, node: NodeKey) {
        let mut current = node;
        let mut depth = 0usize;
        loop {
            let parent = match self.nodes[current].parent {
                Some(parent) => parent,
                None => break,
            };
            if !self.nodes[current].marked {
                self.nodes[current].marked = true;
                break;
            }
            self.cut(current, parent);
            self.stats.cascading_cuts += 1;
            depth += 1;
            current = parent;
        }
        if depth > 0 {
            trace!(depth, "cascading cut");
        }
    }
}

impl<K: Ord + fmt::Debug> fmt::Debug for FibonacciHeap<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FibonacciHeap")
            .field("len", &self.len)
            .field("min", &self.find_min())
            .field("roots", &self.root_count())
            .field("sentinel", &self.sentinel)
            .finish()
    }
}

/// Renders the forest depth-first, one node per line, indented by one tab
/// per level
impl<K: Ord + fmt::Display> fmt::Display for FibonacciHeap<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(min) = self.min else {
            return write!(f, "FibonacciHeap=[]");
        };
        writeln!(f, "FibonacciHeap={{")?;

        let mut stack: Vec<(Ring<'_, K>, usize)> = vec![(self.nodes.ring(min), 1)];
        loop {
            let Some((ring, depth)) = stack.last_mut() else {
                break;
            };
            let depth = *depth;
            match ring.next() {
                Some(node) => {
                    for _ in 0..depth {
                        f.write_str("\t")?;
                    }
                    writeln!(f, "{}", self.nodes[node])?;
                    if let Some(child) = self.nodes[node].child {
                        stack.push((self.nodes.ring(child), depth + 1));
                    }
                }
                None => {
                    stack.pop();
                }
            }
        }
        write!(f, "}};")
    }
}

impl<K: Ord> Heap<K> for FibonacciHeap<K> {
    fn is_empty(&self) -> bool {
        FibonacciHeap::is_empty(self)
    }

    fn len(&self) -> usize {
        FibonacciHeap::len(self)
    }

    fn push(&mut self, key: K) {
        self.insert(key);
    }

    fn peek(&self) -> Option<&K> {
        self.find_min()
    }

    fn pop(&mut self) -> Option<K> {
        FibonacciHeap::pop(self)
    }

    fn merge(&mut self, other: Self) {
        FibonacciHeap::merge(self, other)
    }
}

impl<K: Ord> DecreaseKeyHeap<K> for FibonacciHeap<K> {
    type Handle = FibonacciHandle;

    fn push_with_handle(&mut self, key: K) -> Self::Handle {
        self.insert(key)
    }

    fn decrease_key(&mut self, handle: &Self::Handle, new_key: K) -> Result<(), HeapError> {
        FibonacciHeap::decrease_key(self, handle, new_key)
    }

    fn delete(&mut self, handle: &Self::Handle) -> Result<K, HeapError> {
        FibonacciHeap::delete(self, handle).map(HeapNode::into_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lazy_heap() -> FibonacciHeap<i32> {
        FibonacciHeap::with_config(i32::MIN, HeapConfig::new().with_proactive_consolidation(false))
    }

    fn children_of(heap: &FibonacciHeap<i32>, node: NodeKey) -> Vec<NodeKey> {
        match heap.nodes[node].child {
            Some(child) => heap.nodes.ring(child).collect(),
            None => Vec::new(),
        }
    }

    fn child_with_degree(heap: &FibonacciHeap<i32>, node: NodeKey, degree: usize) -> NodeKey {
        children_of(heap, node)
            .into_iter()
            .find(|&c| heap.nodes[c].degree == degree)
            .expect("binomial tree child of the requested degree")
    }

    #[test]
    fn test_basic_operations() {
        let mut heap = FibonacciHeap::new(i32::MIN);
        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);

        heap.insert(5);
        heap.insert(3);
        heap.insert(7);

        assert_eq!(heap.len(), 3);
        assert_eq!(heap.find_min(), Some(&3));

        let min = heap.extract_minimum();
        assert_eq!(min.map(HeapNode::into_key), Some(3));
        assert_eq!(heap.find_min(), Some(&5));
        assert!(heap.verify_internal_structure());
    }

    #[test]
    fn test_empty_heap_reports_sentinel() {
        let mut heap: FibonacciHeap<i32> = FibonacciHeap::new(-1);
        assert_eq!(*heap.peek_minimum(), -1);
        assert!(heap.extract_minimum().is_none());
        assert_eq!(heap.pop(), None);
        assert_eq!(heap.root_count(), 0);
        assert!(heap.verify_internal_structure());
    }

    #[test]
    fn test_decrease_key() {
        let mut heap = FibonacciHeap::new(i32::MIN);
        let _h1 = heap.insert(10);
        let h2 = heap.insert(20);
        let h3 = heap.insert(30);

        assert_eq!(heap.find_min(), Some(&10));

        heap.decrease_key(&h2, 5).unwrap();
        assert_eq!(heap.find_min(), Some(&5));

        heap.decrease_key(&h3, 1).unwrap();
        assert_eq!(heap.find_min(), Some(&1));
        assert_eq!(heap.get(&h3), Some(&1));
    }

    #[test]
    fn test_decrease_key_rejects_larger_key() {
        let mut heap = FibonacciHeap::new(i32::MIN);
        let h = heap.insert(10);
        heap.insert(4);

        assert_eq!(heap.decrease_key(&h, 11), Err(HeapError::InvalidKeyOrder));
        assert_eq!(heap.get(&h), Some(&10));
        assert_eq!(heap.find_min(), Some(&4));

        // Equal key is accepted
        assert_eq!(heap.decrease_key(&h, 10), Ok(()));
    }

    #[test]
    fn test_handles_from_other_heap_are_rejected() {
        let mut a = FibonacciHeap::new(i32::MIN);
        let mut b = FibonacciHeap::new(i32::MIN);
        let ha = a.insert(1);
        b.insert(1);

        assert_eq!(b.decrease_key(&ha, 0), Err(HeapError::ForeignHandle));
        assert_eq!(b.delete(&ha), Err(HeapError::ForeignHandle));
        assert!(!b.contains(&ha));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_removed_handles_are_stale() {
        let mut heap = FibonacciHeap::new(i32::MIN);
        let h = heap.insert(1);
        heap.insert(2);
        assert_eq!(heap.pop(), Some(1));

        assert_eq!(heap.decrease_key(&h, 0), Err(HeapError::StaleHandle));
        assert_eq!(heap.delete(&h), Err(HeapError::StaleHandle));
        assert_eq!(heap.get(&h), None);
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut heap = FibonacciHeap::new(i32::MIN);
        let handles: Vec<_> = (0..20).map(|i| heap.insert(i)).collect();
        heap.clear();

        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);
        assert!(heap.verify_internal_structure());
        assert_eq!(heap.consolidation_threshold(), 2);
        for h in &handles {
            assert!(heap.decrease_key(h, -1).unwrap_err().is_structural());
        }

        let fresh = heap.insert(7);
        assert_eq!(heap.get(&fresh), Some(&7));
        assert!(!handles.contains(&fresh));
    }

    #[test]
    fn test_clear_keeps_configured_capacity() {
        let mut heap = FibonacciHeap::with_config(i32::MIN, HeapConfig::new().with_capacity(256));
        assert!(heap.nodes.capacity() >= 256);
        for k in 0..50 {
            heap.insert(k);
        }
        heap.clear();
        assert!(heap.nodes.capacity() >= 256);
        assert!(heap.verify_internal_structure());
    }

    #[test]
    fn test_consolidate_reaches_high_degree() {
        let mut heap = lazy_heap();
        for k in 0..=4096 {
            heap.insert(k);
        }
        // 4096 remaining nodes collapse into a single B12 tree
        assert_eq!(heap.pop(), Some(0));
        assert_eq!(heap.root_count(), 1);
        let root = heap.min.unwrap();
        assert_eq!(heap.nodes[root].degree, 12);
        assert!(heap.verify_internal_structure());

        for k in 1..=4096 {
            assert_eq!(heap.pop(), Some(k));
        }
        assert!(heap.is_empty());
    }

    #[test]
    fn test_merge() {
        let mut heap1 = FibonacciHeap::new(i32::MIN);
        heap1.insert(5);
        heap1.insert(10);

        let mut heap2 = FibonacciHeap::new(i32::MIN);
        let moved = heap2.insert(3);
        heap2.insert(7);
        heap2.pop();
        heap2.insert(2);

        heap1.merge(heap2);
        assert_eq!(heap1.find_min(), Some(&2));
        assert_eq!(heap1.len(), 4);
        assert!(heap1.verify_internal_structure());
        assert_eq!(heap1.get(&moved), None);

        let drained: Vec<_> = std::iter::from_fn(|| heap1.pop()).collect();
        assert_eq!(drained, vec![2, 5, 7, 10]);
    }

    #[test]
    fn test_merge_into_empty() {
        let mut empty = FibonacciHeap::new(i32::MIN);
        let mut other = FibonacciHeap::new(i32::MIN);
        for k in [4, 8, 1] {
            other.insert(k);
        }
        empty.merge(other);
        assert_eq!(empty.len(), 3);
        assert_eq!(empty.find_min(), Some(&1));
        assert!(empty.verify_internal_structure());
    }

    #[test]
    fn test_proactive_consolidation_at_fibonacci_sizes() {
        let mut heap = FibonacciHeap::new(0);
        for k in 1..=88 {
            heap.insert(k);
        }
        assert_eq!(heap.stats().proactive_consolidations, 8);

        heap.insert(89);
        assert_eq!(heap.stats().proactive_consolidations, 9);
        assert_eq!(heap.consolidation_threshold(), 144);
        // 89 = 64 + 16 + 8 + 1: one binomial tree per set bit
        assert_eq!(heap.root_count(), 4);
        assert_eq!(*heap.peek_minimum(), 1);
        assert!(heap.verify_internal_structure());
    }

    #[test]
    fn test_lazy_config_skips_insert_consolidation() {
        let mut heap = lazy_heap();
        for k in 0..100 {
            heap.insert(k);
        }
        assert_eq!(heap.stats().consolidations, 0);
        assert_eq!(heap.root_count(), 100);

        heap.pop();
        assert_eq!(heap.stats().consolidations, 1);
        // 99 = 64 + 32 + 2 + 1
        assert_eq!(heap.root_count(), 4);
    }

    #[test]
    fn test_cascading_cut_on_second_child_loss() {
        let mut heap = lazy_heap();
        for k in 0..=8 {
            heap.insert(k);
        }
        // Removing 0 consolidates the eight remaining roots into one B3 tree
        assert_eq!(heap.pop(), Some(0));
        assert_eq!(heap.root_count(), 1);

        let root = heap.min.unwrap();
        let a = child_with_degree(&heap, root, 2);
        let b = child_with_degree(&heap, a, 1);
        let e = child_with_degree(&heap, a, 0);
        let c = child_with_degree(&heap, b, 0);

        heap.decrease_key(&heap.handle_for(e), -1).unwrap();
        assert!(heap.nodes[a].marked);
        heap.decrease_key(&heap.handle_for(c), -2).unwrap();
        assert!(heap.nodes[b].marked);
        assert_eq!(heap.stats().cascading_cuts, 0);

        // b loses its parent's favour: a is marked, so a is cut as well
        heap.decrease_key(&heap.handle_for(b), -3).unwrap();
        assert_eq!(heap.stats().cuts, 4);
        assert_eq!(heap.stats().cascading_cuts, 1);
        assert_eq!(heap.nodes[a].parent, None);
        assert!(!heap.nodes[a].marked);
        assert!(!heap.nodes[root].marked);
        assert_eq!(*heap.peek_minimum(), -3);
        assert!(heap.verify_internal_structure());

        let drained: Vec<_> = std::iter::from_fn(|| heap.pop()).collect();
        let mut sorted = drained.clone();
        sorted.sort();
        assert_eq!(drained, sorted);
        assert_eq!(drained.len(), 8);
    }

    #[test]
    fn test_delete_inner_node() {
        let mut heap = lazy_heap();
        let handles: Vec<_> = (0..=8).map(|k| heap.insert(k)).collect();
        heap.pop();

        let removed = heap.delete(&handles[5]).unwrap();
        assert_eq!(removed.into_key(), 5);
        assert_eq!(heap.len(), 7);
        assert!(!heap.contains(&handles[5]));
        assert!(heap.verify_internal_structure());

        let drained: Vec<_> = std::iter::from_fn(|| heap.pop()).collect();
        assert_eq!(drained, vec![1, 2, 3, 4, 6, 7, 8]);
    }

    #[test]
    fn test_insert_node_reuses_extracted_node() {
        let mut heap = FibonacciHeap::new(i32::MIN);
        heap.insert(3);
        let mut node = heap.extract_minimum().unwrap();
        node.set_key(9);
        let h = heap.insert_node(node);
        assert_eq!(heap.get(&h), Some(&9));
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn test_display_rendering() {
        let mut heap = lazy_heap();
        assert_eq!(heap.to_string(), "FibonacciHeap=[]");

        heap.insert(1);
        heap.insert(2);
        heap.insert(0);
        heap.pop();

        let rendered = heap.to_string();
        assert_eq!(
            rendered,
            "FibonacciHeap={\n\tNode[Degree:1 Key:1 Marked:false]\n\t\tNode[Degree:0 Key:2 Marked:false]\n};"
        );
    }
}
