//! Common traits for heap data structures
//!
//! This module provides a two-tier trait hierarchy for priority queues:
//!
//! - [`Heap`]: Base trait for push/peek/pop/merge
//! - [`DecreaseKeyHeap`]: Extended trait adding handle-based `decrease_key` and `delete`
//!
//! The base [`Heap`] trait follows the shape of Rust's standard heap API, while
//! [`DecreaseKeyHeap`] adds the operations needed by algorithms like Dijkstra's
//! shortest path or Prim's spanning tree.

use std::fmt;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// The new key is greater than the current key
    InvalidKeyOrder,
    /// The handle was issued by a different heap (or by this heap before `clear`)
    ForeignHandle,
    /// The handle refers to an element that has already been removed
    StaleHandle,
}

impl HeapError {
    /// Returns true for errors caused by a handle that does not address a live
    /// node of this heap, as opposed to a rejected key.
    pub fn is_structural(&self) -> bool {
        matches!(self, HeapError::ForeignHandle | HeapError::StaleHandle)
    }
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::InvalidKeyOrder => {
                write!(f, "new key is greater than the current key")
            }
            HeapError::ForeignHandle => {
                write!(f, "handle does not belong to this heap")
            }
            HeapError::StaleHandle => {
                write!(f, "handle is no longer valid (element was removed)")
            }
        }
    }
}

impl std::error::Error for HeapError {}

/// A handle to an element in the heap, used for `decrease_key` and `delete`
///
/// This is an opaque type that identifies a specific element in a specific heap.
pub trait Handle: Clone + PartialEq + Eq {}

/// Base trait for heap/priority queue data structures
///
/// Min-heap semantics: `peek` and `pop` address the smallest key.
///
/// # Example
///
/// ```rust
/// use rust_fibonacci_heap::{FibonacciHeap, Heap};
///
/// let mut heap = FibonacciHeap::new(i32::MIN);
/// heap.push(3);
/// heap.push(1);
/// heap.push(2);
///
/// assert_eq!(heap.peek(), Some(&1));
/// assert_eq!(heap.pop(), Some(1));
/// ```
pub trait Heap<K: Ord> {
    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Inserts a key
    ///
    /// # Time Complexity
    /// O(1) amortized for Fibonacci heaps.
    fn push(&mut self, key: K);

    /// Returns the minimum key without removing it
    ///
    /// # Time Complexity
    /// O(1)
    fn peek(&self) -> Option<&K>;

    /// Removes and returns the minimum key
    ///
    /// # Time Complexity
    /// O(log n) amortized.
    fn pop(&mut self) -> Option<K>;

    /// Merges another heap into this one, consuming the other heap
    fn merge(&mut self, other: Self);
}

/// Extended heap trait with `decrease_key` and `delete` support
///
/// # Example
///
/// ```rust
/// use rust_fibonacci_heap::{DecreaseKeyHeap, FibonacciHeap, Heap};
///
/// let mut heap = FibonacciHeap::new(i32::MIN);
/// let handle = heap.push_with_handle(10);
/// heap.decrease_key(&handle, 5).unwrap();
/// assert_eq!(heap.peek(), Some(&5));
/// ```
pub trait DecreaseKeyHeap<K: Ord>: Heap<K> {
    /// The handle type for this heap
    type Handle: Handle;

    /// Inserts a key, returning a handle for later `decrease_key`/`delete`
    fn push_with_handle(&mut self, key: K) -> Self::Handle;

    /// Lowers the key of the element identified by the handle
    ///
    /// A new key equal to the current one is accepted and leaves the heap as is.
    ///
    /// # Errors
    /// - `HeapError::InvalidKeyOrder` if the new key is greater than the current key
    /// - `HeapError::ForeignHandle` / `HeapError::StaleHandle` if the handle does
    ///   not address a live element of this heap
    fn decrease_key(&mut self, handle: &Self::Handle, new_key: K) -> Result<(), HeapError>;

    /// Removes the element identified by the handle and returns its key
    ///
    /// # Errors
    /// `HeapError::ForeignHandle` / `HeapError::StaleHandle` for handles that do
    /// not address a live element of this heap.
    fn delete(&mut self, handle: &Self::Handle) -> Result<K, HeapError>;
}
