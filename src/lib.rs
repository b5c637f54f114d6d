//! Arena-backed Fibonacci heap for Rust
//!
//! This crate provides a Fibonacci heap, a mergeable priority queue with
//! efficient `decrease_key` support, as used by shortest-path and spanning-tree
//! algorithms.
//!
//! # Features
//!
//! - O(1) amortized insert and decrease_key; O(log n) amortized extract-min and delete
//! - Handles validated against the issuing heap: misuse is an error, never corruption
//! - Delete-by-handle without relying on a sentinel key
//! - Optional proactive consolidation on Fibonacci-indexed insert thresholds
//! - Read-only graph export (with Graphviz output) and a tree-shaped `Display`
//!
//! # Example
//!
//! ```rust
//! use rust_fibonacci_heap::FibonacciHeap;
//!
//! let mut heap = FibonacciHeap::new(i32::MIN);
//! let handle1 = heap.insert(5);
//! let handle2 = heap.insert(3);
//! heap.decrease_key(&handle1, 1).unwrap();
//! assert_eq!(heap.find_min(), Some(&1));
//!
//! let deleted = heap.delete(&handle2).unwrap();
//! assert_eq!(deleted.into_key(), 3);
//! assert_eq!(heap.len(), 1);
//! ```

pub mod export;
pub mod fibonacci;
mod node;
mod storage;
pub mod threshold;
pub mod traits;

pub use export::{EdgeKind, HeapEdge, HeapGraph, HeapVertex};
pub use fibonacci::{FibonacciHandle, FibonacciHeap, HeapConfig, HeapStats};
pub use node::HeapNode;
pub use traits::{DecreaseKeyHeap, Handle, Heap, HeapError};
