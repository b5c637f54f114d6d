//! Read-only graph view of a heap's forest
//!
//! [`FibonacciHeap::to_graph`] walks everything reachable from the minimum and
//! records one vertex per node plus one edge per parent, left, right and child
//! link. The result borrows the heap, so the heap cannot change while a graph is
//! alive. [`HeapGraph::dot`] renders it for Graphviz.

use std::collections::HashMap;
use std::fmt;

use crate::fibonacci::{FibonacciHandle, FibonacciHeap};
use crate::storage::NodeKey;

/// Which link of the source node an edge represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// From a child to its parent
    Parent,
    /// To the left sibling in the same ring
    Left,
    /// To the right sibling in the same ring
    Right,
    /// From a parent to the entry point of its child ring
    Child,
}

impl EdgeKind {
    fn label(self) -> &'static str {
        match self {
            EdgeKind::Parent => "parent",
            EdgeKind::Left => "left",
            EdgeKind::Right => "right",
            EdgeKind::Child => "child",
        }
    }
}

/// One directed link between two nodes of the forest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeapEdge {
    /// Node the link is stored on
    pub source: FibonacciHandle,
    /// Node the link points at
    pub target: FibonacciHandle,
    pub kind: EdgeKind,
}

/// One node of the forest as seen by the export
#[derive(Debug, Clone, Copy)]
pub struct HeapVertex<'a, K> {
    /// Handle usable with the exported heap, e.g. for `decrease_key`
    pub handle: FibonacciHandle,
    pub key: &'a K,
    /// Number of children
    pub degree: usize,
    /// Lost a child since becoming a child itself
    pub marked: bool,
}

/// Vertex and edge lists of a heap snapshot
#[derive(Debug, Clone)]
pub struct HeapGraph<'a, K> {
    vertices: Vec<HeapVertex<'a, K>>,
    edges: Vec<HeapEdge>,
}

impl<'a, K: Ord> HeapGraph<'a, K> {
    /// Walks every node reachable from the heap's minimum
    pub fn from_heap(heap: &'a FibonacciHeap<K>) -> Self {
        let mut vertices = Vec::with_capacity(heap.len());
        let mut edges = Vec::with_capacity(heap.len() * 4);
        let mut pending: Vec<NodeKey> = heap.min_node().into_iter().collect();

        while let Some(start) = pending.pop() {
            for key in heap.ring(start) {
                let node = heap.node(key);
                let source = heap.handle_for(key);
                vertices.push(HeapVertex {
                    handle: source,
                    key: &node.key,
                    degree: node.degree,
                    marked: node.marked,
                });

                let mut edge = |target: NodeKey, kind| {
                    edges.push(HeapEdge {
                        source,
                        target: heap.handle_for(target),
                        kind,
                    })
                };
                if let Some(parent) = node.parent {
                    edge(parent, EdgeKind::Parent);
                }
                edge(node.left, EdgeKind::Left);
                edge(node.right, EdgeKind::Right);
                if let Some(child) = node.child {
                    edge(child, EdgeKind::Child);
                    pending.push(child);
                }
            }
        }

        HeapGraph { vertices, edges }
    }
}

impl<'a, K> HeapGraph<'a, K> {
    pub fn vertices(&self) -> &[HeapVertex<'a, K>] {
        &self.vertices
    }

    pub fn edges(&self) -> &[HeapEdge] {
        &self.edges
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Edges leaving the vertex behind `handle`
    pub fn edges_from(&self, handle: FibonacciHandle) -> impl Iterator<Item = &HeapEdge> + '_ {
        self.edges.iter().filter(move |e| e.source == handle)
    }

    /// Graphviz DOT rendering; marked nodes are filled
    pub fn dot(&self) -> Dot<'_, 'a, K> {
        Dot(self)
    }
}

/// [`fmt::Display`] adapter returned by [`HeapGraph::dot`]
pub struct Dot<'g, 'a, K>(&'g HeapGraph<'a, K>);

impl<K: fmt::Display> fmt::Display for Dot<'_, '_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = self.0;
        let ids: HashMap<FibonacciHandle, usize> = graph
            .vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (v.handle, i))
            .collect();

        writeln!(f, "digraph FibonacciHeap {{")?;
        for (i, v) in graph.vertices.iter().enumerate() {
            write!(f, "    n{} [label=\"{} (d{})\"", i, v.key, v.degree)?;
            if v.marked {
                write!(f, ", style=filled")?;
            }
            writeln!(f, "];")?;
        }
        for e in &graph.edges {
            if let (Some(s), Some(t)) = (ids.get(&e.source), ids.get(&e.target)) {
                writeln!(f, "    n{} -> n{} [label=\"{}\"];", s, t, e.kind.label())?;
            }
        }
        write!(f, "}}")
    }
}

impl<K: Ord> FibonacciHeap<K> {
    /// Exports the forest as a vertex/edge list without modifying the heap
    pub fn to_graph(&self) -> HeapGraph<'_, K> {
        HeapGraph::from_heap(self)
    }
}
