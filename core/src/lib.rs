//! arbor-core: directed graph model with support-edge traversals.
//!
//! A pure Rust library that keeps nodes and edges in index arenas with
//! per-node adjacency lists, and builds support-edge trees over them:
//! breadth-first reachability, single-source shortest paths (linear-scan and
//! heap-based Dijkstra) and path reconstruction from the tree.
//!
//! Traversal results live in a [`TraversalState`] side table rather than on
//! the nodes, so one graph can serve any number of independent traversals.

mod document;
mod error;
mod graph;
mod state;
mod traversal;

pub use document::{EdgeRecord, GraphDocument};
pub use error::{GraphError, Result};
pub use graph::{Edge, EdgeId, Graph, GraphKey, Node, NodeId};
pub use state::{SupportEdge, SupportTree, TraversalState};
pub use traversal::{
    breadth_first_search, breadth_first_search_with, dijkstra, dijkstra_heap, dijkstra_heap_with,
    dijkstra_with, predecessors, successors,
};
