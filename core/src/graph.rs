use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{GraphError, Result};
use crate::state::{SupportEdge, TraversalState};

/// Bounds shared by node and edge keys.
pub trait GraphKey: Eq + Hash + Clone + Debug {}

impl<T: Eq + Hash + Clone + Debug> GraphKey for T {}

/// Arena index of a node. Stable for the lifetime of the graph; slots of
/// removed nodes are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Arena index of an edge. Same stability rules as [`NodeId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A vertex: the caller's key plus its adjacency lists.
#[derive(Debug, Clone)]
pub struct Node<N> {
    key: N,
    outgoing: Vec<EdgeId>,
    incoming: Vec<EdgeId>,
}

impl<N> Node<N> {
    pub fn key(&self) -> &N {
        &self.key
    }

    pub fn out_degree(&self) -> usize {
        self.outgoing.len()
    }

    pub fn in_degree(&self) -> usize {
        self.incoming.len()
    }
}

/// A directed edge with a non-negative length.
#[derive(Debug, Clone)]
pub struct Edge<E> {
    id: EdgeId,
    key: E,
    source: NodeId,
    target: NodeId,
    length: f64,
}

impl<E> Edge<E> {
    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn key(&self) -> &E {
        &self.key
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Cost of traversing the edge. Always finite and `>= 0`.
    pub fn length(&self) -> f64 {
        self.length
    }
}

/// In-memory directed graph: node and edge arenas, key lookup maps, and
/// per-node adjacency lists.
///
/// Edges are indexed in both directions: a node's `outgoing` list holds the
/// edges leaving it, `incoming` the edges entering it. Both lists are
/// maintained by `insert_edge` / `remove_edge`, so an isolated node simply
/// has two empty lists.
///
/// Traversal state is not stored here. Algorithms write into a
/// [`TraversalState`], which lets several traversals share one `&Graph`.
#[derive(Debug, Clone)]
pub struct Graph<N, E> {
    nodes: Vec<Option<Node<N>>>,
    edges: Vec<Option<Edge<E>>>,
    node_index: HashMap<N, NodeId>,
    edge_index: HashMap<E, EdgeId>,
}

impl<N, E> Graph<N, E> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            node_index: HashMap::new(),
            edge_index: HashMap::new(),
        }
    }

    /// Pre-allocate for a known graph size.
    pub fn with_capacity(node_count: usize, edge_count: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(node_count),
            edges: Vec::with_capacity(edge_count),
            node_index: HashMap::with_capacity(node_count),
            edge_index: HashMap::with_capacity(edge_count),
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_index.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_index.len()
    }

    /// Number of node slots, including tombstones of removed nodes.
    /// Traversal side tables are sized to this.
    pub(crate) fn node_slots(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<N>> {
        self.nodes.get(id.0).and_then(|slot| slot.as_ref())
    }

    pub fn node_key(&self, id: NodeId) -> Option<&N> {
        self.node(id).map(|n| &n.key)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge<E>> {
        self.edges.get(id.0).and_then(|slot| slot.as_ref())
    }

    /// Live edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge<E>> {
        self.edges.iter().filter_map(|slot| slot.as_ref())
    }

    /// Live node keys in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter().filter_map(|slot| slot.as_ref().map(|n| &n.key))
    }

    /// Source and target keys of an edge belonging to this graph.
    pub fn endpoints(&self, edge: &Edge<E>) -> Option<(&N, &N)> {
        Some((self.node_key(edge.source)?, self.node_key(edge.target)?))
    }

    pub(crate) fn out_edges(&self, id: NodeId) -> impl Iterator<Item = &Edge<E>> {
        let ids = self.node(id).map(|n| n.outgoing.as_slice()).unwrap_or(&[]);
        ids.iter().filter_map(move |&eid| self.edge(eid))
    }

    pub(crate) fn in_edges(&self, id: NodeId) -> impl Iterator<Item = &Edge<E>> {
        let ids = self.node(id).map(|n| n.incoming.as_slice()).unwrap_or(&[]);
        ids.iter().filter_map(move |&eid| self.edge(eid))
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        let node_slots = self.nodes.capacity() * size_of::<Option<Node<N>>>();
        let edge_slots = self.edges.capacity() * size_of::<Option<Edge<E>>>();
        let adjacency: usize = self
            .nodes
            .iter()
            .flatten()
            .map(|n| (n.outgoing.capacity() + n.incoming.capacity()) * size_of::<EdgeId>())
            .sum();
        // Rough per-entry overhead for the two key maps (key + id + control bytes).
        let index_mem = self.node_index.len() * (size_of::<N>() + size_of::<NodeId>() + 8)
            + self.edge_index.len() * (size_of::<E>() + size_of::<EdgeId>() + 8);

        node_slots + edge_slots + adjacency + index_mem
    }
}

impl<N: GraphKey, E: GraphKey> Graph<N, E> {
    /// Register a node. Returns `false` if a node with an equal key is
    /// already present, in which case nothing changes.
    pub fn add_node(&mut self, key: N) -> bool {
        if self.node_index.contains_key(&key) {
            return false;
        }
        let id = NodeId(self.nodes.len());
        self.node_index.insert(key.clone(), id);
        self.nodes.push(Some(Node {
            key,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }));
        true
    }

    /// Remove a node together with every edge touching it.
    pub fn remove_node(&mut self, key: &N) -> bool {
        let Some(id) = self.node_id(key) else {
            return false;
        };

        let incident: Vec<EdgeId> = self
            .node(id)
            .map(|n| n.outgoing.iter().chain(n.incoming.iter()).copied().collect())
            .unwrap_or_default();
        for eid in incident {
            self.remove_edge_by_id(eid);
        }

        self.nodes[id.0] = None;
        self.node_index.remove(key);
        true
    }

    pub fn contains_node(&self, key: &N) -> bool {
        self.node_index.contains_key(key)
    }

    pub fn node_id(&self, key: &N) -> Option<NodeId> {
        self.node_index.get(key).copied()
    }

    /// Insert a directed edge between two member nodes.
    ///
    /// Fails if either endpoint is not in the graph, if `key` is already
    /// used by another edge, or if `length` is negative or not finite.
    /// Parallel edges between the same pair are fine as long as their keys
    /// differ.
    pub fn insert_edge(&mut self, key: E, source: &N, target: &N, length: f64) -> Result<EdgeId> {
        let source_id = self
            .node_id(source)
            .ok_or_else(|| GraphError::unknown_node(source))?;
        let target_id = self
            .node_id(target)
            .ok_or_else(|| GraphError::unknown_node(target))?;
        self.check_edge(&key, length)?;

        let id = EdgeId(self.edges.len());
        self.edge_index.insert(key.clone(), id);
        self.edges.push(Some(Edge {
            id,
            key,
            source: source_id,
            target: target_id,
            length,
        }));
        if let Some(Some(node)) = self.nodes.get_mut(source_id.0) {
            node.outgoing.push(id);
        }
        if let Some(Some(node)) = self.nodes.get_mut(target_id.0) {
            node.incoming.push(id);
        }
        Ok(id)
    }

    /// Key and length checks of `insert_edge`, without touching the graph.
    pub(crate) fn check_edge(&self, key: &E, length: f64) -> Result<()> {
        if self.edge_index.contains_key(key) {
            return Err(GraphError::DuplicateEdge(format!("{:?}", key)));
        }
        if !length.is_finite() || length < 0.0 {
            return Err(GraphError::InvalidLength {
                edge: format!("{:?}", key),
                length,
            });
        }
        Ok(())
    }

    pub fn remove_edge(&mut self, key: &E) -> bool {
        match self.edge_id(key) {
            Some(id) => self.remove_edge_by_id(id),
            None => false,
        }
    }

    fn remove_edge_by_id(&mut self, id: EdgeId) -> bool {
        let Some(edge) = self.edges.get_mut(id.0).and_then(|slot| slot.take()) else {
            return false;
        };
        self.edge_index.remove(&edge.key);
        if let Some(Some(node)) = self.nodes.get_mut(edge.source.0) {
            node.outgoing.retain(|&e| e != id);
        }
        if let Some(Some(node)) = self.nodes.get_mut(edge.target.0) {
            node.incoming.retain(|&e| e != id);
        }
        true
    }

    pub fn contains_edge(&self, key: &E) -> bool {
        self.edge_index.contains_key(key)
    }

    /// True if at least one edge leads from `source` to `target`, whatever
    /// its key.
    pub fn contains_edge_between(&self, source: &N, target: &N) -> bool {
        match (self.node_id(source), self.node_id(target)) {
            (Some(s), Some(t)) => self.out_edges(s).any(|e| e.target == t),
            _ => false,
        }
    }

    pub fn edge_id(&self, key: &E) -> Option<EdgeId> {
        self.edge_index.get(key).copied()
    }

    /// Edges leaving `key`. Empty for nodes without outgoing edges and for
    /// keys that are not in the graph.
    pub fn outgoing_edges<'a>(&'a self, key: &N) -> impl Iterator<Item = &'a Edge<E>> + 'a {
        let id = self.node_id(key);
        id.into_iter().flat_map(move |id| self.out_edges(id))
    }

    /// Edges entering `key`. Empty for nodes without incoming edges and for
    /// keys that are not in the graph.
    pub fn incoming_edges<'a>(&'a self, key: &N) -> impl Iterator<Item = &'a Edge<E>> + 'a {
        let id = self.node_id(key);
        id.into_iter().flat_map(move |id| self.in_edges(id))
    }

    /// Outgoing then incoming edges of `key`. A self-loop is reported twice,
    /// once per side.
    pub fn incident_edges<'a>(&'a self, key: &N) -> impl Iterator<Item = &'a Edge<E>> + 'a {
        self.outgoing_edges(key).chain(self.incoming_edges(key))
    }

    /// Prepare `state` for a traversal rooted at `root`: every node loses its
    /// support edge, then `root` gets the root marker.
    ///
    /// Must precede every fresh traversal; the algorithms in this crate call
    /// it themselves. Calling it twice in a row is the same as calling it
    /// once.
    pub fn reset_support_edges(&self, state: &mut TraversalState, root: &N) -> Result<NodeId> {
        let root_id = self
            .node_id(root)
            .ok_or_else(|| GraphError::unknown_node(root))?;
        state.clear_support_edges(self.node_slots());
        state.set_support_edge(root_id, SupportEdge::Root);
        Ok(root_id)
    }

    /// Set every node's potential to `initial`. Support edges are untouched.
    pub fn reset_potentials(&self, state: &mut TraversalState, initial: f64) {
        state.fill_potentials(self.node_slots(), initial);
    }
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}
