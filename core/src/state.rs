//! Per-traversal side table and the typed view algorithms hand back.

use tracing::warn;

use crate::graph::{Edge, EdgeId, Graph, GraphKey, NodeId};

/// How a reached node was reached.
///
/// `Root` marks the traversal's start node; it carries no source, target or
/// length. Unvisited nodes have no support edge at all (`None` in the
/// accessors below).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportEdge {
    Root,
    Edge(EdgeId),
}

impl SupportEdge {
    pub fn is_root(self) -> bool {
        matches!(self, SupportEdge::Root)
    }

    pub fn edge_id(self) -> Option<EdgeId> {
        match self {
            SupportEdge::Root => None,
            SupportEdge::Edge(id) => Some(id),
        }
    }
}

/// Support edge and potential for every node slot of one graph, indexed by
/// [`NodeId`].
///
/// Create one per traversal, or keep one around and pass it to the `_with`
/// algorithm variants, which reset it before use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraversalState {
    support: Vec<Option<SupportEdge>>,
    potential: Vec<f64>,
}

impl TraversalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn support_edge(&self, node: NodeId) -> Option<SupportEdge> {
        self.support.get(node.0).copied().flatten()
    }

    /// Raw potential of a slot, whether or not the node was reached.
    pub fn potential(&self, node: NodeId) -> Option<f64> {
        self.potential.get(node.0).copied()
    }

    pub fn is_reached(&self, node: NodeId) -> bool {
        self.support_edge(node).is_some()
    }

    /// Number of nodes carrying a support edge (root included).
    pub fn reached_count(&self) -> usize {
        self.support.iter().filter(|s| s.is_some()).count()
    }

    pub(crate) fn clear_support_edges(&mut self, slots: usize) {
        self.support.clear();
        self.support.resize(slots, None);
    }

    pub(crate) fn fill_potentials(&mut self, slots: usize, value: f64) {
        self.potential.clear();
        self.potential.resize(slots, value);
    }

    pub(crate) fn set_support_edge(&mut self, node: NodeId, edge: SupportEdge) {
        if node.0 >= self.support.len() {
            self.support.resize(node.0 + 1, None);
        }
        self.support[node.0] = Some(edge);
    }

    pub(crate) fn set_potential(&mut self, node: NodeId, value: f64) {
        if node.0 >= self.potential.len() {
            self.potential.resize(node.0 + 1, 0.0);
        }
        self.potential[node.0] = value;
    }
}

/// Result of a traversal: the filled side table together with the graph it
/// describes. Support edges form an arborescence rooted at [`root`].
///
/// [`root`]: SupportTree::root
#[derive(Debug)]
pub struct SupportTree<'g, N, E> {
    graph: &'g Graph<N, E>,
    state: TraversalState,
    root: NodeId,
}

impl<'g, N: GraphKey, E: GraphKey> SupportTree<'g, N, E> {
    /// Wrap a state filled by one of the `_with` traversals.
    pub fn new(graph: &'g Graph<N, E>, state: TraversalState, root: NodeId) -> Self {
        Self { graph, state, root }
    }

    pub fn graph(&self) -> &'g Graph<N, E> {
        self.graph
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn root(&self) -> Option<&'g N> {
        self.graph.node_key(self.root)
    }

    pub fn state(&self) -> &TraversalState {
        &self.state
    }

    /// Hand the side table back for reuse.
    pub fn into_state(self) -> TraversalState {
        self.state
    }

    pub fn support_edge(&self, node: &N) -> Option<SupportEdge> {
        self.graph
            .node_id(node)
            .and_then(|id| self.state.support_edge(id))
    }

    /// The edge through which `node` was reached. `None` for the root and
    /// for unreached nodes.
    pub fn support_edge_of(&self, node: &N) -> Option<&'g Edge<E>> {
        self.support_edge(node)
            .and_then(SupportEdge::edge_id)
            .and_then(|id| self.graph.edge(id))
    }

    /// Distance from the root. `None` for nodes the traversal did not reach.
    pub fn potential(&self, node: &N) -> Option<f64> {
        let id = self.graph.node_id(node)?;
        if !self.state.is_reached(id) {
            return None;
        }
        self.state.potential(id)
    }

    pub fn is_reachable(&self, node: &N) -> bool {
        self.support_edge(node).is_some()
    }

    pub fn reached_count(&self) -> usize {
        self.state.reached_count()
    }

    /// Reached node keys in graph insertion order, root included.
    pub fn reached(&self) -> impl Iterator<Item = &'g N> + '_ {
        let graph = self.graph;
        graph
            .nodes()
            .filter(move |key| graph.node_id(key).is_some_and(|id| self.state.is_reached(id)))
    }

    /// Edges from the root to `target`, in walking order.
    ///
    /// `None` if `target` was not reached (or is not in the graph);
    /// `Some(vec![])` if `target` is the root.
    pub fn path_from_root(&self, target: &N) -> Option<Vec<&'g Edge<E>>> {
        let id = self.graph.node_id(target)?;
        self.path_to(id)
    }

    /// Node keys along [`path_from_root`](Self::path_from_root), root first
    /// and `target` last.
    pub fn path_nodes_from_root(&self, target: &N) -> Option<Vec<&'g N>> {
        let edges = self.path_from_root(target)?;
        let mut nodes = Vec::with_capacity(edges.len() + 1);
        nodes.push(self.root()?);
        for edge in edges {
            nodes.push(self.graph.node_key(edge.target())?);
        }
        Some(nodes)
    }

    fn path_to(&self, target: NodeId) -> Option<Vec<&'g Edge<E>>> {
        let limit = self.graph.node_count();
        let mut path = Vec::new();
        let mut current = target;

        // Unreached target: the `?` on the first lookup is the "no path" answer.
        let mut support = self.state.support_edge(current)?;
        while let SupportEdge::Edge(eid) = support {
            let Some(edge) = self.graph.edge(eid) else {
                warn!(
                    node = current.index(),
                    edge = eid.index(),
                    "support edge no longer in graph"
                );
                return None;
            };
            path.push(edge);
            if path.len() > limit {
                warn!(node = target.index(), limit, "support edge chain does not reach the root");
                return None;
            }
            current = edge.source();
            let Some(next) = self.state.support_edge(current) else {
                warn!(node = current.index(), "support edge chain passes an unreached node");
                return None;
            };
            support = next;
        }

        path.reverse();
        Some(path)
    }
}
