use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet, VecDeque};
use std::time::Instant;

use tracing::{debug, trace};

use crate::error::Result;
use crate::graph::{EdgeId, Graph, GraphKey, NodeId};
use crate::state::{SupportEdge, SupportTree, TraversalState};

/// Breadth-first search from `root` along outgoing edges.
///
/// Every node reachable from `root` gets the edge it was first discovered
/// through as its support edge, so the resulting tree holds shortest paths
/// by edge count (not by length). The potential of each reached node is its
/// hop distance from `root`.
///
/// Fails if `root` is not in the graph.
pub fn breadth_first_search<'g, N: GraphKey, E: GraphKey>(
    graph: &'g Graph<N, E>,
    root: &N,
) -> Result<SupportTree<'g, N, E>> {
    let mut state = TraversalState::new();
    let root_id = breadth_first_search_with(graph, &mut state, root)?;
    Ok(SupportTree::new(graph, state, root_id))
}

/// [`breadth_first_search`] into a caller-owned side table. Anything left in
/// `state` from an earlier run is discarded.
pub fn breadth_first_search_with<N: GraphKey, E: GraphKey>(
    graph: &Graph<N, E>,
    state: &mut TraversalState,
    root: &N,
) -> Result<NodeId> {
    let started = Instant::now();
    let root_id = graph.reset_support_edges(state, root)?;
    graph.reset_potentials(state, 0.0);

    let mut queue: VecDeque<(NodeId, u32)> = VecDeque::new();
    queue.push_back((root_id, 0));
    let mut reached = 1usize;

    while let Some((current, depth)) = queue.pop_front() {
        for edge in graph.out_edges(current) {
            let successor = edge.target();
            if state.is_reached(successor) {
                continue;
            }
            state.set_support_edge(successor, SupportEdge::Edge(edge.id()));
            state.set_potential(successor, f64::from(depth + 1));
            queue.push_back((successor, depth + 1));
            reached += 1;
        }
    }

    debug!(
        root = ?root,
        reached,
        elapsed_us = started.elapsed().as_micros() as u64,
        "breadth-first search complete"
    );
    Ok(root_id)
}

/// Single-source shortest paths from `root` by repeated linear scans.
///
/// Each round scans every edge and finalizes the cheapest one leading from a
/// reached node to an unreached one; ties go to the edge seen first. Runs in
/// O(E · V), with no auxiliary queue. See [`dijkstra_heap`] for the
/// O((V + E) log E) variant with the same results.
///
/// On return the potential of every reached node is its minimum total edge
/// length from `root`. Unreached nodes have no support edge. A path whose
/// total length reaches `f64::MAX` does not count, so a node only reachable
/// that way stays unreached.
pub fn dijkstra<'g, N: GraphKey, E: GraphKey>(
    graph: &'g Graph<N, E>,
    root: &N,
) -> Result<SupportTree<'g, N, E>> {
    let mut state = TraversalState::new();
    let root_id = dijkstra_with(graph, &mut state, root)?;
    Ok(SupportTree::new(graph, state, root_id))
}

/// [`dijkstra`] into a caller-owned side table.
pub fn dijkstra_with<N: GraphKey, E: GraphKey>(
    graph: &Graph<N, E>,
    state: &mut TraversalState,
    root: &N,
) -> Result<NodeId> {
    let started = Instant::now();
    let root_id = graph.reset_support_edges(state, root)?;
    graph.reset_potentials(state, 0.0);

    let mut reached = 1usize;
    let mut rounds = 0usize;

    loop {
        rounds += 1;
        let mut best: Option<(EdgeId, NodeId, f64)> = None;

        for edge in graph.edges() {
            if !state.is_reached(edge.source()) || state.is_reached(edge.target()) {
                continue;
            }
            let base = state.potential(edge.source()).unwrap_or(0.0);
            let candidate = base + edge.length();
            let min = best.map_or(f64::MAX, |(_, _, min)| min);
            if candidate < min {
                best = Some((edge.id(), edge.target(), candidate));
            }
        }

        let Some((edge, node, distance)) = best else {
            break;
        };
        state.set_potential(node, distance);
        state.set_support_edge(node, SupportEdge::Edge(edge));
        reached += 1;
        trace!(node = node.index(), edge = edge.index(), distance, "finalized");
    }

    debug!(
        root = ?root,
        reached,
        rounds,
        elapsed_us = started.elapsed().as_micros() as u64,
        "linear-scan dijkstra complete"
    );
    Ok(root_id)
}

/// Pending edge in the heap: reaching `edge.target` would cost `distance`.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f64,
    edge: EdgeId,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap pops the smallest distance; lower edge id
        // first on ties, matching the scan order of `dijkstra`.
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.edge.cmp(&self.edge))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Single-source shortest paths from `root` using a binary heap.
///
/// Same contract as [`dijkstra`]: identical reachability and identical
/// potentials, including the `f64::MAX` cutoff. The chosen support edges can
/// differ only between equally short alternatives.
pub fn dijkstra_heap<'g, N: GraphKey, E: GraphKey>(
    graph: &'g Graph<N, E>,
    root: &N,
) -> Result<SupportTree<'g, N, E>> {
    let mut state = TraversalState::new();
    let root_id = dijkstra_heap_with(graph, &mut state, root)?;
    Ok(SupportTree::new(graph, state, root_id))
}

/// [`dijkstra_heap`] into a caller-owned side table.
pub fn dijkstra_heap_with<N: GraphKey, E: GraphKey>(
    graph: &Graph<N, E>,
    state: &mut TraversalState,
    root: &N,
) -> Result<NodeId> {
    let started = Instant::now();
    let root_id = graph.reset_support_edges(state, root)?;
    graph.reset_potentials(state, 0.0);

    let mut heap = BinaryHeap::new();
    push_frontier(graph, state, &mut heap, root_id, 0.0);
    let mut reached = 1usize;

    while let Some(Candidate { distance, edge }) = heap.pop() {
        let Some(edge) = graph.edge(edge) else {
            continue;
        };
        let node = edge.target();
        // Lazy deletion: a cheaper candidate already finalized this node.
        if state.is_reached(node) {
            continue;
        }
        state.set_potential(node, distance);
        state.set_support_edge(node, SupportEdge::Edge(edge.id()));
        reached += 1;
        trace!(node = node.index(), edge = edge.id().index(), distance, "finalized");

        push_frontier(graph, state, &mut heap, node, distance);
    }

    debug!(
        root = ?root,
        reached,
        elapsed_us = started.elapsed().as_micros() as u64,
        "heap dijkstra complete"
    );
    Ok(root_id)
}

fn push_frontier<N, E>(
    graph: &Graph<N, E>,
    state: &TraversalState,
    heap: &mut BinaryHeap<Candidate>,
    node: NodeId,
    base: f64,
) {
    for edge in graph.out_edges(node) {
        let distance = base + edge.length();
        if distance < f64::MAX && !state.is_reached(edge.target()) {
            heap.push(Candidate {
                distance,
                edge: edge.id(),
            });
        }
    }
}

/// Targets of the outgoing edges of `node`; parallel edges count once.
/// Empty if `node` is not in the graph.
pub fn successors<'g, N: GraphKey, E: GraphKey>(
    graph: &'g Graph<N, E>,
    node: &N,
) -> HashSet<&'g N> {
    graph
        .outgoing_edges(node)
        .filter_map(|e| graph.node_key(e.target()))
        .collect()
}

/// Sources of the incoming edges of `node`; parallel edges count once.
/// Empty if `node` is not in the graph.
pub fn predecessors<'g, N: GraphKey, E: GraphKey>(
    graph: &'g Graph<N, E>,
    node: &N,
) -> HashSet<&'g N> {
    graph
        .incoming_edges(node)
        .filter_map(|e| graph.node_key(e.source()))
        .collect()
}
