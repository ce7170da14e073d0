use std::collections::HashMap;

use arbor_core::{
    breadth_first_search, dijkstra, dijkstra_heap, Graph, SupportEdge, SupportTree,
    TraversalState,
};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

type EdgeSpec = (usize, usize, u32);

/// Small random digraphs: node count, a root, and edges with integer lengths
/// (so path sums are exact in f64). Self-loops and parallel edges included.
fn small_graph() -> impl Strategy<Value = (usize, usize, Vec<EdgeSpec>)> {
    (1usize..7).prop_flat_map(|n| {
        (
            Just(n),
            0..n,
            proptest::collection::vec((0..n, 0..n, 0u32..20), 0..14),
        )
    })
}

fn build(n: usize, edges: &[EdgeSpec]) -> Graph<usize, usize> {
    let mut g = Graph::with_capacity(n, edges.len());
    for i in 0..n {
        g.add_node(i);
    }
    for (key, &(from, to, len)) in edges.iter().enumerate() {
        g.insert_edge(key, &from, &to, f64::from(len)).unwrap();
    }
    g
}

/// Minimum (length, hops) over all simple paths from `root`, per reachable node.
fn brute_force(n: usize, edges: &[EdgeSpec], root: usize) -> HashMap<usize, (u32, usize)> {
    fn walk(
        node: usize,
        length: u32,
        hops: usize,
        edges: &[EdgeSpec],
        on_path: &mut Vec<bool>,
        best: &mut HashMap<usize, (u32, usize)>,
    ) {
        let entry = best.entry(node).or_insert((length, hops));
        entry.0 = entry.0.min(length);
        entry.1 = entry.1.min(hops);

        for &(from, to, len) in edges {
            if from == node && !on_path[to] {
                on_path[to] = true;
                walk(to, length + len, hops + 1, edges, on_path, best);
                on_path[to] = false;
            }
        }
    }

    let mut best = HashMap::new();
    let mut on_path = vec![false; n];
    on_path[root] = true;
    walk(root, 0, 0, edges, &mut on_path, &mut best);
    best
}

/// Every reached node's support chain ends at the root marker within
/// `node_count` steps, and each support edge actually enters its node.
fn check_arborescence(tree: &SupportTree<'_, usize, usize>) -> Result<(), TestCaseError> {
    let g = tree.graph();
    for node in g.nodes() {
        let Some(mut support) = tree.support_edge(node) else {
            continue;
        };
        let mut current = *node;
        let mut steps = 0;
        while let SupportEdge::Edge(id) = support {
            let edge = g.edge(id).unwrap();
            prop_assert_eq!(g.node_key(edge.target()), Some(&current));
            current = *g.node_key(edge.source()).unwrap();
            support = tree
                .support_edge(&current)
                .ok_or_else(|| TestCaseError::fail("chain passes an unreached node"))?;
            steps += 1;
            prop_assert!(steps <= g.node_count(), "cycle in support edges");
        }
        prop_assert_eq!(Some(&current), tree.root());
    }
    Ok(())
}

/// The reconstructed path starts at the root, is contiguous, and ends at `node`.
fn check_path(
    tree: &SupportTree<'_, usize, usize>,
    node: usize,
) -> Result<Vec<f64>, TestCaseError> {
    let g = tree.graph();
    let path = tree
        .path_from_root(&node)
        .ok_or_else(|| TestCaseError::fail("reachable node has no path"))?;
    let mut at = *tree.root().unwrap();
    for edge in &path {
        let (source, target) = g.endpoints(edge).unwrap();
        prop_assert_eq!(*source, at);
        at = *target;
    }
    prop_assert_eq!(at, node);
    Ok(path.iter().map(|e| e.length()).collect())
}

proptest! {
    #[test]
    fn test_dijkstra_matches_brute_force((n, root, edges) in small_graph()) {
        let g = build(n, &edges);
        let expected = brute_force(n, &edges, root);
        let tree = dijkstra(&g, &root).unwrap();

        check_arborescence(&tree)?;
        for node in 0..n {
            let reachable = expected.contains_key(&node);
            prop_assert_eq!(tree.is_reachable(&node), reachable, "node {}", node);
            match expected.get(&node) {
                Some(&(length, _)) => {
                    prop_assert_eq!(tree.potential(&node), Some(f64::from(length)));
                    let lengths = check_path(&tree, node)?;
                    prop_assert_eq!(lengths.iter().sum::<f64>(), f64::from(length));
                }
                None => prop_assert!(tree.path_from_root(&node).is_none()),
            }
        }
    }

    #[test]
    fn test_heap_dijkstra_agrees_with_linear_scan((n, root, edges) in small_graph()) {
        let g = build(n, &edges);
        let scan = dijkstra(&g, &root).unwrap();
        let heap = dijkstra_heap(&g, &root).unwrap();

        check_arborescence(&heap)?;
        for node in 0..n {
            prop_assert_eq!(scan.potential(&node), heap.potential(&node), "node {}", node);
            prop_assert_eq!(scan.is_reachable(&node), heap.is_reachable(&node));
        }
    }

    #[test]
    fn test_bfs_gives_hop_shortest_tree((n, root, edges) in small_graph()) {
        let g = build(n, &edges);
        let expected = brute_force(n, &edges, root);
        let tree = breadth_first_search(&g, &root).unwrap();

        check_arborescence(&tree)?;
        prop_assert_eq!(tree.reached_count(), expected.len());
        for (&node, &(_, hops)) in &expected {
            let lengths = check_path(&tree, node)?;
            prop_assert_eq!(lengths.len(), hops, "node {}", node);
            prop_assert_eq!(tree.potential(&node), Some(hops as f64));
        }
    }

    #[test]
    fn test_reset_support_edges_idempotent((n, root, edges) in small_graph()) {
        let g = build(n, &edges);
        let mut once = TraversalState::new();
        g.reset_support_edges(&mut once, &root).unwrap();

        // Start from a dirty state to make sure nothing leaks through.
        let mut twice = dijkstra(&g, &root).unwrap().into_state();
        let support_edges = |state: &TraversalState| -> Vec<_> {
            (0..n).map(|i| state.support_edge(g.node_id(&i).unwrap())).collect()
        };
        g.reset_support_edges(&mut twice, &root).unwrap();
        let after_first = support_edges(&twice);
        g.reset_support_edges(&mut twice, &root).unwrap();
        let after_second = support_edges(&twice);

        prop_assert_eq!(&after_first, &after_second);
        let fresh = support_edges(&once);
        prop_assert_eq!(&after_first, &fresh);
        prop_assert_eq!(twice.reached_count(), 1);
    }
}
