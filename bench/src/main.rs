mod config;

use std::time::Instant;

use arbor_core::{Graph, GraphKey, NodeId, SupportTree, TraversalState};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::BenchConfig;

type BenchGraph = Graph<u64, u64>;

/// A traversal that fills a caller-owned side table.
type Run<N, E> = fn(&Graph<N, E>, &mut TraversalState, &N) -> arbor_core::Result<NodeId>;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if matches!(args.get(1).map(|s| s.as_str()), Some("help" | "--help")) {
        print_usage();
        return;
    }

    let config = match BenchConfig::from_args(&args) {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    };

    println!("arbor-bench");
    println!("===========");
    println!();

    if config.mode == "file" {
        if let Err(e) = run_file(&config) {
            error!("{}", e);
            std::process::exit(1);
        }
        return;
    }

    let generators: Vec<(&str, fn(u64) -> BenchGraph)> = match config.mode.as_str() {
        "lsystem" => vec![("L-system tree", gen_lsystem)],
        "scalefree" => vec![("Scale-free (edge sampling)", gen_scale_free)],
        "random" => vec![("Erdos-Renyi random", gen_random)],
        "barbell" => vec![("Barbell (clique-bridge-clique)", gen_barbell)],
        "all" => vec![
            ("L-system tree", gen_lsystem as fn(u64) -> BenchGraph),
            ("Scale-free (edge sampling)", gen_scale_free),
            ("Erdos-Renyi random", gen_random),
            ("Barbell (clique-bridge-clique)", gen_barbell),
        ],
        other => {
            error!("unknown mode: {}. Use --help for options.", other);
            std::process::exit(2);
        }
    };

    for (name, generator) in generators {
        println!("--- {} ---", name);
        let t = Instant::now();
        let graph = generator(config.node_count);
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            elapsed_ms = t.elapsed().as_millis() as u64,
            "generated {}",
            name
        );
        let far_node = graph.node_count() as u64 - 1;
        run_benchmark(&graph, &0, &far_node, &config);
    }
}

fn print_usage() {
    println!("Usage: arbor-bench [mode] [node_count]");
    println!("       arbor-bench file <graph.json> <root>");
    println!();
    println!("Modes:");
    println!("  all         Run all generators and benchmark each (default)");
    println!("  lsystem     Fractal branching tree (deep paths)");
    println!("  scalefree   Preferential attachment via edge sampling (hub-and-spoke)");
    println!("  random      Erdos-Renyi uniform random edges");
    println!("  barbell     Two dense cliques connected by a thin bridge");
    println!("  file        Load a JSON graph document with string keys");
    println!();
    println!("Environment:");
    println!(
        "  ARBOR_BENCH_NODES              node count when not given (default {})",
        config::DEFAULT_NODES
    );
    println!(
        "  ARBOR_BENCH_LINEAR_SCAN_MAX    skip linear-scan Dijkstra above this many nodes \
         (default {})",
        config::DEFAULT_LINEAR_SCAN_MAX
    );
    println!("  RUST_LOG                       log filter (default info)");
}

fn run_file(config: &BenchConfig) -> Result<(), String> {
    let (Some(path), Some(root)) = (config.graph_file.as_deref(), config.root.as_ref()) else {
        return Err("file mode needs a graph document path and a root".to_string());
    };
    let json = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
    let graph: Graph<String, String> =
        Graph::from_json(&json).map_err(|e| format!("{}: {}", path, e))?;
    info!(nodes = graph.node_count(), edges = graph.edge_count(), "loaded {}", path);

    // Report the path to the last node in document order.
    let far = graph.nodes().last().cloned().unwrap_or_else(|| root.clone());
    run_benchmark(&graph, root, &far, config);
    Ok(())
}

fn run_benchmark<N: GraphKey, E: GraphKey>(
    graph: &Graph<N, E>,
    root: &N,
    far: &N,
    config: &BenchConfig,
) {
    println!(
        "{} nodes, {} edges, ~{:.1}MB",
        graph.node_count(),
        graph.edge_count(),
        graph.memory_usage() as f64 / 1_048_576.0
    );
    println!();
    println!("{:>14} {:>12} {:>14} {:>10}", "algorithm", "reached", "dist to far", "time");
    println!("{:->14} {:->12} {:->14} {:->10}", "", "", "", "");

    // One side table reused across all runs.
    let mut state = TraversalState::new();

    let mut runs: Vec<(&str, Run<N, E>)> = vec![
        ("bfs", arbor_core::breadth_first_search_with as Run<N, E>),
        ("dijkstra-heap", arbor_core::dijkstra_heap_with as Run<N, E>),
    ];
    if graph.node_count() as u64 <= config.linear_scan_max {
        runs.push(("dijkstra-scan", arbor_core::dijkstra_with as Run<N, E>));
    } else {
        info!(
            limit = config.linear_scan_max,
            "skipping linear-scan dijkstra on a graph this large"
        );
    }

    for (name, run) in runs {
        let t = Instant::now();
        let root_id = match run(graph, &mut state, root) {
            Ok(id) => id,
            Err(e) => {
                error!("{}: {}", name, e);
                return;
            }
        };
        let elapsed = t.elapsed();

        let tree = SupportTree::new(graph, state, root_id);
        let distance = tree
            .potential(far)
            .map(|d| format!("{:.1}", d))
            .unwrap_or_else(|| "unreached".to_string());
        println!(
            "{:>14} {:>12} {:>14} {:>8.1}ms",
            name,
            tree.reached_count(),
            distance,
            elapsed.as_secs_f64() * 1000.0
        );
        if let Some(path) = tree.path_from_root(far) {
            info!(algorithm = name, hops = path.len(), "path to far node");
        }
        state = tree.into_state();
    }
    println!();
}

// ---------------------------------------------------------------------------
// Generators: O(n + edges), single-threaded, deterministic. Edge keys are
// sequential; lengths are pseudo-random in [1, 10).
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
    fn length(&mut self) -> f64 {
        1.0 + self.next_f64() * 9.0
    }
}

/// Adds edges with sequential keys; endpoints must already exist.
struct Builder {
    graph: BenchGraph,
    next_key: u64,
}

impl Builder {
    fn new(nodes: u64, edges: u64) -> Self {
        let mut graph = Graph::with_capacity(nodes as usize, edges as usize);
        for i in 0..nodes {
            graph.add_node(i);
        }
        Self { graph, next_key: 0 }
    }

    fn edge(&mut self, from: u64, to: u64, length: f64) {
        // Generators only connect nodes they created, with lengths in [1, 10).
        if self.graph.insert_edge(self.next_key, &from, &to, length).is_ok() {
            self.next_key += 1;
        }
    }
}

/// L-system fractal tree: deep branching with self-similar structure.
///
/// Each node spawns three children. Produces deep paths (log depth) with
/// exponential width. Tests deep BFS and path reconstruction.
fn gen_lsystem(node_count: u64) -> BenchGraph {
    let mut b = Builder::new(node_count, node_count);
    let mut rng = FastRng::new(42);
    let branching = 3u64;

    let mut next_id: u64 = 1;
    let mut frontier: Vec<u64> = vec![0];

    while next_id < node_count && !frontier.is_empty() {
        let mut next_frontier = Vec::with_capacity(frontier.len() * branching as usize);
        for &parent in &frontier {
            for _ in 0..branching {
                if next_id >= node_count {
                    break;
                }
                let child = next_id;
                next_id += 1;
                b.edge(parent, child, rng.length());
                next_frontier.push(child);
            }
        }
        frontier = next_frontier;
    }

    b.graph
}

/// Scale-free via edge-list sampling: preferential attachment by picking a
/// random endpoint of an existing edge. Edges point from the hub side to the
/// newcomer so node 0 reaches the whole graph.
fn gen_scale_free(node_count: u64) -> BenchGraph {
    let edges_per_node = 5u64;
    let mut b = Builder::new(node_count, node_count * edges_per_node);
    let mut rng = FastRng::new(12345);
    let mut endpoints: Vec<u64> = Vec::with_capacity((node_count * edges_per_node * 2) as usize);

    let seed = 5u64.min(node_count);
    for i in 0..seed {
        for j in (i + 1)..seed {
            b.edge(i, j, rng.length());
            endpoints.push(i);
            endpoints.push(j);
        }
    }

    for new_node in seed..node_count {
        let attach = edges_per_node.min(new_node);
        for _ in 0..attach {
            let idx = rng.next(endpoints.len() as u64) as usize;
            let hub = endpoints[idx];
            if hub != new_node {
                b.edge(hub, new_node, rng.length());
                endpoints.push(new_node);
                endpoints.push(hub);
            }
        }
    }

    b.graph
}

/// Erdos-Renyi: ~5 uniform random edges per node. No structure.
fn gen_random(node_count: u64) -> BenchGraph {
    let target_edges = node_count * 5;
    let mut b = Builder::new(node_count, target_edges);
    let mut rng = FastRng::new(54321);

    for _ in 0..target_edges {
        let from = rng.next(node_count);
        let to = rng.next(node_count);
        if from != to {
            b.edge(from, to, rng.length());
        }
    }

    b.graph
}

/// Barbell: two dense clusters joined by a chain of ten bridge nodes.
/// Worst case for "find a path through a bottleneck".
fn gen_barbell(node_count: u64) -> BenchGraph {
    let bridge_len = 10u64;
    let cluster = (node_count.saturating_sub(bridge_len) / 2).max(2);
    let total = cluster * 2 + bridge_len;
    let mut b = Builder::new(total, cluster * 20 + bridge_len);
    let mut rng = FastRng::new(99999);

    let mut wire_cluster = |b: &mut Builder, offset: u64| {
        for i in 0..cluster {
            for _ in 0..10u64.min(cluster - 1) {
                let target = rng.next(cluster);
                if target != i {
                    b.edge(offset + i, offset + target, rng.length());
                }
            }
        }
    };

    wire_cluster(&mut b, 0);

    // Bridge: last node of the first cluster through the chain into the second.
    let bridge_start = cluster;
    b.edge(cluster - 1, bridge_start, 1.0);
    for i in 1..bridge_len {
        b.edge(bridge_start + i - 1, bridge_start + i, 1.0);
    }
    let second = bridge_start + bridge_len;
    b.edge(second - 1, second, 1.0);

    wire_cluster(&mut b, second);

    b.graph
}
