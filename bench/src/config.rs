use std::env;

/// Default node count for generated graphs.
pub const DEFAULT_NODES: u64 = 200_000;

/// Graphs with more nodes than this skip the O(E·V) linear-scan Dijkstra.
pub const DEFAULT_LINEAR_SCAN_MAX: u64 = 20_000;

const NODES_RANGE: (u64, u64) = (16, 50_000_000);
const LINEAR_SCAN_RANGE: (u64, u64) = (0, 1_000_000);

/// Benchmark settings: positional arguments first, then environment
/// overrides, then defaults.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub mode: String,
    pub node_count: u64,
    pub linear_scan_max: u64,
    /// `file` mode: JSON graph document and root key.
    pub graph_file: Option<String>,
    pub root: Option<String>,
}

impl BenchConfig {
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mode = args.get(1).cloned().unwrap_or_else(|| "all".to_string());

        if mode == "file" {
            let graph_file = args
                .get(2)
                .cloned()
                .ok_or("file mode needs a graph document path")?;
            let root = args.get(3).cloned().ok_or("file mode needs a root node key")?;
            return Ok(Self {
                mode,
                node_count: 0,
                linear_scan_max: linear_scan_max()?,
                graph_file: Some(graph_file),
                root: Some(root),
            });
        }

        Ok(Self {
            node_count: setting("ARBOR_BENCH_NODES", args.get(2), DEFAULT_NODES, NODES_RANGE)?,
            linear_scan_max: linear_scan_max()?,
            mode,
            graph_file: None,
            root: None,
        })
    }
}

fn linear_scan_max() -> Result<u64, String> {
    setting(
        "ARBOR_BENCH_LINEAR_SCAN_MAX",
        None,
        DEFAULT_LINEAR_SCAN_MAX,
        LINEAR_SCAN_RANGE,
    )
}

/// Resolve an integer setting: explicit argument > environment > default,
/// rejected if outside `(min, max)`.
fn setting(
    var: &str,
    arg: Option<&String>,
    default: u64,
    (min, max): (u64, u64),
) -> Result<u64, String> {
    let raw = arg.cloned().or_else(|| env::var(var).ok());
    let value = match raw {
        Some(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| format!("{}: expected an integer, got '{}'", var, s))?,
        None => default,
    };
    if value < min || value > max {
        return Err(format!("{} must be between {} and {}, got {}", var, min, max, value));
    }
    Ok(value)
}
