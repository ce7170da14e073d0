//! Serializable graph description and bulk loading.
//!
//! A document lists node keys and edge records. Edge endpoints that are not
//! listed under `nodes` are registered on load, so an edge list alone is a
//! valid document:
//!
//! ```json
//! { "edges": [ { "key": "ab", "source": "A", "target": "B", "length": 2.5 } ] }
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::graph::{Graph, GraphKey};

fn default_length() -> f64 {
    1.0
}

/// One edge as it appears in a document. `length` defaults to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord<N, E> {
    pub key: E,
    pub source: N,
    pub target: N,
    #[serde(default = "default_length")]
    pub length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument<N, E> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<N>,
    #[serde(default = "Vec::new")]
    pub edges: Vec<EdgeRecord<N, E>>,
}

impl<N: GraphKey, E: GraphKey> Graph<N, E> {
    /// Bulk load edges, registering any endpoint not yet in the graph.
    ///
    /// Stops at the first edge that cannot be inserted (duplicate key or
    /// invalid length). Edges before it, and their endpoints, stay in the
    /// graph; the failing record registers nothing.
    pub fn load_edges<I>(&mut self, edges: I) -> Result<()>
    where
        I: IntoIterator<Item = EdgeRecord<N, E>>,
    {
        for record in edges {
            self.check_edge(&record.key, record.length)?;
            self.add_node(record.source.clone());
            self.add_node(record.target.clone());
            self.insert_edge(record.key, &record.source, &record.target, record.length)?;
        }
        Ok(())
    }

    pub fn from_document(doc: GraphDocument<N, E>) -> Result<Self> {
        let mut graph = Self::with_capacity(doc.nodes.len(), doc.edges.len());
        for node in doc.nodes {
            graph.add_node(node);
        }
        graph.load_edges(doc.edges)?;
        Ok(graph)
    }

    /// Snapshot the graph as a document. Node and edge order follow
    /// insertion order, so `from_document(g.to_document())` rebuilds an
    /// equivalent graph.
    pub fn to_document(&self) -> GraphDocument<N, E> {
        let edges = self
            .edges()
            .filter_map(|edge| {
                let (source, target) = self.endpoints(edge)?;
                Some(EdgeRecord {
                    key: edge.key().clone(),
                    source: source.clone(),
                    target: target.clone(),
                    length: edge.length(),
                })
            })
            .collect();

        GraphDocument {
            nodes: self.nodes().cloned().collect(),
            edges,
        }
    }
}

impl<N, E> Graph<N, E>
where
    N: GraphKey + DeserializeOwned,
    E: GraphKey + DeserializeOwned,
{
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: GraphDocument<N, E> = serde_json::from_str(json)?;
        Self::from_document(doc)
    }
}

impl<N, E> Graph<N, E>
where
    N: GraphKey + Serialize,
    E: GraphKey + Serialize,
{
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;

    const ROADS: &str = r#"{
        "nodes": ["depot", "north", "south", "closed"],
        "edges": [
            { "key": "d-n", "source": "depot", "target": "north", "length": 4.0 },
            { "key": "d-s", "source": "depot", "target": "south" },
            { "key": "s-n", "source": "south", "target": "north", "length": 1.5 }
        ]
    }"#;

    fn record(key: &str, source: &str, target: &str, length: f64) -> EdgeRecord<String, String> {
        EdgeRecord {
            key: key.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            length,
        }
    }

    #[test]
    fn test_from_json() {
        let g: Graph<String, String> = Graph::from_json(ROADS).unwrap();
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 3);
        assert!(g.contains_node(&"closed".to_string()));
        let ds = g.edge(g.edge_id(&"d-s".to_string()).unwrap()).unwrap();
        assert_eq!(ds.length(), 1.0);
    }

    #[test]
    fn test_document_feeds_traversal() {
        let g: Graph<String, String> = Graph::from_json(ROADS).unwrap();
        let tree = crate::dijkstra(&g, &"depot".to_string()).unwrap();
        assert_eq!(tree.potential(&"north".to_string()), Some(2.5));
        assert!(tree.path_from_root(&"closed".to_string()).is_none());
    }

    #[test]
    fn test_edges_only_document() {
        let g: Graph<u32, u32> =
            Graph::from_json(r#"{ "edges": [ { "key": 7, "source": 1, "target": 2 } ] }"#).unwrap();
        assert_eq!(g.nodes().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert!(g.contains_edge_between(&1, &2));
    }

    #[test]
    fn test_to_document_preserves_order() {
        let g: Graph<String, String> = Graph::from_json(ROADS).unwrap();
        let doc = g.to_document();
        assert_eq!(doc.nodes, vec!["depot", "north", "south", "closed"]);
        assert_eq!(doc.edges[2], record("s-n", "south", "north", 1.5));

        let json = g.to_json().unwrap();
        let again: Graph<String, String> = Graph::from_json(&json).unwrap();
        assert_eq!(again.to_document(), doc);
    }

    #[test]
    fn test_malformed_json() {
        let err = Graph::<String, String>::from_json("{ \"edges\": [ {").unwrap_err();
        assert!(matches!(err, GraphError::Document(_)));
        assert!(!err.is_invalid_argument());
    }

    #[test]
    fn test_load_edges_registers_endpoints() {
        let mut g: Graph<String, String> = Graph::new();
        g.load_edges(vec![record("ab", "a", "b", 1.0), record("bc", "b", "c", 2.0)])
            .unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn test_load_edges_stops_at_duplicate() {
        let mut g: Graph<String, String> = Graph::new();
        let err = g
            .load_edges(vec![
                record("ab", "a", "b", 1.0),
                record("ab", "b", "c", 1.0),
                record("cd", "c", "d", 1.0),
            ])
            .unwrap_err();
        assert!(matches!(err, GraphError::DuplicateEdge(_)));
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.node_count(), 2);
        assert!(!g.contains_node(&"c".to_string()));
        assert!(!g.contains_node(&"d".to_string()));
    }

    #[test]
    fn test_rejected_record_leaves_no_nodes() {
        let mut g: Graph<String, String> = Graph::new();
        let err = g.load_edges(vec![record("ab", "a", "b", -1.0)]).unwrap_err();
        assert!(matches!(err, GraphError::InvalidLength { .. }));
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);

        g.add_node("a".to_string());
        let err = g.load_edges(vec![record("ax", "a", "x", f64::NAN)]).unwrap_err();
        assert!(matches!(err, GraphError::InvalidLength { .. }));
        assert_eq!(g.nodes().cloned().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_negative_length_in_document() {
        let json = r#"{ "edges": [ { "key": "x", "source": "a", "target": "b", "length": -2 } ] }"#;
        let err = Graph::<String, String>::from_json(json).unwrap_err();
        assert!(matches!(err, GraphError::InvalidLength { .. }));
    }
}
