//! Structural errors raised while building, traversing or cloning a graph.
use super::types::NodeId;
use thiserror::Error;

/// A graph that violates the single-rooted DAG invariant. These always point at
/// a bug in whoever constructed the graph, so nothing downstream retries them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Graph has no nodes")]
    EmptyGraph,
    #[error("Edge {from} -> {to} references a node outside the graph ({len} nodes)")]
    DanglingEdge { from: NodeId, to: NodeId, len: usize },
    #[error("Cycle detected: {visited} of {total} nodes could be ordered")]
    CycleDetected { visited: usize, total: usize },
    #[error("Graph must have exactly one root, found {count}")]
    MultipleRoots { count: usize },
    #[error("Node '{key}' is not reachable from the root")]
    Unreachable { key: String },
    #[error("Predicate excluded the root node '{key}'")]
    RootExcluded { key: String },
}
