//! Algorithms over the dependency graph.
pub mod subgraph;
pub mod topology;
