//! The dependency graph: typed nodes in a dense arena.
pub mod error;
pub mod graph;
pub mod registry;
pub mod types;

pub use error::GraphError;
pub use graph::DependencyGraph;
pub use registry::GraphBuilder;
pub use types::{CpuTask, InitiatorType, NetworkRequest, Node, NodeId, NodeKind, NodeType, Priority, ResourceType};
