use super::error::GraphError;
use super::graph::DependencyGraph;
use super::types::{Node, NodeId};
use crate::analysis::topology;

/// Accumulates nodes and edges, then validates them into a `DependencyGraph`.
///
/// Trace processing discovers edges in any order (a script's dependents are
/// only known after later tasks are seen), so nothing is checked until `build`.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<(NodeId, NodeId)>,
}

impl GraphBuilder {
    pub fn new() -> Self { Self::default() }
    pub fn count(&self) -> usize { self.nodes.len() }

    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Records that `dependent` cannot start before `dependency` finishes.
    pub fn add_dependency(&mut self, dependent: NodeId, dependency: NodeId) -> &mut Self {
        self.edges.push((dependency, dependent));
        self
    }

    pub fn build(self) -> Result<DependencyGraph, GraphError> {
        let count = self.nodes.len();
        if count == 0 {
            return Err(GraphError::EmptyGraph);
        }

        // 1. Bounds
        for &(from, to) in &self.edges {
            if from.index() >= count || to.index() >= count {
                return Err(GraphError::DanglingEdge { from, to, len: count });
            }
        }

        // 2. Root: the only node without dependencies
        let mut has_dependency = vec![false; count];
        for &(_, to) in &self.edges {
            has_dependency[to.index()] = true;
        }
        let roots: Vec<usize> = (0..count).filter(|&i| !has_dependency[i]).collect();

        let source_ids = (0..count).map(NodeId::new).collect();
        let root = roots.first().map(|&i| NodeId::new(i)).unwrap_or_default();
        let graph = DependencyGraph::from_parts(self.nodes, &self.edges, root, source_ids);

        // 3. Acyclicity (a fully cyclic graph has no root at all, so check this first)
        topology::sort(&graph)?;

        if roots.len() != 1 {
            return Err(GraphError::MultipleRoots { count: roots.len() });
        }

        // 4. Reachability
        let reachable = topology::reachable_from_root(&graph);
        if let Some(unreachable) = reachable.iter().position(|&seen| !seen) {
            return Err(GraphError::Unreachable { key: graph.nodes[unreachable].key.clone() });
        }

        Ok(graph)
    }
}
