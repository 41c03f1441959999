//! graph.rs
//! Dense arena layout: nodes in a flat table, edges in CSR arrays for both directions.

use super::error::GraphError;
use super::types::{Node, NodeId};
use crate::analysis::{subgraph, topology};

#[derive(Debug, Clone, PartialEq)]
pub struct DependencyGraph {
    pub(crate) nodes: Vec<Node>,

    // Upstream (CSR)
    pub(crate) dependencies_flat: Vec<NodeId>,
    pub(crate) dependency_ranges: Vec<(u32, u32)>,

    // Downstream (CSR), in edge insertion order
    pub(crate) dependents_flat: Vec<NodeId>,
    pub(crate) dependent_ranges: Vec<(u32, u32)>,

    pub(crate) root: NodeId,

    /// For clones: id of each node in the graph it was cloned from.
    pub(crate) source_ids: Vec<NodeId>,
}

impl DependencyGraph {
    /// Packs an edge list (`(dependency, dependent)` pairs) into CSR arrays.
    /// Duplicate edges collapse; relative edge order per node is preserved.
    /// Callers are responsible for bounds-checking and validation.
    pub(crate) fn from_parts(
        nodes: Vec<Node>,
        edges: &[(NodeId, NodeId)],
        root: NodeId,
        source_ids: Vec<NodeId>,
    ) -> Self {
        let count = nodes.len();
        let mut dependents: Vec<Vec<NodeId>> = vec![Vec::new(); count];
        let mut dependencies: Vec<Vec<NodeId>> = vec![Vec::new(); count];

        for &(from, to) in edges {
            let outgoing = &mut dependents[from.index()];
            if outgoing.contains(&to) {
                continue;
            }
            outgoing.push(to);
            dependencies[to.index()].push(from);
        }

        let (dependents_flat, dependent_ranges) = pack(dependents);
        let (dependencies_flat, dependency_ranges) = pack(dependencies);

        Self {
            nodes,
            dependencies_flat,
            dependency_ranges,
            dependents_flat,
            dependent_ranges,
            root,
            source_ids,
        }
    }

    pub fn len(&self) -> usize { self.nodes.len() }
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }
    pub fn root(&self) -> NodeId { self.root }

    pub fn node(&self, id: NodeId) -> &Node { &self.nodes[id.index()] }

    /// Checked lookup for ids that may come from another graph.
    pub fn get_node(&self, id: NodeId) -> Option<&Node> { self.nodes.get(id.index()) }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId::new(i), n))
    }

    #[inline(always)]
    pub fn dependencies(&self, id: NodeId) -> &[NodeId] {
        let (start, count) = self.dependency_ranges[id.index()];
        &self.dependencies_flat[start as usize..(start + count) as usize]
    }

    #[inline(always)]
    pub fn dependents(&self, id: NodeId) -> &[NodeId] {
        let (start, count) = self.dependent_ranges[id.index()];
        &self.dependents_flat[start as usize..(start + count) as usize]
    }

    /// The id this node had in the graph it was cloned from (itself for a built graph).
    pub fn source_id(&self, id: NodeId) -> NodeId { self.source_ids[id.index()] }

    pub fn is_main_document(&self, id: NodeId) -> bool { id == self.root }

    pub fn find_by_key(&self, key: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.key == key).map(NodeId::new)
    }

    // --- Graph Algorithms ---

    /// Visits every node reachable from the root exactly once, depth-first.
    pub fn traverse<'a, F>(&'a self, visitor: F)
    where
        F: FnMut(NodeId, &'a Node),
    {
        topology::traverse(self, visitor)
    }

    /// Dependencies strictly before dependents.
    pub fn topological_order(&self) -> Result<Vec<NodeId>, GraphError> {
        topology::sort(self)
    }

    /// A new graph holding exactly the nodes accepted by `predicate`, with every
    /// dependency path between two kept nodes contracted to a direct edge.
    pub fn clone_with_relationships<P>(&self, predicate: P) -> Result<DependencyGraph, GraphError>
    where
        P: FnMut(NodeId, &Node) -> bool,
    {
        subgraph::clone_with_relationships(self, predicate)
    }

    pub fn urls(&self) -> Vec<&str> {
        let mut urls = Vec::new();
        self.traverse(|_, node| {
            if let Some(request) = node.as_network() {
                urls.push(request.url.as_str());
            }
        });
        urls
    }
}

fn pack(lists: Vec<Vec<NodeId>>) -> (Vec<NodeId>, Vec<(u32, u32)>) {
    let mut flat = Vec::with_capacity(lists.iter().map(Vec::len).sum());
    let mut ranges = Vec::with_capacity(lists.len());
    for list in lists {
        let start = flat.len() as u32;
        ranges.push((start, list.len() as u32));
        flat.extend(list);
    }
    (flat, ranges)
}
