use crate::store::{DependencyGraph, NodeKind};
use petgraph::dot::{Config, Dot};
use petgraph::graph::DiGraph;

/// Copies the graph into a `petgraph` graph. Node indices match `NodeId`s and
/// edges point from dependency to dependent.
pub fn to_petgraph(graph: &DependencyGraph) -> DiGraph<String, ()> {
    let mut out = DiGraph::with_capacity(graph.len(), graph.len());
    let indices: Vec<_> = graph.nodes().map(|(_, node)| out.add_node(label(node))).collect();
    for (id, _) in graph.nodes() {
        for &dependent in graph.dependents(id) {
            out.add_edge(indices[id.index()], indices[dependent.index()], ());
        }
    }
    out
}

/// Graphviz source for the graph, one labelled box per node.
pub fn to_dot(graph: &DependencyGraph) -> String {
    let pg = to_petgraph(graph);
    format!("{:?}", Dot::with_config(&pg, &[Config::EdgeNoLabel]))
}

fn label(node: &crate::store::Node) -> String {
    match &node.kind {
        NodeKind::Cpu(task) => format!("{} cpu {:.1}ms", node.key, task.duration() / 1000.0),
        NodeKind::Network(request) => format!("{} {:?} {}", node.key, request.resource_type, request.url),
    }
}
