use crate::store::{DependencyGraph, GraphError, Node, NodeId};
use std::collections::VecDeque;

/// Returns a topological order using Kahn's Algorithm.
///
/// Every dependency appears before its dependents. Nodes that become ready at
/// the same time keep id order, so the result is stable for a given graph.
/// Works off in-degree counts rather than recursion, so a cycle shows up as
/// nodes that never reach in-degree zero instead of a blown stack.
pub fn sort(graph: &DependencyGraph) -> Result<Vec<NodeId>, GraphError> {
    let count = graph.len();
    let mut in_degree = vec![0usize; count];
    let mut queue = VecDeque::with_capacity(count);
    let mut order = Vec::with_capacity(count);

    // 1. Initialize In-Degrees O(N)
    for (i, &(_, deps)) in graph.dependency_ranges.iter().enumerate() {
        in_degree[i] = deps as usize;
        if deps == 0 {
            queue.push_back(NodeId::new(i));
        }
    }

    // 2. Process Queue
    while let Some(node) = queue.pop_front() {
        order.push(node);
        for &dependent in graph.dependents(node) {
            let idx = dependent.index();
            in_degree[idx] -= 1;
            if in_degree[idx] == 0 {
                queue.push_back(dependent);
            }
        }
    }

    if order.len() != count {
        return Err(GraphError::CycleDetected { visited: order.len(), total: count });
    }

    Ok(order)
}

/// Depth-first pre-order walk from the root along dependent edges.
///
/// Uses an explicit stack and a visited bitmap: shared descendants (diamonds)
/// are visited once, and a corrupted cyclic graph still terminates.
pub fn traverse<'a, F>(graph: &'a DependencyGraph, mut visitor: F)
where
    F: FnMut(NodeId, &'a Node),
{
    if graph.is_empty() {
        return;
    }
    let mut visited = vec![false; graph.len()];
    let mut stack = vec![graph.root()];

    while let Some(node) = stack.pop() {
        if std::mem::replace(&mut visited[node.index()], true) {
            continue;
        }
        visitor(node, graph.node(node));

        // Reverse push so the first-recorded dependent is explored first.
        for &dependent in graph.dependents(node).iter().rev() {
            if !visited[dependent.index()] {
                stack.push(dependent);
            }
        }
    }
}

/// Discovery index of each node in `traverse` order; `usize::MAX` if unreachable.
pub fn discovery_order(graph: &DependencyGraph) -> Vec<usize> {
    let mut order = vec![usize::MAX; graph.len()];
    let mut next = 0;
    traverse(graph, |id, _| {
        order[id.index()] = next;
        next += 1;
    });
    order
}

pub(crate) fn reachable_from_root(graph: &DependencyGraph) -> Vec<bool> {
    let mut seen = vec![false; graph.len()];
    traverse(graph, |id, _| seen[id.index()] = true);
    seen
}
