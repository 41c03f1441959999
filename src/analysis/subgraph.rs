//! Predicate-based cloning with edge contraction.

use super::topology;
use crate::store::{DependencyGraph, GraphError, Node, NodeId};
use smallvec::SmallVec;

/// Kept nodes reachable from a node through excluded nodes only.
type Frontier = SmallVec<[NodeId; 4]>;

/// Builds a new graph from the nodes `predicate` accepts.
///
/// Excluded nodes are spliced out: if `A -> B -> C` and only `B` is rejected,
/// the clone has `A -> C`. The source graph is untouched and ids in the clone
/// are reassigned densely in source-id order. The predicate sees nodes in
/// traversal order, once each.
pub fn clone_with_relationships<P>(graph: &DependencyGraph, mut predicate: P) -> Result<DependencyGraph, GraphError>
where
    P: FnMut(NodeId, &Node) -> bool,
{
    // Fails before the predicate runs if the source is cyclic.
    let order = topology::sort(graph)?;

    let mut keep = vec![false; graph.len()];
    topology::traverse(graph, |id, node| keep[id.index()] = predicate(id, node));

    let root = graph.root();
    if !keep[root.index()] {
        return Err(GraphError::RootExcluded { key: graph.node(root).key.clone() });
    }

    // 1. Dense remap of surviving ids
    let mut remap = vec![u32::MAX; graph.len()];
    let mut nodes = Vec::new();
    let mut source_ids = Vec::new();
    for (i, &kept) in keep.iter().enumerate() {
        if kept {
            remap[i] = nodes.len() as u32;
            nodes.push(graph.nodes[i].clone());
            source_ids.push(NodeId::new(i));
        }
    }

    // 2. Frontiers, dependents first (reverse topological order)
    let mut frontiers: Vec<Frontier> = vec![Frontier::new(); graph.len()];
    for &node in order.iter().rev() {
        let mut frontier = Frontier::new();
        for &dependent in graph.dependents(node) {
            if keep[dependent.index()] {
                push_unique(&mut frontier, dependent);
            } else {
                for &reached in &frontiers[dependent.index()] {
                    push_unique(&mut frontier, reached);
                }
            }
        }
        frontiers[node.index()] = frontier;
    }

    // 3. Contracted edges between survivors
    let mut edges = Vec::new();
    for (i, &kept) in keep.iter().enumerate() {
        if !kept {
            continue;
        }
        let from = NodeId(remap[i]);
        for &to in &frontiers[i] {
            edges.push((from, NodeId(remap[to.index()])));
        }
    }

    Ok(DependencyGraph::from_parts(nodes, &edges, NodeId(remap[root.index()]), source_ids))
}

fn push_unique(frontier: &mut Frontier, id: NodeId) {
    if !frontier.contains(&id) {
        frontier.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::dot::to_petgraph;
    use crate::store::GraphBuilder;
    use crate::test_support::cpu_node;
    use petgraph::algo::has_path_connecting;
    use petgraph::graph::NodeIndex;
    use rstest::rstest;

    fn chain(keys: &[&str]) -> DependencyGraph {
        let mut builder = GraphBuilder::new();
        let ids: Vec<NodeId> = keys
            .iter()
            .enumerate()
            .map(|(i, k)| builder.add_node(cpu_node(k, i as f64, 1.0)))
            .collect();
        for pair in ids.windows(2) {
            builder.add_dependency(pair[1], pair[0]);
        }
        builder.build().unwrap()
    }

    /// Random single-rooted DAG: node i > 0 depends on 1..=3 earlier nodes.
    fn random_dag(seed: u64, size: usize) -> DependencyGraph {
        let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let mut next = move |bound: usize| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % bound as u64) as usize
        };

        let mut builder = GraphBuilder::new();
        let ids: Vec<NodeId> = (0..size)
            .map(|i| builder.add_node(cpu_node(&format!("n{}", i), i as f64, 1.0)))
            .collect();
        for i in 1..size {
            for _ in 0..=next(3) {
                builder.add_dependency(ids[i], ids[next(i)]);
            }
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_excluded_middle_node_is_contracted() {
        let graph = chain(&["A", "B", "C"]);
        let clone = graph.clone_with_relationships(|_, node| node.key != "B").unwrap();

        assert_eq!(clone.len(), 2);
        let a = clone.find_by_key("A").unwrap();
        let c = clone.find_by_key("C").unwrap();
        assert_eq!(clone.dependents(a), &[c]);
        assert_eq!(clone.dependencies(c), &[a]);
        assert_eq!(clone.source_id(c), NodeId(2));
    }

    #[test]
    fn test_diamond_collapses_to_single_edge() {
        // A -> {B, C} -> D with B and C excluded leaves one A -> D edge.
        let mut builder = GraphBuilder::new();
        let a = builder.add_node(cpu_node("A", 0.0, 1.0));
        let b = builder.add_node(cpu_node("B", 1.0, 1.0));
        let c = builder.add_node(cpu_node("C", 1.0, 1.0));
        let d = builder.add_node(cpu_node("D", 2.0, 1.0));
        builder.add_dependency(b, a).add_dependency(c, a).add_dependency(d, b).add_dependency(d, c);
        let graph = builder.build().unwrap();

        let clone = graph.clone_with_relationships(|_, n| n.key == "A" || n.key == "D").unwrap();
        assert_eq!(clone.dependents(NodeId(0)), &[NodeId(1)]);
    }

    #[test]
    fn test_root_must_survive() {
        let graph = chain(&["A", "B"]);
        let err = graph.clone_with_relationships(|_, node| node.key == "B").unwrap_err();
        assert_eq!(err, GraphError::RootExcluded { key: "A".into() });
    }

    #[test]
    fn test_clone_leaves_source_untouched_and_is_deterministic() {
        let graph = random_dag(7, 30);
        let before = graph.clone();
        let keep_even = |id: NodeId, _: &Node| id.index() % 2 == 0;

        let first = graph.clone_with_relationships(keep_even).unwrap();
        let second = graph.clone_with_relationships(keep_even).unwrap();

        assert_eq!(graph, before);
        assert_eq!(first, second);
    }

    #[rstest]
    #[case(1, 12)]
    #[case(2, 25)]
    #[case(3, 40)]
    #[case(42, 60)]
    fn test_paths_between_survivors_are_preserved(#[case] seed: u64, #[case] size: usize) {
        let graph = random_dag(seed, size);
        let keep = |id: NodeId, _: &Node| id.index() == 0 || (id.index() * 7 + seed as usize) % 3 != 0;
        let clone = graph.clone_with_relationships(keep).unwrap();

        // No excluded node leaks into the clone.
        for (id, node) in clone.nodes() {
            let source = clone.source_id(id);
            assert!(keep(source, node));
            assert_eq!(graph.node(source).key, node.key);
        }

        let original = to_petgraph(&graph);
        let pruned = to_petgraph(&clone);
        for (u, _) in clone.nodes() {
            for (v, _) in clone.nodes() {
                if u == v {
                    continue;
                }
                let su = NodeIndex::new(clone.source_id(u).index());
                let sv = NodeIndex::new(clone.source_id(v).index());
                assert_eq!(
                    has_path_connecting(&original, su, sv, None),
                    has_path_connecting(&pruned, NodeIndex::new(u.index()), NodeIndex::new(v.index()), None),
                    "path {} -> {} differs after cloning",
                    su.index(),
                    sv.index()
                );
            }
        }
    }

    #[test]
    fn test_clone_of_cyclic_graph_fails() {
        let mut graph = chain(&["A", "B"]);
        graph.dependencies_flat.push(NodeId(1));
        graph.dependency_ranges[0] = ((graph.dependencies_flat.len() - 1) as u32, 1);

        let err = graph.clone_with_relationships(|_, _| true).unwrap_err();
        assert!(matches!(err, GraphError::CycleDetected { .. }));
    }
}
