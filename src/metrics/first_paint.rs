//! Pruning shared by the paint metrics: keep only the work that could have
//! delayed a paint observed at a given timestamp.
use crate::store::{CpuTask, DependencyGraph, GraphError, InitiatorType, NetworkRequest, NodeId, NodeKind, ResourceType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// How a paint metric derives one of its two graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaintStrategy {
    /// Every node of the page graph.
    Unpruned,
    /// Requests with a render-blocking priority that finished before the paint,
    /// plus the main-thread tasks evaluating those that are scripts.
    RenderBlocking {
        /// Also keep render-blocking requests that a script initiated.
        include_script_initiated: bool,
        /// Also keep every layout task that started before the paint.
        include_layout_tasks: bool,
    },
}

impl PaintStrategy {
    pub fn prune(&self, graph: &DependencyGraph, cutoff: f64) -> Result<DependencyGraph, GraphError> {
        match *self {
            PaintStrategy::Unpruned => graph.clone_with_relationships(|_, _| true),
            PaintStrategy::RenderBlocking { include_script_initiated, include_layout_tasks } => first_paint_based_graph(
                graph,
                cutoff,
                |request| {
                    request.has_render_blocking_priority()
                        && (include_script_initiated || request.initiator_type != InitiatorType::Script)
                },
                |task| include_layout_tasks && task.performed_layout,
            ),
        }
    }
}

/// Clones the graph down to what could block a paint at `cutoff` (microseconds).
///
/// - Requests must have started and finished by the cutoff and pass
///   `treat_as_render_blocking`. The main document is always kept.
/// - A script evaluated only after the cutoff is dropped even if it qualified.
///   A script no task evaluated stays if it qualifies.
/// - A negative end time counts as finished before the cutoff, so only a
///   request that started before the cutoff can be affected by one.
/// - Tasks are kept if they evaluated a blocking script or match `extra_cpu`.
pub fn first_paint_based_graph<F, C>(
    graph: &DependencyGraph,
    cutoff: f64,
    treat_as_render_blocking: F,
    extra_cpu: C,
) -> Result<DependencyGraph, GraphError>
where
    F: Fn(&NetworkRequest) -> bool,
    C: Fn(&CpuTask) -> bool,
{
    // 1. First task to evaluate each script, and every task begun before the cutoff
    let mut first_evaluation: BTreeMap<&str, (f64, NodeId)> = BTreeMap::new();
    let mut early_tasks: Vec<(NodeId, &CpuTask)> = Vec::new();
    graph.traverse(|id, node| {
        if let NodeKind::Cpu(task) = &node.kind {
            if task.start_time <= cutoff {
                early_tasks.push((id, task));
            }
            for url in &task.evaluated_script_urls {
                let entry = first_evaluation.entry(url.as_str()).or_insert((task.start_time, id));
                if task.start_time < entry.0 {
                    *entry = (task.start_time, id);
                }
            }
        }
    });

    // 2. Split candidate scripts by whether their evaluation preceded the paint
    let mut blocking_scripts: BTreeSet<&str> = BTreeSet::new();
    let mut non_blocking_scripts: BTreeSet<&str> = BTreeSet::new();
    graph.traverse(|_, node| {
        if let NodeKind::Network(request) = &node.kind {
            let candidate = request.resource_type == ResourceType::Script
                && node.end_time() <= cutoff
                && treat_as_render_blocking(request);
            if !candidate {
                return;
            }
            // A script no task evaluated is judged like any other request.
            match first_evaluation.get(request.url.as_str()) {
                Some(&(start, _)) if start <= cutoff => blocking_scripts.insert(request.url.as_str()),
                Some(_) => non_blocking_scripts.insert(request.url.as_str()),
                None => false,
            };
        }
    });

    let blocking_tasks: HashSet<NodeId> = early_tasks
        .iter()
        .filter(|&&(_, task)| task.evaluates_any(blocking_scripts.iter().copied()) || extra_cpu(task))
        .map(|&(id, _)| id)
        .collect();

    // 3. Clone
    graph.clone_with_relationships(|id, node| match &node.kind {
        NodeKind::Network(request) => {
            if graph.is_main_document(id) {
                return true;
            }
            let after_paint = node.start_time() > cutoff || node.end_time() > cutoff;
            if after_paint || non_blocking_scripts.contains(request.url.as_str()) {
                return false;
            }
            treat_as_render_blocking(request)
        }
        NodeKind::Cpu(_) => blocking_tasks.contains(&id),
    })
}
