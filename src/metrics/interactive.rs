use super::error::MetricError;
use super::policy::{Branch, Extras, MetricCoefficients, MetricComputationData, MetricPolicy};
use crate::simulation::{NodeTimings, SimulationResult};
use crate::store::{DependencyGraph, NodeKind, Priority, ResourceType};

/// Main-thread tasks longer than this (ms) survive optimistic pruning.
pub const CRITICAL_LONG_TASK_THRESHOLD_MS: f64 = 20.0;
/// Simulated tasks longer than this (ms) delay interactivity.
pub const LONG_TASK_THRESHOLD_MS: f64 = 50.0;

/// Time to Interactive: when the main thread has settled after the largest paint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interactive;

impl Interactive {
    pub const COEFFICIENTS: MetricCoefficients = MetricCoefficients::new(0.0, 0.45, 0.55);
}

/// End of the last simulated CPU task whose duration exceeds `threshold_ms`, or 0.
pub fn last_long_task_end_time(graph: &DependencyGraph, timings: &NodeTimings, threshold_ms: f64) -> f64 {
    timings
        .iter()
        .filter(|(id, timing)| {
            let is_cpu = graph.get_node(*id).is_some_and(|node| matches!(node.kind, NodeKind::Cpu(_)));
            is_cpu && timing.duration > threshold_ms
        })
        .map(|(_, timing)| timing.end_time)
        .fold(0.0, f64::max)
}

impl MetricPolicy for Interactive {
    fn name(&self) -> &'static str { "Interactive" }

    fn coefficients(&self) -> MetricCoefficients { Self::COEFFICIENTS }

    fn check_extras(&self, extras: &Extras<'_>) -> Result<(), MetricError> {
        extras.require_lcp(self.name()).map(|_| ())
    }

    /// Long tasks, scripts and important non-image requests. The document
    /// itself always stays so the graph keeps its root.
    fn prune_optimistic(&self, data: &MetricComputationData<'_>) -> Result<DependencyGraph, MetricError> {
        let minimum_cpu_task_duration = CRITICAL_LONG_TASK_THRESHOLD_MS * 1000.0;
        let graph = data.graph;
        Ok(graph.clone_with_relationships(|id, node| match &node.kind {
            NodeKind::Cpu(task) => task.duration() > minimum_cpu_task_duration,
            NodeKind::Network(request) => {
                let is_image = request.resource_type == ResourceType::Image;
                let is_script = request.resource_type == ResourceType::Script;
                let is_important = matches!(request.priority, Priority::High | Priority::VeryHigh);
                graph.is_main_document(id) || (!is_image && (is_script || is_important))
            }
        })?)
    }

    fn prune_pessimistic(&self, data: &MetricComputationData<'_>) -> Result<DependencyGraph, MetricError> {
        Ok(data.graph.clone_with_relationships(|_, _| true)?)
    }

    fn extract_estimate(
        &self,
        graph: &DependencyGraph,
        simulation: SimulationResult,
        extras: &Extras<'_>,
        branch: Branch,
    ) -> Result<SimulationResult, MetricError> {
        let lcp = extras.require_lcp(self.name())?;
        let last_task_end = last_long_task_end_time(graph, &simulation.node_timings, LONG_TASK_THRESHOLD_MS);
        let minimum_time = lcp.estimate(branch).time_in_ms;
        Ok(SimulationResult {
            time_in_ms: minimum_time.max(last_task_end),
            node_timings: simulation.node_timings,
        })
    }

    /// Interactivity can never precede the largest paint.
    fn finalize(&self, timing: f64, extras: &Extras<'_>) -> f64 {
        match extras.lcp_result {
            Some(lcp) => timing.max(lcp.timing),
            None => timing,
        }
    }
}
