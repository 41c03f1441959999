use super::error::MetricError;
use super::first_paint::first_paint_based_graph;
use super::policy::{Branch, Extras, MetricCoefficients, MetricComputationData, MetricPolicy};
use crate::simulation::SimulationResult;
use crate::store::{DependencyGraph, Node};

/// Largest Contentful Paint: when the largest text or image element is painted.
///
/// Low-priority images are assumed to be offscreen, so they neither block the
/// optimistic paint nor count towards either estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LargestContentfulPaint;

impl LargestContentfulPaint {
    pub const COEFFICIENTS: MetricCoefficients = MetricCoefficients::new(0.0, 0.5, 0.5);

    fn cutoff(data: &MetricComputationData<'_>) -> Result<f64, MetricError> {
        data.timestamps.largest_contentful_paint.ok_or(MetricError::MissingTimestamp {
            metric: "LargestContentfulPaint",
            timestamp: "largest contentful paint",
        })
    }
}

fn is_not_low_priority_image(node: &Node) -> bool {
    node.as_network().map_or(true, |request| !request.is_low_priority_image())
}

impl MetricPolicy for LargestContentfulPaint {
    fn name(&self) -> &'static str { "LargestContentfulPaint" }

    fn coefficients(&self) -> MetricCoefficients { Self::COEFFICIENTS }

    fn check_extras(&self, extras: &Extras<'_>) -> Result<(), MetricError> {
        extras.require_fcp(self.name()).map(|_| ())
    }

    fn prune_optimistic(&self, data: &MetricComputationData<'_>) -> Result<DependencyGraph, MetricError> {
        let cutoff = Self::cutoff(data)?;
        Ok(first_paint_based_graph(
            data.graph,
            cutoff,
            |request| !request.is_low_priority_image(),
            |_| false,
        )?)
    }

    fn prune_pessimistic(&self, data: &MetricComputationData<'_>) -> Result<DependencyGraph, MetricError> {
        let cutoff = Self::cutoff(data)?;
        Ok(first_paint_based_graph(data.graph, cutoff, |_| true, |task| task.performed_layout)?)
    }

    fn extract_estimate(
        &self,
        graph: &DependencyGraph,
        simulation: SimulationResult,
        _extras: &Extras<'_>,
        _branch: Branch,
    ) -> Result<SimulationResult, MetricError> {
        let time_in_ms = simulation
            .node_timings
            .iter()
            .filter(|(id, _)| graph.get_node(*id).is_some_and(is_not_low_priority_image))
            .map(|(_, timing)| timing.end_time)
            .fold(0.0, f64::max);
        Ok(SimulationResult { time_in_ms, node_timings: simulation.node_timings })
    }

    /// Largest paint can never precede the first one.
    fn finalize(&self, timing: f64, extras: &Extras<'_>) -> f64 {
        match extras.fcp_result {
            Some(fcp) => timing.max(fcp.timing),
            None => timing,
        }
    }
}
