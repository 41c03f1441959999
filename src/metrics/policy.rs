//! The fixed estimation algorithm shared by every metric.
use super::error::MetricError;
use crate::simulation::{SimulationResult, Simulator};
use crate::store::DependencyGraph;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Linear weights blending the two simulated estimates into one value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricCoefficients {
    pub intercept: f64,
    pub optimistic: f64,
    pub pessimistic: f64,
}

impl MetricCoefficients {
    pub const fn new(intercept: f64, optimistic: f64, pessimistic: f64) -> Self {
        Self { intercept, optimistic, pessimistic }
    }

    pub fn blend(&self, optimistic_ms: f64, pessimistic_ms: f64) -> f64 {
        self.intercept + self.optimistic * optimistic_ms + self.pessimistic * pessimistic_ms
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    Optimistic,
    Pessimistic,
}

/// Paint timestamps observed in the trace, in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NavigationTimestamps {
    pub first_contentful_paint: f64,
    pub largest_contentful_paint: Option<f64>,
}

/// Everything a metric computation reads. The graph is never modified.
#[derive(Clone, Copy)]
pub struct MetricComputationData<'a> {
    pub graph: &'a DependencyGraph,
    pub simulator: &'a dyn Simulator,
    pub timestamps: NavigationTimestamps,
}

/// Results of metrics computed earlier in the FCP -> LCP -> TTI chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct Extras<'a> {
    pub fcp_result: Option<&'a MetricResult>,
    pub lcp_result: Option<&'a MetricResult>,
}

impl<'a> Extras<'a> {
    pub fn none() -> Self { Self::default() }

    pub fn with_fcp(mut self, result: &'a MetricResult) -> Self {
        self.fcp_result = Some(result);
        self
    }

    pub fn with_lcp(mut self, result: &'a MetricResult) -> Self {
        self.lcp_result = Some(result);
        self
    }

    pub fn require_fcp(&self, metric: &'static str) -> Result<&'a MetricResult, MetricError> {
        self.fcp_result.ok_or(MetricError::MissingDependency { metric, dependency: "FirstContentfulPaint" })
    }

    pub fn require_lcp(&self, metric: &'static str) -> Result<&'a MetricResult, MetricError> {
        self.lcp_result.ok_or(MetricError::MissingDependency { metric, dependency: "LargestContentfulPaint" })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricResult {
    pub timing: f64,
    pub optimistic_estimate: SimulationResult,
    pub pessimistic_estimate: SimulationResult,
    pub optimistic_graph: DependencyGraph,
    pub pessimistic_graph: DependencyGraph,
}

impl MetricResult {
    pub fn estimate(&self, branch: Branch) -> &SimulationResult {
        match branch {
            Branch::Optimistic => &self.optimistic_estimate,
            Branch::Pessimistic => &self.pessimistic_estimate,
        }
    }
}

/// What a concrete metric contributes to the shared algorithm.
pub trait MetricPolicy {
    fn name(&self) -> &'static str;

    fn coefficients(&self) -> MetricCoefficients;

    /// Rejects a call whose prerequisite metrics are missing, before any work is done.
    fn check_extras(&self, _extras: &Extras<'_>) -> Result<(), MetricError> {
        Ok(())
    }

    fn prune_optimistic(&self, data: &MetricComputationData<'_>) -> Result<DependencyGraph, MetricError>;

    fn prune_pessimistic(&self, data: &MetricComputationData<'_>) -> Result<DependencyGraph, MetricError>;

    /// Turns a raw simulation of `graph` into this metric's estimate for `branch`.
    fn extract_estimate(
        &self,
        _graph: &DependencyGraph,
        simulation: SimulationResult,
        _extras: &Extras<'_>,
        _branch: Branch,
    ) -> Result<SimulationResult, MetricError> {
        Ok(simulation)
    }

    /// Adjusts the blended timing, e.g. to keep it after a prerequisite metric.
    fn finalize(&self, timing: f64, _extras: &Extras<'_>) -> f64 {
        timing
    }
}

/// Prunes the graph twice, simulates both sub-graphs, and blends the two estimates.
pub fn compute(
    policy: &dyn MetricPolicy,
    data: &MetricComputationData<'_>,
    extras: Extras<'_>,
) -> Result<MetricResult, MetricError> {
    policy.check_extras(&extras)?;

    let optimistic_graph = policy.prune_optimistic(data)?;
    let pessimistic_graph = policy.prune_pessimistic(data)?;

    // The branches share nothing mutable.
    let simulator = data.simulator;
    let (raw_optimistic, raw_pessimistic) = rayon::join(
        || simulator.simulate(&optimistic_graph),
        || simulator.simulate(&pessimistic_graph),
    );

    let optimistic_estimate = policy.extract_estimate(&optimistic_graph, raw_optimistic?, &extras, Branch::Optimistic)?;
    let pessimistic_estimate = policy.extract_estimate(&pessimistic_graph, raw_pessimistic?, &extras, Branch::Pessimistic)?;

    let coefficients = policy.coefficients();
    let blended = coefficients.blend(optimistic_estimate.time_in_ms, pessimistic_estimate.time_in_ms);
    let timing = policy.finalize(blended, &extras);

    debug!(
        metric = policy.name(),
        optimistic_nodes = optimistic_graph.len(),
        pessimistic_nodes = pessimistic_graph.len(),
        optimistic_ms = optimistic_estimate.time_in_ms,
        pessimistic_ms = pessimistic_estimate.time_in_ms,
        timing,
        "metric estimated"
    );

    Ok(MetricResult {
        timing,
        optimistic_estimate,
        pessimistic_estimate,
        optimistic_graph,
        pessimistic_graph,
    })
}
