// Page-load metric estimation.
// A page load is modelled as a DAG of network requests and main-thread tasks.
// Each metric prunes that graph into an optimistic and a pessimistic variant,
// simulates both under throttling, and blends the two completion times.

pub mod analysis;
pub mod display;
pub mod metrics;
pub mod simulation;
pub mod store;

#[cfg(test)]
mod test_support;

pub use metrics::{
    estimate_page_load, Extras, FirstContentfulPaint, Interactive, LargestContentfulPaint, Metric,
    MetricCoefficients, MetricComputationData, MetricError, MetricPolicy, MetricResult, NavigationTimestamps,
    PageLoadEstimates,
};
pub use simulation::{SimulationResult, Simulator, SimulatorError, SimulatorOptions, ThrottledSimulator};
pub use store::{DependencyGraph, GraphBuilder, GraphError, Node, NodeId};
