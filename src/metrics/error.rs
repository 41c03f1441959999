use crate::simulation::SimulatorError;
use crate::store::GraphError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    #[error("{metric} requires the {dependency} result; compute it first and pass it as an extra")]
    MissingDependency { metric: &'static str, dependency: &'static str },
    #[error("{metric} requires the observed {timestamp} timestamp")]
    MissingTimestamp { metric: &'static str, timestamp: &'static str },
    #[error("Malformed dependency graph: {0}")]
    MalformedGraph(#[from] GraphError),
    #[error("Simulation failed: {0}")]
    SimulatorFailure(#[from] SimulatorError),
}
