//! Schedules a dependency graph under throttling and reports per-node timings.
pub mod connections;
pub mod engine;
pub mod options;
pub mod result;

pub use engine::ThrottledSimulator;
pub use options::SimulatorOptions;
pub use result::{NodeTiming, NodeTimings, SimulationResult, SimulatorError};

use crate::store::DependencyGraph;

/// The scheduling contract the metrics rely on.
///
/// Implementations must guarantee that no node starts before all of its
/// dependencies have ended, that CPU nodes never overlap (ties go to the node
/// discovered first), and that requests to one origin never exceed the
/// per-origin connection limit. Throttling configuration belongs to the
/// implementation. `Sync` because the two estimate branches may be simulated
/// on different threads.
pub trait Simulator: Sync {
    fn simulate(&self, graph: &DependencyGraph) -> Result<SimulationResult, SimulatorError>;
}
