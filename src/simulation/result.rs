//! result.rs
//! Dense per-node timing storage, indexed by the simulated graph's `NodeId`.

use crate::store::{GraphError, NodeId};
use serde::{Deserialize, Serialize};

pub use self::error::SimulatorError;
mod error {
    use super::*;
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum SimulatorError {
        #[error("Invalid simulator options: {0}")]
        InvalidOptions(String),
        #[error("Simulation stalled after completing {completed} of {total} nodes")]
        Stalled { completed: usize, total: usize },
        #[error("Cannot simulate malformed graph: {0}")]
        Graph(#[from] GraphError),
    }
}

/// Simulated schedule of one node, in milliseconds from navigation start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeTiming {
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
}

impl NodeTiming {
    pub fn new(start_time: f64, end_time: f64) -> Self {
        Self { start_time, end_time, duration: end_time - start_time }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeTimings {
    values: Vec<Option<NodeTiming>>,
}

impl NodeTimings {
    pub fn new() -> Self { Self::default() }

    pub fn with_capacity(size: usize) -> Self {
        Self { values: vec![None; size] }
    }

    #[inline(always)]
    pub fn get(&self, node_id: NodeId) -> Option<&NodeTiming> {
        self.values.get(node_id.index())?.as_ref()
    }

    pub fn insert(&mut self, node_id: NodeId, timing: NodeTiming) {
        let idx = node_id.index();
        if idx >= self.values.len() {
            self.values.resize(idx + 1, None);
        }
        self.values[idx] = Some(timing);
    }

    /// Timed nodes in id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NodeTiming)> {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.as_ref().map(|t| (NodeId::new(i), t)))
    }

    /// Number of nodes that received a timing.
    pub fn len(&self) -> usize { self.values.iter().filter(|t| t.is_some()).count() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn last_end_time(&self) -> f64 {
        self.iter().map(|(_, t)| t.end_time).fold(0.0, f64::max)
    }
}

impl FromIterator<(NodeId, NodeTiming)> for NodeTimings {
    fn from_iter<I: IntoIterator<Item = (NodeId, NodeTiming)>>(iter: I) -> Self {
        let mut timings = NodeTimings::new();
        for (id, timing) in iter {
            timings.insert(id, timing);
        }
        timings
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub time_in_ms: f64,
    pub node_timings: NodeTimings,
}
