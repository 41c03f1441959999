use super::connections::{origin_of, Connection, ConnectionPool};
use super::options::SimulatorOptions;
use super::result::{NodeTiming, NodeTimings, SimulationResult, SimulatorError};
use super::Simulator;
use crate::analysis::topology;
use crate::store::{CpuTask, DependencyGraph, NetworkRequest, NodeId, NodeKind};
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// Discrete-event simulator: one main thread, pooled connections per origin.
///
/// Ready nodes are started in discovery order. A CPU task waits for the main
/// thread; a request waits for a connection slot. Durations are fixed when a
/// node starts, so the schedule is a pure function of graph and options.
#[derive(Debug, Clone)]
pub struct ThrottledSimulator {
    options: SimulatorOptions,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    id: NodeId,
    start: f64,
    end: f64,
}

impl ThrottledSimulator {
    pub fn new(options: SimulatorOptions) -> Result<Self, SimulatorError> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &SimulatorOptions { &self.options }

    fn cpu_duration(&self, task: &CpuTask) -> f64 {
        let multiplier = if task.performed_layout {
            self.options.effective_layout_multiplier()
        } else {
            self.options.cpu_slowdown_multiplier
        };
        let observed_ms = task.duration().max(0.0) / 1000.0;
        (observed_ms * multiplier).min(self.options.max_cpu_task_duration_ms)
    }

    /// Handshake on a cold connection, one round trip for request/response,
    /// then the body at this request's share of the bandwidth.
    fn network_duration(&self, request: &NetworkRequest, connection: Connection, secure: bool, concurrent: usize) -> f64 {
        let rtt = self.options.rtt_ms;
        let handshake = match (connection.warm, secure) {
            (true, _) => 0.0,
            (false, false) => rtt,
            (false, true) => 2.0 * rtt,
        };
        let bits_per_ms = self.options.throughput_kbps * 1024.0 / 1000.0 / concurrent.max(1) as f64;
        let download = request.transfer_size as f64 * 8.0 / bits_per_ms;
        handshake + rtt + download
    }
}

impl Simulator for ThrottledSimulator {
    fn simulate(&self, graph: &DependencyGraph) -> Result<SimulationResult, SimulatorError> {
        // 1. Structural barrier: never schedule a cyclic graph.
        topology::sort(graph)?;

        let total = graph.len();
        let priority = topology::discovery_order(graph);
        let origins: Vec<Option<(String, bool)>> = graph
            .nodes()
            .map(|(_, node)| node.as_network().map(|r| origin_of(&r.url)))
            .collect();

        let mut remaining: Vec<usize> = (0..total).map(|i| graph.dependencies(NodeId::new(i)).len()).collect();
        let mut ready: BTreeSet<(usize, NodeId)> = (0..total)
            .filter(|&i| remaining[i] == 0)
            .map(|i| (priority[i], NodeId::new(i)))
            .collect();
        let mut in_flight: Vec<InFlight> = Vec::new();
        let mut pool = ConnectionPool::new(self.options.max_connections_per_origin, self.options.max_concurrent_requests);
        let mut timings = NodeTimings::with_capacity(total);
        let mut cpu_busy = false;
        let mut clock = 0.0_f64;
        let mut completed = 0;

        // 2. Event loop
        loop {
            // A. Start everything that can start now
            let candidates: Vec<(usize, NodeId)> = ready.iter().copied().collect();
            for entry in candidates {
                let (_, id) = entry;
                let duration = match &graph.node(id).kind {
                    NodeKind::Cpu(task) => {
                        if cpu_busy {
                            continue;
                        }
                        cpu_busy = true;
                        self.cpu_duration(task)
                    }
                    NodeKind::Network(request) => {
                        let Some((origin, secure)) = &origins[id.index()] else { continue };
                        let Some(connection) = pool.acquire(origin) else { continue };
                        self.network_duration(request, connection, *secure, pool.active_total())
                    }
                };
                ready.remove(&entry);
                trace!(node = %id, start = clock, duration, "node started");
                in_flight.push(InFlight { id, start: clock, end: clock + duration });
            }

            if in_flight.is_empty() {
                break;
            }

            // B. Advance to the earliest completion and retire everything ending then
            clock = in_flight.iter().map(|f| f.end).fold(f64::INFINITY, f64::min);
            let mut finished: Vec<InFlight> = Vec::new();
            in_flight.retain(|f| {
                if f.end <= clock {
                    finished.push(*f);
                    false
                } else {
                    true
                }
            });
            finished.sort_by_key(|f| priority[f.id.index()]);

            for done in finished {
                timings.insert(done.id, NodeTiming::new(done.start, done.end));
                completed += 1;
                match &origins[done.id.index()] {
                    Some((origin, _)) => pool.release(origin),
                    None => cpu_busy = false,
                }
                for &dependent in graph.dependents(done.id) {
                    let slot = &mut remaining[dependent.index()];
                    *slot -= 1;
                    if *slot == 0 {
                        ready.insert((priority[dependent.index()], dependent));
                    }
                }
            }
        }

        if completed != total {
            return Err(SimulatorError::Stalled { completed, total });
        }

        let time_in_ms = timings.last_end_time();
        debug!(nodes = total, time_in_ms, "simulation complete");
        Ok(SimulationResult { time_in_ms, node_timings: timings })
    }
}
