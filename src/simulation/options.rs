//! Throttling configuration handed to the simulator.
use super::result::SimulatorError;
use serde::{Deserialize, Serialize};

/// Network and CPU throttling applied during simulation.
///
/// The default is the "slow 4G on a mid-tier phone" profile. Missing fields in
/// JSON fall back to it, so a profile file only needs to list what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorOptions {
    pub rtt_ms: f64,
    pub throughput_kbps: f64,
    pub cpu_slowdown_multiplier: f64,
    /// Multiplier for tasks that performed layout. Defaults to half the CPU slowdown.
    pub layout_task_multiplier: Option<f64>,
    pub max_cpu_task_duration_ms: f64,
    pub max_connections_per_origin: usize,
    pub max_concurrent_requests: usize,
}

impl Default for SimulatorOptions {
    fn default() -> Self { Self::mobile_slow_4g() }
}

impl SimulatorOptions {
    pub fn mobile_slow_4g() -> Self {
        Self {
            rtt_ms: 150.0,
            throughput_kbps: 1.6 * 1024.0,
            cpu_slowdown_multiplier: 4.0,
            layout_task_multiplier: None,
            max_cpu_task_duration_ms: 10_000.0,
            max_connections_per_origin: 6,
            max_concurrent_requests: 10,
        }
    }

    pub fn desktop() -> Self {
        Self {
            rtt_ms: 40.0,
            throughput_kbps: 10.0 * 1024.0,
            cpu_slowdown_multiplier: 1.0,
            ..Self::mobile_slow_4g()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SimulatorError> {
        let options: Self = serde_json::from_str(json).map_err(|e| SimulatorError::InvalidOptions(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn effective_layout_multiplier(&self) -> f64 {
        self.layout_task_multiplier.unwrap_or(self.cpu_slowdown_multiplier * 0.5)
    }

    pub fn validate(&self) -> Result<(), SimulatorError> {
        let invalid = |msg: &str| Err(SimulatorError::InvalidOptions(msg.to_string()));

        if !(self.rtt_ms.is_finite() && self.rtt_ms >= 0.0) {
            return invalid("rtt_ms must be a non-negative number");
        }
        if !(self.throughput_kbps.is_finite() && self.throughput_kbps > 0.0) {
            return invalid("throughput_kbps must be positive");
        }
        if !(self.cpu_slowdown_multiplier.is_finite() && self.cpu_slowdown_multiplier > 0.0) {
            return invalid("cpu_slowdown_multiplier must be positive");
        }
        if let Some(m) = self.layout_task_multiplier {
            if !(m.is_finite() && m > 0.0) {
                return invalid("layout_task_multiplier must be positive");
            }
        }
        if !(self.max_cpu_task_duration_ms > 0.0) {
            return invalid("max_cpu_task_duration_ms must be positive");
        }
        if self.max_connections_per_origin == 0 || self.max_concurrent_requests == 0 {
            return invalid("connection limits must be at least 1");
        }
        Ok(())
    }
}
