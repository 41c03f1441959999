use super::error::MetricError;
use super::first_paint::PaintStrategy;
use super::policy::{MetricCoefficients, MetricComputationData, MetricPolicy};
use crate::store::DependencyGraph;

/// First Contentful Paint: when the first text or image is painted.
///
/// The optimistic graph is the render-blocking work finished by the observed
/// paint; the pessimistic graph is the whole page unless configured otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirstContentfulPaint {
    pub optimistic: PaintStrategy,
    pub pessimistic: PaintStrategy,
}

impl Default for FirstContentfulPaint {
    fn default() -> Self {
        Self {
            optimistic: PaintStrategy::RenderBlocking { include_script_initiated: false, include_layout_tasks: false },
            pessimistic: PaintStrategy::Unpruned,
        }
    }
}

impl FirstContentfulPaint {
    pub const COEFFICIENTS: MetricCoefficients = MetricCoefficients::new(0.0, 0.5, 0.5);

    pub fn new() -> Self { Self::default() }

    /// Both branches pruned to render-blocking work; the pessimistic one also
    /// counts script-initiated requests and layout.
    pub fn render_blocking_only() -> Self {
        Self {
            pessimistic: PaintStrategy::RenderBlocking { include_script_initiated: true, include_layout_tasks: true },
            ..Self::default()
        }
    }
}

impl MetricPolicy for FirstContentfulPaint {
    fn name(&self) -> &'static str { "FirstContentfulPaint" }

    fn coefficients(&self) -> MetricCoefficients { Self::COEFFICIENTS }

    fn prune_optimistic(&self, data: &MetricComputationData<'_>) -> Result<DependencyGraph, MetricError> {
        Ok(self.optimistic.prune(data.graph, data.timestamps.first_contentful_paint)?)
    }

    fn prune_pessimistic(&self, data: &MetricComputationData<'_>) -> Result<DependencyGraph, MetricError> {
        Ok(self.pessimistic.prune(data.graph, data.timestamps.first_contentful_paint)?)
    }
}
