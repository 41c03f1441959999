//! Page-load metrics estimated from an optimistic and a pessimistic simulation.
pub mod error;
pub mod first_contentful_paint;
pub mod first_paint;
pub mod interactive;
pub mod largest_contentful_paint;
pub mod policy;

pub use error::MetricError;
pub use first_contentful_paint::FirstContentfulPaint;
pub use first_paint::{first_paint_based_graph, PaintStrategy};
pub use interactive::{last_long_task_end_time, Interactive};
pub use largest_contentful_paint::LargestContentfulPaint;
pub use policy::{
    compute, Branch, Extras, MetricCoefficients, MetricComputationData, MetricPolicy, MetricResult,
    NavigationTimestamps,
};

/// Selects one of the supported metric policies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    FirstContentfulPaint(FirstContentfulPaint),
    LargestContentfulPaint(LargestContentfulPaint),
    Interactive(Interactive),
}

impl Metric {
    pub fn policy(&self) -> &dyn MetricPolicy {
        match self {
            Metric::FirstContentfulPaint(m) => m,
            Metric::LargestContentfulPaint(m) => m,
            Metric::Interactive(m) => m,
        }
    }

    pub fn name(&self) -> &'static str { self.policy().name() }

    pub fn compute(&self, data: &MetricComputationData<'_>, extras: Extras<'_>) -> Result<MetricResult, MetricError> {
        compute(self.policy(), data, extras)
    }
}

/// The three metrics of one page load.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLoadEstimates {
    pub first_contentful_paint: MetricResult,
    pub largest_contentful_paint: MetricResult,
    pub interactive: MetricResult,
}

/// Runs FCP, LCP and TTI in dependency order, feeding each result into the next.
pub fn estimate_page_load(
    data: &MetricComputationData<'_>,
    fcp: FirstContentfulPaint,
) -> Result<PageLoadEstimates, MetricError> {
    let first_contentful_paint = Metric::FirstContentfulPaint(fcp).compute(data, Extras::none())?;
    let largest_contentful_paint = Metric::LargestContentfulPaint(LargestContentfulPaint)
        .compute(data, Extras::none().with_fcp(&first_contentful_paint))?;
    let interactive =
        Metric::Interactive(Interactive).compute(data, Extras::none().with_lcp(&largest_contentful_paint))?;

    Ok(PageLoadEstimates { first_contentful_paint, largest_contentful_paint, interactive })
}
