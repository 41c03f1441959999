//! Human-readable renderings of graphs and simulations, for debugging.
pub mod dot;
pub mod trace;

pub use dot::{to_dot, to_petgraph};
pub use trace::format_timeline;
