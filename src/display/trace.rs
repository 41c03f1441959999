use crate::simulation::NodeTimings;
use crate::store::{DependencyGraph, NodeId, NodeKind};
use std::fmt::Write;

const BAR_WIDTH: usize = 40;

/// Renders simulated timings as an ASCII waterfall, one row per node in start order.
///
/// ```text
/// TIMELINE (4 nodes, 1107.0ms)
/// --------------------------------------------------
/// [net] 0       0.0 ->  450.0 |################                        | https://squoosh.app/
/// [cpu] 1.2   900.0 -> 1107.0 |                                #######| 30.0ms observed
/// ```
pub fn format_timeline(graph: &DependencyGraph, timings: &NodeTimings) -> String {
    let mut tracer = Timeline {
        graph,
        timings,
        total: timings.last_end_time(),
        key_width: graph.nodes().map(|(_, n)| n.key.len()).max().unwrap_or(0),
        output: String::new(),
    };
    tracer.render();
    tracer.output
}

struct Timeline<'a> {
    graph: &'a DependencyGraph,
    timings: &'a NodeTimings,
    total: f64,
    key_width: usize,
    output: String,
}

impl<'a> Timeline<'a> {
    fn render(&mut self) {
        let _ = writeln!(self.output, "TIMELINE ({} nodes, {:.1}ms)", self.timings.len(), self.total);
        let _ = writeln!(self.output, "--------------------------------------------------");

        let (graph, timings) = (self.graph, self.timings);
        let mut rows: Vec<_> = timings.iter().filter(|(id, _)| id.index() < graph.len()).collect();
        // Stable sort keeps id order among ties.
        rows.sort_by(|a, b| a.1.start_time.total_cmp(&b.1.start_time));
        for (id, _) in rows {
            self.render_row(id);
        }

        let missing = self.graph.len() - self.timings.len().min(self.graph.len());
        if missing > 0 {
            let _ = writeln!(self.output, "({} nodes not simulated)", missing);
        }
    }

    fn render_row(&mut self, id: NodeId) {
        let Some(timing) = self.timings.get(id) else { return };
        let node = self.graph.node(id);
        let (tag, detail) = match &node.kind {
            NodeKind::Cpu(task) => ("cpu", format!("{:.1}ms observed", task.duration() / 1000.0)),
            NodeKind::Network(request) => ("net", request.url.clone()),
        };
        let bar = self.bar(timing.start_time, timing.end_time);
        let _ = writeln!(
            self.output,
            "[{}] {:<width$} {:>7.1} -> {:>7.1} |{}| {}",
            tag,
            node.key,
            timing.start_time,
            timing.end_time,
            bar,
            detail,
            width = self.key_width
        );
    }

    fn bar(&self, start: f64, end: f64) -> String {
        if self.total <= 0.0 {
            return " ".repeat(BAR_WIDTH);
        }
        let scale = |t: f64| ((t / self.total) * BAR_WIDTH as f64).round().clamp(0.0, BAR_WIDTH as f64) as usize;
        let from = scale(start);
        // Zero-length work still gets one cell.
        let to = scale(end).max(from + 1).min(BAR_WIDTH);
        let from = from.min(to.saturating_sub(1));
        format!("{}{}{}", " ".repeat(from), "#".repeat(to - from), " ".repeat(BAR_WIDTH - to))
    }
}
