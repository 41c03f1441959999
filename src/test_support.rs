//! Shared graph fixtures and stub simulators for unit tests.
use crate::analysis::topology;
use crate::simulation::{NodeTiming, NodeTimings, SimulationResult, Simulator, SimulatorError};
use crate::store::{CpuTask, DependencyGraph, GraphBuilder, InitiatorType, NetworkRequest, Node, Priority, ResourceType};
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn request(id: &str, url: &str, resource_type: ResourceType, priority: Priority) -> NetworkRequest {
    NetworkRequest {
        request_id: id.to_string(),
        url: url.to_string(),
        resource_type,
        priority,
        initiator_type: InitiatorType::Parser,
        transfer_size: 0,
        renderer_start_time: 0.0,
        network_end_time: 0.0,
    }
}

pub fn network_node(id: &str, url: &str, resource_type: ResourceType, priority: Priority) -> Node {
    Node::network(request(id, url, resource_type, priority))
}

/// Network node observed between `start_ms` and `end_ms`.
pub fn timed_request(
    id: &str,
    url: &str,
    resource_type: ResourceType,
    priority: Priority,
    initiator_type: InitiatorType,
    transfer_size: u64,
    start_ms: f64,
    end_ms: f64,
) -> Node {
    Node::network(NetworkRequest {
        initiator_type,
        transfer_size,
        renderer_start_time: start_ms,
        network_end_time: end_ms,
        ..request(id, url, resource_type, priority)
    })
}

pub fn cpu_node(key: &str, start_ms: f64, duration_ms: f64) -> Node {
    Node::cpu(key, CpuTask {
        start_time: start_ms * 1000.0,
        end_time: (start_ms + duration_ms) * 1000.0,
        ..CpuTask::default()
    })
}

pub fn layout_node(key: &str, start_ms: f64, duration_ms: f64) -> Node {
    Node::cpu(key, CpuTask {
        start_time: start_ms * 1000.0,
        end_time: (start_ms + duration_ms) * 1000.0,
        performed_layout: true,
        ..CpuTask::default()
    })
}

pub fn script_eval_node(key: &str, start_ms: f64, duration_ms: f64, url: &str) -> Node {
    Node::cpu(key, CpuTask {
        start_time: start_ms * 1000.0,
        end_time: (start_ms + duration_ms) * 1000.0,
        evaluated_script_urls: vec![url.to_string()],
        performed_layout: false,
    })
}

/// Observed first contentful paint of `page_graph`, in microseconds.
pub const PAGE_FCP_US: f64 = 700_000.0;
/// Observed largest contentful paint of `page_graph`, in microseconds.
pub const PAGE_LCP_US: f64 = 1_000_000.0;

/// A small but complete page load:
///
/// ```text
/// doc -> parse -> { style.css, app.js, hero.png }
/// app.js -> eval(app.js) -> { layout, lazy.png, analytics.js }
/// style.css -> layout -> roboto.woff2
/// analytics.js -> eval(analytics.js)
/// ```
pub fn page_graph() -> DependencyGraph {
    let mut b = GraphBuilder::new();
    let doc = b.add_node(timed_request("0", "https://squoosh.app/", ResourceType::Document, Priority::VeryHigh, InitiatorType::Other, 10_000, 0.0, 300.0));
    let parse = b.add_node(cpu_node("1.1", 300.0, 5.0));
    let css = b.add_node(timed_request("1", "https://squoosh.app/style.css", ResourceType::Stylesheet, Priority::VeryHigh, InitiatorType::Parser, 5_000, 310.0, 500.0));
    let app = b.add_node(timed_request("2", "https://squoosh.app/app.js", ResourceType::Script, Priority::High, InitiatorType::Parser, 20_000, 310.0, 600.0));
    let eval_app = b.add_node(script_eval_node("1.2", 600.0, 30.0, "https://squoosh.app/app.js"));
    let layout = b.add_node(layout_node("1.3", 640.0, 8.0));
    let hero = b.add_node(timed_request("3", "https://squoosh.app/hero.png", ResourceType::Image, Priority::High, InitiatorType::Parser, 50_000, 650.0, 900.0));
    let lazy = b.add_node(timed_request("4", "https://cdn.squoosh.app/lazy.png", ResourceType::Image, Priority::Low, InitiatorType::Parser, 30_000, 700.0, 1100.0));
    let analytics = b.add_node(timed_request("5", "https://www.google-analytics.com/analytics.js", ResourceType::Script, Priority::Low, InitiatorType::Script, 15_000, 640.0, 800.0));
    let eval_analytics = b.add_node(script_eval_node("1.4", 820.0, 60.0, "https://www.google-analytics.com/analytics.js"));
    let font = b.add_node(timed_request("6", "https://fonts.gstatic.com/roboto.woff2", ResourceType::Font, Priority::High, InitiatorType::Parser, 20_000, 700.0, 950.0));

    b.add_dependency(parse, doc)
        .add_dependency(css, parse)
        .add_dependency(app, parse)
        .add_dependency(hero, parse)
        .add_dependency(eval_app, app)
        .add_dependency(layout, eval_app)
        .add_dependency(layout, css)
        .add_dependency(lazy, eval_app)
        .add_dependency(analytics, eval_app)
        .add_dependency(eval_analytics, analytics)
        .add_dependency(font, layout);
    b.build().expect("page fixture is a valid graph")
}

/// Four render-blocking nodes: document, stylesheet, blocking script and its evaluation.
pub fn progressive_app_graph() -> DependencyGraph {
    let mut b = GraphBuilder::new();
    let doc = b.add_node(timed_request("0", "https://squoosh.app/", ResourceType::Document, Priority::VeryHigh, InitiatorType::Other, 10_000, 0.0, 300.0));
    let css = b.add_node(timed_request("1", "https://squoosh.app/style.css", ResourceType::Stylesheet, Priority::VeryHigh, InitiatorType::Parser, 5_000, 310.0, 500.0));
    let app = b.add_node(timed_request("2", "https://squoosh.app/app.js", ResourceType::Script, Priority::High, InitiatorType::Parser, 20_000, 310.0, 600.0));
    let eval_app = b.add_node(script_eval_node("1.2", 600.0, 30.0, "https://squoosh.app/app.js"));
    b.add_dependency(css, doc).add_dependency(app, doc).add_dependency(eval_app, app);
    b.build().expect("progressive app fixture is a valid graph")
}

/// Document plus requests that never block first paint, whatever their end
/// times: a High image, a Low script, a script-initiated VeryHigh stylesheet and
/// a stylesheet requested after the paint (262ms).
pub fn squoosh_graph() -> DependencyGraph {
    let mut b = GraphBuilder::new();
    let doc = b.add_node(timed_request("0", "https://squoosh.app/", ResourceType::Document, Priority::VeryHigh, InitiatorType::Other, 8_000, 0.0, 150.0));
    let parse = b.add_node(layout_node("1.1", 150.0, 12.0));
    let inline = b.add_node(script_eval_node("1.2", 162.0, 80.0, "https://squoosh.app/"));
    let logo = b.add_node(timed_request("1", "https://squoosh.app/logo.png", ResourceType::Image, Priority::High, InitiatorType::Parser, 4_000, 160.0, 240.0));
    let analytics = b.add_node(timed_request("2", "https://www.google-analytics.com/analytics.js", ResourceType::Script, Priority::Low, InitiatorType::Parser, 15_000, 160.0, 250.0));
    let injected = b.add_node(timed_request("3", "https://squoosh.app/injected.css", ResourceType::Stylesheet, Priority::VeryHigh, InitiatorType::Script, 2_000, 170.0, 230.0));
    let deferred = b.add_node(timed_request("4", "https://squoosh.app/deferred.css", ResourceType::Stylesheet, Priority::VeryHigh, InitiatorType::Parser, 2_000, 300.0, 400.0));
    b.add_dependency(parse, doc)
        .add_dependency(inline, parse)
        .add_dependency(logo, doc)
        .add_dependency(analytics, doc)
        .add_dependency(injected, inline)
        .add_dependency(deferred, inline);
    b.build().expect("squoosh fixture is a valid graph")
}

/// Schedules nodes back to back in topological order so the last one ends at
/// a configured time. Trivially honors the scheduling contract.
#[derive(Debug, Default)]
pub struct StubSimulator {
    default_ms: f64,
    by_node_count: Vec<(usize, f64)>,
    calls: AtomicUsize,
}

impl StubSimulator {
    pub fn new(default_ms: f64) -> Self {
        Self { default_ms, ..Self::default() }
    }

    pub fn with_time(mut self, node_count: usize, time_in_ms: f64) -> Self {
        self.by_node_count.push((node_count, time_in_ms));
        self
    }

    pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

impl Simulator for StubSimulator {
    fn simulate(&self, graph: &DependencyGraph) -> Result<SimulationResult, SimulatorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let total = self
            .by_node_count
            .iter()
            .find(|(count, _)| *count == graph.len())
            .map(|&(_, ms)| ms)
            .unwrap_or(self.default_ms);

        let order = topology::sort(graph)?;
        let n = order.len();
        let node_timings: NodeTimings = order
            .into_iter()
            .enumerate()
            .map(|(k, id)| {
                let start = total * k as f64 / n as f64;
                let end = if k + 1 == n { total } else { total * (k + 1) as f64 / n as f64 };
                (id, NodeTiming::new(start, end))
            })
            .collect();
        Ok(SimulationResult { time_in_ms: total, node_timings })
    }
}
