use serde::{Deserialize, Serialize};

/// Index of a node inside one graph's arena. Ids are only meaningful for the
/// graph that issued them; a clone assigns fresh ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Document,
    Stylesheet,
    Image,
    Media,
    Font,
    Script,
    Xhr,
    Fetch,
    Other,
}

/// Chrome's network request priority buckets, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InitiatorType {
    Parser,
    Script,
    Preload,
    Other,
}

/// Descriptor of a network request as recorded in the trace.
/// Times are in milliseconds, as the network log reports them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkRequest {
    pub request_id: String,
    pub url: String,
    pub resource_type: ResourceType,
    pub priority: Priority,
    pub initiator_type: InitiatorType,
    /// Bytes on the wire, headers included.
    pub transfer_size: u64,
    pub renderer_start_time: f64,
    pub network_end_time: f64,
}

impl NetworkRequest {
    /// A request the browser will not paint past: the page's own document,
    /// any `VeryHigh` request, and parser-blocking `High` scripts.
    pub fn has_render_blocking_priority(&self) -> bool {
        let is_script = self.resource_type == ResourceType::Script;
        let is_document = self.resource_type == ResourceType::Document;
        match self.priority {
            Priority::VeryHigh => true,
            Priority::High => is_script || is_document,
            _ => false,
        }
    }

    pub fn is_low_priority_image(&self) -> bool {
        self.resource_type == ResourceType::Image
            && matches!(self.priority, Priority::Low | Priority::VeryLow)
    }
}

/// A main-thread task. Times are trace timestamps in microseconds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CpuTask {
    pub start_time: f64,
    pub end_time: f64,
    /// URLs of the scripts evaluated (or compiled) inside this task.
    pub evaluated_script_urls: Vec<String>,
    pub performed_layout: bool,
}

impl CpuTask {
    pub fn duration(&self) -> f64 { self.end_time - self.start_time }

    pub fn evaluates_any<'a>(&self, urls: impl IntoIterator<Item = &'a str>) -> bool {
        urls.into_iter().any(|url| self.evaluated_script_urls.iter().any(|u| u == url))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Cpu(CpuTask),
    Network(NetworkRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Cpu,
    Network,
}

/// A unit of page-load work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Stable identity that survives cloning (request id, or `tid.ts` for tasks).
    pub key: String,
    pub kind: NodeKind,
}

impl Node {
    pub fn cpu(key: impl Into<String>, task: CpuTask) -> Self {
        Self { key: key.into(), kind: NodeKind::Cpu(task) }
    }

    pub fn network(request: NetworkRequest) -> Self {
        Self { key: request.request_id.clone(), kind: NodeKind::Network(request) }
    }

    pub fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Cpu(_) => NodeType::Cpu,
            NodeKind::Network(_) => NodeType::Network,
        }
    }

    pub fn as_cpu(&self) -> Option<&CpuTask> {
        match &self.kind {
            NodeKind::Cpu(task) => Some(task),
            NodeKind::Network(_) => None,
        }
    }

    pub fn as_network(&self) -> Option<&NetworkRequest> {
        match &self.kind {
            NodeKind::Network(request) => Some(request),
            NodeKind::Cpu(_) => None,
        }
    }

    /// Observed start, in microseconds.
    pub fn start_time(&self) -> f64 {
        match &self.kind {
            NodeKind::Cpu(task) => task.start_time,
            NodeKind::Network(request) => request.renderer_start_time * 1000.0,
        }
    }

    /// Observed end, in microseconds.
    pub fn end_time(&self) -> f64 {
        match &self.kind {
            NodeKind::Cpu(task) => task.end_time,
            NodeKind::Network(request) => request.network_end_time * 1000.0,
        }
    }
}
