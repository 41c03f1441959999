//! Per-origin connection accounting for the simulator.
use std::collections::BTreeMap;
use url::Url;

#[derive(Debug, Clone, Default)]
struct OriginState {
    active: usize,
    /// Connections that finished a request and can be reused without a handshake.
    idle_warm: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub warm: bool,
}

#[derive(Debug, Clone)]
pub struct ConnectionPool {
    per_origin_limit: usize,
    global_limit: usize,
    active_total: usize,
    origins: BTreeMap<String, OriginState>,
}

impl ConnectionPool {
    pub fn new(per_origin_limit: usize, global_limit: usize) -> Self {
        Self { per_origin_limit, global_limit, active_total: 0, origins: BTreeMap::new() }
    }

    pub fn active_total(&self) -> usize { self.active_total }

    /// Claims a connection to `origin`, preferring a warm one. `None` when
    /// either the origin or the global limit is saturated.
    pub fn acquire(&mut self, origin: &str) -> Option<Connection> {
        if self.active_total >= self.global_limit {
            return None;
        }
        let state = self.origins.entry(origin.to_string()).or_default();
        if state.active >= self.per_origin_limit {
            return None;
        }

        state.active += 1;
        self.active_total += 1;
        let warm = state.idle_warm > 0;
        if warm {
            state.idle_warm -= 1;
        }
        Some(Connection { warm })
    }

    pub fn release(&mut self, origin: &str) {
        if let Some(state) = self.origins.get_mut(origin) {
            if state.active > 0 {
                state.active -= 1;
                state.idle_warm += 1;
                self.active_total -= 1;
            }
        }
    }
}

/// Connection key and whether the handshake includes TLS.
/// Unparsable URLs get a pool of their own.
pub fn origin_of(raw: &str) -> (String, bool) {
    match Url::parse(raw) {
        Ok(url) if url.has_host() => {
            let secure = matches!(url.scheme(), "https" | "wss");
            (url.origin().ascii_serialization(), secure)
        }
        _ => (raw.to_string(), false),
    }
}
