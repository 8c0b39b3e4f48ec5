use std::time::Duration;
use url::Url;

/// Immutable parameters for a single round at a fixed client count.
#[derive(Debug, Clone)]
pub struct RoundConfig {
    /// Fully-joined ws/wss endpoint the clients connect to.
    pub endpoint: Url,
    /// Instrument requested in the subscribe frame.
    pub symbol: String,
    /// Requested server push cadence, forwarded verbatim.
    pub push_ms: u32,
    /// Length of each client's receive window.
    pub duration: Duration,
    /// Window over which client launches are linearly staggered.
    pub ramp: Duration,
    /// Number of concurrent subscriber sessions.
    pub clients: usize,
}

/// Parameters for a whole sweep over several client counts.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub endpoint: Url,
    pub symbol: String,
    pub push_ms: u32,
    pub duration: Duration,
    pub ramp: Duration,
    /// Client counts, one round each, run in order.
    pub clients: Vec<usize>,
}

impl SweepConfig {
    /// Round parameters for one entry of the sweep.
    pub fn round(&self, clients: usize) -> RoundConfig {
        RoundConfig {
            endpoint: self.endpoint.clone(),
            symbol: self.symbol.clone(),
            push_ms: self.push_ms,
            duration: self.duration,
            ramp: self.ramp,
            clients,
        }
    }
}
