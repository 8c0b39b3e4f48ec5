use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::{percentile, ClientOutcome, RoundConfig};

/// Aggregated result of one round, serialized as one JSONL record.
///
/// Field order is the record's wire order. `total_bytes` feeds the bitrate
/// and is kept for programmatic consumers, but stays out of the serialized
/// record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundReport {
    /// Wall-clock seconds since the Unix epoch, stamped at aggregation.
    pub ts_wall_s: f64,
    pub clients: usize,
    pub ok: usize,
    pub fail: usize,
    pub duration_s: f64,
    pub push_ms: u32,
    pub total_msgs: u64,
    #[serde(skip)]
    pub total_bytes: u64,
    pub total_mps: f64,
    pub total_mbps: f64,
    pub avg_msgs_per_client: f64,
    pub connect_p50_ms: f64,
    pub connect_p95_ms: f64,
    /// Error of the first failed outcome, kept as a single representative.
    pub sample_error: Option<String>,
}

impl RoundReport {
    /// Reduces the outcomes of one round into a report.
    ///
    /// Totals and connect percentiles cover successful outcomes only. Rates
    /// divide by the configured round duration and are exactly zero when
    /// that duration is zero. All-failed input aggregates cleanly to zeroed
    /// metrics plus one representative error.
    pub fn aggregate(config: &RoundConfig, outcomes: &[ClientOutcome]) -> Self {
        let ok = outcomes.iter().filter(|o| o.ok).count();
        let fail = outcomes.len() - ok;

        let total_msgs: u64 = outcomes.iter().filter(|o| o.ok).map(|o| o.msgs).sum();
        let total_bytes: u64 = outcomes.iter().filter(|o| o.ok).map(|o| o.bytes).sum();

        let connect_ms: Vec<f64> = outcomes
            .iter()
            .filter(|o| o.ok)
            .map(|o| o.connect_ms)
            .collect();

        let duration_s = config.duration.as_secs_f64();
        let (total_mps, total_mbps) = if duration_s > 0.0 {
            (
                total_msgs as f64 / duration_s,
                total_bytes as f64 * 8.0 / (duration_s * 1e6),
            )
        } else {
            (0.0, 0.0)
        };

        let avg_msgs_per_client = if ok > 0 {
            total_msgs as f64 / ok as f64
        } else {
            0.0
        };

        let sample_error = outcomes.iter().find(|o| !o.ok).and_then(|o| o.error.clone());

        Self {
            ts_wall_s: unix_now_s(),
            clients: config.clients,
            ok,
            fail,
            duration_s,
            push_ms: config.push_ms,
            total_msgs,
            total_bytes,
            total_mps,
            total_mbps,
            avg_msgs_per_client,
            connect_p50_ms: percentile(&connect_ms, 50.0),
            connect_p95_ms: percentile(&connect_ms, 95.0),
            sample_error,
        }
    }
}

fn unix_now_s() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs_f64()
}
