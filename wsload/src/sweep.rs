#[allow(unused)]
use tracing::{debug, error, info, trace, warn};

use wsload_core::{RoundReport, SweepConfig};

use crate::output::{OutputError, ReportWriter};
use crate::round::run_round;

/// Runs one round per configured client count, strictly in order.
///
/// Round `k + 1` starts only after round `k` has fully joined and its
/// report has been appended and flushed, so the client-count dimension is
/// never conflated and a killed sweep still leaves complete records behind.
pub async fn run_sweep(
    config: &SweepConfig,
    out: &mut ReportWriter,
) -> Result<Vec<RoundReport>, OutputError> {
    let mut reports = Vec::with_capacity(config.clients.len());

    for &clients in &config.clients {
        debug!(clients, "starting round");
        let report = run_round(config.round(clients)).await;
        out.append(&report)?;

        info!(
            clients = report.clients,
            ok = report.ok,
            fail = report.fail,
            "total_mps={:.1} throughput={:.2} Mbps connect_p50={:.1}ms p95={:.1}ms",
            report.total_mps,
            report.total_mbps,
            report.connect_p50_ms,
            report.connect_p95_ms,
        );

        reports.push(report);
    }

    Ok(reports)
}
