use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::sleep;
#[allow(unused)]
use tracing::{debug, error, info, instrument, trace, warn};

use wsload_core::{ClientOutcome, RoundConfig, RoundReport};

use crate::client::run_client;

/// Runs one round at a fixed client count.
///
/// Spawns every client with its ramp delay, waits for all of them (no
/// outcome is ever dropped), then aggregates. Client failures arrive as
/// data in the outcomes; a panicked task is folded into a failed outcome
/// rather than aborting the round.
#[instrument(name = "round", skip_all, fields(clients = config.clients))]
pub async fn run_round(config: RoundConfig) -> RoundReport {
    let config = Arc::new(config);
    let mut tasks = JoinSet::new();

    for i in 0..config.clients {
        let config = config.clone();
        let delay = ramp_delay(i, config.clients, config.ramp);
        tasks.spawn(async move {
            if !delay.is_zero() {
                sleep(delay).await;
            }
            run_client(config).await
        });
    }

    let mut outcomes = Vec::with_capacity(config.clients);
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) => {
                error!("client task did not finish: {err}");
                outcomes.push(ClientOutcome::failed(format!(
                    "client task did not finish: {err}"
                )));
            }
        }
    }

    RoundReport::aggregate(&config, &outcomes)
}

/// Launch delay for client `i` of `n`: a linear spread across the ramp
/// window. The first client starts immediately, the last at the full ramp.
fn ramp_delay(i: usize, n: usize, ramp: Duration) -> Duration {
    ramp.mul_f64(i as f64 / n.saturating_sub(1).max(1) as f64)
}
