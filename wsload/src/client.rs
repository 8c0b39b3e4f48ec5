use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::time::{interval_at, sleep_until, timeout, Instant, MissedTickBehavior};
use tokio_tungstenite::{
    connect_async_with_config,
    tungstenite::{protocol::WebSocketConfig, Message},
};
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};

use wsload_core::{
    ClientOutcome, RoundConfig, CLOSE_GRACE, CONNECT_TIMEOUT, PING_INTERVAL, PING_TIMEOUT,
};

use crate::error::SessionError;

#[derive(Default)]
struct Counters {
    msgs: u64,
    bytes: u64,
}

struct SessionTiming {
    connect_ms: f64,
    run_s: f64,
}

/// Runs one subscriber session end to end and reports its outcome.
///
/// Never returns an error: every failure is absorbed into a failed outcome,
/// with the frame counters preserved up to the point of failure, so sibling
/// clients and the round itself are unaffected.
pub async fn run_client(config: Arc<RoundConfig>) -> ClientOutcome {
    let started = Instant::now();
    let mut counters = Counters::default();

    let outcome = match run_session(&config, started, &mut counters).await {
        Ok(timing) => ClientOutcome {
            ok: true,
            msgs: counters.msgs,
            bytes: counters.bytes,
            error: None,
            connect_ms: timing.connect_ms,
            run_s: timing.run_s,
        },
        Err(err) => {
            debug!("session failed: {err}");
            ClientOutcome {
                ok: false,
                msgs: counters.msgs,
                bytes: counters.bytes,
                error: Some(err.to_string()),
                connect_ms: started.elapsed().as_secs_f64() * 1e3,
                run_s: 0.0,
            }
        }
    };

    #[cfg(feature = "metrics")]
    record_outcome(&outcome);

    outcome
}

/// One session: bounded connect, subscribe frame, then a receive loop that
/// ends at this client's own deadline (connect instant plus the round
/// duration). Reaching the deadline is the success path; everything else
/// that ends the loop is an error.
async fn run_session(
    config: &RoundConfig,
    started: Instant,
    counters: &mut Counters,
) -> Result<SessionTiming, SessionError> {
    // No inbound size caps; a snapshot frame may be arbitrarily large.
    let ws_config = WebSocketConfig {
        max_message_size: None,
        max_frame_size: None,
        ..Default::default()
    };
    let connect = connect_async_with_config(config.endpoint.clone(), Some(ws_config), false);
    let connected = timeout(CONNECT_TIMEOUT, connect)
        .await
        .map_err(|_| SessionError::ConnectTimeout(CONNECT_TIMEOUT))?;
    let (ws, _) = connected.map_err(SessionError::Connect)?;
    let connect_ms = started.elapsed().as_secs_f64() * 1e3;

    let (mut tx, mut rx) = ws.split();

    let subscribe = serde_json::json!({
        "type": "subscribe",
        "symbol": config.symbol,
        "push_ms": config.push_ms,
    });
    tx.send(Message::Text(subscribe.to_string()))
        .await
        .map_err(SessionError::Transport)?;

    let run_started = Instant::now();
    let deadline = run_started + config.duration;

    let mut keepalive = interval_at(run_started + PING_INTERVAL, PING_INTERVAL);
    keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut pong_due: Option<Instant> = None;

    loop {
        tokio::select! {
            // Deadline first so a busy stream cannot delay the exit.
            biased;

            _ = sleep_until(deadline) => break,

            _ = keepalive.tick() => {
                tx.send(Message::Ping(Vec::new()))
                    .await
                    .map_err(SessionError::Transport)?;
                pong_due.get_or_insert(Instant::now() + PING_TIMEOUT);
            }

            _ = sleep_opt(pong_due) => return Err(SessionError::KeepAlive(PING_TIMEOUT)),

            inbound = rx.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    counters.msgs += 1;
                    counters.bytes += text.len() as u64;
                }
                Some(Ok(Message::Binary(data))) => {
                    counters.msgs += 1;
                    counters.bytes += data.len() as u64;
                }
                Some(Ok(Message::Ping(payload))) => {
                    tx.send(Message::Pong(payload))
                        .await
                        .map_err(SessionError::Transport)?;
                }
                Some(Ok(Message::Pong(_))) => pong_due = None,
                Some(Ok(Message::Close(_))) | None => return Err(SessionError::ServerClosed),
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(SessionError::Transport(err)),
            },
        }
    }
    let run_s = run_started.elapsed().as_secs_f64();

    // Polite close; the deadline result stands even if the peer is gone.
    let _ = timeout(CLOSE_GRACE, tx.close()).await;

    Ok(SessionTiming { connect_ms, run_s })
}

async fn sleep_opt(due: Option<Instant>) {
    match due {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

#[cfg(feature = "metrics")]
fn record_outcome(outcome: &ClientOutcome) {
    if outcome.ok {
        metrics::counter!("wsload_clients_ok").increment(1);
    } else {
        metrics::counter!("wsload_clients_failed").increment(1);
    }
    metrics::counter!("wsload_frames_total").increment(outcome.msgs);
    metrics::counter!("wsload_bytes_total").increment(outcome.bytes);
    metrics::histogram!("wsload_connect_latency_ms").record(outcome.connect_ms);
}
