mod utils;
#[allow(unused)]
use utils::*;

use std::sync::Arc;
use std::time::Duration;

use wsload::{run_client, run_round};

#[tokio::test]
#[ntest::timeout(60000)]
async fn finite_round_counts_every_frame() {
    init();
    let addr = spawn_mock().await;

    let config = round_config(addr, "/finite/5/100", 3, Duration::from_secs(1));
    let report = run_round(config).await;

    assert_eq!(report.ok, 3);
    assert_eq!(report.fail, 0);
    assert_eq!(report.total_msgs, 15);
    assert_eq!(report.total_bytes, 1500);
    assert_eq!(report.total_mps, 15.0);
    assert!((report.total_mbps - 0.012).abs() < 1e-9);
    assert_eq!(report.avg_msgs_per_client, 5.0);
    assert!(report.sample_error.is_none());
    assert!(report.connect_p50_ms >= 0.0);
    assert!(report.connect_p95_ms >= report.connect_p50_ms);
}

#[tokio::test]
#[ntest::timeout(60000)]
async fn identical_rounds_agree() {
    init();
    let addr = spawn_mock().await;

    let config = round_config(addr, "/finite/4/25", 2, Duration::from_millis(750));
    let first = run_round(config.clone()).await;
    let second = run_round(config).await;

    assert_eq!(first.ok, second.ok);
    assert_eq!(first.fail, second.fail);
    assert_eq!(first.total_msgs, second.total_msgs);
    assert_eq!(first.total_bytes, second.total_bytes);
}

#[tokio::test]
#[ntest::timeout(60000)]
async fn oversized_frames_are_counted_in_full() {
    init();
    let addr = spawn_mock().await;

    // One 20 MiB frame, larger than common per-frame receive caps.
    let config = round_config(addr, "/finite/1/20971520", 1, Duration::from_secs(2));
    let outcome = run_client(Arc::new(config)).await;

    assert!(outcome.ok, "oversized frame failed: {:?}", outcome.error);
    assert_eq!(outcome.msgs, 1);
    assert_eq!(outcome.bytes, 20 * 1024 * 1024);
}

#[tokio::test]
#[ntest::timeout(60000)]
async fn refused_round_reports_every_failure() {
    init();

    // Bind and drop so the port is known to refuse connections.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = round_config(addr, "/", 4, Duration::from_secs(1));
    let report = run_round(config).await;

    assert_eq!(report.ok, 0);
    assert_eq!(report.fail, 4);
    assert_eq!(report.total_msgs, 0);
    assert_eq!(report.avg_msgs_per_client, 0.0);
    assert_eq!(report.connect_p50_ms, 0.0);
    assert_eq!(report.connect_p95_ms, 0.0);
    assert!(report.sample_error.is_some());
}

#[tokio::test]
#[ntest::timeout(60000)]
async fn silent_stream_is_a_clean_timeout() {
    init();
    let addr = spawn_mock().await;

    let config = round_config(addr, "/silent", 1, Duration::from_millis(500));
    let outcome = run_client(Arc::new(config)).await;

    assert!(outcome.ok, "deadline expiry is success: {:?}", outcome.error);
    assert_eq!(outcome.msgs, 0);
    assert_eq!(outcome.bytes, 0);
    assert!(outcome.run_s >= 0.4);
}

#[tokio::test]
#[ntest::timeout(60000)]
async fn hangup_preserves_partial_counts() {
    init();
    let addr = spawn_mock().await;

    let config = round_config(addr, "/hangup/3/50", 1, Duration::from_secs(5));
    let outcome = run_client(Arc::new(config)).await;

    assert!(!outcome.ok);
    assert_eq!(outcome.msgs, 3);
    assert_eq!(outcome.bytes, 150);
    assert_eq!(outcome.run_s, 0.0);

    let error = outcome.error.unwrap();
    assert!(error.contains("closed"), "unexpected error: {error}");
}

#[tokio::test]
#[ntest::timeout(60000)]
async fn stream_route_acks_and_pushes() {
    init();
    let addr = spawn_mock().await;

    let config = round_config(addr, "/stream", 2, Duration::from_millis(600));
    let report = run_round(config).await;

    assert_eq!(report.ok, 2);
    assert_eq!(report.fail, 0);
    // ack plus a steady push cadence; generous floor for scheduling jitter
    assert!(report.total_msgs >= 10, "got {}", report.total_msgs);
    assert!(report.total_bytes > 0);
}

#[tokio::test]
#[ignore]
#[ntest::timeout(30000)]
async fn unanswered_handshake_trips_the_connect_timeout() {
    init();

    // Accept TCP but never answer the upgrade request.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let config = round_config(addr, "/", 1, Duration::from_secs(1));
    let outcome = run_client(Arc::new(config)).await;

    assert!(!outcome.ok);
    assert_eq!(outcome.msgs, 0);
    assert_eq!(outcome.run_s, 0.0);
    assert!(outcome.connect_ms >= 9_000.0, "gave up early: {}", outcome.connect_ms);

    let error = outcome.error.unwrap();
    assert!(error.contains("connect timed out"), "unexpected error: {error}");
}

#[tokio::test]
#[ignore]
#[ntest::timeout(50000)]
async fn stalled_peer_trips_the_keepalive() {
    init();
    let addr = spawn_mock().await;

    // Deadline far beyond the first ping so the keepalive path decides.
    let config = round_config(addr, "/stall", 1, Duration::from_secs(55));
    let outcome = run_client(Arc::new(config)).await;

    assert!(!outcome.ok);
    assert_eq!(outcome.msgs, 0);
    assert_eq!(outcome.run_s, 0.0);
    // First ping after 20s of quiet, pong due 20s later.
    assert!(outcome.connect_ms >= 39_000.0, "gave up early: {}", outcome.connect_ms);

    let error = outcome.error.unwrap();
    assert!(error.contains("no pong"), "unexpected error: {error}");
}
