use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::Path;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures_util::{SinkExt, Stream, StreamExt};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

/// Deterministic WebSocket push server for exercising subscriber clients.
///
/// Routes that push frames wait for the `{"type":"subscribe",...}` control
/// frame before sending anything:
/// - `/` and `/stream`: ack the subscription, then push snapshot frames at
///   the requested cadence until the client goes away.
/// - `/finite/:frames/:frame_bytes`: push an exact number of fixed-size
///   frames, then idle so clients exit on their own deadline.
/// - `/silent`: accept the session and push nothing.
/// - `/hangup/:frames/:frame_bytes`: push the frames, then close.
/// - `/stall`: complete the upgrade, then never poll the session, leaving
///   pings unanswered.
pub fn router() -> Router {
    Router::new()
        .route("/", get(stream))
        .route("/stream", get(stream))
        .route("/finite/:frames/:frame_bytes", get(finite))
        .route("/silent", get(silent))
        .route("/hangup/:frames/:frame_bytes", get(hangup))
        .route("/stall", get(stall))
}

pub async fn run(addr: SocketAddr) {
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, router()).await.unwrap();
}

#[derive(Debug, Deserialize)]
struct SubscribeReq {
    #[serde(rename = "type")]
    kind: String,
    symbol: String,
    push_ms: u64,
}

async fn stream(ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(handle_stream)
}

async fn finite(
    ws: WebSocketUpgrade,
    Path((frames, frame_bytes)): Path<(u64, usize)>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_finite(socket, frames, frame_bytes))
}

async fn silent(ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(handle_silent)
}

async fn hangup(
    ws: WebSocketUpgrade,
    Path((frames, frame_bytes)): Path<(u64, usize)>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_hangup(socket, frames, frame_bytes))
}

async fn stall(ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(handle_stall)
}

async fn handle_stream(socket: WebSocket) {
    let (mut tx, mut rx) = socket.split();
    let Some(req) = wait_subscribe(&mut rx).await else {
        return;
    };

    let ack = serde_json::json!({
        "type": "ack",
        "symbol": req.symbol,
        "push_ms": req.push_ms,
    });
    if tx.send(Message::Text(ack.to_string())).await.is_err() {
        return;
    }

    let mut push = interval(Duration::from_millis(req.push_ms.max(1)));
    push.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // NOTE: First tick completes instantly.
    push.tick().await;

    let mut seq: u64 = 0;
    loop {
        tokio::select! {
            _ = push.tick() => {
                seq += 1;
                let frame = snapshot_frame(&req.symbol, seq);
                if tx.send(Message::Text(frame)).await.is_err() {
                    return;
                }
            }
            inbound = rx.next() => match inbound {
                Some(Ok(_)) => {}
                Some(Err(_)) | None => return,
            },
        }
    }
}

async fn handle_finite(mut socket: WebSocket, frames: u64, frame_bytes: usize) {
    if wait_subscribe(&mut socket).await.is_none() {
        return;
    }

    let payload = "x".repeat(frame_bytes);
    for _ in 0..frames {
        if socket.send(Message::Text(payload.clone())).await.is_err() {
            return;
        }
    }

    // Hold the session open; clients leave at their own deadline.
    while let Some(Ok(_)) = socket.recv().await {}
}

async fn handle_silent(mut socket: WebSocket) {
    while let Some(Ok(_)) = socket.recv().await {}
}

async fn handle_hangup(mut socket: WebSocket, frames: u64, frame_bytes: usize) {
    if wait_subscribe(&mut socket).await.is_none() {
        return;
    }

    let payload = "x".repeat(frame_bytes);
    for _ in 0..frames {
        if socket.send(Message::Text(payload.clone())).await.is_err() {
            return;
        }
    }

    let _ = socket.send(Message::Close(None)).await;
}

async fn handle_stall(socket: WebSocket) {
    // Hold the session open without polling it; pings go unanswered.
    let _socket = socket;
    std::future::pending().await
}

async fn wait_subscribe<S>(socket: &mut S) -> Option<SubscribeReq>
where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    while let Some(Ok(msg)) = socket.next().await {
        if let Message::Text(text) = msg {
            match serde_json::from_str::<SubscribeReq>(&text) {
                Ok(req) if req.kind == "subscribe" => return Some(req),
                Ok(req) => debug!("ignoring control frame {:?}", req.kind),
                Err(err) => debug!("unparseable control frame: {err}"),
            }
        }
    }
    None
}

fn snapshot_frame(symbol: &str, seq: u64) -> String {
    serde_json::json!({
        "type": "snapshot",
        "symbol": symbol,
        "seq": seq,
        "bids": [[6450.25, 12], [6450.00, 7], [6449.75, 3]],
        "asks": [[6450.50, 9], [6450.75, 11], [6451.00, 2]],
    })
    .to_string()
}
