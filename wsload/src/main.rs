use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;
use url::Url;

use wsload::{ReportWriter, SweepConfig};

/// Load harness for a push-style WebSocket streaming service.
#[derive(Debug, Parser)]
#[command(name = "wsload", version, about)]
struct Args {
    /// WebSocket endpoint of the streaming service.
    #[arg(long, default_value = "ws://127.0.0.1:8080")]
    url: String,

    /// Path appended to the endpoint, for streams not served at the root.
    #[arg(long, default_value = "")]
    path: String,

    /// Instrument to subscribe to.
    #[arg(long, default_value = "CLX5")]
    symbol: String,

    /// Push cadence requested from the server, in milliseconds.
    #[arg(long, default_value_t = 50)]
    push_ms: u32,

    /// Receive window of each client.
    #[arg(long, default_value = "20s", value_parser = humantime::parse_duration)]
    duration: Duration,

    /// Window over which client launches are staggered.
    #[arg(long, default_value = "8s", value_parser = humantime::parse_duration)]
    ramp: Duration,

    /// Comma-separated client counts, one round each.
    #[arg(long, default_value = "10,50,100,1000")]
    clients: String,

    /// JSONL file the round reports are appended to.
    #[arg(long, default_value = "ws_load_results.jsonl")]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let endpoint = join_endpoint(&args.url, &args.path)?;
    let clients = parse_counts(&args.clients)?;

    let config = SweepConfig {
        endpoint: endpoint.clone(),
        symbol: args.symbol,
        push_ms: args.push_ms,
        duration: args.duration,
        ramp: args.ramp,
        clients,
    };

    let mut out = ReportWriter::create(&args.out)
        .with_context(|| format!("opening {}", args.out.display()))?;

    info!(endpoint = %endpoint, out = %args.out.display(), "ws load test starting");
    wsload::run_sweep(&config, &mut out).await?;
    Ok(())
}

/// Joins the base URL and an optional path into the final ws/wss endpoint.
fn join_endpoint(url: &str, path: &str) -> anyhow::Result<Url> {
    let joined = if path.is_empty() {
        url.to_string()
    } else {
        format!(
            "{}/{}",
            url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    };
    let endpoint =
        Url::parse(&joined).with_context(|| format!("invalid endpoint {joined:?}"))?;
    match endpoint.scheme() {
        "ws" | "wss" => Ok(endpoint),
        other => bail!("endpoint scheme must be ws or wss, got {other:?}"),
    }
}

/// Parses the comma-separated client counts; blank entries are skipped.
fn parse_counts(raw: &str) -> anyhow::Result<Vec<usize>> {
    let counts = raw
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .parse::<usize>()
                .with_context(|| format!("bad client count {entry:?}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    if counts.is_empty() {
        bail!("no client counts given");
    }
    Ok(counts)
}
