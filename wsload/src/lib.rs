//! A load harness for push-style WebSocket streaming services.
//!
//! `wsload` opens swarms of subscriber sessions against an endpoint, each
//! sending one subscribe frame and then counting every pushed frame until
//! its own deadline. Rounds run at a fixed client count with launches
//! staggered across a ramp window; a sweep runs several counts back to back
//! and appends one JSONL report per round.
//!
//! ```no_run
//! use std::path::Path;
//! use std::time::Duration;
//! use wsload::{ReportWriter, SweepConfig};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = SweepConfig {
//!     endpoint: url::Url::parse("ws://127.0.0.1:8080")?,
//!     symbol: "CLX5".to_string(),
//!     push_ms: 50,
//!     duration: Duration::from_secs(20),
//!     ramp: Duration::from_secs(8),
//!     clients: vec![10, 50, 100],
//! };
//! let mut out = ReportWriter::create(Path::new("ws_load_results.jsonl"))?;
//! let reports = wsload::run_sweep(&config, &mut out).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod output;
pub mod round;
pub mod sweep;

mod error;

pub use client::run_client;
pub use output::{OutputError, ReportWriter};
pub use round::run_round;
pub use sweep::run_sweep;

pub use wsload_core::{ClientOutcome, RoundConfig, RoundReport, SweepConfig};
