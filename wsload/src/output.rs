use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use wsload_core::RoundReport;

/// Failures while persisting round reports.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("report io error: {0}")]
    Io(#[from] io::Error),

    #[error("report serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Append-mode JSONL sink for round reports, opened once per sweep.
///
/// Every record is flushed as soon as it is written, so a partial sweep is
/// on disk and tailable while later rounds run.
pub struct ReportWriter {
    writer: BufWriter<File>,
}

impl ReportWriter {
    /// Opens `path` for appending, creating parent directories on demand.
    pub fn create(path: &Path) -> Result<Self, OutputError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Appends one report as a single JSON line and flushes it.
    pub fn append(&mut self, report: &RoundReport) -> Result<(), OutputError> {
        serde_json::to_writer(&mut self.writer, report)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
