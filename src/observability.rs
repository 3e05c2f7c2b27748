//! Observer hooks for conversion outcomes.
//!
//! Structured logging always goes through `tracing`; observers are an additional, optional way
//! for callers to record stage progress, results and failures (tests, event logs, alerting).

use std::error::Error as StdError;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::convert::ConvertReport;
use crate::error::ConvertError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConversionSeverity {
    /// Conversion failed on the data or configuration.
    Error,
    /// Critical error (I/O or other infrastructure failures).
    Critical,
}

/// Pipeline stage that just completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStage {
    Loaded,
    Renamed,
    Tagged,
    Indexed,
    Limited,
    Written,
}

/// Context about a conversion attempt.
#[derive(Debug, Clone)]
pub struct ConversionContext {
    /// Parquet input path.
    pub input: PathBuf,
    /// CSV output path.
    pub output: PathBuf,
}

/// Table shape after a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageStats {
    pub rows: usize,
    pub columns: usize,
}

/// Observer interface for conversion outcomes.
pub trait ConversionObserver: Send + Sync {
    /// Called after each completed pipeline stage.
    fn on_stage(&self, _ctx: &ConversionContext, _stage: ConversionStage, _stats: StageStats) {}

    /// Called when the conversion succeeds.
    fn on_success(&self, _ctx: &ConversionContext, _report: &ConvertReport) {}

    /// Called when the conversion fails.
    fn on_failure(&self, _ctx: &ConversionContext, _severity: ConversionSeverity, _error: &ConvertError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConvertError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Classify a conversion error for observers and alert thresholds.
pub fn severity_for_error(e: &ConvertError) -> ConversionSeverity {
    match e {
        ConvertError::InputUnavailable { .. }
        | ConvertError::OutputUnwritable { .. }
        | ConvertError::Io(_) => ConversionSeverity::Critical,
        ConvertError::Parquet(err) => {
            if error_chain_contains_io(err) {
                ConversionSeverity::Critical
            } else {
                ConversionSeverity::Error
            }
        }
        ConvertError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => ConversionSeverity::Critical,
            _ => ConversionSeverity::Error,
        },
        ConvertError::SchemaMismatch { .. }
        | ConvertError::Config { .. }
        | ConvertError::ConfigFormat(_) => ConversionSeverity::Error,
    }
}

fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ConversionObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn ConversionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ConversionObserver for CompositeObserver {
    fn on_stage(&self, ctx: &ConversionContext, stage: ConversionStage, stats: StageStats) {
        for o in &self.observers {
            o.on_stage(ctx, stage, stats);
        }
    }

    fn on_success(&self, ctx: &ConversionContext, report: &ConvertReport) {
        for o in &self.observers {
            o.on_success(ctx, report);
        }
    }

    fn on_failure(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConvertError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConvertError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Appends conversion events to a local log file, one line per event.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{} {line}", Utc::now().to_rfc3339());
        }
    }
}

impl ConversionObserver for FileObserver {
    fn on_stage(&self, ctx: &ConversionContext, stage: ConversionStage, stats: StageStats) {
        self.append_line(&format!(
            "stage={stage:?} input={} rows={} columns={}",
            ctx.input.display(),
            stats.rows,
            stats.columns
        ));
    }

    fn on_success(&self, _ctx: &ConversionContext, report: &ConvertReport) {
        let body = serde_json::to_string(report).unwrap_or_else(|e| format!("\"{e}\""));
        self.append_line(&format!("ok report={body}"));
    }

    fn on_failure(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConvertError) {
        self.append_line(&format!(
            "fail severity={severity:?} input={} output={} err={error}",
            ctx.input.display(),
            ctx.output.display()
        ));
    }

    fn on_alert(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConvertError) {
        self.append_line(&format!(
            "ALERT severity={severity:?} input={} output={} err={error}",
            ctx.input.display(),
            ctx.output.display()
        ));
    }
}
