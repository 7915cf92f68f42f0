//! Diagnostic sink.
//!
//! Validators, the executor and the strategies never reach for a global
//! logger; they are handed an `Arc<dyn DiagnosticSink>`. Production code uses
//! [`TracingSink`], tests use [`MemorySink`] to assert on what was reported.

use parking_lot::Mutex;
use std::fmt;

/// Severity of a diagnostic record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One recorded event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    /// Component that emitted the record (e.g. `validate`, `twap`).
    pub component: &'static str,
    pub message: String,
}

/// Destination for diagnostic records.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, level: DiagnosticLevel, component: &'static str, message: &str);

    fn info(&self, component: &'static str, message: &str) {
        self.record(DiagnosticLevel::Info, component, message);
    }

    fn warn(&self, component: &'static str, message: &str) {
        self.record(DiagnosticLevel::Warning, component, message);
    }

    fn error(&self, component: &'static str, message: &str) {
        self.record(DiagnosticLevel::Error, component, message);
    }
}

/// Forwards records to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, level: DiagnosticLevel, component: &'static str, message: &str) {
        match level {
            DiagnosticLevel::Info => tracing::info!(component, "{message}"),
            DiagnosticLevel::Warning => tracing::warn!(component, "{message}"),
            DiagnosticLevel::Error => tracing::error!(component, "{message}"),
        }
    }
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records so far.
    pub fn records(&self) -> Vec<Diagnostic> {
        self.records.lock().clone()
    }

    /// Records at exactly `level`.
    pub fn at_level(&self, level: DiagnosticLevel) -> Vec<Diagnostic> {
        self.records
            .lock()
            .iter()
            .filter(|d| d.level == level)
            .cloned()
            .collect()
    }

    /// True if any record at `level` contains `needle`.
    pub fn contains(&self, level: DiagnosticLevel, needle: &str) -> bool {
        self.records
            .lock()
            .iter()
            .any(|d| d.level == level && d.message.contains(needle))
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, level: DiagnosticLevel, component: &'static str, message: &str) {
        self.records.lock().push(Diagnostic {
            level,
            component,
            message: message.to_string(),
        });
    }
}
