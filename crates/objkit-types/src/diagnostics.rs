use std::fmt;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Code emitted when an unset host value is coerced to the empty marker.
pub const UNSET_NORMALIZED: &str = "unset-normalized";

/// Code emitted when a container is built without going through a factory.
pub const DIRECT_CONSTRUCTION: &str = "direct-construction";

/// How loudly a diagnostic should be reported. Neither level is fatal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

/// A non-fatal report about ergonomic misuse.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Stable machine-readable code (e.g. [`UNSET_NORMALIZED`]).
    pub code: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Destination for misuse diagnostics.
///
/// Implementations must never panic; diagnostics are advisory and the
/// operation that produced them always proceeds.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `tracing` subscriber installed by the host.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => {
                tracing::warn!(code = %diagnostic.code, "{}", diagnostic.message)
            }
            Severity::Error => {
                tracing::error!(code = %diagnostic.code, "{}", diagnostic.message)
            }
        }
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _diagnostic: Diagnostic) {}
}

/// In-memory sink that keeps every diagnostic for later inspection.
#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far, oldest first.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.entries.lock().expect("lock poisoned").clone()
    }

    /// Number of recorded diagnostics carrying `code`.
    pub fn count(&self, code: &str) -> usize {
        self.entries
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|d| d.code == code)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().expect("lock poisoned").is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().expect("lock poisoned").clear();
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.entries.lock().expect("lock poisoned").push(diagnostic);
    }
}
