//! Ordered accumulation of session diagnostics.

use crate::{Diagnostic, Severity};

/// Collects diagnostics in the order a session encounters them.
///
/// Order is meaningful: entries appear in document traversal order, so two
/// loads of the same input report identically. Each reported diagnostic is
/// also mirrored to `tracing` at its severity.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    entries: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        DiagnosticSink::default()
    }

    /// Record a diagnostic.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => {
                tracing::warn!(code = diagnostic.code.as_str(), "{}", diagnostic.message);
            }
            Severity::Error => {
                tracing::error!(code = diagnostic.code.as_str(), "{}", diagnostic.message);
            }
        }
        self.entries.push(diagnostic);
    }

    /// Move every entry out of `other`, preserving its order after ours.
    pub fn absorb(&mut self, mut other: DiagnosticSink) {
        self.entries.append(&mut other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(Diagnostic::is_error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| !d.is_error())
    }

    /// Drain all entries, leaving the sink empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.entries)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
