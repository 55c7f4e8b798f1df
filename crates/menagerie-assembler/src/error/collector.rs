//! Diagnostic sinks.
//!
//! The assembler never stops at the first problem it finds; it reports each
//! one to a [`DiagnosticSink`] and keeps going. [`DiagnosticCollector`] is the
//! in-memory implementation used by the library facade and the tests.

use log::trace;

use crate::error::Diagnostic;

/// Which non-error diagnostics a sink drops.
///
/// Errors are never filtered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticFilter {
    pub no_info: bool,
    pub no_warning: bool,
    pub no_experiment: bool,
}

impl DiagnosticFilter {
    /// Whether `diagnostic` passes the filter.
    pub fn admits(&self, diagnostic: &Diagnostic) -> bool {
        let severity = diagnostic.severity();
        if severity.is_error() {
            return true;
        }
        if self.no_experiment && diagnostic.is_on_experiment() {
            return false;
        }
        !((self.no_info && severity.is_info()) || (self.no_warning && severity.is_warning()))
    }
}

/// Receiver of the diagnostics raised while assembling a model.
pub trait DiagnosticSink {
    /// Report a diagnostic.
    fn emit(&mut self, diagnostic: Diagnostic);

    /// Replace the filter applied to subsequent diagnostics.
    fn set_filter(&mut self, filter: DiagnosticFilter);
}

/// A sink accumulating diagnostics in memory.
///
/// # Example
///
/// ```
/// # use menagerie_assembler::error::{Diagnostic, DiagnosticCollector, DiagnosticSink, ErrorCode};
///
/// let mut collector = DiagnosticCollector::new();
/// collector.emit(Diagnostic::error("species `wolf` is declared twice").with_code(ErrorCode::E100));
/// collector.emit(Diagnostic::warning("unused species `cell`"));
///
/// assert!(collector.has_errors());
/// assert_eq!(collector.diagnostics().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    filter: DiagnosticFilter,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Diagnostics kept so far, in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Whether an error was emitted.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity().is_error())
            .count()
    }

    pub fn filter(&self) -> DiagnosticFilter {
        self.filter
    }

    /// Consume the collector, returning its diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for DiagnosticCollector {
    /// The diagnostic is dropped if the current filter rejects it; an error
    /// marks the collector as having errors.
    fn emit(&mut self, diagnostic: Diagnostic) {
        if !self.filter.admits(&diagnostic) {
            trace!(diagnostic:% = diagnostic; "Diagnostic filtered out");
            return;
        }
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    fn set_filter(&mut self, filter: DiagnosticFilter) {
        self.filter = filter;
    }
}
