//! Collector for accumulating diagnostics while elaborating a definition.
//!
//! Elaboration keeps going after the first problem so one run reports every
//! broken state. Errors make the run fail; warnings (dangling transitions)
//! are handed back alongside the elaborated definition.

use crate::error::{Diagnostic, ParseError};

/// Accumulates diagnostics emitted during elaboration.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic; any error-severity diagnostic fails the run.
    pub(crate) fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Finishes collection.
    ///
    /// Returns every diagnostic as a [`ParseError`] when an error was emitted,
    /// otherwise the warnings in emission order.
    pub(crate) fn finish(self) -> Result<Vec<Diagnostic>, ParseError> {
        if self.has_errors {
            Err(ParseError::new(self.diagnostics))
        } else {
            Ok(self.diagnostics)
        }
    }
}
