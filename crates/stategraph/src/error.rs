//! Error types for Stategraph operations.
//!
//! This module provides the main error type [`StategraphError`] returned by
//! the strict entry points of [`crate::GraphBuilder`]. The fail-soft entry
//! points never surface it.

use std::io;

use thiserror::Error;

use stategraph_parser::ParseError;

/// The main error type for Stategraph operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the definition text next to the diagnostics (when
/// the input was text) so callers can render source snippets.
#[derive(Debug, Error)]
pub enum StategraphError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("no definition was provided")]
    MissingInput,

    #[error("{err}")]
    Parse { err: ParseError, src: Option<String> },

    #[error("Export error: {0}")]
    Export(#[from] serde_json::Error),
}

impl StategraphError {
    /// Create a new `Parse` error with the associated source text, if any.
    pub fn new_parse_error(err: ParseError, src: Option<String>) -> Self {
        Self::Parse { err, src }
    }
}
