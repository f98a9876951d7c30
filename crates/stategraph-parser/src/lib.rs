//! # Stategraph Parser
//!
//! Parser for workflow definition documents. This crate turns the JSON
//! definition (ASL field names or their camelCase aliases) into the validated
//! [`WorkflowDefinition`] model consumed by the layout engine.
//!
//! ## Usage
//!
//! ```
//! # use stategraph_parser::{parse, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"{
//!         "StartAt": "Hello",
//!         "States": {
//!             "Hello": {"Type": "Pass", "Next": "World"},
//!             "World": {"Type": "Succeed"}
//!         }
//!     }"#;
//!
//!     let definition = parse(source)?;
//!     assert_eq!(definition.states().len(), 2);
//!     Ok(())
//! }
//! ```

pub mod condition;
mod elaborate;
pub mod error;
mod raw;
mod span;

pub use error::{Diagnostic, ErrorCode, ParseError};
pub use span::Span;

use log::{debug, info};
use serde::Deserialize;
use serde_json::{Value, error::Category};

use stategraph_core::definition::WorkflowDefinition;

use elaborate::Elaborator;
use raw::RawDefinition;

/// Parse definition text into a workflow definition.
///
/// The pipeline has two steps:
///
/// 1. **Decode** - Read the JSON into the wire-level types
/// 2. **Elaborate** - Validate the structure and build the semantic model
///
/// Warnings (transitions to undefined states) are discarded; use
/// [`parse_with_warnings`] to keep them.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying every diagnostic when the text is not
/// JSON, has the wrong shape, or breaks a structural rule.
pub fn parse(source: &str) -> Result<WorkflowDefinition, ParseError> {
    parse_with_warnings(source).map(|(definition, _)| definition)
}

/// Parse definition text, also returning the warnings found.
///
/// # Examples
///
/// ```
/// # use stategraph_parser::{parse_with_warnings, ErrorCode};
/// let source = r#"{"StartAt": "A", "States": {"A": {"Type": "Task", "Next": "B"}}}"#;
/// let (definition, warnings) = parse_with_warnings(source).unwrap();
///
/// assert_eq!(definition.start_state(), "A");
/// assert_eq!(warnings[0].code(), Some(ErrorCode::E207));
/// ```
pub fn parse_with_warnings(
    source: &str,
) -> Result<(WorkflowDefinition, Vec<Diagnostic>), ParseError> {
    info!(source_len = source.len(); "Parsing definition text");
    let raw: RawDefinition =
        serde_json::from_str(source).map_err(|err| decode_error(&err, Some(source)))?;
    debug!("Definition decoded");
    Elaborator::new(Some(source)).elaborate(raw)
}

/// Parse an already decoded JSON value into a workflow definition.
///
/// # Errors
///
/// Same as [`parse`]; diagnostics carry no source spans.
pub fn parse_value(value: &Value) -> Result<WorkflowDefinition, ParseError> {
    parse_value_with_warnings(value).map(|(definition, _)| definition)
}

/// Parse an already decoded JSON value, also returning the warnings found.
pub fn parse_value_with_warnings(
    value: &Value,
) -> Result<(WorkflowDefinition, Vec<Diagnostic>), ParseError> {
    info!("Parsing definition value");
    let raw = RawDefinition::deserialize(value).map_err(|err| decode_error(&err, None))?;
    Elaborator::new(None).elaborate(raw)
}

/// Converts a decoder error into a diagnostic.
fn decode_error(err: &serde_json::Error, source: Option<&str>) -> ParseError {
    let (code, help) = match err.classify() {
        Category::Syntax | Category::Eof | Category::Io => {
            (ErrorCode::E100, "the definition must be a JSON object")
        }
        Category::Data => (
            ErrorCode::E101,
            "check the field types: `States` is an object, `Catch` and `Choices` are lists",
        ),
    };
    debug!(code:%, line = err.line(), column = err.column(); "Definition failed to decode");

    let diagnostic = Diagnostic::error(err.to_string())
        .with_code(code)
        .with_help(help);
    let diagnostic = match source {
        Some(source) if err.line() > 0 && !source.is_empty() => diagnostic.with_label(
            Span::from_line_column(source, err.line(), err.column()),
            code.description(),
        ),
        _ => diagnostic,
    };
    ParseError::from(diagnostic)
}
