//! A single problem found in a workflow definition.

use std::fmt;

use crate::{
    error::{Severity, error_code::ErrorCode, label::Label},
    span::Span,
};

/// An error or warning about a definition, with optional code, labeled
/// spans into the definition text and help.
///
/// Rendered by the CLI as:
///
/// ```text
/// error[E202]: start state `Begin` is not defined
///   --> order.asl.json:2:14
///    |
///  2 |   "StartAt": "Begin",
///    |              ^^^^^^^ not a key of `States`
///    |
///    = help: defined states: Validate, Charge, Done
/// ```
///
/// Definitions passed as JSON values have no text, so their diagnostics
/// carry no labels.
///
/// # Example
///
/// ```
/// # use stategraph_parser::error::{Diagnostic, ErrorCode};
/// # use stategraph_parser::Span;
/// let diag = Diagnostic::warning("unknown state type `Activity`")
///     .with_code(ErrorCode::E203)
///     .with_label(Span::new(40..50), "state declared here")
///     .with_help("expected one of Task, Pass, Wait, Succeed, Fail, Choice, Parallel, Map");
///
/// assert_eq!(diag.to_string(), "warning[E203]: unknown state type `Activity`");
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// A problem the layout tolerates, such as a transition to an
    /// undefined state.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Labels in the order they were attached.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Span of the first primary label.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .map(Label::span)
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach a primary label at `span`.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Attach a context label at `span`.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{}[{code}]: {}", self.severity, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

impl std::error::Error for Diagnostic {}
