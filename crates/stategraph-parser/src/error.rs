//! Error and diagnostic system for the Stategraph parser.
//!
//! Problems found while reading a definition are reported as [`Diagnostic`]s:
//! an error code, a message, labeled byte spans into the source text (when
//! the definition came from text) and optional help. A failed parse returns
//! every collected diagnostic wrapped in a [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use stategraph_parser::error::{Diagnostic, ErrorCode};
//! # use stategraph_parser::Span;
//!
//! let state_span = Span::new(40..48);
//! let type_span = Span::new(60..70);
//!
//! let diag = Diagnostic::warning("unknown state type `Activity`")
//!     .with_code(ErrorCode::E203)
//!     .with_label(state_span, "state declared here")
//!     .with_secondary_label(type_span, "type given here")
//!     .with_help("expected one of Task, Pass, Wait, Succeed, Fail, Choice, Parallel, Map");
//!
//! assert_eq!(diag.labels().len(), 2);
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::{Label, LabelStyle};
pub use parse_error::ParseError;
pub use severity::Severity;
