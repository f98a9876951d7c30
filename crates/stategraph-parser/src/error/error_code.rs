//! Error codes for the Stategraph diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E1xx` - Document errors (JSON syntax and shape)
//! - `E2xx` - Structure errors (states, transitions, branches)

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Document Errors (E1xx)
    // =========================================================================
    /// Invalid JSON syntax.
    ///
    /// The document is not well-formed JSON.
    E100,

    /// Unexpected document shape.
    ///
    /// The document is valid JSON but a field has the wrong type, for
    /// example `States` given as a list.
    E101,

    // =========================================================================
    // Structure Errors (E2xx)
    // =========================================================================
    /// Missing start state.
    ///
    /// The definition has no `StartAt` field.
    E200,

    /// Empty state map.
    ///
    /// The definition has no `States`, or the map is empty.
    E201,

    /// Undefined start state.
    ///
    /// `StartAt` names a state that is not a key of `States`.
    E202,

    /// Unknown state type.
    ///
    /// The `Type` of a state is not one of `Task`, `Pass`, `Wait`,
    /// `Succeed`, `Fail`, `Choice`, `Parallel` or `Map`. Reported as a
    /// warning: the state is laid out as a Task.
    E203,

    /// Missing state type.
    ///
    /// A state has no `Type` field. Reported as a warning: the state is laid
    /// out as a Task.
    E204,

    /// Choice rule without target.
    ///
    /// A rule in `Choices` has no `Next`. Reported as a warning: the rule is
    /// dropped.
    E205,

    /// Catch rule without target.
    ///
    /// A rule in `Catch` has no `Next`. Reported as a warning: the rule is
    /// dropped.
    E206,

    /// Undefined transition target.
    ///
    /// A `Next`, `Default`, choice or catch target names a state that is not
    /// a key of `States`. Reported as a warning: the transition is dropped
    /// from the layout.
    E207,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E100").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E205 => "E205",
            ErrorCode::E206 => "E206",
            ErrorCode::E207 => "E207",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "invalid JSON syntax",
            ErrorCode::E101 => "unexpected document shape",
            ErrorCode::E200 => "missing start state",
            ErrorCode::E201 => "empty state map",
            ErrorCode::E202 => "undefined start state",
            ErrorCode::E203 => "unknown state type",
            ErrorCode::E204 => "missing state type",
            ErrorCode::E205 => "choice rule without target",
            ErrorCode::E206 => "catch rule without target",
            ErrorCode::E207 => "undefined transition target",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
