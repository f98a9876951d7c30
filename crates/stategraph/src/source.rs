//! Normalization of the accepted input forms.

use log::debug;
use serde_json::Value;

use stategraph_core::definition::WorkflowDefinition;
use stategraph_parser::{Diagnostic, ErrorCode, ParseError};

use crate::error::StategraphError;

/// A workflow definition in any of the forms the builder accepts.
///
/// # Examples
///
/// ```
/// # use stategraph::DefinitionSource;
/// let text: DefinitionSource = r#"{"StartAt": "A"}"#.into();
/// assert!(matches!(text, DefinitionSource::Text(_)));
///
/// let missing: DefinitionSource = None::<String>.into();
/// assert!(matches!(missing, DefinitionSource::Missing));
/// ```
#[derive(Debug, Clone, Default)]
pub enum DefinitionSource {
    /// No definition was supplied.
    #[default]
    Missing,
    /// Raw JSON text.
    Text(String),
    /// An already decoded JSON value.
    Value(Value),
    /// An already validated definition.
    Definition(WorkflowDefinition),
}

impl DefinitionSource {
    /// Resolves the input into a validated definition and its warnings.
    pub(crate) fn resolve(self) -> Result<(WorkflowDefinition, Vec<Diagnostic>), StategraphError> {
        match self {
            Self::Missing => Err(StategraphError::MissingInput),
            Self::Text(text) => stategraph_parser::parse_with_warnings(&text)
                .map_err(|err| StategraphError::new_parse_error(err, Some(text))),
            Self::Value(value) => stategraph_parser::parse_value_with_warnings(&value)
                .map_err(|err| StategraphError::new_parse_error(err, None)),
            Self::Definition(definition) => {
                debug!("Using pre-built definition");
                let diagnostic = if definition.states().is_empty() {
                    Diagnostic::error("the definition declares no states").with_code(ErrorCode::E201)
                } else if !definition.has_valid_start() {
                    Diagnostic::error(format!(
                        "start state `{}` is not defined",
                        definition.start_state()
                    ))
                    .with_code(ErrorCode::E202)
                } else {
                    return Ok((definition, Vec::new()));
                };
                Err(StategraphError::new_parse_error(
                    ParseError::from(diagnostic),
                    None,
                ))
            }
        }
    }
}

impl From<&str> for DefinitionSource {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for DefinitionSource {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Value> for DefinitionSource {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&Value> for DefinitionSource {
    fn from(value: &Value) -> Self {
        Self::Value(value.clone())
    }
}

impl From<WorkflowDefinition> for DefinitionSource {
    fn from(definition: WorkflowDefinition) -> Self {
        Self::Definition(definition)
    }
}

impl<T: Into<DefinitionSource>> From<Option<T>> for DefinitionSource {
    fn from(source: Option<T>) -> Self {
        source.map_or(Self::Missing, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use serde_json::json;
    use stategraph_core::definition::{StateKind, StateSpec};

    use super::*;

    fn parse_codes(source: DefinitionSource) -> Vec<ErrorCode> {
        match source.resolve() {
            Err(StategraphError::Parse { err, .. }) => {
                err.diagnostics().iter().filter_map(Diagnostic::code).collect()
            }
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_source() {
        assert!(matches!(
            DefinitionSource::Missing.resolve(),
            Err(StategraphError::MissingInput)
        ));
    }

    #[test]
    fn test_text_keeps_source_on_error() {
        let result = DefinitionSource::from("{not json").resolve();
        let Err(StategraphError::Parse { src, .. }) = result else {
            panic!("expected a parse error");
        };
        assert_eq!(src.as_deref(), Some("{not json"));
    }

    #[test]
    fn test_value_source() {
        let value = json!({"StartAt": "A", "States": {"A": {"Type": "Succeed"}}});
        let (definition, warnings) = DefinitionSource::from(&value).resolve().unwrap();
        assert_eq!(definition.start_state(), "A");
        assert!(warnings.is_empty());

        let codes = parse_codes(json!({"States": {}, "StartAt": "X"}).into());
        assert_eq!(codes, [ErrorCode::E201]);
    }

    #[test]
    fn test_definition_source_is_checked() {
        let mut states = IndexMap::new();
        states.insert("A".to_string(), StateSpec::new(StateKind::Succeed));

        let ok = WorkflowDefinition::new("A", states.clone());
        assert!(DefinitionSource::from(ok).resolve().is_ok());

        let broken = WorkflowDefinition::new("Nope", states);
        assert_eq!(parse_codes(broken.into()), [ErrorCode::E202]);

        let empty = WorkflowDefinition::new("A", IndexMap::new());
        assert_eq!(parse_codes(empty.into()), [ErrorCode::E201]);
    }
}
