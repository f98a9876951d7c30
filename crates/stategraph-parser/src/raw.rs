//! Wire-level types for definition documents.
//!
//! These mirror the JSON document one-to-one: every field is optional so a
//! structurally broken definition still decodes and elaboration can report
//! each problem with its own diagnostic. Fields accept both the ASL key and
//! the camelCase alias. Keys this crate does not model (`Resource`,
//! `TimeoutSeconds`, `Retry`, ...) are ignored.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

/// A whole definition, or one Parallel branch.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawDefinition {
    #[serde(rename = "StartAt", alias = "startState", default)]
    pub start_at: Option<String>,
    #[serde(rename = "States", alias = "states", default)]
    pub states: Option<IndexMap<String, RawState>>,
    #[serde(rename = "Comment", alias = "comment", default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawState {
    #[serde(rename = "Type", alias = "kind", default)]
    pub state_type: Option<String>,
    #[serde(rename = "Next", alias = "next", default)]
    pub next: Option<String>,
    #[serde(rename = "End", alias = "isTerminal", default)]
    pub end: Option<bool>,
    #[serde(rename = "Catch", alias = "catchRules", default)]
    pub catch: Option<Vec<RawCatch>>,
    #[serde(rename = "Choices", alias = "choices", default)]
    pub choices: Option<Vec<RawChoiceRule>>,
    #[serde(rename = "Default", alias = "defaultNext", default)]
    pub default: Option<String>,
    #[serde(rename = "Branches", alias = "branches", default)]
    pub branches: Option<Vec<RawDefinition>>,
    #[serde(rename = "Comment", alias = "comment", default)]
    pub comment: Option<String>,
}

impl RawState {
    pub fn is_end(&self) -> bool {
        self.end.unwrap_or(false)
    }
}

/// One rule of a Choice state. Everything except the target and the explicit
/// summary is kept as the raw condition object.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawChoiceRule {
    #[serde(rename = "Next", alias = "next", default)]
    pub next: Option<String>,
    #[serde(rename = "conditionSummary", alias = "ConditionSummary", default)]
    pub condition_summary: Option<String>,
    #[serde(flatten)]
    pub condition: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawCatch {
    #[serde(rename = "Next", alias = "next", default)]
    pub next: Option<String>,
    #[serde(rename = "ErrorEquals", alias = "errorEquals", default)]
    pub error_equals: Vec<String>,
}
