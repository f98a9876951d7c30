//! Elaboration of raw definition documents into the semantic model.
//!
//! The elaborator walks a [`RawDefinition`] and its Parallel branches,
//! checks the structural rules (start state present and defined, non-empty
//! state map) and builds the closed [`StateKind`] variants. Every problem
//! becomes a [`Diagnostic`]. Only the structural rules are errors: states with
//! a missing or unknown type become [`StateKind::Other`], rules without a
//! target are dropped and undefined transition targets are left out of the
//! layout, each with a warning.

use log::{debug, trace, warn};

use stategraph_core::definition::{
    CatchRule, ChoiceRule, ChoiceState, ParallelState, StateKind, StateSpec, StateType,
    Transition, WorkflowDefinition,
};

use crate::{
    condition,
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    raw::{RawChoiceRule, RawDefinition, RawState},
    span::Span,
};

/// Where in the document a definition sits, for diagnostic messages.
#[derive(Debug, Clone)]
enum Location {
    Root,
    Branch { parallel: String, index: usize },
}

impl Location {
    fn describe(&self) -> String {
        match self {
            Self::Root => "the definition".to_string(),
            Self::Branch { parallel, index } => format!("branch {index} of `{parallel}`"),
        }
    }
}

pub(crate) struct Elaborator<'a> {
    source: Option<&'a str>,
    collector: DiagnosticCollector,
}

impl<'a> Elaborator<'a> {
    /// Creates an elaborator; `source` enables spans in diagnostics.
    pub(crate) fn new(source: Option<&'a str>) -> Self {
        Self {
            source,
            collector: DiagnosticCollector::new(),
        }
    }

    /// Elaborates a whole document, returning the definition and any warnings.
    pub(crate) fn elaborate(
        mut self,
        raw: RawDefinition,
    ) -> Result<(WorkflowDefinition, Vec<Diagnostic>), ParseError> {
        debug!("Elaborating workflow definition");
        let definition = self.definition(raw, &Location::Root);
        let warnings = self.collector.finish()?;
        let definition = definition.ok_or_else(|| {
            ParseError::from(
                Diagnostic::error("definition could not be elaborated").with_code(ErrorCode::E101),
            )
        })?;

        debug!(
            states_len = definition.states().len(),
            warnings_len = warnings.len();
            "Elaboration completed",
        );
        Ok((definition, warnings))
    }

    fn span_of(&self, key: &str) -> Option<Span> {
        self.source.and_then(|source| Span::locate_key(source, key))
    }

    fn report(&mut self, diagnostic: Diagnostic, key: &str, label: &str) {
        let diagnostic = match self.span_of(key) {
            Some(span) => diagnostic.with_label(span, label),
            None => diagnostic,
        };
        self.collector.emit(diagnostic);
    }

    fn definition(&mut self, raw: RawDefinition, location: &Location) -> Option<WorkflowDefinition> {
        let RawDefinition {
            start_at,
            states,
            comment,
        } = raw;

        let start_at = match start_at {
            Some(start_at) => Some(start_at),
            None => {
                self.report(
                    Diagnostic::error(format!("{} has no start state", location.describe()))
                        .with_code(ErrorCode::E200)
                        .with_help("add a `StartAt` field naming the first state"),
                    "States",
                    "states declared without `StartAt`",
                );
                None
            }
        };

        let states = match states {
            Some(states) if !states.is_empty() => states,
            _ => {
                self.report(
                    Diagnostic::error(format!("{} declares no states", location.describe()))
                        .with_code(ErrorCode::E201)
                        .with_help("`States` must map at least one state name to a state"),
                    "StartAt",
                    "start state given here",
                );
                return None;
            }
        };

        let start_at = start_at?;
        if !states.contains_key(&start_at) {
            let defined: Vec<&str> = states.keys().map(String::as_str).collect();
            let mut diagnostic = Diagnostic::error(format!(
                "start state `{start_at}` of {} is not defined",
                location.describe()
            ))
            .with_code(ErrorCode::E202)
            .with_help(format!("defined states: {}", defined.join(", ")));
            if let Some(span) = self.span_of("States") {
                diagnostic = diagnostic.with_secondary_label(span, "states declared here");
            }
            self.report(diagnostic, "StartAt", "not a key of `States`");
        }

        let mut elaborated = indexmap::IndexMap::with_capacity(states.len());
        for (name, state) in states {
            trace!(name = name.as_str(); "Elaborating state");
            if let Some(spec) = self.state(&name, state) {
                elaborated.insert(name, spec);
            }
        }

        if self.collector.has_errors() {
            return None;
        }

        for (name, spec) in &elaborated {
            for target in spec.successors() {
                if !elaborated.contains_key(target) {
                    warn!(state = name.as_str(), to = target; "Transition to undefined state");
                    self.report(
                        Diagnostic::warning(format!(
                            "`{name}` transitions to undefined state `{target}`"
                        ))
                        .with_code(ErrorCode::E207)
                        .with_help("the transition is left out of the layout"),
                        name,
                        "state declared here",
                    );
                }
            }
        }

        let definition = WorkflowDefinition::new(start_at, elaborated);
        Some(match comment {
            Some(comment) => definition.with_comment(comment),
            None => definition,
        })
    }

    fn state(&mut self, name: &str, raw: RawState) -> Option<StateSpec> {
        let state_type = match raw.state_type.as_deref().map(str::parse::<StateType>) {
            Some(Ok(state_type)) => Some(state_type),
            Some(Err(message)) => {
                warn!(state = name; "Unknown state type, laying out as a task");
                self.report(
                    Diagnostic::warning(format!("{message} for state `{name}`"))
                        .with_code(ErrorCode::E203)
                        .with_help(
                            "expected one of Task, Pass, Wait, Succeed, Fail, Choice, Parallel, Map; \
                             the state is laid out as a Task",
                        ),
                    name,
                    "state declared here",
                );
                None
            }
            None => {
                warn!(state = name; "State without type, laying out as a task");
                self.report(
                    Diagnostic::warning(format!("state `{name}` has no type"))
                        .with_code(ErrorCode::E204)
                        .with_help("add a `Type` field; the state is laid out as a Task"),
                    name,
                    "state declared here",
                );
                None
            }
        };

        let catch_rules = self.catch_rules(name, &raw);
        let transition = Self::transition(&raw);
        let RawState {
            state_type: declared,
            choices,
            default,
            branches,
            comment,
            ..
        } = raw;

        let Some(state_type) = state_type else {
            let kind = StateKind::Other {
                declared,
                transition,
            };
            return Some(Self::spec(kind, catch_rules, comment));
        };

        let kind = match state_type {
            StateType::Task => StateKind::Task(transition),
            StateType::Pass => StateKind::Pass(transition),
            StateType::Wait => StateKind::Wait(transition),
            StateType::Map => StateKind::Map(transition),
            StateType::Succeed => StateKind::Succeed,
            StateType::Fail => StateKind::Fail,
            StateType::Choice => {
                let rules = self.choice_rules(name, choices.unwrap_or_default());
                StateKind::Choice(ChoiceState::new(rules, default))
            }
            StateType::Parallel => {
                let mut elaborated = Vec::new();
                let mut complete = true;
                for (index, branch) in branches.unwrap_or_default().into_iter().enumerate() {
                    let location = Location::Branch {
                        parallel: name.to_string(),
                        index,
                    };
                    match self.definition(branch, &location) {
                        Some(branch) => elaborated.push(branch),
                        None => complete = false,
                    }
                }
                if !complete {
                    return None;
                }
                StateKind::Parallel(ParallelState::new(elaborated, transition))
            }
        };

        Some(Self::spec(kind, catch_rules, comment))
    }

    fn spec(kind: StateKind, catch_rules: Vec<CatchRule>, comment: Option<String>) -> StateSpec {
        let spec = StateSpec::new(kind).with_catch_rules(catch_rules);
        match comment {
            Some(comment) => spec.with_comment(comment),
            None => spec,
        }
    }

    /// `Next` wins over `End` when both are present.
    fn transition(raw: &RawState) -> Transition {
        match (&raw.next, raw.is_end()) {
            (Some(next), _) => Transition::Next(next.clone()),
            (None, true) => Transition::End,
            (None, false) => Transition::Unset,
        }
    }

    /// Rules without a `Next` are dropped with a warning.
    fn choice_rules(&mut self, name: &str, raw: Vec<RawChoiceRule>) -> Vec<ChoiceRule> {
        let mut rules = Vec::with_capacity(raw.len());
        for (index, rule) in raw.into_iter().enumerate() {
            let Some(next) = rule.next else {
                warn!(state = name, index; "Dropping choice rule without target");
                self.report(
                    Diagnostic::warning(format!("choice rule {index} of `{name}` has no target"))
                        .with_code(ErrorCode::E205)
                        .with_help("every entry of `Choices` needs a `Next`; the rule is left out"),
                    name,
                    "choice state declared here",
                );
                continue;
            };
            let summary = rule
                .condition_summary
                .unwrap_or_else(|| condition::summarize(&rule.condition));
            rules.push(ChoiceRule::new(summary, next));
        }
        rules
    }

    fn catch_rules(&mut self, name: &str, raw: &RawState) -> Vec<CatchRule> {
        let mut rules = Vec::new();
        for (index, rule) in raw.catch.iter().flatten().enumerate() {
            let Some(next) = &rule.next else {
                warn!(state = name, index; "Dropping catch rule without target");
                self.report(
                    Diagnostic::warning(format!("catch rule {index} of `{name}` has no target"))
                        .with_code(ErrorCode::E206)
                        .with_help("every entry of `Catch` needs a `Next`; the rule is left out"),
                    name,
                    "state declared here",
                );
                continue;
            };
            rules.push(CatchRule::new(next).with_error_equals(rule.error_equals.clone()));
        }
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elaborate(source: &str) -> Result<(WorkflowDefinition, Vec<Diagnostic>), ParseError> {
        let raw: RawDefinition = serde_json::from_str(source).unwrap();
        Elaborator::new(Some(source)).elaborate(raw)
    }

    fn codes(err: &ParseError) -> Vec<ErrorCode> {
        err.diagnostics().iter().filter_map(Diagnostic::code).collect()
    }

    #[test]
    fn test_sequential_states() {
        let (definition, warnings) = elaborate(
            r#"{"StartAt": "A", "States": {
                "A": {"Type": "Task", "Next": "B"},
                "B": {"Type": "Wait", "End": true}
            }}"#,
        )
        .unwrap();

        assert!(warnings.is_empty());
        assert_eq!(definition.start_state(), "A");
        assert_eq!(
            definition.state("A").unwrap().kind(),
            &StateKind::Task(Transition::Next("B".to_string()))
        );
        assert_eq!(
            definition.state("B").unwrap().kind(),
            &StateKind::Wait(Transition::End)
        );
    }

    #[test]
    fn test_next_wins_over_end() {
        let (definition, _) = elaborate(
            r#"{"StartAt": "A", "States": {
                "A": {"Type": "Pass", "Next": "B", "End": true},
                "B": {"Type": "Pass"}
            }}"#,
        )
        .unwrap();

        assert_eq!(
            definition.state("A").unwrap().kind(),
            &StateKind::Pass(Transition::Next("B".to_string()))
        );
        assert_eq!(
            definition.state("B").unwrap().kind(),
            &StateKind::Pass(Transition::Unset)
        );
    }

    #[test]
    fn test_choice_summaries() {
        let (definition, _) = elaborate(
            r#"{"StartAt": "Pick", "States": {
                "Pick": {"Type": "Choice", "Default": "C", "Choices": [
                    {"Variable": "$.n", "NumericEquals": 1, "Next": "A"},
                    {"conditionSummary": "n is big", "Next": "B"},
                    {"Variable": "$.n", "Frobnicate": 2, "Next": "B"}
                ]},
                "A": {"Type": "Succeed"},
                "B": {"Type": "Succeed"},
                "C": {"Type": "Fail"}
            }}"#,
        )
        .unwrap();

        let StateKind::Choice(choice) = definition.state("Pick").unwrap().kind() else {
            panic!("expected a choice state");
        };
        let summaries: Vec<_> = choice.choices().iter().map(ChoiceRule::condition_summary).collect();
        assert_eq!(summaries, ["$.n == 1", "n is big", condition::PLACEHOLDER]);
        assert_eq!(choice.default_next(), Some("C"));
    }

    #[test]
    fn test_parallel_branches_are_elaborated() {
        let (definition, _) = elaborate(
            r#"{"StartAt": "Fan", "States": {
                "Fan": {"Type": "Parallel", "Next": "Join", "Branches": [
                    {"StartAt": "L", "States": {"L": {"Type": "Pass", "End": true}}},
                    {"StartAt": "R", "States": {"R": {"Type": "Succeed"}}}
                ]},
                "Join": {"Type": "Succeed"}
            }}"#,
        )
        .unwrap();

        let StateKind::Parallel(parallel) = definition.state("Fan").unwrap().kind() else {
            panic!("expected a parallel state");
        };
        assert_eq!(parallel.branches().len(), 2);
        assert_eq!(parallel.branches()[1].start_state(), "R");
        assert_eq!(parallel.transition().next(), Some("Join"));
    }

    #[test]
    fn test_missing_start_state() {
        let err = elaborate(r#"{"States": {"A": {"Type": "Succeed"}}}"#).unwrap_err();
        assert_eq!(codes(&err), [ErrorCode::E200]);
        assert!(!err.diagnostics()[0].labels().is_empty());
    }

    #[test]
    fn test_empty_states() {
        let err = elaborate(r#"{"States": {}, "StartAt": "X"}"#).unwrap_err();
        assert_eq!(codes(&err), [ErrorCode::E201]);
    }

    #[test]
    fn test_undefined_start_state() {
        let err = elaborate(r#"{"StartAt": "X", "States": {"A": {"Type": "Succeed"}}}"#).unwrap_err();
        assert_eq!(codes(&err), [ErrorCode::E202]);
    }

    #[test]
    fn test_malformed_states_are_tolerated_with_warnings() {
        let (definition, warnings) = elaborate(
            r#"{"StartAt": "A", "States": {
                "A": {"Type": "Activity", "Next": "B"},
                "B": {"Next": "C"},
                "C": {"Type": "Choice", "Default": "D", "Choices": [
                    {"Variable": "$.x", "IsNull": true},
                    {"Variable": "$.x", "IsNull": false, "Next": "D"}
                ]},
                "D": {"Type": "Task", "End": true, "Catch": [
                    {"ErrorEquals": ["States.ALL"]},
                    {"ErrorEquals": ["States.Timeout"], "Next": "A"}
                ]}
            }}"#,
        )
        .unwrap();

        let codes: Vec<_> = warnings.iter().filter_map(Diagnostic::code).collect();
        assert_eq!(
            codes,
            [ErrorCode::E203, ErrorCode::E204, ErrorCode::E205, ErrorCode::E206]
        );
        assert!(warnings.iter().all(|w| w.severity().is_warning()));

        assert_eq!(
            definition.state("A").unwrap().kind(),
            &StateKind::Other {
                declared: Some("Activity".to_string()),
                transition: Transition::Next("B".to_string()),
            }
        );
        assert_eq!(
            definition.state("B").unwrap().kind(),
            &StateKind::Other {
                declared: None,
                transition: Transition::Next("C".to_string()),
            }
        );
        assert_eq!(definition.state("A").unwrap().state_type(), StateType::Task);

        let StateKind::Choice(choice) = definition.state("C").unwrap().kind() else {
            panic!("expected a choice state");
        };
        assert_eq!(choice.choices().len(), 1);
        assert_eq!(choice.choices()[0].next(), "D");

        let catches = definition.state("D").unwrap().catch_rules();
        assert_eq!(catches.len(), 1);
        assert_eq!(catches[0].next(), "A");
    }

    #[test]
    fn test_unknown_type_catch_rules_are_kept() {
        let (definition, _) = elaborate(
            r#"{"StartAt": "A", "States": {
                "A": {"Type": "Activity", "End": true, "Catch": [{"Next": "H"}]},
                "H": {"Type": "Fail"}
            }}"#,
        )
        .unwrap();

        assert_eq!(definition.state("A").unwrap().catch_rules().len(), 1);
        assert_eq!(definition.state("A").unwrap().successors(), ["H"]);
    }

    #[test]
    fn test_broken_branch_fails_the_whole_definition() {
        let err = elaborate(
            r#"{"StartAt": "Fan", "States": {
                "Fan": {"Type": "Parallel", "End": true, "Branches": [
                    {"StartAt": "Missing", "States": {"L": {"Type": "Succeed"}}}
                ]}
            }}"#,
        )
        .unwrap_err();

        assert_eq!(codes(&err), [ErrorCode::E202]);
        assert!(err.diagnostics()[0].message().contains("branch 0 of `Fan`"));
    }

    #[test]
    fn test_dangling_targets_are_warnings() {
        let (definition, warnings) = elaborate(
            r#"{"StartAt": "A", "States": {
                "A": {"Type": "Task", "Next": "Gone", "Catch": [{"Next": "Lost"}]}
            }}"#,
        )
        .unwrap();

        assert_eq!(definition.states().len(), 1);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.severity().is_warning()));
        assert_eq!(warnings[0].code(), Some(ErrorCode::E207));
        assert!(warnings[1].message().contains("`Lost`"));
    }

    #[test]
    fn test_diagnostics_without_source_have_no_labels() {
        let raw: RawDefinition =
            serde_json::from_str(r#"{"StartAt": "X", "States": {"A": {"Type": "Nope"}}}"#).unwrap();
        let err = Elaborator::new(None).elaborate(raw).unwrap_err();
        assert_eq!(codes(&err), [ErrorCode::E202]);
        assert!(err.diagnostics().iter().all(|d| d.labels().is_empty()));
    }
}
