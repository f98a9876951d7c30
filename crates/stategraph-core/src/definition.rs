//! Semantic model of workflow definitions.
//!
//! These types are the validated form of a definition document: the parser
//! crate turns raw JSON into a [`WorkflowDefinition`], and the layout engine
//! only ever sees this model. Each [`StateKind`] variant carries exactly the
//! fields its kind needs, so a `Choice` with a `next` or a `Task` with
//! branches cannot be expressed.

use std::{fmt, str::FromStr};

use indexmap::IndexMap;

/// A complete workflow definition: a start state and the named states.
///
/// Parallel branches are themselves `WorkflowDefinition`s.
///
/// # Examples
///
/// ```
/// use indexmap::IndexMap;
/// use stategraph_core::definition::{StateKind, StateSpec, Transition, WorkflowDefinition};
///
/// let mut states = IndexMap::new();
/// states.insert(
///     "Hello".to_string(),
///     StateSpec::new(StateKind::Pass(Transition::Next("World".to_string()))),
/// );
/// states.insert(
///     "World".to_string(),
///     StateSpec::new(StateKind::Pass(Transition::End)),
/// );
///
/// let definition = WorkflowDefinition::new("Hello", states);
/// assert_eq!(definition.start_state(), "Hello");
/// assert!(definition.state("World").is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowDefinition {
    start_state: String,
    states: IndexMap<String, StateSpec>,
    comment: Option<String>,
}

impl WorkflowDefinition {
    /// Creates a definition from its start state and state map.
    pub fn new(start_state: impl Into<String>, states: IndexMap<String, StateSpec>) -> Self {
        Self {
            start_state: start_state.into(),
            states,
            comment: None,
        }
    }

    /// Attaches a free-form comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Returns the name of the entry state.
    pub fn start_state(&self) -> &str {
        &self.start_state
    }

    /// Returns all states in document order.
    pub fn states(&self) -> &IndexMap<String, StateSpec> {
        &self.states
    }

    /// Looks up a state by name.
    pub fn state(&self, name: &str) -> Option<&StateSpec> {
        self.states.get(name)
    }

    /// Returns the comment, if any.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns `true` when the start state names an existing state.
    pub fn has_valid_start(&self) -> bool {
        self.states.contains_key(&self.start_state)
    }
}

/// One named state: its kind-specific body plus the error-handling rules any
/// kind may declare.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSpec {
    kind: StateKind,
    catch_rules: Vec<CatchRule>,
    comment: Option<String>,
}

impl StateSpec {
    pub fn new(kind: StateKind) -> Self {
        Self {
            kind,
            catch_rules: Vec::new(),
            comment: None,
        }
    }

    /// Sets the catch rules, replacing any existing ones.
    pub fn with_catch_rules(mut self, catch_rules: Vec<CatchRule>) -> Self {
        self.catch_rules = catch_rules;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn kind(&self) -> &StateKind {
        &self.kind
    }

    pub fn catch_rules(&self) -> &[CatchRule] {
        &self.catch_rules
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns the kind discriminator of this state.
    pub fn state_type(&self) -> StateType {
        self.kind.state_type()
    }

    /// Returns every state name this state can transition to within its own
    /// scope, in declaration order. Branch start states are not included.
    pub fn successors(&self) -> Vec<&str> {
        let mut targets = Vec::new();
        match &self.kind {
            StateKind::Task(transition)
            | StateKind::Pass(transition)
            | StateKind::Wait(transition)
            | StateKind::Map(transition)
            | StateKind::Other { transition, .. } => targets.extend(transition.next()),
            StateKind::Parallel(parallel) => targets.extend(parallel.transition().next()),
            StateKind::Choice(choice) => {
                targets.extend(choice.choices().iter().map(ChoiceRule::next));
                targets.extend(choice.default_next());
            }
            StateKind::Succeed | StateKind::Fail => {}
        }
        targets.extend(self.catch_rules.iter().map(CatchRule::next));
        targets
    }
}

/// The kind-specific body of a state.
#[derive(Debug, Clone, PartialEq)]
pub enum StateKind {
    Task(Transition),
    Pass(Transition),
    Wait(Transition),
    /// Map states are laid out as a single atomic node.
    Map(Transition),
    Succeed,
    Fail,
    Choice(ChoiceState),
    Parallel(ParallelState),
    /// A state whose `Type` is missing or not a known kind, laid out as a
    /// Task. `declared` keeps the type name as written.
    Other {
        declared: Option<String>,
        transition: Transition,
    },
}

impl StateKind {
    /// Returns the discriminator of this kind.
    pub fn state_type(&self) -> StateType {
        match self {
            Self::Task(_) => StateType::Task,
            Self::Pass(_) => StateType::Pass,
            Self::Wait(_) => StateType::Wait,
            Self::Map(_) => StateType::Map,
            Self::Succeed => StateType::Succeed,
            Self::Fail => StateType::Fail,
            Self::Choice(_) => StateType::Choice,
            Self::Parallel(_) => StateType::Parallel,
            Self::Other { .. } => StateType::Task,
        }
    }
}

/// How a sequential state leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Continue with the named state.
    Next(String),
    /// The state ends the flow (explicit end flag).
    End,
    /// Neither a successor nor an end flag was declared.
    Unset,
}

impl Transition {
    /// Returns the successor name for [`Transition::Next`].
    pub fn next(&self) -> Option<&str> {
        match self {
            Self::Next(name) => Some(name),
            Self::End | Self::Unset => None,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }
}

/// Body of a Choice state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChoiceState {
    choices: Vec<ChoiceRule>,
    default_next: Option<String>,
}

impl ChoiceState {
    pub fn new(choices: Vec<ChoiceRule>, default_next: Option<String>) -> Self {
        Self {
            choices,
            default_next,
        }
    }

    pub fn choices(&self) -> &[ChoiceRule] {
        &self.choices
    }

    pub fn default_next(&self) -> Option<&str> {
        self.default_next.as_deref()
    }
}

/// One guarded transition of a Choice state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceRule {
    condition_summary: String,
    next: String,
}

impl ChoiceRule {
    pub fn new(condition_summary: impl Into<String>, next: impl Into<String>) -> Self {
        Self {
            condition_summary: condition_summary.into(),
            next: next.into(),
        }
    }

    /// Human readable rendering of the rule's condition.
    pub fn condition_summary(&self) -> &str {
        &self.condition_summary
    }

    pub fn next(&self) -> &str {
        &self.next
    }
}

/// Body of a Parallel state.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelState {
    branches: Vec<WorkflowDefinition>,
    transition: Transition,
}

impl ParallelState {
    pub fn new(branches: Vec<WorkflowDefinition>, transition: Transition) -> Self {
        Self {
            branches,
            transition,
        }
    }

    pub fn branches(&self) -> &[WorkflowDefinition] {
        &self.branches
    }

    /// How the Parallel state continues once every branch has rejoined.
    pub fn transition(&self) -> &Transition {
        &self.transition
    }
}

/// An error-escalation transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchRule {
    next: String,
    error_equals: Vec<String>,
}

impl CatchRule {
    pub fn new(next: impl Into<String>) -> Self {
        Self {
            next: next.into(),
            error_equals: Vec::new(),
        }
    }

    /// Sets the error names this rule matches.
    pub fn with_error_equals(mut self, error_equals: Vec<String>) -> Self {
        self.error_equals = error_equals;
        self
    }

    pub fn next(&self) -> &str {
        &self.next
    }

    pub fn error_equals(&self) -> &[String] {
        &self.error_equals
    }
}

/// Discriminator of a state kind, as written in the `Type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateType {
    Task,
    Pass,
    Wait,
    Succeed,
    Fail,
    Choice,
    Parallel,
    Map,
}

impl StateType {
    /// All kinds, in the order they are documented.
    pub const ALL: [StateType; 8] = [
        Self::Task,
        Self::Pass,
        Self::Wait,
        Self::Succeed,
        Self::Fail,
        Self::Choice,
        Self::Parallel,
        Self::Map,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "Task",
            Self::Pass => "Pass",
            Self::Wait => "Wait",
            Self::Succeed => "Succeed",
            Self::Fail => "Fail",
            Self::Choice => "Choice",
            Self::Parallel => "Parallel",
            Self::Map => "Map",
        }
    }
}

impl fmt::Display for StateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown state type `{s}`"))
    }
}
