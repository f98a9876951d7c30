//! Node identifiers for layout graphs.
//!
//! Every node of a [`LayoutGraph`](crate::graph::LayoutGraph) carries a
//! [`NodeId`]. State nodes are identified by their state name *and* the
//! [`Scope`] they were laid out in, so the same state name used in two
//! parallel branches (or in a branch and in the main flow) maps to two
//! distinct ids. Synthesized markers have their own variants instead of a
//! reserved name.
//!
//! # String form
//!
//! Ids serialize to strings that are unique per id:
//!
//! | Id                                   | String                      |
//! |--------------------------------------|-----------------------------|
//! | entry marker                         | `entry`                     |
//! | main-flow state `Validate`           | `state:Validate`            |
//! | state `Fetch` in branch 1 of `Fan`   | `state:Fan[1]/Fetch`        |
//! | exit marker of `state:Done`          | `exit:state:Done`           |
//!
//! Characters that carry structure (`/`, `[`, `]`), the escape character
//! `%`, and the characters edge ids are built from (`#`, `>`) are
//! percent-encoded inside names. Edge ids `{source}->{target}` with an
//! optional `#n` suffix are therefore unambiguous.

use std::fmt;

use serde::{Serialize, Serializer};

/// One level of parallel nesting: branch `index` of the Parallel state `parallel`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchSegment {
    parallel: String,
    index: usize,
}

impl BranchSegment {
    /// Returns the name of the Parallel state owning the branch.
    pub fn parallel(&self) -> &str {
        &self.parallel
    }

    /// Returns the position of the branch in the Parallel state's branch list.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// The namespace a state is laid out in.
///
/// The main flow is the empty scope. Each parallel branch opens a nested scope
/// that extends its parent's path with one [`BranchSegment`].
///
/// # Examples
///
/// ```
/// use stategraph_core::identifier::Scope;
///
/// let main = Scope::main();
/// let branch = main.branch("Fan", 0);
/// let nested = branch.branch("Inner", 2);
///
/// assert!(main.is_main());
/// assert_eq!(nested.depth(), 2);
/// assert_ne!(branch, main.branch("Fan", 1));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Scope {
    path: Vec<BranchSegment>,
}

impl Scope {
    /// Returns the scope of the main flow.
    pub fn main() -> Self {
        Self::default()
    }

    /// Returns the scope of branch `index` of the Parallel state `parallel`
    /// declared in this scope.
    pub fn branch(&self, parallel: &str, index: usize) -> Self {
        let mut path = self.path.clone();
        path.push(BranchSegment {
            parallel: parallel.to_string(),
            index,
        });
        Self { path }
    }

    /// Returns `true` for the main flow scope.
    pub fn is_main(&self) -> bool {
        self.path.is_empty()
    }

    /// Returns the parallel nesting depth.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Returns the branch segments from outermost to innermost.
    pub fn segments(&self) -> &[BranchSegment] {
        &self.path
    }
}

/// Identifier of a node in a layout graph.
///
/// # Examples
///
/// ```
/// use stategraph_core::identifier::{NodeId, Scope};
///
/// let task = NodeId::state(&Scope::main(), "Validate");
/// assert_eq!(task.to_string(), "state:Validate");
///
/// let in_branch = NodeId::state(&Scope::main().branch("Fan", 1), "Fetch");
/// assert_eq!(in_branch.to_string(), "state:Fan[1]/Fetch");
///
/// let exit = NodeId::exit(&task);
/// assert_eq!(exit.to_string(), "exit:state:Validate");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeId {
    /// The entry marker of the graph.
    Entry,
    /// The exit marker attached to a terminal node.
    Exit(Box<NodeId>),
    /// A state laid out in a scope.
    State { scope: Scope, name: String },
}

impl NodeId {
    /// Creates the id of state `name` laid out in `scope`.
    pub fn state(scope: &Scope, name: &str) -> Self {
        Self::State {
            scope: scope.clone(),
            name: name.to_string(),
        }
    }

    /// Creates the id of the exit marker attached to `terminal`.
    pub fn exit(terminal: &NodeId) -> Self {
        Self::Exit(Box::new(terminal.clone()))
    }

    /// Returns the state name for state ids.
    pub fn state_name(&self) -> Option<&str> {
        match self {
            Self::State { name, .. } => Some(name),
            Self::Entry | Self::Exit(_) => None,
        }
    }

    /// Returns the scope for state ids.
    pub fn scope(&self) -> Option<&Scope> {
        match self {
            Self::State { scope, .. } => Some(scope),
            Self::Entry | Self::Exit(_) => None,
        }
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    for c in name.chars() {
        match c {
            '%' => f.write_str("%25")?,
            '/' => f.write_str("%2F")?,
            '[' => f.write_str("%5B")?,
            ']' => f.write_str("%5D")?,
            '#' => f.write_str("%23")?,
            '>' => f.write_str("%3E")?,
            c => write!(f, "{c}")?,
        }
    }
    Ok(())
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry => f.write_str("entry"),
            Self::Exit(terminal) => write!(f, "exit:{terminal}"),
            Self::State { scope, name } => {
                f.write_str("state:")?;
                for segment in scope.segments() {
                    write_escaped(f, segment.parallel())?;
                    write!(f, "[{}]/", segment.index())?;
                }
                write_escaped(f, name)
            }
        }
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
