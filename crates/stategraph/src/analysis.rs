//! Static analysis of workflow definitions.

use std::collections::HashMap;

use log::trace;
use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::Dfs,
};

use stategraph_core::definition::WorkflowDefinition;

/// Builds the transition graph of one scope: one node per state, one edge per
/// defined `next`, choice, default or catch target.
fn transition_graph(definition: &WorkflowDefinition) -> (DiGraph<&str, ()>, HashMap<&str, NodeIndex>) {
    let mut graph = DiGraph::new();
    let indices: HashMap<&str, NodeIndex> = definition
        .states()
        .keys()
        .map(|name| (name.as_str(), graph.add_node(name.as_str())))
        .collect();

    for (name, spec) in definition.states() {
        for target in spec.successors() {
            if let (Some(&source), Some(&target)) = (indices.get(name.as_str()), indices.get(target)) {
                graph.add_edge(source, target, ());
            }
        }
    }
    trace!(nodes = graph.node_count(), edges = graph.edge_count(); "Transition graph built");

    (graph, indices)
}

/// Returns the states of `definition` that cannot be reached from its start
/// state, in declaration order.
///
/// Only the given scope is analysed; states inside Parallel branches belong to
/// their branch definitions. An undefined start state makes every state
/// unreachable.
///
/// # Examples
///
/// ```
/// # use stategraph::analysis::unreachable_states;
/// let definition = stategraph_parser::parse(r#"{"StartAt": "A", "States": {
///     "A": {"Type": "Succeed"},
///     "Orphan": {"Type": "Pass", "Next": "A"}
/// }}"#).unwrap();
///
/// assert_eq!(unreachable_states(&definition), ["Orphan"]);
/// ```
pub fn unreachable_states(definition: &WorkflowDefinition) -> Vec<&str> {
    let (graph, indices) = transition_graph(definition);

    let mut reached = vec![false; graph.node_count()];
    if let Some(&start) = indices.get(definition.start_state()) {
        let mut dfs = Dfs::new(&graph, start);
        while let Some(index) = dfs.next(&graph) {
            reached[index.index()] = true;
        }
    }

    graph
        .node_indices()
        .filter(|index| !reached[index.index()])
        .map(|index| graph[index])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> WorkflowDefinition {
        stategraph_parser::parse(source).unwrap()
    }

    #[test]
    fn test_everything_reachable() {
        let definition = parse(
            r#"{"StartAt": "A", "States": {
                "A": {"Type": "Task", "Next": "B", "Catch": [{"Next": "F"}]},
                "B": {"Type": "Choice", "Choices": [{"Next": "A", "conditionSummary": "again"}], "Default": "C"},
                "C": {"Type": "Succeed"},
                "F": {"Type": "Fail"}
            }}"#,
        );
        assert!(unreachable_states(&definition).is_empty());
    }

    #[test]
    fn test_unreachable_in_declaration_order() {
        let definition = parse(
            r#"{"StartAt": "A", "States": {
                "Z": {"Type": "Pass", "Next": "Y"},
                "A": {"Type": "Succeed"},
                "Y": {"Type": "Succeed"}
            }}"#,
        );
        assert_eq!(unreachable_states(&definition), ["Z", "Y"]);
    }

    #[test]
    fn test_branch_states_are_not_counted() {
        let definition = parse(
            r#"{"StartAt": "Fan", "States": {
                "Fan": {"Type": "Parallel", "End": true, "Branches": [
                    {"StartAt": "Inner", "States": {"Inner": {"Type": "Succeed"}}}
                ]}
            }}"#,
        );
        assert!(unreachable_states(&definition).is_empty());
    }
}
