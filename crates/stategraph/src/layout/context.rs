//! Mutable state of one layout run.
//!
//! [`LayoutContext`] owns everything the traversal writes: placed nodes,
//! emitted edges, row occupancy and the edge id registry. [`ScopeWalk`] is the
//! per-scope part (the main flow, or one Parallel branch) with its own visited
//! set. Both live only for the duration of a single layout call.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use log::trace;

use stategraph_core::{
    definition::WorkflowDefinition,
    geometry::Point,
    graph::{EdgeKind, LayoutEdge, LayoutGraph, NodeFlags, NodeKind, PositionedNode},
    identifier::{NodeId, Scope},
};

use super::occupancy::Occupancy;

/// Output being accumulated by one layout run.
#[derive(Debug)]
pub(super) struct LayoutContext {
    nodes: IndexMap<NodeId, PositionedNode>,
    edges: Vec<LayoutEdge>,
    edge_ids: HashMap<String, usize>,
    occupancy: Occupancy,
    side_lane_fails: HashSet<NodeId>,
}

impl LayoutContext {
    pub(super) fn new(min_node_gap: f32) -> Self {
        Self {
            nodes: IndexMap::new(),
            edges: Vec::new(),
            edge_ids: HashMap::new(),
            occupancy: Occupancy::new(min_node_gap),
            side_lane_fails: HashSet::new(),
        }
    }

    /// Places a node at the first free position from `anchor`.
    ///
    /// Positions are write-once: placing an id twice keeps the first node.
    pub(super) fn place(
        &mut self,
        id: NodeId,
        kind: NodeKind,
        label: &str,
        anchor: Point,
        flags: NodeFlags,
    ) -> Point {
        if let Some(existing) = self.nodes.get(&id) {
            return existing.position();
        }
        let position = self.occupancy.claim(anchor);
        trace!(id:%, x = position.x(), y = position.y(); "Node placed");
        let node = PositionedNode::new(id.clone(), kind, label, position).with_flags(flags);
        self.nodes.insert(id, node);
        position
    }

    /// Emits an undecorated edge.
    pub(super) fn connect(&mut self, source: &NodeId, target: &NodeId, kind: EdgeKind) {
        self.connect_with(source, target, kind, |edge| edge);
    }

    /// Emits an edge with a unique id derived from its endpoints; `decorate`
    /// attaches labels or ports.
    pub(super) fn connect_with(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        kind: EdgeKind,
        decorate: impl FnOnce(LayoutEdge) -> LayoutEdge,
    ) {
        let base = format!("{source}->{target}");
        let count = self.edge_ids.entry(base.clone()).or_insert(0);
        let id = match *count {
            0 => base,
            n => format!("{base}#{n}"),
        };
        *count += 1;

        trace!(id = id.as_str(), kind:?; "Edge emitted");
        let edge = LayoutEdge::new(id, source.clone(), target.clone(), kind);
        self.edges.push(decorate(edge));
    }

    /// Records that a Fail state was placed in an error side lane.
    pub(super) fn mark_side_lane_fail(&mut self, id: NodeId) {
        self.side_lane_fails.insert(id);
    }

    pub(super) fn is_side_lane_fail(&self, id: &NodeId) -> bool {
        self.side_lane_fails.contains(id)
    }

    pub(super) fn finish(self) -> LayoutGraph {
        LayoutGraph::new(self.nodes.into_values().collect(), self.edges)
    }
}

/// Traversal state of one scope.
#[derive(Debug)]
pub(super) struct ScopeWalk<'d> {
    definition: &'d WorkflowDefinition,
    scope: Scope,
    visited: HashSet<&'d str>,
    tails: Vec<NodeId>,
}

impl<'d> ScopeWalk<'d> {
    pub(super) fn new(definition: &'d WorkflowDefinition, scope: Scope) -> Self {
        Self {
            definition,
            scope,
            visited: HashSet::new(),
            tails: Vec::new(),
        }
    }

    pub(super) fn definition(&self) -> &'d WorkflowDefinition {
        self.definition
    }

    pub(super) fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Whether this walk lays out a Parallel branch.
    pub(super) fn in_branch(&self) -> bool {
        !self.scope.is_main()
    }

    pub(super) fn node_id(&self, name: &str) -> NodeId {
        NodeId::state(&self.scope, name)
    }

    /// Marks `name` visited; returns `false` when it already was.
    pub(super) fn visit(&mut self, name: &'d str) -> bool {
        self.visited.insert(name)
    }

    pub(super) fn is_visited(&self, name: &str) -> bool {
        self.visited.contains(name)
    }

    /// Registers a node that rejoins the parent flow when the branch ends.
    pub(super) fn push_tail(&mut self, id: NodeId) {
        self.tails.push(id);
    }

    pub(super) fn take_tails(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.tails)
    }
}
