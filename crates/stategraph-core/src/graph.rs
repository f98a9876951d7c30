//! Positioned node/edge graphs handed to diagram renderers.
//!
//! A [`LayoutGraph`] is the output of a layout run. It owns its nodes and
//! edges, serializes to camelCase JSON and carries no reference back to the
//! definition it was built from.
//!
//! Serialized shape:
//!
//! ```text
//! {
//!   "nodes": [{ "id", "kind", "label", "x", "y",
//!               "flags": { "isBranchMember", "hasErrorOutput" } }],
//!   "edges": [{ "id", "source", "target", "kind",
//!               "label"?, "sourcePort"?, "targetPort"? }]
//! }
//! ```

use std::fmt;

use serde::{Serialize, Serializer};

use crate::{
    definition::StateType,
    geometry::{Bounds, Point},
    identifier::NodeId,
};

/// Category of a node.
///
/// Synthesized markers are their own variants; state nodes carry the state
/// kind. Serializes to `"entry"`, `"exit"` or the state type name
/// (`"Task"`, `"Choice"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Entry,
    Exit,
    State(StateType),
}

impl NodeKind {
    /// Returns `true` for the synthesized entry and exit markers.
    pub fn is_marker(self) -> bool {
        matches!(self, Self::Entry | Self::Exit)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Exit => "exit",
            Self::State(kind) => kind.as_str(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Rendering hints attached to a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeFlags {
    /// The node was laid out inside a parallel branch.
    pub is_branch_member: bool,
    /// The node declares catch rules and exposes an error port.
    pub has_error_output: bool,
}

/// A node with its final coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedNode {
    id: NodeId,
    kind: NodeKind,
    label: String,
    #[serde(flatten)]
    position: Point,
    flags: NodeFlags,
}

impl PositionedNode {
    pub fn new(id: NodeId, kind: NodeKind, label: impl Into<String>, position: Point) -> Self {
        Self {
            id,
            kind,
            label: label.into(),
            position,
            flags: NodeFlags::default(),
        }
    }

    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn x(&self) -> f32 {
        self.position.x()
    }

    pub fn y(&self) -> f32 {
        self.position.y()
    }

    pub fn flags(&self) -> NodeFlags {
        self.flags
    }
}

/// Semantic category of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Plain `next` transition, branch fan-out or branch rejoin.
    Sequential,
    /// Guarded Choice transition; labeled with the condition summary.
    Conditional,
    /// Choice fallback transition; labeled "default".
    Default,
    /// Catch rule transition.
    Error,
    /// From the entry marker to the start state.
    Entry,
    /// From a terminal state to its exit marker.
    Exit,
}

impl EdgeKind {
    /// Returns `true` for edges renderers draw dashed.
    pub fn is_dashed(self) -> bool {
        matches!(self, Self::Default)
    }
}

/// Connection point on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Port {
    Primary,
    Error,
}

/// A directed edge between two nodes of the same graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutEdge {
    id: String,
    source: NodeId,
    target: NodeId,
    kind: EdgeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_port: Option<Port>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_port: Option<Port>,
}

impl LayoutEdge {
    pub fn new(id: impl Into<String>, source: NodeId, target: NodeId, kind: EdgeKind) -> Self {
        Self {
            id: id.into(),
            source,
            target,
            kind,
            label: None,
            source_port: None,
            target_port: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the ports the edge leaves and enters through.
    pub fn with_ports(mut self, source_port: Port, target_port: Port) -> Self {
        self.source_port = Some(source_port);
        self.target_port = Some(target_port);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn source_port(&self) -> Option<Port> {
        self.source_port
    }

    pub fn target_port(&self) -> Option<Port> {
        self.target_port
    }
}

/// The positioned node/edge graph produced by one layout run.
///
/// # Examples
///
/// ```
/// use stategraph_core::{
///     geometry::Point,
///     graph::{EdgeKind, LayoutEdge, LayoutGraph, NodeKind, PositionedNode},
///     identifier::{NodeId, Scope},
///     definition::StateType,
/// };
///
/// let start = NodeId::state(&Scope::main(), "Start");
/// let graph = LayoutGraph::new(
///     vec![
///         PositionedNode::new(NodeId::Entry, NodeKind::Entry, "Start", Point::default()),
///         PositionedNode::new(start.clone(), NodeKind::State(StateType::Pass), "Start", Point::new(0.0, 100.0)),
///     ],
///     vec![LayoutEdge::new("entry->state:Start", NodeId::Entry, start.clone(), EdgeKind::Entry)],
/// );
///
/// assert_eq!(graph.incoming(&start).count(), 1);
/// assert!(graph.node(&start).is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutGraph {
    nodes: Vec<PositionedNode>,
    edges: Vec<LayoutEdge>,
}

impl LayoutGraph {
    pub fn new(nodes: Vec<PositionedNode>, edges: Vec<LayoutEdge>) -> Self {
        Self { nodes, edges }
    }

    /// Returns the graph with no nodes and no edges.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn nodes(&self) -> &[PositionedNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[LayoutEdge] {
        &self.edges
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &NodeId) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    /// Returns the edges leaving `id`.
    pub fn outgoing<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a LayoutEdge> + 'a {
        self.edges.iter().filter(move |edge| edge.source() == id)
    }

    /// Returns the edges entering `id`.
    pub fn incoming<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a LayoutEdge> + 'a {
        self.edges.iter().filter(move |edge| edge.target() == id)
    }

    /// Returns the state nodes, skipping entry and exit markers.
    pub fn state_nodes(&self) -> impl Iterator<Item = &PositionedNode> {
        self.nodes.iter().filter(|node| !node.kind().is_marker())
    }

    /// Returns the bounding box of all node positions, or `None` for an empty graph.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut positions = self.nodes.iter().map(PositionedNode::position);
        let first = positions.next()?;
        Some(positions.fold(Bounds::from_point(first), Bounds::include))
    }

    pub fn into_parts(self) -> (Vec<PositionedNode>, Vec<LayoutEdge>) {
        (self.nodes, self.edges)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use serde_json::json;

    use super::*;
    use crate::identifier::Scope;

    fn sample_graph() -> LayoutGraph {
        let task = NodeId::state(&Scope::main(), "Work");
        let fail = NodeId::state(&Scope::main(), "Failed");
        LayoutGraph::new(
            vec![
                PositionedNode::new(NodeId::Entry, NodeKind::Entry, "Start", Point::default()),
                PositionedNode::new(
                    task.clone(),
                    NodeKind::State(StateType::Task),
                    "Work",
                    Point::new(0.0, 100.0),
                )
                .with_flags(NodeFlags {
                    is_branch_member: false,
                    has_error_output: true,
                }),
                PositionedNode::new(
                    fail.clone(),
                    NodeKind::State(StateType::Fail),
                    "Failed",
                    Point::new(220.0, 100.0),
                ),
            ],
            vec![
                LayoutEdge::new("e0", NodeId::Entry, task.clone(), EdgeKind::Entry),
                LayoutEdge::new("e1", task, fail, EdgeKind::Error)
                    .with_ports(Port::Error, Port::Error),
            ],
        )
    }

    #[test]
    fn test_empty_graph() {
        let graph = LayoutGraph::empty();
        assert!(graph.is_empty());
        assert!(graph.bounds().is_none());
        assert_eq!(
            serde_json::to_value(&graph).unwrap(),
            json!({"nodes": [], "edges": []})
        );
    }

    #[test]
    fn test_node_serialization() {
        let graph = sample_graph();
        let value = serde_json::to_value(&graph.nodes()[1]).unwrap();

        assert_eq!(
            value,
            json!({
                "id": "state:Work",
                "kind": "Task",
                "label": "Work",
                "x": 0.0,
                "y": 100.0,
                "flags": {"isBranchMember": false, "hasErrorOutput": true}
            })
        );
    }

    #[test]
    fn test_edge_serialization_skips_missing_fields() {
        let graph = sample_graph();
        let entry = serde_json::to_value(&graph.edges()[0]).unwrap();
        let error = serde_json::to_value(&graph.edges()[1]).unwrap();

        assert_eq!(
            entry,
            json!({"id": "e0", "source": "entry", "target": "state:Work", "kind": "entry"})
        );
        assert_eq!(error["kind"], "error");
        assert_eq!(error["sourcePort"], "error");
        assert_eq!(error["targetPort"], "error");
        assert!(error.get("label").is_none());
    }

    #[test]
    fn test_incoming_and_outgoing() {
        let graph = sample_graph();
        let task = NodeId::state(&Scope::main(), "Work");

        assert_eq!(graph.incoming(&task).count(), 1);
        assert_eq!(graph.outgoing(&task).count(), 1);
        assert_eq!(graph.outgoing(&NodeId::Entry).count(), 1);
        assert_eq!(graph.state_nodes().count(), 2);
    }

    #[test]
    fn test_bounds_cover_all_nodes() {
        let bounds = sample_graph().bounds().unwrap();
        assert_approx_eq!(f32, bounds.min_x(), 0.0);
        assert_approx_eq!(f32, bounds.max_x(), 220.0);
        assert_approx_eq!(f32, bounds.max_y(), 100.0);
    }

    #[test]
    fn test_kind_helpers() {
        assert!(NodeKind::Entry.is_marker());
        assert!(NodeKind::Exit.is_marker());
        assert!(!NodeKind::State(StateType::Fail).is_marker());
        assert_eq!(NodeKind::State(StateType::Choice).to_string(), "Choice");

        assert!(EdgeKind::Default.is_dashed());
        assert!(!EdgeKind::Conditional.is_dashed());
    }
}
