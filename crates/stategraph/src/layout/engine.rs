//! Stacking layout engine for workflow definitions.
//!
//! The engine walks the definition once, depth first from the start state,
//! and places every reachable state exactly once:
//!
//! - sequential successors stack one vertical step below their predecessor;
//! - choice targets and parallel branches fan out horizontally, centered on
//!   their parent, one branch spacing apart;
//! - catch targets go to an error side lane right of the throwing state;
//! - a Parallel's successor sits below its tallest branch and receives one
//!   rejoin edge per branch tail.
//!
//! Transitions to already visited states only add an edge, which is what
//! keeps cyclic definitions finite.

use log::{debug, info, warn};

use stategraph_core::{
    definition::{
        CatchRule, ChoiceState, ParallelState, StateKind, StateType, Transition, WorkflowDefinition,
    },
    geometry::Point,
    graph::{EdgeKind, LayoutGraph, NodeFlags, NodeKind, Port},
    identifier::{NodeId, Scope},
};

use super::context::{LayoutContext, ScopeWalk};
use crate::{analysis, config::LayoutConfig};

const ENTRY_LABEL: &str = "Start";
const EXIT_LABEL: &str = "End";
const DEFAULT_LABEL: &str = "default";

/// Layout engine holding the spacing constants.
///
/// # Examples
///
/// ```
/// # use stategraph::layout::Engine;
/// let definition = stategraph_parser::parse(r#"{"StartAt": "A", "States": {
///     "A": {"Type": "Pass", "End": true}
/// }}"#).unwrap();
///
/// let graph = Engine::new().calculate_layout(&definition);
/// // entry marker, the state and its exit marker
/// assert_eq!(graph.nodes().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    vertical_spacing: f32,
    branch_spacing: f32,
    error_lane_offset: f32,
    min_node_gap: f32,
}

impl Default for Engine {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

impl Engine {
    /// Create an engine with the default spacing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the spacing of `config`.
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            vertical_spacing: config.vertical_spacing(),
            branch_spacing: config.branch_spacing(),
            error_lane_offset: config.error_lane_offset(),
            min_node_gap: config.min_node_gap(),
        }
    }

    pub fn set_vertical_spacing(&mut self, spacing: f32) -> &mut Self {
        self.vertical_spacing = spacing;
        self
    }

    pub fn set_branch_spacing(&mut self, spacing: f32) -> &mut Self {
        self.branch_spacing = spacing;
        self
    }

    pub fn set_error_lane_offset(&mut self, offset: f32) -> &mut Self {
        self.error_lane_offset = offset;
        self
    }

    /// Set the minimum horizontal distance between nodes on one row.
    pub fn set_min_node_gap(&mut self, gap: f32) -> &mut Self {
        self.min_node_gap = gap;
        self
    }

    /// Calculate the layout graph of a definition.
    ///
    /// A definition without states, or whose start state is not one of its
    /// states, yields the empty graph.
    pub fn calculate_layout(&self, definition: &WorkflowDefinition) -> LayoutGraph {
        if definition.states().is_empty() || !definition.has_valid_start() {
            warn!(
                start = definition.start_state(),
                states_len = definition.states().len();
                "Definition has no usable start state, returning empty graph",
            );
            return LayoutGraph::empty();
        }

        info!(states_len = definition.states().len(); "Calculating layout");
        let mut ctx = LayoutContext::new(self.min_node_gap);
        let mut walk = ScopeWalk::new(definition, Scope::main());
        Self::report_unreachable(&walk);

        let entry = ctx.place(
            NodeId::Entry,
            NodeKind::Entry,
            ENTRY_LABEL,
            Point::default(),
            NodeFlags::default(),
        );
        let start = definition.start_state();
        ctx.connect(&NodeId::Entry, &walk.node_id(start), EdgeKind::Entry);
        let bottom = self.visit_state(&mut ctx, &mut walk, start, entry.add_y(self.vertical_spacing));

        let graph = ctx.finish();
        info!(
            nodes_len = graph.nodes().len(),
            edges_len = graph.edges().len(),
            bottom;
            "Layout calculated",
        );
        graph
    }

    fn report_unreachable(walk: &ScopeWalk<'_>) {
        for name in analysis::unreachable_states(walk.definition()) {
            warn!(state = name; "State is unreachable from the start state and is not laid out");
        }
    }

    /// Lays out `name` and everything first reached from it; returns the
    /// lowest y used by the subtree.
    fn visit_state<'d>(
        &self,
        ctx: &mut LayoutContext,
        walk: &mut ScopeWalk<'d>,
        name: &'d str,
        anchor: Point,
    ) -> f32 {
        let Some(spec) = walk.definition().state(name) else {
            return anchor.y();
        };
        let first_visit = walk.visit(name);
        debug_assert!(first_visit, "state `{name}` laid out twice");

        let id = walk.node_id(name);
        let flags = NodeFlags {
            is_branch_member: walk.in_branch(),
            has_error_output: !spec.catch_rules().is_empty(),
        };
        let position = ctx.place(
            id.clone(),
            NodeKind::State(spec.state_type()),
            name,
            anchor,
            flags,
        );

        let subtree = match spec.kind() {
            StateKind::Task(transition)
            | StateKind::Pass(transition)
            | StateKind::Wait(transition)
            | StateKind::Map(transition)
            | StateKind::Other { transition, .. } => match transition {
                Transition::Next(target) => self.follow(
                    ctx,
                    walk,
                    &id,
                    target,
                    position.add_y(self.vertical_spacing),
                    EdgeKind::Sequential,
                    None,
                ),
                Transition::End => self.terminate(ctx, walk, &id, position),
                Transition::Unset => None,
            },
            StateKind::Succeed => {
                if walk.in_branch() {
                    walk.push_tail(id.clone());
                }
                None
            }
            StateKind::Fail => None,
            StateKind::Choice(choice) => self.visit_choice(ctx, walk, &id, position, choice),
            StateKind::Parallel(parallel) => {
                self.visit_parallel(ctx, walk, name, &id, position, parallel)
            }
        };
        let catches = self.visit_catches(ctx, walk, &id, position, spec.catch_rules());

        [subtree, catches]
            .into_iter()
            .flatten()
            .fold(position.y(), f32::max)
    }

    /// Adds the edge `source -> target` and lays out `target` at `anchor`
    /// when it has not been visited yet.
    #[allow(clippy::too_many_arguments)]
    fn follow<'d>(
        &self,
        ctx: &mut LayoutContext,
        walk: &mut ScopeWalk<'d>,
        source: &NodeId,
        target: &'d str,
        anchor: Point,
        kind: EdgeKind,
        label: Option<&str>,
    ) -> Option<f32> {
        if walk.definition().state(target).is_none() {
            debug!(source:%, to = target; "Dropping transition to undefined state");
            return None;
        }

        let target_id = walk.node_id(target);
        ctx.connect_with(source, &target_id, kind, |edge| match label {
            Some(label) => edge.with_label(label),
            None => edge,
        });

        if walk.is_visited(target) {
            return None;
        }
        Some(self.visit_state(ctx, walk, target, anchor))
    }

    /// Ends the flow at `id`: an exit marker below it in the main flow, a
    /// branch tail inside a Parallel branch.
    fn terminate(
        &self,
        ctx: &mut LayoutContext,
        walk: &mut ScopeWalk<'_>,
        id: &NodeId,
        position: Point,
    ) -> Option<f32> {
        if walk.in_branch() {
            walk.push_tail(id.clone());
            return None;
        }
        let (exit, exit_position) = self.place_exit(ctx, id, position.add_y(self.vertical_spacing));
        ctx.connect(id, &exit, EdgeKind::Exit);
        Some(exit_position.y())
    }

    fn place_exit(&self, ctx: &mut LayoutContext, terminal: &NodeId, anchor: Point) -> (NodeId, Point) {
        let exit = NodeId::exit(terminal);
        let position = ctx.place(
            exit.clone(),
            NodeKind::Exit,
            EXIT_LABEL,
            anchor,
            NodeFlags::default(),
        );
        (exit, position)
    }

    /// Anchors of `count` slots one step below `parent`, centered on it.
    fn spread(&self, parent: Point, count: usize) -> Vec<Point> {
        let width = count.saturating_sub(1) as f32 * self.branch_spacing;
        let left = parent.x() - width / 2.0;
        (0..count)
            .map(|index| {
                Point::new(
                    left + index as f32 * self.branch_spacing,
                    parent.y() + self.vertical_spacing,
                )
            })
            .collect()
    }

    fn visit_choice<'d>(
        &self,
        ctx: &mut LayoutContext,
        walk: &mut ScopeWalk<'d>,
        id: &NodeId,
        position: Point,
        choice: &'d ChoiceState,
    ) -> Option<f32> {
        let rules: Vec<(&'d str, EdgeKind, &'d str)> = choice
            .choices()
            .iter()
            .map(|rule| (rule.next(), EdgeKind::Conditional, rule.condition_summary()))
            .chain(
                choice
                    .default_next()
                    .map(|target| (target, EdgeKind::Default, DEFAULT_LABEL)),
            )
            .collect();

        // One slot per distinct target that still needs a position.
        let mut slots: Vec<&str> = Vec::new();
        for (target, ..) in &rules {
            if walk.definition().state(target).is_some()
                && !walk.is_visited(target)
                && !slots.contains(target)
            {
                slots.push(*target);
            }
        }
        let anchors = self.spread(position, slots.len());
        debug!(rules_len = rules.len(), slots_len = slots.len(); "Choice fan-out");

        let mut bottom = None;
        for (target, kind, label) in rules {
            let anchor = slots
                .iter()
                .position(|slot| *slot == target)
                .map_or(position.add_y(self.vertical_spacing), |index| anchors[index]);
            if let Some(extent) = self.follow(ctx, walk, id, target, anchor, kind, Some(label)) {
                bottom = Some(bottom.map_or(extent, |current: f32| current.max(extent)));
            }
        }
        bottom
    }

    fn visit_parallel<'d>(
        &self,
        ctx: &mut LayoutContext,
        walk: &mut ScopeWalk<'d>,
        name: &str,
        id: &NodeId,
        position: Point,
        parallel: &'d ParallelState,
    ) -> Option<f32> {
        let branches = parallel.branches();
        let anchors = self.spread(position, branches.len());

        let mut tails = Vec::new();
        let mut branches_bottom = position.y();
        for (index, (branch, anchor)) in branches.iter().zip(anchors).enumerate() {
            if branch.states().is_empty() || !branch.has_valid_start() {
                warn!(parallel = name, index; "Skipping branch without a usable start state");
                continue;
            }
            let mut branch_walk = ScopeWalk::new(branch, walk.scope().branch(name, index));
            Self::report_unreachable(&branch_walk);

            let start = branch.start_state();
            ctx.connect(id, &branch_walk.node_id(start), EdgeKind::Sequential);
            let bottom = self.visit_state(ctx, &mut branch_walk, start, anchor);
            branches_bottom = branches_bottom.max(bottom);
            tails.extend(branch_walk.take_tails());
        }
        debug!(
            parallel = name,
            branches_len = branches.len(),
            tails_len = tails.len();
            "Parallel branches laid out",
        );

        // Without any tail the Parallel itself continues the flow.
        if tails.is_empty() {
            tails.push(id.clone());
        }
        let join = Point::new(position.x(), branches_bottom + self.vertical_spacing);

        match parallel.transition() {
            Transition::Next(target) => {
                if walk.definition().state(target).is_none() {
                    debug!(parallel = name, to = target.as_str(); "Dropping transition to undefined state");
                    return Some(branches_bottom);
                }
                let target_id = walk.node_id(target);
                for tail in &tails {
                    ctx.connect(tail, &target_id, EdgeKind::Sequential);
                }
                if walk.is_visited(target) {
                    return Some(branches_bottom);
                }
                Some(self.visit_state(ctx, walk, target, join))
            }
            Transition::End if walk.in_branch() => {
                for tail in tails {
                    walk.push_tail(tail);
                }
                Some(branches_bottom)
            }
            Transition::End => {
                let (exit, exit_position) = self.place_exit(ctx, id, join);
                for tail in &tails {
                    ctx.connect(tail, &exit, EdgeKind::Exit);
                }
                Some(exit_position.y())
            }
            Transition::Unset => Some(branches_bottom),
        }
    }

    fn visit_catches<'d>(
        &self,
        ctx: &mut LayoutContext,
        walk: &mut ScopeWalk<'d>,
        id: &NodeId,
        position: Point,
        rules: &'d [CatchRule],
    ) -> Option<f32> {
        let lane = position.add_x(self.error_lane_offset);
        let mut bottom = None;
        for rule in rules {
            let target = rule.next();
            let Some(target_spec) = walk.definition().state(target) else {
                debug!("Dropping catch rule of {id} to undefined state `{target}`");
                continue;
            };
            let target_id = walk.node_id(target);
            let is_fail = target_spec.state_type() == StateType::Fail;
            let enters_lane = !walk.is_visited(target);
            let target_port = if (enters_lane && is_fail) || ctx.is_side_lane_fail(&target_id) {
                Port::Error
            } else {
                Port::Primary
            };
            ctx.connect_with(id, &target_id, EdgeKind::Error, |edge| {
                edge.with_ports(Port::Error, target_port)
            });

            if enters_lane {
                let extent = self.visit_state(ctx, walk, target, lane);
                if is_fail {
                    ctx.mark_side_lane_fail(target_id);
                }
                bottom = Some(bottom.map_or(extent, |current: f32| current.max(extent)));
            }
        }
        bottom
    }
}
