use super::{BranchCoverage, DanglingEdgePolicy, Diagnostic, ValidatorConfig};
use crate::graph::{GraphIndex, Node, NodeKind, branch_handle};
use ahash::AHashSet;
use itertools::Itertools;

pub(super) const EMPTY_WORKFLOW: &str = "Workflow is empty. Add at least one step";
const NO_START_NODE: &str =
    "No starting node found. All nodes have incoming connections, which creates a loop";
const NO_ACTION_SELECTED: &str = "No action selected";
const DISCONNECTED_NODE: &str = "Step is disconnected and will not execute";

/// Everything a rule may look at.
pub(super) struct RuleContext<'a> {
    pub index: &'a GraphIndex<'a>,
    pub config: &'a ValidatorConfig,
}

/// One validation rule. Rules append diagnostics and never fail.
pub(super) trait ValidationRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn check(&self, ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>);
}

/// The rule set for `config`, in reporting order.
pub(super) fn rules_for(config: &ValidatorConfig) -> Vec<Box<dyn ValidationRule>> {
    let mut rules: Vec<Box<dyn ValidationRule>> = vec![
        Box::new(StartNodeRule),
        Box::new(NodeConfigurationRule),
        Box::new(DisconnectedNodeRule),
        Box::new(CycleRule),
    ];
    if config.dangling_edges == DanglingEdgePolicy::Reject {
        rules.push(Box::new(DanglingEdgeRule));
    }
    if config.unique_temp_ids {
        rules.push(Box::new(DuplicateTempIdRule));
    }
    rules
}

/// Checks that depend on nothing but the node itself. The live status badge
/// runs exactly these, so it cannot drift from the full validation.
pub(super) fn check_node_configuration(node: &Node, out: &mut Vec<Diagnostic>) {
    match node.kind {
        NodeKind::Action => check_action(node, out),
        NodeKind::Branch => check_branch_conditions(node, out),
    }
}

fn check_action(node: &Node, out: &mut Vec<Diagnostic>) {
    let selected = node
        .data
        .action_id
        .as_deref()
        .is_some_and(|action_id| !action_id.trim().is_empty());
    if !selected {
        out.push(Diagnostic::error(&node.id, NO_ACTION_SELECTED));
    }

    let Some(definition) = &node.data.action_definition else {
        return;
    };
    // Only key presence counts: an empty value is still configured.
    let missing = definition
        .required_fields()
        .filter(|field| !node.data.config.contains_key(&field.name))
        .map(|field| field.display_label())
        .join(", ");
    if !missing.is_empty() {
        out.push(Diagnostic::error(
            &node.id,
            format!("Missing required fields: {}", missing),
        ));
    }
}

fn check_branch_conditions(node: &Node, out: &mut Vec<Diagnostic>) {
    let without_conditions = node
        .data
        .branches
        .iter()
        .filter(|branch| !branch.has_conditions())
        .count();
    if without_conditions > 0 {
        out.push(Diagnostic::warning(
            &node.id,
            format!("{} branch path(s) without conditions", without_conditions),
        ));
    }
}

fn check_branch_connections(
    node: &Node,
    index: &GraphIndex<'_>,
    coverage: BranchCoverage,
    out: &mut Vec<Diagnostic>,
) {
    let declared = node.data.branches.len();
    match coverage {
        BranchCoverage::Count => {
            let connected = index.outgoing(&node.id).len();
            if connected < declared {
                out.push(Diagnostic::warning(
                    &node.id,
                    format!(
                        "Branch has unconnected paths ({} of {} connected)",
                        connected, declared
                    ),
                ));
            }
        }
        BranchCoverage::PerHandle => {
            let unconnected = node
                .data
                .branches
                .iter()
                .enumerate()
                .filter(|(i, _)| index.edge_from_handle(&node.id, &branch_handle(*i)).is_none())
                .map(|(_, branch)| branch.name.as_str())
                .join(", ");
            if !unconnected.is_empty() {
                out.push(Diagnostic::warning(
                    &node.id,
                    format!("Branch has unconnected paths: {}", unconnected),
                ));
            }
        }
    }
}

struct StartNodeRule;

impl ValidationRule for StartNodeRule {
    fn name(&self) -> &'static str {
        "start-node"
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
        let mut candidates = ctx.index.start_candidates();
        match (candidates.next(), candidates.next()) {
            (None, _) => out.push(Diagnostic::graph_error(NO_START_NODE)),
            (Some(start), Some(_)) => out.push(Diagnostic::graph_warning(format!(
                "Multiple starting nodes found. Only \"{}\" will be used as the start",
                start.display_name()
            ))),
            (Some(_), None) => {}
        }
    }
}

struct NodeConfigurationRule;

impl ValidationRule for NodeConfigurationRule {
    fn name(&self) -> &'static str {
        "node-configuration"
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
        for node in ctx.index.nodes() {
            check_node_configuration(node, out);
            if node.is_branch() {
                check_branch_connections(node, ctx.index, ctx.config.branch_coverage, out);
            }
        }
    }
}

struct DisconnectedNodeRule;

impl ValidationRule for DisconnectedNodeRule {
    fn name(&self) -> &'static str {
        "disconnected-node"
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
        let start_id = ctx.index.start_node().map(|node| node.id.as_str());
        for node in ctx.index.nodes() {
            // Nodes without outgoing edges are legitimate end steps.
            if ctx.index.incoming_count(&node.id) == 0 && Some(node.id.as_str()) != start_id {
                out.push(Diagnostic::warning(&node.id, DISCONNECTED_NODE));
            }
        }
    }
}

/// Depth-first search with a recursion stack. Reports the first back edge
/// only.
struct CycleRule;

impl ValidationRule for CycleRule {
    fn name(&self) -> &'static str {
        "cycle"
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
        let mut visited = AHashSet::new();
        let mut on_stack = AHashSet::new();
        for node in ctx.index.nodes() {
            if visited.contains(node.id.as_str()) {
                continue;
            }
            if let Some(looping) =
                find_back_edge(ctx.index, node.id.as_str(), &mut visited, &mut on_stack)
            {
                let name = ctx
                    .index
                    .node(looping)
                    .map(Node::display_name)
                    .unwrap_or(looping);
                out.push(Diagnostic::error(
                    looping,
                    format!("Circular dependency detected at \"{}\"", name),
                ));
                return;
            }
        }
    }
}

/// Returns the id of the node whose outgoing edge closes a cycle.
fn find_back_edge<'a>(
    index: &GraphIndex<'a>,
    node_id: &'a str,
    visited: &mut AHashSet<&'a str>,
    on_stack: &mut AHashSet<&'a str>,
) -> Option<&'a str> {
    visited.insert(node_id);
    on_stack.insert(node_id);

    for &edge in index.outgoing(node_id) {
        let target = edge.target.as_str();
        if on_stack.contains(target) {
            return Some(node_id);
        }
        if !visited.contains(target) {
            if let Some(found) = find_back_edge(index, target, visited, on_stack) {
                return Some(found);
            }
        }
    }

    on_stack.remove(node_id);
    None
}

struct DanglingEdgeRule;

impl ValidationRule for DanglingEdgeRule {
    fn name(&self) -> &'static str {
        "dangling-edge"
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
        for edge in ctx.index.dangling_edges() {
            let diagnostic = match (
                ctx.index.contains(&edge.source),
                ctx.index.contains(&edge.target),
            ) {
                (true, _) => Diagnostic::error(
                    &edge.source,
                    format!("Connection points to missing step '{}'", edge.target),
                ),
                (false, true) => Diagnostic::error(
                    &edge.target,
                    format!("Connection comes from missing step '{}'", edge.source),
                ),
                (false, false) => Diagnostic::graph_error(format!(
                    "Connection '{}' references missing steps '{}' and '{}'",
                    edge.id, edge.source, edge.target
                )),
            };
            out.push(diagnostic);
        }
    }
}

struct DuplicateTempIdRule;

impl ValidationRule for DuplicateTempIdRule {
    fn name(&self) -> &'static str {
        "duplicate-temp-id"
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
        let mut seen = AHashSet::new();
        for node in ctx.index.nodes() {
            let temp_id = node.data.temp_id.as_str();
            if !temp_id.is_empty() && !seen.insert(temp_id) {
                out.push(Diagnostic::error(
                    &node.id,
                    format!("Duplicate step identifier '{}'", temp_id),
                ));
            }
        }
    }
}
