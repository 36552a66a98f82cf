use super::{Diagnostic, Severity, rules};
use crate::graph::Node;
use serde::{Deserialize, Serialize};

/// Live badge state of a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Valid,
    Warning,
    Error,
}

impl NodeStatus {
    /// The most severe status among `diagnostics`.
    pub fn from_diagnostics<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>) -> Self {
        diagnostics
            .into_iter()
            .fold(NodeStatus::Valid, |status, diagnostic| {
                match (status, diagnostic.severity) {
                    (_, Severity::Error) | (NodeStatus::Error, _) => NodeStatus::Error,
                    (_, Severity::Warning) => NodeStatus::Warning,
                }
            })
    }
}

/// Classifies one node without looking at the rest of the graph.
///
/// Runs the same node-local rules as [`Validator`](super::Validator), so a
/// node's badge agrees with the full validation on everything that does not
/// depend on edges.
pub fn classify(node: &Node) -> NodeStatus {
    let mut diagnostics = Vec::new();
    rules::check_node_configuration(node, &mut diagnostics);
    NodeStatus::from_diagnostics(&diagnostics)
}
