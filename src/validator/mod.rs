//! Whole-graph validation.
//!
//! The validator never fails: every problem it finds becomes a
//! [`Diagnostic`]. Errors block compilation, warnings are advisory.

use crate::graph::WorkflowGraph;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

mod rules;
pub mod status;

use rules::{RuleContext, ValidationRule};
pub use status::{NodeStatus, classify};

/// Diagnostic severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single finding. `node_id` is `None` for graph-level findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub node_id: Option<String>,
    #[serde(rename = "type")]
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn error(node_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Some(node_id.into()), Severity::Error, message)
    }

    pub fn warning(node_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Some(node_id.into()), Severity::Warning, message)
    }

    pub fn graph_error(message: impl Into<String>) -> Self {
        Self::new(None, Severity::Error, message)
    }

    pub fn graph_warning(message: impl Into<String>) -> Self {
        Self::new(None, Severity::Warning, message)
    }

    fn new(node_id: Option<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            node_id,
            severity,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node_id {
            Some(node_id) => write!(f, "[{}] {}: {}", self.severity, node_id, self.message),
            None => write!(f, "[{}] {}", self.severity, self.message),
        }
    }
}

/// Outcome of validating a graph. `is_valid` holds exactly when `errors` is
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Splits diagnostics by severity, keeping their emission order.
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            diagnostics.into_iter().partition(Diagnostic::is_error);
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// All diagnostics attached to `node_id`, errors first.
    pub fn for_node<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .filter(move |d| d.node_id.as_deref() == Some(node_id))
    }

    /// Badge status of a node as seen by the whole-graph validation.
    pub fn status_of(&self, node_id: &str) -> NodeStatus {
        NodeStatus::from_diagnostics(self.for_node(node_id))
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::from_diagnostics(Vec::new())
    }
}

/// What to do with edges whose source or target is not a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DanglingEdgePolicy {
    /// Drop them from every lookup without reporting.
    #[default]
    Ignore,
    /// Report each one as an error.
    Reject,
}

/// How the branch connectivity warning is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BranchCoverage {
    /// Compare the number of outgoing edges with the number of paths.
    #[default]
    Count,
    /// Require an edge on every `branch-{i}` handle.
    PerHandle,
}

/// Validator switches. The default reproduces the editor's live checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidatorConfig {
    /// Report an empty graph as an error instead of accepting it.
    pub reject_empty: bool,
    pub dangling_edges: DanglingEdgePolicy,
    pub branch_coverage: BranchCoverage,
    /// Report duplicate non-empty `tempId`s as errors.
    pub unique_temp_ids: bool,
}

impl ValidatorConfig {
    /// Every optional check switched on.
    pub fn strict() -> Self {
        Self {
            reject_empty: true,
            dangling_edges: DanglingEdgePolicy::Reject,
            branch_coverage: BranchCoverage::PerHandle,
            unique_temp_ids: true,
        }
    }

    pub fn with_reject_empty(mut self, reject_empty: bool) -> Self {
        self.reject_empty = reject_empty;
        self
    }
}

/// Runs the rule set over a graph.
pub struct Validator {
    config: ValidatorConfig,
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        Self {
            config,
            rules: rules::rules_for(&config),
        }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn validate(&self, graph: &WorkflowGraph) -> ValidationResult {
        let mut diagnostics = Vec::new();

        if graph.is_empty() {
            if self.config.reject_empty {
                diagnostics.push(Diagnostic::graph_error(rules::EMPTY_WORKFLOW));
            }
            return ValidationResult::from_diagnostics(diagnostics);
        }

        let index = graph.index();
        let context = RuleContext {
            index: &index,
            config: &self.config,
        };
        for rule in &self.rules {
            let before = diagnostics.len();
            rule.check(&context, &mut diagnostics);
            if diagnostics.len() > before {
                debug!(
                    rule = rule.name(),
                    found = diagnostics.len() - before,
                    "validation rule reported"
                );
            }
        }

        let result = ValidationResult::from_diagnostics(diagnostics);
        debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "validated workflow graph"
        );
        result
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates with the default configuration.
pub fn validate(graph: &WorkflowGraph) -> ValidationResult {
    Validator::new().validate(graph)
}
