use crate::error::CompileError;
use crate::graph::WorkflowGraph;
use crate::validator::{ValidationResult, Validator, ValidatorConfig};
use tracing::{debug, warn};

mod builder;
pub mod ir;

use builder::StepBuilder;
pub use ir::*;

/// Compiles a validated [`WorkflowGraph`] into a [`WorkflowJson`].
///
/// Compilation is gated on validity alone: warnings never block it, and any
/// error makes [`Compiler::compile`] return [`CompileError::InvalidWorkflow`].
/// The output only depends on the graph, so compiling an unchanged graph
/// twice yields identical JSON.
pub struct Compiler<'a> {
    graph: &'a WorkflowGraph,
    workflow_id: Option<String>,
    validator_config: ValidatorConfig,
}

pub struct CompilerBuilder<'a> {
    graph: &'a WorkflowGraph,
    workflow_id: Option<String>,
    validator_config: ValidatorConfig,
}

impl<'a> CompilerBuilder<'a> {
    pub fn new(graph: &'a WorkflowGraph) -> Self {
        Self {
            graph,
            workflow_id: None,
            validator_config: ValidatorConfig::default(),
        }
    }

    /// Id of an already persisted workflow. Without it the output carries
    /// [`NEW_WORKFLOW_ID`].
    pub fn workflow_id(mut self, workflow_id: impl Into<String>) -> Self {
        self.workflow_id = Some(workflow_id.into());
        self
    }

    /// Configuration used by [`Compiler::generate`].
    pub fn validator_config(mut self, config: ValidatorConfig) -> Self {
        self.validator_config = config;
        self
    }

    pub fn build(self) -> Compiler<'a> {
        Compiler {
            graph: self.graph,
            workflow_id: self.workflow_id,
            validator_config: self.validator_config,
        }
    }
}

impl<'a> Compiler<'a> {
    pub fn builder(graph: &'a WorkflowGraph) -> CompilerBuilder<'a> {
        CompilerBuilder::new(graph)
    }

    pub fn new(graph: &'a WorkflowGraph) -> Self {
        CompilerBuilder::new(graph).build()
    }

    /// Emits one step per node, in node order.
    ///
    /// `validation` must come from validating this same graph; callers are
    /// expected to re-validate after every edit.
    pub fn compile(&self, validation: &ValidationResult) -> Result<WorkflowJson, CompileError> {
        if !validation.is_valid {
            debug!(
                errors = validation.errors.len(),
                "refusing to compile an invalid workflow"
            );
            return Err(CompileError::InvalidWorkflow {
                errors: validation.errors.clone(),
            });
        }

        let index = self.graph.index();
        let start_step_temp_id = index
            .start_node()
            .map(|node| node.data.temp_id.clone())
            .unwrap_or_default();

        let builder = StepBuilder::new(&index);
        let steps = self
            .graph
            .nodes
            .iter()
            .map(|node| builder.build_step(node))
            .collect::<Result<Vec<_>, _>>()?;

        let workflow_id = self
            .workflow_id
            .clone()
            .unwrap_or_else(|| NEW_WORKFLOW_ID.to_string());
        debug!(
            workflow_id = %workflow_id,
            start = %start_step_temp_id,
            steps = steps.len(),
            "compiled workflow"
        );

        Ok(WorkflowJson {
            workflow_id,
            start_step_temp_id,
            steps,
        })
    }

    /// The save-time entry point: rejects an empty graph, validates, then
    /// compiles.
    pub fn generate(&self) -> Result<WorkflowJson, CompileError> {
        if self.graph.is_empty() {
            warn!("cannot generate an empty workflow");
            return Err(CompileError::EmptyWorkflow);
        }
        let validator = Validator::with_config(self.validator_config.with_reject_empty(true));
        let validation = validator.validate(self.graph);
        self.compile(&validation)
    }
}
