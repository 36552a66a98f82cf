use super::ir::{
    BranchStepConfig, CompiledBranch, ON_APPROVE_KEY, ON_REJECT_KEY, StepType, WorkflowStep,
};
use crate::error::CompileError;
use crate::graph::{
    APPROVE_HANDLE, ConditionLogic, GraphIndex, Node, NodeKind, REJECT_HANDLE, branch_handle,
};
use serde_json::{Map, Value};

/// Turns graph nodes into linked workflow steps. Edges are resolved through
/// node `id`; the emitted links always use `tempId`.
pub(super) struct StepBuilder<'a> {
    index: &'a GraphIndex<'a>,
}

impl<'a> StepBuilder<'a> {
    pub(super) fn new(index: &'a GraphIndex<'a>) -> Self {
        Self { index }
    }

    pub(super) fn build_step(&self, node: &Node) -> Result<WorkflowStep, CompileError> {
        match node.kind {
            NodeKind::Action => Ok(self.build_action_step(node)),
            NodeKind::Branch => self.build_branch_step(node),
        }
    }

    fn build_action_step(&self, node: &Node) -> WorkflowStep {
        let mut config = node.data.config.clone();

        // Approval steps route through config; the step-level pointer stays empty.
        let next_step_temp_id = if node.is_approval() {
            config.insert(
                ON_APPROVE_KEY.to_string(),
                nullable(self.handle_target(node, APPROVE_HANDLE)),
            );
            config.insert(
                ON_REJECT_KEY.to_string(),
                nullable(self.handle_target(node, REJECT_HANDLE)),
            );
            None
        } else {
            self.linear_successor(node)
        };

        WorkflowStep {
            action_id: node.data.action_id.clone(),
            config,
            next_step_temp_id,
            ..self.step_shell(node, StepType::Action)
        }
    }

    fn build_branch_step(&self, node: &Node) -> Result<WorkflowStep, CompileError> {
        let branches = node
            .data
            .branches
            .iter()
            .enumerate()
            .map(|(i, branch)| CompiledBranch {
                name: branch.name.clone(),
                conditions: branch.conditions.clone(),
                condition_logic: branch.condition_logic,
                target_step_temp_id: self.handle_target(node, &branch_handle(i)),
                next_step_temp_id_after_branch: None,
            })
            .collect();

        let branch_config = BranchStepConfig {
            branches,
            default_target_temp_id: None,
        };
        let config = match serde_json::to_value(branch_config) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(CompileError::ConfigSerialization {
                    temp_id: node.data.temp_id.clone(),
                    message: format!("expected an object, found {}", other),
                });
            }
            Err(e) => {
                return Err(CompileError::ConfigSerialization {
                    temp_id: node.data.temp_id.clone(),
                    message: e.to_string(),
                });
            }
        };

        Ok(WorkflowStep {
            config,
            ..self.step_shell(node, StepType::Branch)
        })
    }

    fn step_shell(&self, node: &Node, step_type: StepType) -> WorkflowStep {
        let step_name = if node.data.step_name.is_empty() {
            node.data.label.clone()
        } else {
            node.data.step_name.clone()
        };
        WorkflowStep {
            temp_id: node.data.temp_id.clone(),
            step_name,
            step_type,
            action_id: None,
            conditions: Vec::new(),
            condition_logic: ConditionLogic::And,
            config: Map::new(),
            next_step_temp_id: None,
        }
    }

    /// Only one linear successor is representable: the first outgoing edge.
    fn linear_successor(&self, node: &Node) -> Option<String> {
        self.index
            .outgoing(&node.id)
            .first()
            .and_then(|edge| self.temp_id_of(&edge.target))
    }

    fn handle_target(&self, node: &Node, handle: &str) -> Option<String> {
        self.index
            .edge_from_handle(&node.id, handle)
            .and_then(|edge| self.temp_id_of(&edge.target))
    }

    fn temp_id_of(&self, node_id: &str) -> Option<String> {
        self.index
            .node(node_id)
            .map(|target| target.data.temp_id.clone())
    }
}

fn nullable(temp_id: Option<String>) -> Value {
    temp_id.map(Value::String).unwrap_or(Value::Null)
}
