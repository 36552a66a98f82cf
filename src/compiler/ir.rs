//! The compiled workflow handed to persistence and the execution engine.
//! Field names and nullability are part of the wire contract.

use crate::graph::{ConditionData, ConditionLogic};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Workflow id used until the workflow has been saved once.
pub const NEW_WORKFLOW_ID: &str = "new-workflow";
/// Config keys injected into approval steps.
pub const ON_APPROVE_KEY: &str = "onApproveNextStepTempId";
pub const ON_REJECT_KEY: &str = "onRejectNextStepTempId";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowJson {
    pub workflow_id: String,
    pub start_step_temp_id: String,
    pub steps: Vec<WorkflowStep>,
}

impl WorkflowJson {
    pub fn step(&self, temp_id: &str) -> Option<&WorkflowStep> {
        self.steps.iter().find(|step| step.temp_id == temp_id)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    Action,
    Branch,
}

/// One step per graph node, linked to its successors by `tempId`.
///
/// `conditions` and `condition_logic` are step-level placeholders: branch
/// conditions live in the branch step's `config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub temp_id: String,
    pub step_name: String,
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub action_id: Option<String>,
    pub conditions: Vec<ConditionData>,
    pub condition_logic: ConditionLogic,
    pub config: Map<String, Value>,
    pub next_step_temp_id: Option<String>,
}

impl WorkflowStep {
    /// Resolved successor of the branch path at `index`.
    pub fn branch_target(&self, index: usize) -> Option<&str> {
        self.config
            .get("branches")?
            .get(index)?
            .get("targetStepTempId")?
            .as_str()
    }
}

/// Layout of a branch step's `config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BranchStepConfig {
    pub branches: Vec<CompiledBranch>,
    pub default_target_temp_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CompiledBranch {
    pub name: String,
    pub conditions: Vec<ConditionData>,
    pub condition_logic: ConditionLogic,
    pub target_step_temp_id: Option<String>,
    pub next_step_temp_id_after_branch: Option<String>,
}
