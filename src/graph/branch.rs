use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How the conditions of a single branch path are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConditionLogic {
    #[default]
    #[serde(rename = "AND", alias = "and")]
    And,
    #[serde(rename = "OR", alias = "or")]
    Or,
}

/// Comparison applied by a branch condition.
///
/// The short names are the canonical wire form; the long names used by older
/// editor builds are accepted as aliases on input. Any other name is kept
/// verbatim in [`ConditionOperator::Other`] and passed through to the
/// compiled workflow, since only the execution engine interprets operators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionOperator {
    #[serde(alias = "equals")]
    Eq,
    #[serde(alias = "notEquals")]
    Neq,
    #[serde(alias = "greaterThan")]
    Gt,
    #[serde(alias = "greaterThanOrEqual")]
    Gte,
    #[serde(alias = "lessThan")]
    Lt,
    #[serde(alias = "lessThanOrEqual")]
    Lte,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    IsEmpty,
    IsNotEmpty,
    #[serde(untagged)]
    Other(String),
}

impl ConditionOperator {
    /// Emptiness checks carry no comparison value.
    pub fn takes_value(&self) -> bool {
        !matches!(self, ConditionOperator::IsEmpty | ConditionOperator::IsNotEmpty)
    }
}

/// A single `field <operator> value` test inside a branch path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionData {
    pub field: String,
    pub operator: ConditionOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl ConditionData {
    pub fn new(field: impl Into<String>, operator: ConditionOperator, value: Option<Value>) -> Self {
        // `isEmpty`/`isNotEmpty` never keep a stale value from a previous operator.
        let value = if operator.takes_value() { value } else { None };
        Self {
            field: field.into(),
            operator,
            value,
        }
    }
}

/// One outgoing path of a branch node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchData {
    pub name: String,
    #[serde(default)]
    pub conditions: Vec<ConditionData>,
    #[serde(default)]
    pub condition_logic: ConditionLogic,
    #[serde(default)]
    pub target_temp_id: Option<String>,
}

impl BranchData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_condition(mut self, condition: ConditionData) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }
}
