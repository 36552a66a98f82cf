//! Common test utilities for building workflow graphs.
use keiro::graph::{APPROVE_HANDLE, REJECT_HANDLE, branch_handle};
use keiro::prelude::*;
use serde_json::json;

/// An action node with a selected action and no required fields.
#[allow(dead_code)]
pub fn action(id: &str) -> Node {
    Node::action(id, format!("t-{}", id)).with_action("noop")
}

/// An action node whose action declares `to` (required) and `cc` (optional).
#[allow(dead_code)]
pub fn email_action(id: &str) -> Node {
    Node::action(id, format!("t-{}", id))
        .with_action("send-email")
        .with_definition(ActionDefinition::new(vec![
            ActionField::required("to", "Recipient"),
            ActionField::optional("cc", "CC"),
        ]))
}

/// An action node routed on approve/reject.
#[allow(dead_code)]
pub fn approval(id: &str) -> Node {
    Node::action(id, format!("t-{}", id))
        .with_action("manager-approval")
        .with_definition(ActionDefinition::default().with_category("approval"))
}

/// A branch node whose paths all carry a condition.
#[allow(dead_code)]
pub fn branch(id: &str, paths: &[&str]) -> Node {
    let branches = paths
        .iter()
        .map(|name| {
            BranchData::new(*name).with_condition(ConditionData::new(
                "status",
                ConditionOperator::Eq,
                Some(json!(name)),
            ))
        })
        .collect();
    Node::branch(id, format!("t-{}", id)).with_branches(branches)
}

#[allow(dead_code)]
pub fn edge(source: &str, target: &str) -> Edge {
    Edge::new(source, target).with_id(format!("e-{}-{}", source, target))
}

#[allow(dead_code)]
pub fn branch_edge(source: &str, index: usize, target: &str) -> Edge {
    edge(source, target).with_source_handle(branch_handle(index))
}

#[allow(dead_code)]
pub fn approve_edge(source: &str, target: &str) -> Edge {
    edge(source, target).with_source_handle(APPROVE_HANDLE)
}

#[allow(dead_code)]
pub fn reject_edge(source: &str, target: &str) -> Edge {
    edge(source, target).with_source_handle(REJECT_HANDLE)
}

/// Checks whether any diagnostic message contains `needle`.
#[allow(dead_code)]
pub fn mentions(diagnostics: &[Diagnostic], needle: &str) -> bool {
    diagnostics.iter().any(|d| d.message.contains(needle))
}

/// Request approval, then branch on the amount:
/// `intake -> review (approve -> router, reject -> notify)`,
/// `router (branch-0 -> large, branch-1 -> small)`.
#[allow(dead_code)]
pub fn create_approval_flow() -> WorkflowGraph {
    WorkflowGraph::new(
        vec![
            email_action("intake").with_config("to", json!("ops@example.com")),
            approval("review"),
            branch("router", &["Large", "Small"]),
            action("large"),
            action("small"),
            action("notify"),
        ],
        vec![
            edge("intake", "review"),
            approve_edge("review", "router"),
            reject_edge("review", "notify"),
            branch_edge("router", 0, "large"),
            branch_edge("router", 1, "small"),
        ],
    )
}

/// A graph as the editor serializes it.
#[allow(dead_code)]
pub const EDITOR_GRAPH_JSON: &str = r#"{
  "nodes": [
    {
      "id": "n1",
      "type": "action",
      "position": { "x": 100, "y": 100 },
      "data": {
        "label": "Send welcome mail",
        "tempId": "step-1",
        "actionId": "send-email",
        "actionDefinition": {
          "fields": [{ "name": "to", "label": "Recipient", "required": true, "type": "text" }]
        },
        "config": { "to": "{{user.email}}" }
      }
    },
    {
      "id": "n2",
      "type": "branch",
      "position": { "x": 100, "y": 300 },
      "data": {
        "label": "Plan?",
        "tempId": "step-2",
        "stepName": "Check plan",
        "branches": [
          {
            "name": "Paid",
            "conditions": [{ "field": "plan", "operator": "equals", "value": "paid" }],
            "conditionLogic": "AND"
          },
          {
            "name": "Free",
            "conditions": [{ "field": "plan", "operator": "isEmpty" }],
            "conditionLogic": "OR"
          }
        ]
      }
    },
    {
      "id": "n3",
      "type": "action",
      "position": { "x": 0, "y": 500 },
      "data": { "label": "Onboard", "tempId": "step-3", "actionId": "create-task" }
    },
    {
      "id": "n4",
      "type": "action",
      "position": { "x": 300, "y": 500 },
      "data": { "label": "Upsell", "tempId": "step-4", "actionId": "create-task" }
    }
  ],
  "edges": [
    { "id": "e1", "source": "n1", "target": "n2" },
    { "id": "e2", "source": "n2", "target": "n4", "sourceHandle": "branch-1" },
    { "id": "e3", "source": "n2", "target": "n3", "sourceHandle": "branch-0" }
  ]
}"#;
