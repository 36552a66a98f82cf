//! Integration tests for Keiro
//!
//! End-to-end tests that load an editor graph, validate it, compile it, and
//! lay it out.
//!
mod common;
use common::*;
use keiro::prelude::*;
use serde_json::json;

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn test_editor_graph_compiles_end_to_end() {
        let graph = WorkflowGraph::from_json(EDITOR_GRAPH_JSON).expect("Failed to parse graph");
        let validation = Validator::new().validate(&graph);

        assert!(validation.is_valid, "unexpected errors: {:?}", validation.errors);
        assert!(validation.warnings.is_empty());

        let workflow = Compiler::builder(&graph)
            .workflow_id("wf-onboarding")
            .build()
            .compile(&validation)
            .expect("Failed to compile workflow");

        assert_eq!(workflow.workflow_id, "wf-onboarding");
        assert_eq!(workflow.start_step_temp_id, "step-1");

        let mail = workflow.step("step-1").expect("mail step");
        assert_eq!(mail.step_name, "Send welcome mail");
        assert_eq!(mail.next_step_temp_id.as_deref(), Some("step-2"));
        assert_eq!(mail.config["to"], json!("{{user.email}}"));

        let plan = workflow.step("step-2").expect("branch step");
        assert_eq!(plan.step_name, "Check plan");
        assert_eq!(plan.branch_target(0), Some("step-3"));
        assert_eq!(plan.branch_target(1), Some("step-4"));
    }

    #[test]
    fn test_legacy_operator_names_are_normalized() {
        let graph = WorkflowGraph::from_json(EDITOR_GRAPH_JSON).expect("Failed to parse graph");
        let branches = &graph.node("n2").expect("branch node").data.branches;

        assert_eq!(branches[0].conditions[0].operator, ConditionOperator::Eq);
        assert_eq!(branches[1].conditions[0].operator, ConditionOperator::IsEmpty);
        assert_eq!(branches[1].conditions[0].value, None);
        assert_eq!(branches[1].condition_logic, ConditionLogic::Or);

        let reserialized = serde_json::to_value(&branches[0]).expect("serializable");
        assert_eq!(reserialized["conditions"][0]["operator"], json!("eq"));
    }

    #[test]
    fn test_graph_json_round_trip() {
        let graph = WorkflowGraph::from_json(EDITOR_GRAPH_JSON).expect("Failed to parse graph");
        let json = graph.to_json().expect("Failed to serialize graph");
        let reparsed = WorkflowGraph::from_json(&json).expect("Failed to reparse graph");

        assert_eq!(reparsed, graph);
    }

    #[test]
    fn test_malformed_graph_json_is_an_error() {
        let error = WorkflowGraph::from_json(r#"{ "nodes": [ { "id": "n1" } ] }"#).unwrap_err();

        assert!(matches!(error, GraphError::JsonParseError(_)));
    }

    #[test]
    fn test_arrange_then_compile_is_unchanged() {
        let mut graph = create_approval_flow();
        let before = Compiler::new(&graph).generate().expect("Failed to generate workflow");

        graph.auto_arrange();
        let after = Compiler::new(&graph).generate().expect("Failed to generate workflow");

        assert_eq!(before, after);
    }

    #[test]
    fn test_compiled_workflow_writes_to_disk() {
        let graph = create_approval_flow();
        let workflow = Compiler::new(&graph).generate().expect("Failed to generate workflow");

        let path = std::env::temp_dir().join(format!("keiro-{}.json", std::process::id()));
        std::fs::write(&path, workflow.to_json().expect("serializable")).expect("write");
        let written = std::fs::read_to_string(&path).expect("read");
        std::fs::remove_file(&path).ok();

        let reparsed: WorkflowJson = serde_json::from_str(&written).expect("Failed to reparse workflow");
        assert_eq!(reparsed, workflow);
    }

    #[test]
    fn test_unknown_operator_passes_through_to_compiled_branch() {
        let json = json!({
            "nodes": [
                {
                    "id": "b",
                    "type": "branch",
                    "data": {
                        "tempId": "t-b",
                        "branches": [
                            { "name": "Listed", "conditions": [{ "field": "f", "operator": "in", "value": [1, 2] }] },
                            { "name": "Rest", "conditions": [{ "field": "f", "operator": "eq", "value": 3 }] }
                        ]
                    }
                },
                { "id": "x", "type": "action", "data": { "tempId": "t-x", "actionId": "noop" } },
                { "id": "y", "type": "action", "data": { "tempId": "t-y", "actionId": "noop" } }
            ],
            "edges": [
                { "id": "e1", "source": "b", "target": "x", "sourceHandle": "branch-0" },
                { "id": "e2", "source": "b", "target": "y", "sourceHandle": "branch-1" }
            ]
        })
        .to_string();
        let graph = WorkflowGraph::from_json(&json).expect("Failed to parse graph");
        let workflow = Compiler::new(&graph).generate().expect("Failed to generate workflow");
        let step = workflow.step("t-b").expect("branch step");

        assert_eq!(
            step.config["branches"][0]["conditions"][0],
            json!({ "field": "f", "operator": "in", "value": [1, 2] })
        );
        assert_eq!(step.branch_target(0), Some("t-x"));
    }

    #[test]
    fn test_unknown_node_data_survives_round_trip() {
        let json = json!({
            "nodes": [{
                "id": "n1",
                "type": "action",
                "position": { "x": 0.0, "y": 0.0 },
                "data": {
                    "tempId": "t1",
                    "actionId": "noop",
                    "color": "#ff8800",
                    "notes": { "author": "ops", "pinned": true }
                }
            }],
            "edges": []
        })
        .to_string();
        let mut graph = WorkflowGraph::from_json(&json).expect("Failed to parse graph");
        assert_eq!(graph.nodes[0].data.extra["color"], json!("#ff8800"));

        graph.auto_arrange();
        let written: serde_json::Value =
            serde_json::from_str(&graph.to_json().expect("serializable")).expect("valid JSON");

        assert_eq!(written["nodes"][0]["data"]["color"], json!("#ff8800"));
        assert_eq!(
            written["nodes"][0]["data"]["notes"],
            json!({ "author": "ops", "pinned": true })
        );
    }
}
