mod common;
use common::*;
use keiro::graph::{APPROVE_HANDLE, MIN_BRANCH_PATHS, branch_handle};
use keiro::layout::{GRID_SIZE, NODE_MARGIN, nodes_overlap};
use keiro::prelude::*;
use serde_json::json;

/// Builds `a -> b -> c` through the session API.
fn chain() -> (WorkflowGraph, String, String, String) {
    let mut graph = WorkflowGraph::default();
    let a = graph.add_node(NodeKind::Action, Position::new(0.0, 0.0)).id.clone();
    let b = graph.add_node(NodeKind::Action, Position::new(0.0, 200.0)).id.clone();
    let c = graph.add_node(NodeKind::Action, Position::new(0.0, 400.0)).id.clone();
    graph.connect(&a, &b, None).expect("Failed to connect a -> b");
    graph.connect(&b, &c, None).expect("Failed to connect b -> c");
    (graph, a, b, c)
}

#[test]
fn test_new_nodes_get_defaults_and_snapped_positions() {
    let mut graph = WorkflowGraph::default();
    let action = graph.add_node(NodeKind::Action, Position::new(113.0, 47.0)).clone();
    let branch = graph.add_node(NodeKind::Branch, Position::new(0.0, 0.0)).clone();

    assert_eq!(action.position, Position::new(120.0, 40.0));
    assert_eq!(action.data.label, "New Action");
    assert!(!action.data.temp_id.is_empty());
    assert_ne!(action.id, branch.id);
    assert_ne!(action.data.temp_id, branch.data.temp_id);

    assert_eq!(branch.data.label, "Condition");
    assert_eq!(branch.data.branches.len(), MIN_BRANCH_PATHS);
    assert_eq!(branch.data.branches[0].name, "Path 1");
}

#[test]
fn test_default_placement_does_not_stack_nodes() {
    let mut graph = WorkflowGraph::default();
    for _ in 0..5 {
        graph.add_node_at_default_position(NodeKind::Action, None);
    }

    for (i, a) in graph.nodes.iter().enumerate() {
        for b in &graph.nodes[i + 1..] {
            assert!(!nodes_overlap(a.position, b.position, 0.0));
        }
    }
}

#[test]
fn test_remove_node_drops_touching_edges() {
    let (mut graph, a, b, c) = chain();
    let removed = graph.remove_node(&b).expect("Failed to remove node");

    assert_eq!(removed.id, b);
    assert_eq!(graph.nodes.len(), 2);
    assert!(graph.edges.is_empty());
    assert!(graph.node(&a).is_some());
    assert!(graph.node(&c).is_some());
    assert_eq!(graph.remove_node(&b), Err(GraphError::NodeNotFound(b.clone())));
}

#[test]
fn test_connect_rejects_bad_requests() {
    let (mut graph, a, b, _) = chain();

    assert_eq!(
        graph.connect(&a, "missing", None).unwrap_err(),
        GraphError::NodeNotFound("missing".to_string())
    );
    assert_eq!(graph.connect(&a, &a, None).unwrap_err(), GraphError::SelfLoop(a.clone()));
    assert!(matches!(
        graph.connect(&a, &b, None).unwrap_err(),
        GraphError::DuplicateEdge { .. }
    ));
    assert_eq!(graph.edges.len(), 2);
}

#[test]
fn test_branch_handle_reconnect_replaces_edge() {
    let mut graph = WorkflowGraph::default();
    let router = graph.add_node(NodeKind::Branch, Position::default()).id.clone();
    let first = graph.add_node(NodeKind::Action, Position::default()).id.clone();
    let second = graph.add_node(NodeKind::Action, Position::default()).id.clone();
    let handle = branch_handle(0);

    graph.connect(&router, &first, Some(handle.as_str())).expect("connect first");
    graph.connect(&router, &second, Some(handle.as_str())).expect("connect second");

    let from_router: Vec<_> = graph.edges.iter().filter(|e| e.source == router).collect();
    assert_eq!(from_router.len(), 1);
    assert_eq!(from_router[0].target, second);

    let second_temp_id = graph.node(&second).map(|n| n.data.temp_id.clone());
    assert_eq!(
        graph.node(&router).and_then(|n| n.data.branches[0].target_temp_id.clone()),
        second_temp_id
    );
}

#[test]
fn test_approval_handles_are_exclusive() {
    let mut graph = WorkflowGraph::default();
    let review = graph.add_node(NodeKind::Action, Position::default()).id.clone();
    let x = graph.add_node(NodeKind::Action, Position::default()).id.clone();
    let y = graph.add_node(NodeKind::Action, Position::default()).id.clone();

    graph.connect(&review, &x, Some(APPROVE_HANDLE)).expect("approve x");
    graph.connect(&review, &y, Some(APPROVE_HANDLE)).expect("approve y");

    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.edges[0].target, y);
}

#[test]
fn test_connect_to_unknown_branch_path_fails() {
    let mut graph = WorkflowGraph::default();
    let router = graph.add_node(NodeKind::Branch, Position::default()).id.clone();
    let x = graph.add_node(NodeKind::Action, Position::default()).id.clone();

    assert_eq!(
        graph.connect(&router, &x, Some("branch-5")).unwrap_err(),
        GraphError::BranchIndexOutOfRange {
            node_id: router.clone(),
            index: 5
        }
    );
}

#[test]
fn test_disconnect_clears_branch_target() {
    let mut graph = WorkflowGraph::default();
    let router = graph.add_node(NodeKind::Branch, Position::default()).id.clone();
    let x = graph.add_node(NodeKind::Action, Position::default()).id.clone();
    let edge_id = graph
        .connect(&router, &x, Some("branch-1"))
        .expect("connect")
        .id
        .clone();

    graph.disconnect(&edge_id).expect("disconnect");

    assert!(graph.edges.is_empty());
    assert_eq!(graph.node(&router).map(|n| n.data.branches[1].target_temp_id.clone()), Some(None));
    assert_eq!(graph.disconnect(&edge_id), Err(GraphError::EdgeNotFound(edge_id)));
}

#[test]
fn test_remove_branch_path_renumbers_handles() {
    let mut graph = WorkflowGraph::default();
    let router = graph.add_node(NodeKind::Branch, Position::default()).id.clone();
    let third = graph.add_branch_path(&router, "Path 3").expect("add path");
    assert_eq!(third, 2);

    let targets: Vec<String> = (0..3)
        .map(|_| graph.add_node(NodeKind::Action, Position::default()).id.clone())
        .collect();
    for (i, target) in targets.iter().enumerate() {
        graph
            .connect(&router, target, Some(branch_handle(i).as_str()))
            .expect("connect path");
    }

    let removed = graph.remove_branch_path(&router, 1).expect("remove path");
    assert_eq!(removed.name, "Path 2");

    let handles: Vec<(String, String)> = graph
        .edges
        .iter()
        .map(|e| (e.source_handle.clone().unwrap_or_default(), e.target.clone()))
        .collect();
    assert_eq!(
        handles,
        vec![
            ("branch-0".to_string(), targets[0].clone()),
            ("branch-1".to_string(), targets[2].clone()),
        ]
    );

    // Back at the minimum.
    assert_eq!(
        graph.remove_branch_path(&router, 0).unwrap_err(),
        GraphError::BranchPathLimit {
            node_id: router.clone(),
            minimum: MIN_BRANCH_PATHS
        }
    );
}

#[test]
fn test_set_action_requires_action_node_and_resets_config() {
    let mut graph = WorkflowGraph::default();
    let step = graph.add_node(NodeKind::Action, Position::default()).id.clone();
    let router = graph.add_node(NodeKind::Branch, Position::default()).id.clone();

    graph.set_action(&step, "send-email", None).expect("set action");
    graph.set_config_value(&step, "to", json!("a@example.com")).expect("set config");
    graph.set_action(&step, "create-task", None).expect("switch action");

    let node = graph.node(&step).expect("node");
    assert_eq!(node.data.action_id.as_deref(), Some("create-task"));
    assert!(node.data.config.is_empty());

    assert_eq!(
        graph.set_action(&router, "send-email", None).unwrap_err(),
        GraphError::InvalidNodeKind {
            node_id: router.clone(),
            expected: NodeKind::Action
        }
    );
}

#[test]
fn test_duplicate_node_copies_payload_under_new_identity() {
    let mut graph = WorkflowGraph::default();
    let original = graph.add_node(NodeKind::Action, Position::new(100.0, 100.0)).id.clone();
    graph.set_action(&original, "send-email", None).expect("set action");

    let copy = graph.duplicate_node(&original).expect("duplicate").clone();
    let source = graph.node(&original).expect("original").clone();

    assert_ne!(copy.id, source.id);
    assert_ne!(copy.data.temp_id, source.data.temp_id);
    assert_eq!(copy.data.label, "New Action (copy)");
    assert_eq!(copy.data.action_id, source.data.action_id);
    assert!(!nodes_overlap(copy.position, source.position, NODE_MARGIN));
    assert!(copy.position.x > source.position.x && copy.position.y > source.position.y);
    assert_eq!(copy.position.x % GRID_SIZE, 0.0);
    assert_eq!(graph.nodes.len(), 2);
}

#[test]
fn test_session_built_graph_validates_and_compiles() {
    let (mut graph, a, b, c) = chain();
    for id in [&a, &b, &c] {
        graph.set_action(id, "noop", None).expect("set action");
    }
    graph.auto_arrange();

    let workflow = Compiler::new(&graph).generate().expect("Failed to generate workflow");
    let a_temp_id = graph.node(&a).map(|n| n.data.temp_id.clone());
    assert_eq!(Some(workflow.start_step_temp_id.clone()), a_temp_id);
    assert_eq!(workflow.steps.len(), 3);
}

#[test]
fn test_move_node_snaps() {
    let (mut graph, a, _, _) = chain();
    graph.move_node(&a, Position::new(251.0, 309.0)).expect("move");

    assert_eq!(graph.node(&a).map(|n| n.position), Some(Position::new(260.0, 300.0)));
    assert_eq!(
        graph.move_node("missing", Position::default()),
        Err(GraphError::NodeNotFound("missing".to_string()))
    );
}

#[test]
fn test_branch_style_handle_on_action_is_not_exclusive() {
    let mut graph = WorkflowGraph::default();
    let step = graph.add_node(NodeKind::Action, Position::default()).id.clone();
    let x = graph.add_node(NodeKind::Action, Position::default()).id.clone();
    let y = graph.add_node(NodeKind::Action, Position::default()).id.clone();

    graph.connect(&step, &x, Some("branch-0")).expect("connect x");
    graph.connect(&step, &y, Some("branch-0")).expect("connect y");

    assert_eq!(graph.edges.len(), 2);
}
