use crate::graph::NodeKind;
use crate::validator::Diagnostic;
use thiserror::Error;

/// Errors raised while loading or editing a workflow graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Failed to parse workflow graph JSON: {0}")]
    JsonParseError(String),

    #[error("Failed to serialize workflow graph: {0}")]
    JsonSerializeError(String),

    #[error("Node '{0}' not found in the workflow graph")]
    NodeNotFound(String),

    #[error("Edge '{0}' not found in the workflow graph")]
    EdgeNotFound(String),

    #[error("Node '{0}' cannot be connected to itself")]
    SelfLoop(String),

    #[error(
        "A connection from '{source_node_id}' to '{target_node_id}' already exists on handle '{handle}'"
    )]
    DuplicateEdge {
        source_node_id: String,
        target_node_id: String,
        handle: String,
    },

    #[error("Node '{node_id}' is not a {expected} node")]
    InvalidNodeKind { node_id: String, expected: NodeKind },

    #[error("Branch node '{node_id}' must keep at least {minimum} paths")]
    BranchPathLimit { node_id: String, minimum: usize },

    #[error("Branch node '{node_id}' has no path at index {index}")]
    BranchIndexOutOfRange { node_id: String, index: usize },
}

/// Errors that stop a graph from being compiled into a workflow.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Workflow is empty. Add at least one step before saving")]
    EmptyWorkflow,

    #[error("Cannot generate workflow: fix validation errors ({count} found)", count = .errors.len())]
    InvalidWorkflow { errors: Vec<Diagnostic> },

    #[error("Failed to build configuration for step '{temp_id}': {message}")]
    ConfigSerialization { temp_id: String, message: String },
}
