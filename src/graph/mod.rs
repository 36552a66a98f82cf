//! The workflow graph as the editor sees it: ordered nodes, directed edges,
//! and the session operations that mutate them.

pub mod branch;
pub mod edge;
pub mod index;
pub mod node;
mod session;

pub use branch::*;
pub use edge::*;
pub use index::GraphIndex;
pub use node::*;
pub use session::MIN_BRANCH_PATHS;

use crate::error::GraphError;
use serde::{Deserialize, Serialize};

/// The complete editor graph. Node order is significant: it breaks ties when
/// choosing the start step and fixes the order of compiled steps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkflowGraph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl WorkflowGraph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    /// Parses the editor's `{ nodes, edges }` JSON.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        serde_json::from_str(json).map_err(|e| GraphError::JsonParseError(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, GraphError> {
        serde_json::to_string_pretty(self).map_err(|e| GraphError::JsonSerializeError(e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.id == id)
    }

    pub fn index(&self) -> GraphIndex<'_> {
        GraphIndex::new(&self.nodes, &self.edges)
    }
}
