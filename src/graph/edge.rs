use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const APPROVE_HANDLE: &str = "approve";
pub const REJECT_HANDLE: &str = "reject";
const BRANCH_HANDLE_PREFIX: &str = "branch-";

/// Source handle name for the branch path at `index`.
pub fn branch_handle(index: usize) -> String {
    format!("{}{}", BRANCH_HANDLE_PREFIX, index)
}

/// Parses a `branch-{index}` handle. Any other handle yields `None`.
pub fn parse_branch_handle(handle: &str) -> Option<usize> {
    handle.strip_prefix(BRANCH_HANDLE_PREFIX)?.parse().ok()
}

/// A directed connection between two nodes, addressed by node `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    #[serde(default)]
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: format!("edge-{}", Uuid::new_v4()),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_source_handle(mut self, handle: impl Into<String>) -> Self {
        self.source_handle = Some(handle.into());
        self
    }

    pub fn has_source_handle(&self, handle: &str) -> bool {
        self.source_handle.as_deref() == Some(handle)
    }

    /// Index of the branch path this edge leaves from, if any.
    pub fn branch_index(&self) -> Option<usize> {
        self.source_handle.as_deref().and_then(parse_branch_handle)
    }

    /// Branch and approval handles route to exactly one successor each.
    pub fn has_exclusive_handle(&self) -> bool {
        self.branch_index().is_some() || self.has_approval_handle()
    }

    pub fn has_approval_handle(&self) -> bool {
        self.has_source_handle(APPROVE_HANDLE) || self.has_source_handle(REJECT_HANDLE)
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}
