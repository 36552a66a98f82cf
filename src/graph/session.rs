//! Editor-side mutations of a [`WorkflowGraph`].
//!
//! Each operation leaves the graph in a state the validator can reason
//! about: deleting a node deletes its edges, exclusive handles keep a single
//! edge, and branch handles stay numbered in step with the branch list.

use super::{
    ActionDefinition, BranchData, Edge, Node, NodeKind, Position, WorkflowGraph, branch_handle,
};
use crate::error::GraphError;
use crate::layout::{self, PlacementDirection};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

/// A branch node never drops below this many paths.
pub const MIN_BRANCH_PATHS: usize = 2;
const DUPLICATE_OFFSET: f64 = 2.0 * layout::GRID_SIZE;

impl WorkflowGraph {
    /// Adds a fresh node of `kind` at `position`, snapped to the grid.
    pub fn add_node(&mut self, kind: NodeKind, position: Position) -> &Node {
        let node = Node::new(kind, layout::snap(position));
        debug!(node_id = %node.id, %kind, "added node");
        self.push_node(node)
    }

    /// Adds a node where the editor would place it without a drop point.
    pub fn add_node_at_default_position(
        &mut self,
        kind: NodeKind,
        viewport_center: Option<Position>,
    ) -> &Node {
        let position = layout::default_node_position(&self.nodes, viewport_center);
        let node = Node::new(kind, position);
        debug!(node_id = %node.id, %kind, "added node at default position");
        self.push_node(node)
    }

    /// Deletes a node together with every edge that touches it.
    pub fn remove_node(&mut self, id: &str) -> Result<Node, GraphError> {
        let slot = self.slot_of(id)?;
        let removed = self.nodes.remove(slot);
        let before = self.edges.len();
        self.edges.retain(|edge| !edge.touches(id));

        for node in &mut self.nodes {
            for branch in &mut node.data.branches {
                if branch.target_temp_id.as_deref() == Some(removed.data.temp_id.as_str()) {
                    branch.target_temp_id = None;
                }
            }
        }

        debug!(
            node_id = id,
            edges_removed = before - self.edges.len(),
            "removed node"
        );
        Ok(removed)
    }

    pub fn move_node(&mut self, id: &str, position: Position) -> Result<(), GraphError> {
        self.node_mut(id)?.position = layout::snap(position);
        Ok(())
    }

    /// Copies a node's payload under new identities. Edges are not copied.
    pub fn duplicate_node(&mut self, id: &str) -> Result<&Node, GraphError> {
        let original = self
            .node(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;

        let mut copy = original.clone();
        copy.id = format!("node-{}", Uuid::new_v4());
        copy.data.temp_id = Uuid::new_v4().to_string();
        copy.data.label = format!("{} (copy)", original.data.label);
        for branch in &mut copy.data.branches {
            branch.target_temp_id = None;
        }
        copy.position = layout::find_non_overlapping_position(
            original.position.offset(DUPLICATE_OFFSET, DUPLICATE_OFFSET),
            &self.nodes,
            PlacementDirection::Diagonal,
        );

        debug!(source_id = id, node_id = %copy.id, "duplicated node");
        Ok(self.push_node(copy))
    }

    /// Connects `source` to `target`.
    ///
    /// Branch (`branch-{i}`) and approval (`approve`/`reject`) handles hold one
    /// edge each, so connecting such a handle again replaces its edge.
    pub fn connect(
        &mut self,
        source: &str,
        target: &str,
        source_handle: Option<&str>,
    ) -> Result<&Edge, GraphError> {
        let source_node = self
            .node(source)
            .ok_or_else(|| GraphError::NodeNotFound(source.to_string()))?;
        let target_node = self
            .node(target)
            .ok_or_else(|| GraphError::NodeNotFound(target.to_string()))?;
        if source == target {
            return Err(GraphError::SelfLoop(source.to_string()));
        }

        let source_is_branch = source_node.is_branch();
        let branch_count = source_node.data.branches.len();
        let target_temp_id = target_node.data.temp_id.clone();

        let mut edge = Edge::new(source, target);
        if let Some(handle) = source_handle {
            edge = edge.with_source_handle(handle);
        }

        let duplicate = self.edges.iter().any(|existing| {
            existing.source == edge.source
                && existing.target == edge.target
                && existing.source_handle == edge.source_handle
        });
        if duplicate {
            return Err(GraphError::DuplicateEdge {
                source_node_id: source.to_string(),
                target_node_id: target.to_string(),
                handle: source_handle.unwrap_or_default().to_string(),
            });
        }

        let branch_index = edge.branch_index().filter(|_| source_is_branch);
        if let Some(index) = branch_index {
            if index >= branch_count {
                return Err(GraphError::BranchIndexOutOfRange {
                    node_id: source.to_string(),
                    index,
                });
            }
        }

        // `branch-{i}` only routes exclusively when it leaves a branch node.
        if branch_index.is_some() || edge.has_approval_handle() {
            self.edges.retain(|existing| {
                !(existing.source == edge.source && existing.source_handle == edge.source_handle)
            });
        }
        if let Some(index) = branch_index {
            self.node_mut(source)?.data.branches[index].target_temp_id = Some(target_temp_id);
        }

        debug!(edge_id = %edge.id, source, target, handle = ?source_handle, "connected nodes");
        self.edges.push(edge);
        let last = self.edges.len() - 1;
        Ok(&self.edges[last])
    }

    pub fn disconnect(&mut self, edge_id: &str) -> Result<Edge, GraphError> {
        let slot = self
            .edges
            .iter()
            .position(|edge| edge.id == edge_id)
            .ok_or_else(|| GraphError::EdgeNotFound(edge_id.to_string()))?;
        let edge = self.edges.remove(slot);

        if let (Some(index), Ok(source)) = (edge.branch_index(), self.node_mut(&edge.source)) {
            if let Some(branch) = source.data.branches.get_mut(index) {
                branch.target_temp_id = None;
            }
        }

        debug!(edge_id, "disconnected edge");
        Ok(edge)
    }

    /// Points an action node at a catalog action. The previous configuration
    /// belonged to the old action and is cleared.
    pub fn set_action(
        &mut self,
        id: &str,
        action_id: impl Into<String>,
        definition: Option<ActionDefinition>,
    ) -> Result<(), GraphError> {
        let node = self.node_of_kind_mut(id, NodeKind::Action)?;
        node.data.action_id = Some(action_id.into());
        node.data.action_definition = definition;
        node.data.config.clear();
        Ok(())
    }

    pub fn set_config_value(
        &mut self,
        id: &str,
        key: impl Into<String>,
        value: Value,
    ) -> Result<(), GraphError> {
        let node = self.node_of_kind_mut(id, NodeKind::Action)?;
        node.data.config.insert(key.into(), value);
        Ok(())
    }

    /// Appends a path to a branch node and returns its index.
    pub fn add_branch_path(&mut self, id: &str, name: impl Into<String>) -> Result<usize, GraphError> {
        let node = self.node_of_kind_mut(id, NodeKind::Branch)?;
        node.data.branches.push(BranchData::new(name));
        Ok(node.data.branches.len() - 1)
    }

    /// Removes the path at `index`, drops the edge on its handle, and shifts
    /// the handles of later paths down by one.
    pub fn remove_branch_path(&mut self, id: &str, index: usize) -> Result<BranchData, GraphError> {
        let node = self.node_of_kind_mut(id, NodeKind::Branch)?;
        let count = node.data.branches.len();
        if count <= MIN_BRANCH_PATHS {
            return Err(GraphError::BranchPathLimit {
                node_id: id.to_string(),
                minimum: MIN_BRANCH_PATHS,
            });
        }
        if index >= count {
            return Err(GraphError::BranchIndexOutOfRange {
                node_id: id.to_string(),
                index,
            });
        }
        let removed = node.data.branches.remove(index);

        self.edges
            .retain(|edge| !(edge.source == id && edge.branch_index() == Some(index)));
        for edge in self.edges.iter_mut().filter(|edge| edge.source == id) {
            if let Some(later) = edge.branch_index().filter(|&i| i > index) {
                edge.source_handle = Some(branch_handle(later - 1));
            }
        }

        debug!(node_id = id, index, "removed branch path");
        Ok(removed)
    }

    /// Replaces every node position with the layered layout.
    pub fn auto_arrange(&mut self) {
        self.nodes = layout::auto_arrange(&self.nodes, &self.edges);
    }

    fn push_node(&mut self, node: Node) -> &Node {
        self.nodes.push(node);
        let last = self.nodes.len() - 1;
        &self.nodes[last]
    }

    fn slot_of(&self, id: &str) -> Result<usize, GraphError> {
        self.nodes
            .iter()
            .position(|node| node.id == id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))
    }

    fn node_mut(&mut self, id: &str) -> Result<&mut Node, GraphError> {
        self.nodes
            .iter_mut()
            .find(|node| node.id == id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))
    }

    fn node_of_kind_mut(&mut self, id: &str, kind: NodeKind) -> Result<&mut Node, GraphError> {
        let node = self.node_mut(id)?;
        if node.kind != kind {
            return Err(GraphError::InvalidNodeKind {
                node_id: id.to_string(),
                expected: kind,
            });
        }
        Ok(node)
    }
}
