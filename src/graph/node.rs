use super::branch::BranchData;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Action category that switches a step to approve/reject routing.
pub const APPROVAL_CATEGORY: &str = "approval";

/// A point on the editor canvas, in display units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// The two kinds of step a workflow graph is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Action,
    Branch,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Action => write!(f, "action"),
            NodeKind::Branch => write!(f, "branch"),
        }
    }
}

/// A configurable input declared by an action in the catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionField {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "type", default)]
    pub field_type: String,
}

impl ActionField {
    pub fn required(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            required: true,
            field_type: "text".to_string(),
        }
    }

    pub fn optional(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(name, label)
        }
    }

    /// The label shown to users, falling back to the field name.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

/// Cached copy of an action's catalog schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionDefinition {
    #[serde(default)]
    pub fields: Vec<ActionField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ActionDefinition {
    pub fn new(fields: Vec<ActionField>) -> Self {
        Self {
            fields,
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &ActionField> {
        self.fields.iter().filter(|field| field.required)
    }

    pub fn is_approval(&self) -> bool {
        self.category.as_deref() == Some(APPROVAL_CATEGORY)
    }
}

/// Editor payload of a node. Action-only and branch-only fields are simply
/// left empty on the other kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeData {
    pub label: String,
    pub temp_id: String,
    pub step_name: String,
    pub action_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_definition: Option<ActionDefinition>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub config: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<BranchData>,
    /// Editor-owned keys this crate does not interpret, kept for round trips.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A vertex of the workflow graph.
///
/// `id` is editor-local and may be regenerated on reload; `data.temp_id` is
/// the stable identity that the compiled workflow refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: NodeData,
}

impl Node {
    /// Creates a node with fresh identities and the editor's default payload.
    /// Branch nodes start with two empty paths.
    pub fn new(kind: NodeKind, position: Position) -> Self {
        let (label, branches) = match kind {
            NodeKind::Action => ("New Action", Vec::new()),
            NodeKind::Branch => (
                "Condition",
                vec![BranchData::new("Path 1"), BranchData::new("Path 2")],
            ),
        };
        Self {
            id: format!("node-{}", Uuid::new_v4()),
            kind,
            position,
            data: NodeData {
                label: label.to_string(),
                temp_id: Uuid::new_v4().to_string(),
                branches,
                ..NodeData::default()
            },
        }
    }

    pub fn action(id: impl Into<String>, temp_id: impl Into<String>) -> Self {
        Self::with_ids(NodeKind::Action, id, temp_id)
    }

    pub fn branch(id: impl Into<String>, temp_id: impl Into<String>) -> Self {
        Self::with_ids(NodeKind::Branch, id, temp_id)
    }

    fn with_ids(kind: NodeKind, id: impl Into<String>, temp_id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            data: NodeData {
                label: id.clone(),
                temp_id: temp_id.into(),
                ..NodeData::default()
            },
            id,
            kind,
            position: Position::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.data.label = label.into();
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_action(mut self, action_id: impl Into<String>) -> Self {
        self.data.action_id = Some(action_id.into());
        self
    }

    pub fn with_definition(mut self, definition: ActionDefinition) -> Self {
        self.data.action_definition = Some(definition);
        self
    }

    pub fn with_config(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.config.insert(key.into(), value);
        self
    }

    pub fn with_branches(mut self, branches: Vec<BranchData>) -> Self {
        self.data.branches = branches;
        self
    }

    pub fn is_action(&self) -> bool {
        self.kind == NodeKind::Action
    }

    pub fn is_branch(&self) -> bool {
        self.kind == NodeKind::Branch
    }

    /// True for action nodes whose referenced action routes on approve/reject.
    pub fn is_approval(&self) -> bool {
        self.is_action()
            && self
                .data
                .action_definition
                .as_ref()
                .is_some_and(ActionDefinition::is_approval)
    }

    /// Name used in user-facing messages.
    pub fn display_name(&self) -> &str {
        if !self.data.label.is_empty() {
            &self.data.label
        } else if !self.data.step_name.is_empty() {
            &self.data.step_name
        } else {
            &self.id
        }
    }
}
