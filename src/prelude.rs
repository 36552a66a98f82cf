//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the
//! keiro crate. Import this module to get access to the core functionality
//! without having to import each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use keiro::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let graph_json = std::fs::read_to_string("path/to/graph.json")?;
//! let graph = WorkflowGraph::from_json(&graph_json)?;
//!
//! let workflow = Compiler::new(&graph).generate()?;
//! println!("Start step: {}", workflow.start_step_temp_id);
//! # Ok(())
//! # }
//! ```

// Graph model and editing
pub use crate::graph::{
    ActionDefinition, ActionField, BranchData, ConditionData, ConditionLogic, ConditionOperator,
    Edge, Node, NodeData, NodeKind, Position, WorkflowGraph,
};

// Validation
pub use crate::validator::{
    Diagnostic, NodeStatus, Severity, ValidationResult, Validator, ValidatorConfig, classify,
};

// Compilation
pub use crate::compiler::{Compiler, StepType, WorkflowJson, WorkflowStep};

// Layout
pub use crate::layout::{PlacementDirection, auto_arrange, snap_to_grid};

// Error types
pub use crate::error::{CompileError, GraphError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
