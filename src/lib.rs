//! # Keiro - Workflow Graph Compiler, Validator and Layout Engine
//!
//! **Keiro** turns the step graph a user draws in a workflow editor into a
//! linked, executable step list. It validates the graph on every edit,
//! compiles it on save, and keeps the canvas tidy with grid-aligned,
//! non-overlapping placement.
//!
//! ## Core Workflow
//!
//! 1.  **Load or Build a Graph**: Parse the editor's `{ nodes, edges }` JSON with
//!     `WorkflowGraph::from_json`, or build one through the session methods
//!     (`add_node`, `connect`, `set_action`, ...).
//! 2.  **Validate**: Run the `Validator` after every change. It returns errors
//!     (which block saving) and warnings (which never do).
//! 3.  **Compile**: On save, use `Compiler::builder` to emit a `WorkflowJson`,
//!     the step list handed to persistence and the execution engine.
//! 4.  **Lay Out**: Use the `layout` functions for drop placement, duplicate
//!     placement, and whole-graph auto-arrangement.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use keiro::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<()> {
//!     let mut graph = WorkflowGraph::default();
//!
//!     // 1. Build a two-step workflow: send an email, then ask for approval.
//!     let email = graph.add_node(NodeKind::Action, Position::new(100.0, 100.0)).id.clone();
//!     let review = graph.add_node(NodeKind::Action, Position::new(100.0, 300.0)).id.clone();
//!
//!     let email_action = ActionDefinition::new(vec![ActionField::required("to", "Recipient")]);
//!     graph.set_action(&email, "send-email", Some(email_action))?;
//!     graph.set_config_value(&email, "to", json!("ops@example.com"))?;
//!     graph.set_action(&review, "manager-approval", Some(ActionDefinition::default().with_category("approval")))?;
//!     graph.connect(&email, &review, None)?;
//!
//!     // 2. Validate. Warnings are advisory, errors block compilation.
//!     let validation = Validator::new().validate(&graph);
//!     for warning in &validation.warnings {
//!         println!("{}", warning);
//!     }
//!
//!     // 3. Compile into the persisted step list.
//!     let workflow = Compiler::builder(&graph).workflow_id("wf-42").build().compile(&validation)?;
//!     println!("{}", workflow.to_json()?);
//!
//!     // 4. Tidy the canvas.
//!     graph.auto_arrange();
//!     Ok(())
//! }
//! ```

pub mod compiler;
pub mod error;
pub mod graph;
pub mod layout;
pub mod prelude;
pub mod validator;
