use clap::Parser;
use keiro::graph::{APPROVE_HANDLE, REJECT_HANDLE, branch_handle};
use keiro::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use std::fs;

/// A CLI tool to generate random, valid workflow graphs for testing the editor pipeline
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated graph JSON file to
    #[arg(short, long, default_value = "generated_graph.json")]
    output: String,

    /// Number of steps to generate
    #[arg(short, long, default_value_t = 25)]
    steps: usize,

    /// Probability that a new step is a branch
    #[arg(long, default_value_t = 0.2)]
    branch_ratio: f64,

    /// Probability that a new action step is an approval
    #[arg(long, default_value_t = 0.1)]
    approval_ratio: f64,

    /// Seed for reproducible graphs
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    for (name, ratio) in [
        ("--branch-ratio", cli.branch_ratio),
        ("--approval-ratio", cli.approval_ratio),
    ] {
        if !(0.0..=1.0).contains(&ratio) {
            eprintln!("Error: {} ({}) must be between 0 and 1", name, ratio);
            std::process::exit(1);
        }
    }
    if cli.steps == 0 {
        eprintln!("Error: --steps must be at least 1");
        std::process::exit(1);
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    println!("Generating a workflow graph with {} step(s)...", cli.steps);
    let graph = generate_graph(&mut rng, &cli)?;

    let validation = Validator::new().validate(&graph);
    println!(
        "-> {} error(s), {} warning(s)",
        validation.errors.len(),
        validation.warnings.len()
    );

    fs::write(&cli.output, graph.to_json()?)?;
    println!("Successfully generated and saved graph to '{}'", cli.output);
    Ok(())
}

/// Grows a tree of steps from a single root: every new step hangs off a
/// random open output of an earlier one.
fn generate_graph(rng: &mut StdRng, cli: &Cli) -> Result<WorkflowGraph> {
    let mut graph = WorkflowGraph::default();
    let mut open_outputs: Vec<(String, Option<String>)> = Vec::new();

    for step in 0..cli.steps {
        let is_branch = step > 0 && rng.random_bool(cli.branch_ratio);
        let kind = if is_branch {
            NodeKind::Branch
        } else {
            NodeKind::Action
        };
        let id = graph.add_node(kind, Position::default()).id.clone();

        if is_branch {
            configure_branch(&mut graph, &id, rng)?;
            open_outputs.push((id.clone(), Some(branch_handle(0))));
            open_outputs.push((id.clone(), Some(branch_handle(1))));
        } else if rng.random_bool(cli.approval_ratio) {
            let definition = ActionDefinition::default().with_category("approval");
            graph.set_action(&id, "approval", Some(definition))?;
            open_outputs.push((id.clone(), Some(APPROVE_HANDLE.to_string())));
            open_outputs.push((id.clone(), Some(REJECT_HANDLE.to_string())));
        } else {
            configure_action(&mut graph, &id, rng)?;
            open_outputs.push((id.clone(), None));
        }

        if step > 0 {
            // The new node's own outputs are the last pushed; pick among the older ones.
            let own = if is_branch || graph.node(&id).is_some_and(Node::is_approval) {
                2
            } else {
                1
            };
            let available = open_outputs.len() - own;
            if available > 0 {
                let (source, handle) = open_outputs.remove(rng.random_range(0..available));
                graph.connect(&source, &id, handle.as_deref())?;
            }
        }
    }

    graph.auto_arrange();
    Ok(graph)
}

fn configure_action(graph: &mut WorkflowGraph, id: &str, rng: &mut StdRng) -> Result<()> {
    let catalog = [
        ("send-email", vec![ActionField::required("to", "Recipient"), ActionField::optional("cc", "CC")]),
        ("create-task", vec![ActionField::required("title", "Title")]),
        ("webhook", vec![ActionField::required("url", "URL"), ActionField::required("method", "Method")]),
    ];
    let (action_id, fields) = &catalog[rng.random_range(0..catalog.len())];
    graph.set_action(id, *action_id, Some(ActionDefinition::new(fields.clone())))?;
    for field in fields.iter().filter(|field| field.required) {
        graph.set_config_value(id, &field.name, json!(format!("{{{{{}}}}}", field.name)))?;
    }
    Ok(())
}

fn configure_branch(graph: &mut WorkflowGraph, id: &str, rng: &mut StdRng) -> Result<()> {
    let threshold = rng.random_range(1..1000);
    if let Some(node) = graph.nodes.iter_mut().find(|node| node.id == id) {
        node.data.branches = vec![
            BranchData::new("Above").with_condition(ConditionData::new(
                "amount",
                ConditionOperator::Gt,
                Some(json!(threshold)),
            )),
            BranchData::new("Otherwise").with_condition(ConditionData::new(
                "amount",
                ConditionOperator::Lte,
                Some(json!(threshold)),
            )),
        ];
    }
    Ok(())
}
