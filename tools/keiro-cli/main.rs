use clap::{Parser, Subcommand};
use keiro::prelude::*;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Validates, compiles and lays out workflow graphs exported by the editor
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable every optional validation check (dangling edges, per-handle
    /// branch coverage, unique step identifiers, empty graphs)
    #[arg(long, global = true)]
    strict: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the diagnostics for a graph
    Validate {
        /// Path to the graph JSON file
        graph_path: String,
        /// Print the validation result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the live status badge of every node
    Status {
        /// Path to the graph JSON file
        graph_path: String,
    },
    /// Compile a graph into the workflow step list
    Compile {
        /// Path to the graph JSON file
        graph_path: String,
        /// Id of an already saved workflow
        #[arg(short, long)]
        workflow_id: Option<String>,
        /// Write the compiled workflow here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Auto-arrange a graph and write the repositioned graph
    Arrange {
        /// Path to the graph JSON file
        graph_path: String,
        /// Write the arranged graph here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = if cli.strict {
        ValidatorConfig::strict()
    } else {
        ValidatorConfig::default()
    };

    match cli.command {
        Command::Validate { graph_path, json } => run_validate(&graph_path, config, json),
        Command::Status { graph_path } => run_status(&graph_path, config),
        Command::Compile {
            graph_path,
            workflow_id,
            output,
        } => run_compile(&graph_path, config, workflow_id, output),
        Command::Arrange { graph_path, output } => run_arrange(&graph_path, output),
    }
}

fn run_validate(graph_path: &str, config: ValidatorConfig, json: bool) {
    let graph = load_graph(graph_path);

    let start = Instant::now();
    let validation = Validator::with_config(config).validate(&graph);
    let duration = start.elapsed();

    if json {
        let rendered = serde_json::to_string_pretty(&validation).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to serialize validation result: {}", e))
        });
        println!("{}", rendered);
    } else {
        for diagnostic in validation.errors.iter().chain(&validation.warnings) {
            println!("{}", diagnostic);
        }
        println!(
            "\n{} node(s), {} edge(s): {} error(s), {} warning(s) in {:?}",
            graph.nodes.len(),
            graph.edges.len(),
            validation.errors.len(),
            validation.warnings.len(),
            duration
        );
    }

    if !validation.is_valid {
        std::process::exit(1);
    }
}

fn run_status(graph_path: &str, config: ValidatorConfig) {
    let graph = load_graph(graph_path);
    let validation = Validator::with_config(config).validate(&graph);

    for node in &graph.nodes {
        let live = classify(node);
        let full = validation.status_of(&node.id);
        println!(
            "{:<10} {:<10} {} ({})",
            badge(live),
            badge(full),
            node.display_name(),
            node.id
        );
    }
}

fn run_compile(
    graph_path: &str,
    config: ValidatorConfig,
    workflow_id: Option<String>,
    output: Option<String>,
) {
    let graph = load_graph(graph_path);

    let start = Instant::now();
    let mut builder = Compiler::builder(&graph).validator_config(config);
    if let Some(id) = workflow_id {
        builder = builder.workflow_id(id);
    }
    let workflow = match builder.build().generate() {
        Ok(workflow) => workflow,
        Err(CompileError::InvalidWorkflow { errors }) => {
            for diagnostic in &errors {
                eprintln!("{}", diagnostic);
            }
            exit_with_error("Cannot generate workflow: fix validation errors");
        }
        Err(e) => exit_with_error(&format!("Compilation failed: {}", e)),
    };
    let duration = start.elapsed();

    let rendered = workflow
        .to_json()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize workflow: {}", e)));
    write_output(output.as_deref(), &rendered);
    eprintln!(
        "Compiled {} step(s) in {:?}, starting at '{}'",
        workflow.steps.len(),
        duration,
        workflow.start_step_temp_id
    );
}

fn run_arrange(graph_path: &str, output: Option<String>) {
    let mut graph = load_graph(graph_path);
    graph.auto_arrange();
    let rendered = graph
        .to_json()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize graph: {}", e)));
    write_output(output.as_deref(), &rendered);
}

fn load_graph(path: &str) -> WorkflowGraph {
    let json = fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read graph file '{}': {}", path, e)));
    WorkflowGraph::from_json(&json).unwrap_or_else(|e| exit_with_error(&e.to_string()))
}

fn write_output(path: Option<&str>, content: &str) {
    match path {
        Some(path) => fs::write(path, content).unwrap_or_else(|e| {
            exit_with_error(&format!("Could not write to file '{}': {}", path, e))
        }),
        None => println!("{}", content),
    }
}

fn badge(status: NodeStatus) -> &'static str {
    match status {
        NodeStatus::Valid => "valid",
        NodeStatus::Warning => "warning",
        NodeStatus::Error => "error",
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
