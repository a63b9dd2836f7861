mod backends;

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use genflow_graph::{NodeKind, Pipeline};
use genflow_runtime::{
  ExecutionMode, NodeExecutor, PortPolicy, Runner, RunnerConfig, ToolRegistry,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::backends::{DryRunGenerator, DryRunTool};

/// Genflow - execute AI content pipeline graphs
#[derive(Parser)]
#[command(name = "genflow")]
#[command(version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Check that a pipeline is a non-empty acyclic graph
  Validate {
    /// Path to the pipeline JSON file, or "-" for stdin
    pipeline_file: PathBuf,
  },

  /// Print the execution order of a pipeline
  Order {
    /// Path to the pipeline JSON file, or "-" for stdin
    pipeline_file: PathBuf,

    /// Print dependency layers instead of a flat order
    #[arg(long)]
    layers: bool,
  },

  /// Run a pipeline against dry-run backends
  Run {
    /// Path to the pipeline JSON file, or "-" for stdin
    pipeline_file: PathBuf,

    /// Run each dependency layer concurrently
    #[arg(long)]
    layered: bool,

    /// Deadline for nodes that do not set their own
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Ignore edges without a target port instead of inferring one
    #[arg(long)]
    strict_ports: bool,
  },
}

fn main() -> Result<ExitCode> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();

  match cli.command {
    Commands::Validate { pipeline_file } => validate(pipeline_file),
    Commands::Order {
      pipeline_file,
      layers,
    } => order(pipeline_file, layers),
    Commands::Run {
      pipeline_file,
      layered,
      timeout_ms,
      strict_ports,
    } => {
      let config = runner_config(layered, timeout_ms, strict_ports);
      let rt = tokio::runtime::Runtime::new()?;
      rt.block_on(async { run(pipeline_file, config).await })
    }
  }
}

fn runner_config(layered: bool, timeout_ms: Option<u64>, strict_ports: bool) -> RunnerConfig {
  RunnerConfig {
    mode: if layered {
      ExecutionMode::Layered
    } else {
      ExecutionMode::Sequential
    },
    node_timeout_ms: timeout_ms,
    port_policy: if strict_ports {
      PortPolicy::Strict
    } else {
      PortPolicy::Infer
    },
  }
}

fn validate(pipeline_file: PathBuf) -> Result<ExitCode> {
  let pipeline = load_pipeline(&pipeline_file)?;

  match pipeline.validate() {
    Ok(()) => {
      info!(
        nodes = pipeline.nodes.len(),
        edges = pipeline.edges.len(),
        "pipeline_valid"
      );
      Ok(ExitCode::SUCCESS)
    }
    Err(e) => {
      error!(error = %e, "pipeline_invalid");
      Ok(ExitCode::FAILURE)
    }
  }
}

fn order(pipeline_file: PathBuf, layers: bool) -> Result<ExitCode> {
  let pipeline = load_pipeline(&pipeline_file)?;
  if let Err(e) = pipeline.validate() {
    error!(error = %e, "pipeline_invalid");
    return Ok(ExitCode::FAILURE);
  }

  let output = if layers {
    let layers = pipeline.layers().context("failed to schedule pipeline")?;
    let ids: Vec<Vec<&str>> = layers
      .iter()
      .map(|layer| layer.iter().map(|node| node.id.as_str()).collect())
      .collect();
    serde_json::to_string_pretty(&ids)?
  } else {
    let order = pipeline.order().context("failed to schedule pipeline")?;
    let ids: Vec<&str> = order.iter().map(|node| node.id.as_str()).collect();
    serde_json::to_string_pretty(&ids)?
  };

  println!("{}", output);
  Ok(ExitCode::SUCCESS)
}

async fn run(pipeline_file: PathBuf, config: RunnerConfig) -> Result<ExitCode> {
  let pipeline = load_pipeline(&pipeline_file)?;
  info!(
    file = %pipeline_file.display(),
    nodes = pipeline.nodes.len(),
    edges = pipeline.edges.len(),
    "pipeline_loaded"
  );

  let runner = Runner::new(config, dry_run_executor(&pipeline));

  let cancel = CancellationToken::new();
  let on_interrupt = cancel.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      warn!("interrupted, cancelling run");
      on_interrupt.cancel();
    }
  });

  let result = runner.run(&pipeline, cancel).await;

  for run_error in &result.errors {
    error!(run_id = %result.run_id, error = %run_error, "run_error");
  }
  info!(
    run_id = %result.run_id,
    success = result.success,
    nodes_executed = result.order.len(),
    "run_finished"
  );

  println!("{}", serde_json::to_string_pretty(&result)?);

  Ok(if result.success {
    ExitCode::SUCCESS
  } else {
    ExitCode::FAILURE
  })
}

/// Register the dry-run tool for every tool id the pipeline references.
fn dry_run_executor(pipeline: &Pipeline) -> NodeExecutor {
  let tool = Arc::new(DryRunTool);
  let mut tools = ToolRegistry::new();
  for node in &pipeline.nodes {
    if let NodeKind::Tool(config) = &node.kind {
      tools.register(config.tool_id.clone(), tool.clone());
    }
  }
  NodeExecutor::new(Arc::new(DryRunGenerator)).with_tools(tools)
}

fn load_pipeline(pipeline_file: &Path) -> Result<Pipeline> {
  let content = if pipeline_file.as_os_str() == "-" {
    let mut input = String::new();
    io::stdin()
      .read_to_string(&mut input)
      .context("failed to read pipeline from stdin")?;
    input
  } else {
    std::fs::read_to_string(pipeline_file)
      .with_context(|| format!("failed to read pipeline file: {}", pipeline_file.display()))?
  };

  Pipeline::from_json(&content)
    .with_context(|| format!("failed to parse pipeline file: {}", pipeline_file.display()))
}
