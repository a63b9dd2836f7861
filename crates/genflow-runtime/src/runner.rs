//! Pipeline runner.
//!
//! The [`Runner`] is the main entry point for executing pipelines. It
//! validates the graph, schedules it, resolves each node's inputs from the
//! run's [`ExecutionContext`], executes the node, and aggregates the results.
//!
//! Node failures do not stop a run: the failed result is recorded and the
//! walk continues, so independent branches still produce output.

use std::time::Duration;

use futures::future::join_all;
use genflow_graph::{Graph, GraphError, Node, Pipeline};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::context::ExecutionContext;
use crate::error::NodeError;
use crate::events::{ExecutionEvent, ExecutionNotifier, NoopNotifier};
use crate::executor::NodeExecutor;
use crate::input::{PortPolicy, ResolvedInputs, resolve_inputs};
use crate::result::{NodeResult, RunError, RunResult};

/// How the schedule is walked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
  /// One node at a time in topological order.
  #[default]
  Sequential,
  /// Each dependency layer runs concurrently; a layer finishes before the
  /// next one starts.
  Layered,
}

/// Configuration for the runner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerConfig {
  #[serde(default)]
  pub mode: ExecutionMode,
  /// Deadline applied to nodes that do not set their own.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub node_timeout_ms: Option<u64>,
  #[serde(default)]
  pub port_policy: PortPolicy,
}

/// The pipeline runner.
///
/// Generic over `N: ExecutionNotifier` to allow different notification
/// strategies. Use `Runner::new()` for a runner with no-op notifications, or
/// `Runner::with_notifier()` to observe events.
pub struct Runner<N: ExecutionNotifier = NoopNotifier> {
  config: RunnerConfig,
  executor: NodeExecutor,
  notifier: N,
}

impl Runner<NoopNotifier> {
  pub fn new(config: RunnerConfig, executor: NodeExecutor) -> Self {
    Self::with_notifier(config, executor, NoopNotifier)
  }
}

impl<N: ExecutionNotifier> Runner<N> {
  pub fn with_notifier(config: RunnerConfig, executor: NodeExecutor, notifier: N) -> Self {
    Self {
      config,
      executor,
      notifier,
    }
  }

  pub fn config(&self) -> &RunnerConfig {
    &self.config
  }

  /// Execute a pipeline.
  ///
  /// A graph that fails validation yields `success == false`, a single
  /// graph-level error and no results; no node is executed. Otherwise every
  /// node gets exactly one result.
  #[instrument(
    name = "pipeline_run",
    skip(self, pipeline, cancel),
    fields(
      nodes = pipeline.nodes.len(),
      edges = pipeline.edges.len(),
    )
  )]
  pub async fn run(&self, pipeline: &Pipeline, cancel: CancellationToken) -> RunResult {
    let run_id = uuid::Uuid::new_v4().to_string();

    let graph = pipeline.graph();
    let schedule = match graph.validate().and_then(|()| self.schedule(&graph)) {
      Ok(schedule) => schedule,
      Err(e) => {
        error!(run_id = %run_id, error = %e, "run_rejected");
        self.notifier.notify(ExecutionEvent::RunFailed {
          run_id: run_id.clone(),
          error: e.to_string(),
        });
        return RunResult::rejected(run_id, e);
      }
    };

    info!(
      run_id = %run_id,
      mode = ?self.config.mode,
      batches = schedule.len(),
      "run_started"
    );
    self.notifier.notify(ExecutionEvent::RunStarted {
      run_id: run_id.clone(),
      node_count: pipeline.nodes.len(),
    });

    let mut context = ExecutionContext::new();
    let mut order = Vec::with_capacity(pipeline.nodes.len());
    let mut errors = Vec::new();

    for batch in schedule {
      let results = if cancel.is_cancelled() {
        batch
          .iter()
          .map(|node| NodeResult::failed(node.id.clone(), NodeError::Cancelled))
          .collect()
      } else {
        self
          .execute_batch(&run_id, &batch, &graph, &context, &cancel)
          .await
      };

      // Results are written after the whole batch has finished, in batch order.
      for result in results {
        self.record(&run_id, result, &mut context, &mut order, &mut errors);
      }
    }

    let success = errors.is_empty();
    if success {
      info!(run_id = %run_id, nodes = order.len(), "run_completed");
      self.notifier.notify(ExecutionEvent::RunCompleted {
        run_id: run_id.clone(),
      });
    } else {
      error!(run_id = %run_id, failed_nodes = errors.len(), "run_failed");
      self.notifier.notify(ExecutionEvent::RunFailed {
        run_id: run_id.clone(),
        error: format!("{} node(s) failed", errors.len()),
      });
    }

    RunResult {
      run_id,
      success,
      order,
      results: context.into_results(),
      errors,
    }
  }

  /// Execute a single node in isolation with caller-supplied inputs.
  ///
  /// This is for previewing one node without walking the graph. The node's
  /// deadline and the cancellation token apply as in a full run.
  #[instrument(
    name = "pipeline_run_node",
    skip(self, node, inputs, cancel),
    fields(node_id = %node.id)
  )]
  pub async fn run_node(
    &self,
    node: &Node,
    inputs: ResolvedInputs,
    cancel: CancellationToken,
  ) -> NodeResult {
    let run_id = uuid::Uuid::new_v4().to_string();

    let result = if cancel.is_cancelled() {
      NodeResult::failed(node.id.clone(), NodeError::Cancelled)
    } else {
      self.invoke(&run_id, node, inputs, &cancel).await
    };

    self.report(&run_id, &result);
    result
  }

  /// Turn the validated graph into batches. Sequential mode yields one node
  /// per batch.
  fn schedule<'a>(&self, graph: &Graph<'a>) -> Result<Vec<Vec<&'a Node>>, GraphError> {
    match self.config.mode {
      ExecutionMode::Sequential => Ok(
        graph
          .topological_order()?
          .into_iter()
          .map(|node| vec![node])
          .collect(),
      ),
      ExecutionMode::Layered => graph.layers(),
    }
  }

  /// Resolve inputs for every node of a batch against the context as it
  /// stood before the batch, then execute them concurrently.
  async fn execute_batch(
    &self,
    run_id: &str,
    batch: &[&Node],
    graph: &Graph<'_>,
    context: &ExecutionContext,
    cancel: &CancellationToken,
  ) -> Vec<NodeResult> {
    let executions = batch.iter().map(|node| {
      let inputs = resolve_inputs(node, graph, context, self.config.port_policy);
      self.invoke(run_id, node, inputs, cancel)
    });

    join_all(executions).await
  }

  /// Execute one node under its deadline and the run's cancellation token.
  async fn invoke(
    &self,
    run_id: &str,
    node: &Node,
    inputs: ResolvedInputs,
    cancel: &CancellationToken,
  ) -> NodeResult {
    info!(
      run_id = %run_id,
      node_id = %node.id,
      node_type = node.type_name(),
      inputs = ?inputs,
      "node_started"
    );
    self.notifier.notify(ExecutionEvent::NodeStarted {
      run_id: run_id.to_string(),
      node_id: node.id.clone(),
    });

    let deadline = node.timeout_ms.or(self.config.node_timeout_ms);
    let execution = async {
      match deadline {
        Some(timeout_ms) => tokio::time::timeout(
          Duration::from_millis(timeout_ms),
          self.executor.execute(node, &inputs),
        )
        .await
        .unwrap_or_else(|_| NodeResult::failed(node.id.clone(), NodeError::TimedOut { timeout_ms })),
        None => self.executor.execute(node, &inputs).await,
      }
    };

    tokio::select! {
      result = execution => result,
      _ = cancel.cancelled() => {
        warn!(run_id = %run_id, node_id = %node.id, "node cancelled while executing");
        NodeResult::failed(node.id.clone(), NodeError::Cancelled)
      }
    }
  }

  /// Write a result into the context and the run's bookkeeping.
  fn record(
    &self,
    run_id: &str,
    result: NodeResult,
    context: &mut ExecutionContext,
    order: &mut Vec<String>,
    errors: &mut Vec<RunError>,
  ) {
    let node_id = result.node_id.clone();
    let failure = result.error.clone().filter(|_| !result.success);
    let reported = result.clone();

    if let Err(e) = context.record(result) {
      error!(run_id = %run_id, error = %e, "result discarded");
      return;
    }

    self.report(run_id, &reported);
    order.push(node_id.clone());
    if let Some(error) = failure {
      errors.push(RunError::Node { node_id, error });
    }
  }

  /// Log a node's outcome and notify observers.
  fn report(&self, run_id: &str, result: &NodeResult) {
    match (&result.error, result.success) {
      (Some(error), false) => {
        warn!(
          run_id = %run_id,
          node_id = %result.node_id,
          error = %error,
          "node_failed"
        );
        self.notifier.notify(ExecutionEvent::NodeFailed {
          run_id: run_id.to_string(),
          node_id: result.node_id.clone(),
          error: error.to_string(),
        });
      }
      _ => {
        let payload = result.payload.clone().unwrap_or_default();
        info!(
          run_id = %run_id,
          node_id = %result.node_id,
          output = ?payload,
          "node_completed"
        );
        self.notifier.notify(ExecutionEvent::NodeCompleted {
          run_id: run_id.to_string(),
          node_id: result.node_id.clone(),
          payload,
        });
      }
    }
  }
}
