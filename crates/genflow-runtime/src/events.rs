//! Execution events and notifiers for observability.
//!
//! Events are emitted during a run so the editor can show per-node progress
//! while the run is still in flight.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::result::NodePayload;

/// Events emitted during a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExecutionEvent {
  /// The graph passed validation and execution is about to begin.
  RunStarted { run_id: String, node_count: usize },

  /// A node has started executing.
  NodeStarted { run_id: String, node_id: String },

  /// A node has completed successfully.
  NodeCompleted {
    run_id: String,
    node_id: String,
    payload: NodePayload,
  },

  /// A node has failed.
  NodeFailed {
    run_id: String,
    node_id: String,
    error: String,
  },

  /// Every node succeeded.
  RunCompleted { run_id: String },

  /// The graph was rejected or at least one node failed.
  RunFailed { run_id: String, error: String },
}

/// Trait for receiving execution events.
///
/// The runner calls `notify` for each event; implementations decide what to
/// do with them (stream to the UI, log, ignore).
pub trait ExecutionNotifier: Send + Sync {
  fn notify(&self, event: ExecutionEvent);
}

/// A notifier that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl ExecutionNotifier for NoopNotifier {
  fn notify(&self, _event: ExecutionEvent) {}
}

/// A notifier that sends events to an unbounded channel.
///
/// Volume is a handful of events per node, so the runner never waits on a
/// slow consumer.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  sender: mpsc::UnboundedSender<ExecutionEvent>,
}

impl ChannelNotifier {
  pub fn new(sender: mpsc::UnboundedSender<ExecutionEvent>) -> Self {
    Self { sender }
  }

  /// Create a notifier together with the receiving end of its channel.
  pub fn channel() -> (Self, mpsc::UnboundedReceiver<ExecutionEvent>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (Self::new(sender), receiver)
  }
}

impl ExecutionNotifier for ChannelNotifier {
  fn notify(&self, event: ExecutionEvent) {
    // Receiver may have been dropped
    let _ = self.sender.send(event);
  }
}
