//! Runtime error types.

use genflow_graph::PortKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Node-level failures. These are recorded in the node's result and the run
/// continues with the next node.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeError {
  /// A mandatory port had no resolved value.
  #[error("missing required input: {port}")]
  MissingRequiredInput { port: PortKind },

  /// An injected backend failed.
  #[error("execution failed: {message}")]
  ExecutionFailed { message: String },

  /// The node did not finish before its deadline.
  #[error("timed out after {timeout_ms}ms")]
  TimedOut { timeout_ms: u64 },

  /// The run was cancelled before or while the node executed.
  #[error("cancelled")]
  Cancelled,
}

/// Errors reported by generation and tool backends.
#[derive(Debug, Error)]
pub enum BackendError {
  /// The service refused the request (bad parameters, quota, moderation).
  #[error("request rejected: {0}")]
  Rejected(String),

  /// The service could not be reached.
  #[error("transport error: {0}")]
  Transport(String),

  /// The service answered with something that is not an image reference.
  #[error("invalid response: {0}")]
  InvalidResponse(String),
}

impl From<BackendError> for NodeError {
  fn from(error: BackendError) -> Self {
    NodeError::ExecutionFailed {
      message: error.to_string(),
    }
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
  #[error("result for node '{node_id}' already recorded")]
  AlreadyRecorded { node_id: String },
}
