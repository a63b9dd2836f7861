use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Graph-level errors. Any of these aborts a run before a node executes.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphError {
  #[error("graph has no nodes")]
  EmptyGraph,

  #[error("duplicate node id: {node_id}")]
  DuplicateNodeId { node_id: String },

  #[error("cycle detected at node '{node_id}'")]
  CycleDetected { node_id: String },

  /// Kahn's algorithm could not place every node. Validation should have
  /// rejected the graph already.
  #[error("scheduler placed {scheduled} of {total} nodes (unresolved cycle)")]
  Unschedulable { scheduled: usize, total: usize },
}
