//! Execution result types.

use std::collections::HashMap;

use genflow_graph::{GraphError, PortKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::NodeError;

/// Typed value produced by a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePayload {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image_url: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub prompt: Option<String>,
}

impl NodePayload {
  pub fn image(url: impl Into<String>) -> Self {
    Self {
      image_url: Some(url.into()),
      prompt: None,
    }
  }

  pub fn prompt(text: impl Into<String>) -> Self {
    Self {
      image_url: None,
      prompt: Some(text.into()),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.image_url.is_none() && self.prompt.is_none()
  }

  /// The value delivered on an explicitly typed port: the field of that
  /// kind, else the other field.
  pub fn value_for(&self, port: PortKind) -> Option<&str> {
    let (own, other) = match port {
      PortKind::Image => (&self.image_url, &self.prompt),
      PortKind::Prompt => (&self.prompt, &self.image_url),
    };
    own
      .as_deref()
      .filter(|v| !v.is_empty())
      .or_else(|| other.as_deref().filter(|v| !v.is_empty()))
  }
}

/// Result of a single node execution. Created once per node per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeResult {
  pub node_id: String,
  pub success: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub payload: Option<NodePayload>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<NodeError>,
}

impl NodeResult {
  pub fn succeeded(node_id: impl Into<String>, payload: NodePayload) -> Self {
    Self {
      node_id: node_id.into(),
      success: true,
      payload: Some(payload),
      error: None,
    }
  }

  pub fn failed(node_id: impl Into<String>, error: NodeError) -> Self {
    Self {
      node_id: node_id.into(),
      success: false,
      payload: None,
      error: Some(error),
    }
  }

  /// The payload, only when the node succeeded.
  pub fn output(&self) -> Option<&NodePayload> {
    if self.success {
      self.payload.as_ref()
    } else {
      None
    }
  }
}

/// An entry in a run's error list.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum RunError {
  /// The graph was rejected; no node executed.
  #[error("{error}")]
  Graph { error: GraphError },

  #[error("node '{node_id}': {error}")]
  Node { node_id: String, error: NodeError },
}

/// Result of a complete pipeline run.
///
/// A snapshot owned by the caller; the runtime keeps no reference to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
  /// Unique run ID.
  pub run_id: String,
  pub success: bool,
  /// Node ids in the order they were executed.
  pub order: Vec<String>,
  /// Results of all executed nodes, keyed by node id.
  pub results: HashMap<String, NodeResult>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub errors: Vec<RunError>,
}

impl RunResult {
  pub(crate) fn rejected(run_id: String, error: GraphError) -> Self {
    Self {
      run_id,
      success: false,
      order: Vec::new(),
      results: HashMap::new(),
      errors: vec![RunError::Graph { error }],
    }
  }

  pub fn result(&self, node_id: &str) -> Option<&NodeResult> {
    self.results.get(node_id)
  }

  /// The graph-level error, if the run was rejected before executing.
  pub fn graph_error(&self) -> Option<&GraphError> {
    self.errors.iter().find_map(|e| match e {
      RunError::Graph { error } => Some(error),
      RunError::Node { .. } => None,
    })
  }

  /// Errors of the nodes that failed, in execution order.
  pub fn node_errors(&self) -> impl Iterator<Item = (&str, &NodeError)> {
    self.errors.iter().filter_map(|e| match e {
      RunError::Node { node_id, error } => Some((node_id.as_str(), error)),
      RunError::Graph { .. } => None,
    })
  }
}
