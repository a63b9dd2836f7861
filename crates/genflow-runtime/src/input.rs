//! Input resolution.
//!
//! Turns the edges arriving at a node into named, typed inputs by looking up
//! each source node's result in the [`ExecutionContext`].
//!
//! # Classification
//! An edge with a recognised `targetPort` delivers into that slot. An untyped
//! edge is classified by the shape of each payload string: URLs and data URIs
//! are images, any other non-empty text is a prompt. With
//! [`PortPolicy::Strict`] untyped edges are ignored instead.
//!
//! Failed or missing upstream results contribute nothing, so a node whose
//! required input came from a failed node fails on its own.

use genflow_graph::{Graph, Node, PortKind};
use serde::{Deserialize, Serialize};

use crate::context::ExecutionContext;

const IMAGE_PREFIXES: [&str; 4] = ["http://", "https://", "data:", "blob:"];

/// How edges without a recognised target port are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortPolicy {
  /// Classify the upstream value by its shape.
  #[default]
  Infer,
  /// Untyped edges contribute nothing.
  Strict,
}

/// Named inputs handed to a node executor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedInputs {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub prompt: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image: Option<String>,
}

impl ResolvedInputs {
  pub fn get(&self, port: PortKind) -> Option<&str> {
    match port {
      PortKind::Prompt => self.prompt.as_deref(),
      PortKind::Image => self.image.as_deref(),
    }
  }

  pub fn set(&mut self, port: PortKind, value: impl Into<String>) {
    let slot = match port {
      PortKind::Prompt => &mut self.prompt,
      PortKind::Image => &mut self.image,
    };
    *slot = Some(value.into());
  }

  pub fn with(mut self, port: PortKind, value: impl Into<String>) -> Self {
    self.set(port, value);
    self
  }
}

/// Classify a value by shape. Empty strings classify as nothing.
pub fn classify(value: &str) -> Option<PortKind> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return None;
  }
  let lower = trimmed.to_ascii_lowercase();
  if IMAGE_PREFIXES.iter().any(|prefix| lower.starts_with(prefix)) {
    Some(PortKind::Image)
  } else {
    Some(PortKind::Prompt)
  }
}

/// Resolve a node's inputs from the results recorded so far.
///
/// Edges are applied in declaration order; a later edge overwrites an
/// earlier one for the same slot.
pub fn resolve_inputs(
  node: &Node,
  graph: &Graph<'_>,
  context: &ExecutionContext,
  policy: PortPolicy,
) -> ResolvedInputs {
  let mut inputs = ResolvedInputs::default();

  for edge in graph.incoming_edges(&node.id) {
    let Some(payload) = context.get(&edge.source).and_then(|r| r.output()) else {
      continue;
    };

    match (edge.target_port_kind(), policy) {
      (Some(port), _) => {
        if let Some(value) = payload.value_for(port) {
          inputs.set(port, value);
        }
      }
      (None, PortPolicy::Strict) => {}
      (None, PortPolicy::Infer) => {
        let values = [payload.image_url.as_deref(), payload.prompt.as_deref()];
        for value in values.into_iter().flatten() {
          if let Some(port) = classify(value) {
            inputs.set(port, value);
          }
        }
      }
    }
  }

  inputs
}
