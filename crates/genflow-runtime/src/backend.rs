//! External services invoked by generation and tool nodes.
//!
//! The runtime does not know how these are reached; the embedding application
//! injects implementations that talk to its HTTP APIs.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::BackendError;

/// Everything a generation call needs, taken from the node's inputs and
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
  pub node_id: String,
  pub prompt: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub reference_image: Option<String>,
  pub model: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub aspect_ratio: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub output_format: Option<String>,
}

/// Image generation service.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
  /// Generate an image and return a reference to it (URL or data URI).
  async fn generate(&self, request: GenerationRequest) -> Result<String, BackendError>;
}

/// Image post-processing service.
#[async_trait]
pub trait ToolBackend: Send + Sync {
  /// Apply the tool to an image and return a reference to the result.
  async fn apply(&self, tool_id: &str, image: &str) -> Result<String, BackendError>;
}

/// Tool backends keyed by tool id.
///
/// Tool ids without a registered backend pass their image through unchanged.
#[derive(Clone, Default)]
pub struct ToolRegistry {
  tools: HashMap<String, Arc<dyn ToolBackend>>,
}

impl ToolRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a backend, replacing any existing one with the same id.
  pub fn register(&mut self, tool_id: impl Into<String>, backend: Arc<dyn ToolBackend>) {
    self.tools.insert(tool_id.into(), backend);
  }

  pub fn with(mut self, tool_id: impl Into<String>, backend: Arc<dyn ToolBackend>) -> Self {
    self.register(tool_id, backend);
    self
  }

  pub fn get(&self, tool_id: &str) -> Option<&Arc<dyn ToolBackend>> {
    self.tools.get(tool_id)
  }

  pub fn contains(&self, tool_id: &str) -> bool {
    self.tools.contains_key(tool_id)
  }
}

impl fmt::Debug for ToolRegistry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut ids: Vec<&String> = self.tools.keys().collect();
    ids.sort();
    f.debug_struct("ToolRegistry").field("tools", &ids).finish()
  }
}
