use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single unit of work in a pipeline.
///
/// Serialized the way the editor emits it:
///
/// ```json
/// { "id": "gen", "type": "generation", "data": { "model": "flux-pro" } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
  pub id: String,
  #[serde(flatten)]
  pub kind: NodeKind,
  /// Deadline for this node, overriding the runner default.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub timeout_ms: Option<u64>,
}

impl Node {
  pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
    Self {
      id: id.into(),
      kind,
      timeout_ms: None,
    }
  }

  pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
    self.timeout_ms = Some(timeout_ms);
    self
  }

  pub fn type_name(&self) -> &'static str {
    self.kind.type_name()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum NodeKind {
  /// Supplies a user-chosen image.
  Input(InputConfig),
  /// Renders a prompt template against its own variables.
  Prompt(PromptConfig),
  /// Calls the image-generation backend.
  Generation(GenerationConfig),
  /// Calls a post-processing tool on an image.
  Tool(ToolConfig),
  /// Terminal sink holding the final image.
  Output(OutputConfig),
}

impl NodeKind {
  pub fn type_name(&self) -> &'static str {
    match self {
      NodeKind::Input(_) => "input",
      NodeKind::Prompt(_) => "prompt",
      NodeKind::Generation(_) => "generation",
      NodeKind::Tool(_) => "tool",
      NodeKind::Output(_) => "output",
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputConfig {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image_url: Option<String>,
}

/// Prompt template with `{{ variable }}` placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptConfig {
  #[serde(default)]
  pub template: String,
  #[serde(default)]
  pub variables: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
  #[serde(default)]
  pub model: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub aspect_ratio: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub output_format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfig {
  pub tool_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub label: Option<String>,
}
