use serde::{Deserialize, Serialize};

/// A directed dependency from one node's output to another node's input.
///
/// Ports are optional labels. Only the target port is used for input
/// classification; the source port is carried through for the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
  pub source: String,
  pub target: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source_port: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub target_port: Option<String>,
}

impl Edge {
  /// An untyped edge.
  pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
    Self {
      source: source.into(),
      target: target.into(),
      source_port: None,
      target_port: None,
    }
  }

  /// An edge delivering into the given port of the target.
  pub fn to_port(source: impl Into<String>, target: impl Into<String>, port: PortKind) -> Self {
    Self {
      target_port: Some(port.as_str().to_string()),
      ..Self::new(source, target)
    }
  }

  /// The recognised logical port this edge targets, if any.
  pub fn target_port_kind(&self) -> Option<PortKind> {
    self.target_port.as_deref().and_then(PortKind::parse)
  }
}

/// Logical input slots understood by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortKind {
  Prompt,
  Image,
}

impl PortKind {
  pub fn parse(port: &str) -> Option<Self> {
    match port.trim().to_ascii_lowercase().as_str() {
      "prompt" | "text" => Some(PortKind::Prompt),
      "image" | "image_url" | "imageurl" | "reference" => Some(PortKind::Image),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      PortKind::Prompt => "prompt",
      PortKind::Image => "image",
    }
  }
}

impl std::fmt::Display for PortKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}
