//! Per-node execution.

use std::fmt;
use std::sync::{Arc, LazyLock};

use genflow_graph::{
  GenerationConfig, InputConfig, Node, NodeKind, PortKind, PromptConfig, ToolConfig,
};
use regex::{Captures, Regex};
use tracing::{debug, instrument};

use crate::backend::{GenerationBackend, GenerationRequest, ToolRegistry};
use crate::error::NodeError;
use crate::input::ResolvedInputs;
use crate::result::{NodePayload, NodeResult};

/// Executes single nodes against the injected backends.
///
/// Dispatch is an exhaustive match over [`NodeKind`]. Execution never panics
/// or returns early: every outcome becomes a [`NodeResult`].
#[derive(Clone)]
pub struct NodeExecutor {
  generator: Arc<dyn GenerationBackend>,
  tools: ToolRegistry,
}

impl NodeExecutor {
  /// Create an executor with no tool backends registered.
  pub fn new(generator: Arc<dyn GenerationBackend>) -> Self {
    Self {
      generator,
      tools: ToolRegistry::new(),
    }
  }

  pub fn with_tools(mut self, tools: ToolRegistry) -> Self {
    self.tools = tools;
    self
  }

  pub fn tools(&self) -> &ToolRegistry {
    &self.tools
  }

  /// Execute a node with its resolved inputs.
  #[instrument(
    name = "node_execute",
    skip(self, node, inputs),
    fields(node_id = %node.id, node_type = node.type_name())
  )]
  pub async fn execute(&self, node: &Node, inputs: &ResolvedInputs) -> NodeResult {
    let outcome = match &node.kind {
      NodeKind::Input(config) => Ok(execute_input(config)),
      NodeKind::Prompt(config) => Ok(NodePayload::prompt(render_prompt(config))),
      NodeKind::Generation(config) => self.execute_generation(&node.id, config, inputs).await,
      NodeKind::Tool(config) => self.execute_tool(config, inputs).await,
      NodeKind::Output(_) => require(inputs, PortKind::Image).map(NodePayload::image),
    };

    match outcome {
      Ok(payload) => NodeResult::succeeded(node.id.clone(), payload),
      Err(error) => NodeResult::failed(node.id.clone(), error),
    }
  }

  async fn execute_generation(
    &self,
    node_id: &str,
    config: &GenerationConfig,
    inputs: &ResolvedInputs,
  ) -> Result<NodePayload, NodeError> {
    let prompt = require(inputs, PortKind::Prompt)?;

    let request = GenerationRequest {
      node_id: node_id.to_string(),
      prompt: prompt.to_string(),
      reference_image: inputs.image.clone(),
      model: config.model.clone(),
      aspect_ratio: config.aspect_ratio.clone(),
      output_format: config.output_format.clone(),
    };
    debug!(
      model = %request.model,
      has_reference = request.reference_image.is_some(),
      "calling generation backend"
    );

    let image_url = self.generator.generate(request).await?;
    Ok(NodePayload::image(image_url))
  }

  async fn execute_tool(
    &self,
    config: &ToolConfig,
    inputs: &ResolvedInputs,
  ) -> Result<NodePayload, NodeError> {
    let image = require(inputs, PortKind::Image)?;

    let Some(backend) = self.tools.get(&config.tool_id) else {
      debug!(tool_id = %config.tool_id, "no backend registered for tool, passing image through");
      return Ok(NodePayload::image(image));
    };

    let processed = backend.apply(&config.tool_id, image).await?;
    Ok(NodePayload::image(processed))
  }
}

impl fmt::Debug for NodeExecutor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("NodeExecutor")
      .field("tools", &self.tools)
      .finish_non_exhaustive()
  }
}

fn execute_input(config: &InputConfig) -> NodePayload {
  match config.image_url.as_deref().filter(|url| !url.is_empty()) {
    Some(url) => NodePayload::image(url),
    None => NodePayload::default(),
  }
}

static PLACEHOLDER_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\{\{\s*([^{}]+?)\s*\}\}").unwrap());

/// Substitute `{{name}}` placeholders with the node's own variables.
///
/// Whitespace inside the braces is ignored. Placeholders naming an unknown
/// variable, and all other text, are left as written.
pub fn render_prompt(config: &PromptConfig) -> String {
  PLACEHOLDER_REGEX
    .replace_all(&config.template, |caps: &Captures<'_>| {
      match config.variables.get(&caps[1]) {
        Some(value) => value.clone(),
        None => caps[0].to_string(),
      }
    })
    .into_owned()
}

fn require(inputs: &ResolvedInputs, port: PortKind) -> Result<&str, NodeError> {
  inputs
    .get(port)
    .filter(|value| !value.is_empty())
    .ok_or(NodeError::MissingRequiredInput { port })
}
