//! Offline backends for running pipelines without network access.

use async_trait::async_trait;
use genflow_runtime::{BackendError, GenerationBackend, GenerationRequest, ToolBackend};

/// Returns a deterministic URL derived from the request instead of calling
/// a generation API.
pub struct DryRunGenerator;

#[async_trait]
impl GenerationBackend for DryRunGenerator {
  async fn generate(&self, request: GenerationRequest) -> Result<String, BackendError> {
    let format = request.output_format.as_deref().unwrap_or("png");
    let model = if request.model.is_empty() {
      "default"
    } else {
      &request.model
    };
    Ok(format!(
      "https://dry-run.invalid/{}/{}.{}",
      model,
      slug(&request.prompt),
      format
    ))
  }
}

/// Tags the image URL with the tool id.
pub struct DryRunTool;

#[async_trait]
impl ToolBackend for DryRunTool {
  async fn apply(&self, tool_id: &str, image: &str) -> Result<String, BackendError> {
    let separator = if image.contains('?') { '&' } else { '?' };
    Ok(format!("{}{}tool={}", image, separator, tool_id))
  }
}

fn slug(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for c in text.chars() {
    if c.is_ascii_alphanumeric() {
      out.push(c.to_ascii_lowercase());
    } else if !out.ends_with('-') {
      out.push('-');
    }
  }
  let trimmed = out.trim_matches('-');
  if trimmed.is_empty() {
    "untitled".to_string()
  } else {
    trimmed.to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_slug() {
    assert_eq!(slug("Draw a Cat!"), "draw-a-cat");
    assert_eq!(slug("  "), "untitled");
  }

  #[tokio::test]
  async fn test_dry_run_generator_is_deterministic() {
    let request = GenerationRequest {
      node_id: "gen".to_string(),
      prompt: "draw cat".to_string(),
      reference_image: None,
      model: "flux".to_string(),
      aspect_ratio: None,
      output_format: Some("webp".to_string()),
    };
    let first = DryRunGenerator.generate(request.clone()).await.unwrap();
    let second = DryRunGenerator.generate(request).await.unwrap();
    assert_eq!(first, "https://dry-run.invalid/flux/draw-cat.webp");
    assert_eq!(first, second);
  }

  #[tokio::test]
  async fn test_dry_run_tool_tags_url() {
    let tagged = DryRunTool
      .apply("upscale", "https://cdn/a.png")
      .await
      .unwrap();
    assert_eq!(tagged, "https://cdn/a.png?tool=upscale");
    let twice = DryRunTool.apply("gray", &tagged).await.unwrap();
    assert_eq!(twice, "https://cdn/a.png?tool=upscale&tool=gray");
  }
}
