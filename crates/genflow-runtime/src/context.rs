//! Per-run store of node results.

use std::collections::HashMap;

use crate::error::ContextError;
use crate::result::NodeResult;

/// Append-only map from node id to that node's result, scoped to one run.
///
/// Each node id has a single slot; once written it is read-only for the rest
/// of the run.
#[derive(Debug, Default)]
pub struct ExecutionContext {
  results: HashMap<String, NodeResult>,
}

impl ExecutionContext {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, node_id: &str) -> Option<&NodeResult> {
    self.results.get(node_id)
  }

  pub fn contains(&self, node_id: &str) -> bool {
    self.results.contains_key(node_id)
  }

  /// Write a node's result. The first write wins.
  pub fn record(&mut self, result: NodeResult) -> Result<(), ContextError> {
    if self.results.contains_key(&result.node_id) {
      return Err(ContextError::AlreadyRecorded {
        node_id: result.node_id,
      });
    }
    self.results.insert(result.node_id.clone(), result);
    Ok(())
  }

  pub fn len(&self) -> usize {
    self.results.len()
  }

  pub fn is_empty(&self) -> bool {
    self.results.is_empty()
  }

  pub fn into_results(self) -> HashMap<String, NodeResult> {
    self.results
  }
}
