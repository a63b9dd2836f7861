//! Topological scheduling with Kahn's algorithm.
//!
//! Ties between nodes that become ready at the same time are broken by
//! declaration order, so an unchanged graph always runs in the same order.

use std::collections::VecDeque;

use crate::error::GraphError;
use crate::graph::Graph;
use crate::node::Node;

impl<'a> Graph<'a> {
  /// Linear execution order in which every node follows all of its
  /// predecessors.
  pub fn topological_order(&self) -> Result<Vec<&'a Node>, GraphError> {
    let mut in_degree = self.in_degrees();
    let mut queue: VecDeque<usize> = (0..self.len()).filter(|&p| in_degree[p] == 0).collect();
    let mut order = Vec::with_capacity(self.len());

    while let Some(position) = queue.pop_front() {
      order.push(&self.nodes()[position]);
      for &next in self.successors(position) {
        in_degree[next] -= 1;
        if in_degree[next] == 0 {
          queue.push_back(next);
        }
      }
    }

    self.ensure_complete(order.len())?;
    Ok(order)
  }

  /// Dependency levels: every node in layer `k` depends only on nodes in
  /// earlier layers. Nodes within a layer keep declaration order.
  pub fn layers(&self) -> Result<Vec<Vec<&'a Node>>, GraphError> {
    let mut in_degree = self.in_degrees();
    let mut current: Vec<usize> = (0..self.len()).filter(|&p| in_degree[p] == 0).collect();
    let mut layers = Vec::new();
    let mut scheduled = 0;

    while !current.is_empty() {
      let mut next_layer = Vec::new();
      for &position in &current {
        for &next in self.successors(position) {
          in_degree[next] -= 1;
          if in_degree[next] == 0 {
            next_layer.push(next);
          }
        }
      }
      next_layer.sort_unstable();

      scheduled += current.len();
      layers.push(current.iter().map(|&p| &self.nodes()[p]).collect());
      current = next_layer;
    }

    self.ensure_complete(scheduled)?;
    Ok(layers)
  }

  fn ensure_complete(&self, scheduled: usize) -> Result<(), GraphError> {
    if scheduled < self.len() {
      return Err(GraphError::Unschedulable {
        scheduled,
        total: self.len(),
      });
    }
    Ok(())
  }
}
