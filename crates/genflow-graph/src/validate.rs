use std::collections::HashSet;

use crate::error::GraphError;
use crate::graph::Graph;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
  Unvisited,
  InProgress,
  Done,
}

impl Graph<'_> {
  /// Check that the graph can be executed.
  ///
  /// Fails on an empty node set, on a repeated node id, and on any node
  /// reachable from itself through outgoing edges.
  pub fn validate(&self) -> Result<(), GraphError> {
    if self.is_empty() {
      return Err(GraphError::EmptyGraph);
    }

    let mut seen = HashSet::with_capacity(self.len());
    for node in self.nodes() {
      if !seen.insert(node.id.as_str()) {
        return Err(GraphError::DuplicateNodeId {
          node_id: node.id.clone(),
        });
      }
    }

    self.detect_cycle()
  }

  /// Depth-first search keeping the current path marked `InProgress`;
  /// reaching such a node again is a back edge. The path is an explicit stack
  /// of (node, next successor index) frames.
  fn detect_cycle(&self) -> Result<(), GraphError> {
    let mut marks = vec![Mark::Unvisited; self.len()];
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..self.len() {
      if marks[root] != Mark::Unvisited {
        continue;
      }
      marks[root] = Mark::InProgress;
      stack.push((root, 0));

      while let Some((position, cursor)) = stack.last_mut() {
        let Some(&next) = self.successors(*position).get(*cursor) else {
          marks[*position] = Mark::Done;
          stack.pop();
          continue;
        };
        *cursor += 1;

        match marks[next] {
          Mark::InProgress => {
            return Err(GraphError::CycleDetected {
              node_id: self.nodes()[next].id.clone(),
            });
          }
          Mark::Unvisited => {
            marks[next] = Mark::InProgress;
            stack.push((next, 0));
          }
          Mark::Done => {}
        }
      }
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use crate::edge::Edge;
  use crate::error::GraphError;
  use crate::graph::Graph;
  use crate::node::{InputConfig, Node, NodeKind};

  fn input(id: &str) -> Node {
    Node::new(id, NodeKind::Input(InputConfig::default()))
  }

  #[test]
  fn test_empty_graph() {
    let graph = Graph::new(&[], &[]);
    assert_eq!(graph.validate(), Err(GraphError::EmptyGraph));
  }

  #[test]
  fn test_two_cycle() {
    let nodes = vec![input("x"), input("y")];
    let edges = vec![Edge::new("x", "y"), Edge::new("y", "x")];
    let result = Graph::new(&nodes, &edges).validate();
    assert!(matches!(result, Err(GraphError::CycleDetected { .. })));
  }

  #[test]
  fn test_self_loop() {
    let nodes = vec![input("a")];
    let edges = vec![Edge::new("a", "a")];
    assert_eq!(
      Graph::new(&nodes, &edges).validate(),
      Err(GraphError::CycleDetected {
        node_id: "a".to_string()
      })
    );
  }

  #[test]
  fn test_cycle_behind_entry_point() {
    // a -> b -> c -> b
    let nodes = vec![input("a"), input("b"), input("c")];
    let edges = vec![Edge::new("a", "b"), Edge::new("b", "c"), Edge::new("c", "b")];
    assert_eq!(
      Graph::new(&nodes, &edges).validate(),
      Err(GraphError::CycleDetected {
        node_id: "b".to_string()
      })
    );
  }

  #[test]
  fn test_diamond_is_valid() {
    let nodes = vec![input("a"), input("b"), input("c"), input("d")];
    let edges = vec![
      Edge::new("a", "b"),
      Edge::new("a", "c"),
      Edge::new("b", "d"),
      Edge::new("c", "d"),
    ];
    assert_eq!(Graph::new(&nodes, &edges).validate(), Ok(()));
  }

  #[test]
  fn test_duplicate_node_id() {
    let nodes = vec![input("a"), input("a")];
    assert_eq!(
      Graph::new(&nodes, &[]).validate(),
      Err(GraphError::DuplicateNodeId {
        node_id: "a".to_string()
      })
    );
  }

  #[test]
  fn test_dangling_edges_do_not_invalidate() {
    let nodes = vec![input("a")];
    let edges = vec![Edge::new("a", "ghost"), Edge::new("ghost", "a")];
    assert_eq!(Graph::new(&nodes, &edges).validate(), Ok(()));
  }

  #[test]
  fn test_long_chain_does_not_exhaust_stack() {
    let ids: Vec<String> = (0..200_000).map(|i| format!("n{i}")).collect();
    let nodes: Vec<Node> = ids.iter().map(|id| input(id)).collect();
    let mut edges: Vec<Edge> = ids
      .windows(2)
      .map(|pair| Edge::new(pair[0].as_str(), pair[1].as_str()))
      .collect();
    assert_eq!(Graph::new(&nodes, &edges).validate(), Ok(()));

    edges.push(Edge::new("n199999", "n0"));
    assert_eq!(
      Graph::new(&nodes, &edges).validate(),
      Err(GraphError::CycleDetected {
        node_id: "n0".to_string()
      })
    );
  }
}
