use std::collections::HashMap;

use crate::edge::Edge;
use crate::node::Node;

/// Index over a pipeline's nodes and edges for traversal and analysis.
///
/// Nodes are addressed by their declaration position. Edges whose source or
/// target is not a declared node are dropped here, so they never influence
/// scheduling or input resolution.
#[derive(Debug, Clone)]
pub struct Graph<'a> {
  nodes: &'a [Node],
  edges: &'a [Edge],
  /// node id -> position of its first declaration.
  index: HashMap<&'a str, usize>,
  /// Successor positions, one entry per edge, in edge declaration order.
  adjacency: Vec<Vec<usize>>,
  /// Predecessor positions, one entry per edge.
  reverse_adjacency: Vec<Vec<usize>>,
  /// Positions in `edges` of the edges targeting each node.
  incoming: Vec<Vec<usize>>,
}

impl<'a> Graph<'a> {
  /// Build a graph from nodes and edges.
  pub fn new(nodes: &'a [Node], edges: &'a [Edge]) -> Self {
    let mut index = HashMap::with_capacity(nodes.len());
    for (position, node) in nodes.iter().enumerate() {
      index.entry(node.id.as_str()).or_insert(position);
    }

    let mut adjacency = vec![Vec::new(); nodes.len()];
    let mut reverse_adjacency = vec![Vec::new(); nodes.len()];
    let mut incoming = vec![Vec::new(); nodes.len()];

    for (edge_position, edge) in edges.iter().enumerate() {
      let (Some(&from), Some(&to)) = (
        index.get(edge.source.as_str()),
        index.get(edge.target.as_str()),
      ) else {
        continue;
      };
      adjacency[from].push(to);
      reverse_adjacency[to].push(from);
      incoming[to].push(edge_position);
    }

    Self {
      nodes,
      edges,
      index,
      adjacency,
      reverse_adjacency,
      incoming,
    }
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// All nodes in declaration order.
  pub fn nodes(&self) -> &'a [Node] {
    self.nodes
  }

  /// Edges delivering into a node, in declaration order.
  pub fn incoming_edges(&self, node_id: &str) -> impl Iterator<Item = &'a Edge> + '_ {
    let edges = self.edges;
    self
      .position(node_id)
      .map(|position| self.incoming[position].as_slice())
      .unwrap_or(&[])
      .iter()
      .map(move |&edge_position| &edges[edge_position])
  }

  pub(crate) fn position(&self, node_id: &str) -> Option<usize> {
    self.index.get(node_id).copied()
  }

  pub(crate) fn successors(&self, position: usize) -> &[usize] {
    &self.adjacency[position]
  }

  pub(crate) fn in_degrees(&self) -> Vec<usize> {
    self.reverse_adjacency.iter().map(Vec::len).collect()
  }
}
