use serde::{Deserialize, Serialize};

use crate::edge::Edge;
use crate::error::GraphError;
use crate::graph::Graph;
use crate::node::Node;

/// The graph description produced by the editor: ordered nodes and edges.
///
/// Node order matters; it breaks ties when several nodes are ready at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
  #[serde(default)]
  pub nodes: Vec<Node>,
  #[serde(default)]
  pub edges: Vec<Edge>,
}

impl Pipeline {
  pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
    Self { nodes, edges }
  }

  /// Parse the editor's JSON graph description.
  pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(json)
  }

  /// Build the graph structure for traversal.
  pub fn graph(&self) -> Graph<'_> {
    Graph::new(&self.nodes, &self.edges)
  }

  pub fn validate(&self) -> Result<(), GraphError> {
    self.graph().validate()
  }

  pub fn order(&self) -> Result<Vec<&Node>, GraphError> {
    self.graph().topological_order()
  }

  pub fn layers(&self) -> Result<Vec<Vec<&Node>>, GraphError> {
    self.graph().layers()
  }
}
