//! genflow Graph
//!
//! This crate provides the pipeline graph representation for genflow. A
//! pipeline is the ordered set of nodes and edges a user assembles in the
//! visual editor; this crate checks that it can be executed and computes the
//! order in which the runtime walks it.
//!
//! - Nodes are a tagged sum type ([`NodeKind`]) with typed configuration
//! - Edges optionally carry logical ports ([`PortKind`])
//! - [`Pipeline::validate`] rejects empty graphs, duplicate ids and cycles
//! - [`Pipeline::order`] and [`Pipeline::layers`] schedule with Kahn's algorithm

mod edge;
mod error;
mod graph;
mod node;
mod pipeline;
mod schedule;
mod validate;

pub use edge::{Edge, PortKind};
pub use error::GraphError;
pub use graph::Graph;
pub use node::{
  GenerationConfig, InputConfig, Node, NodeKind, OutputConfig, PromptConfig, ToolConfig,
};
pub use pipeline::Pipeline;
