//! genflow Runtime
//!
//! This crate executes pipelines built with `genflow-graph`. It handles
//! input resolution, per-node execution against injected backends, and run
//! coordination.
//!
//! ```text
//! Pipeline ─▶ validate ─▶ schedule ─▶ for each batch:
//!                                       resolve_inputs ─▶ NodeExecutor ─▶ ExecutionContext
//!                                     ─▶ RunResult
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use genflow_runtime::{NodeExecutor, Runner, RunnerConfig, ToolRegistry};
//! use tokio_util::sync::CancellationToken;
//!
//! let executor = NodeExecutor::new(Arc::new(my_generator))
//!   .with_tools(ToolRegistry::new().with("upscale", Arc::new(my_upscaler)));
//! let runner = Runner::new(RunnerConfig::default(), executor);
//!
//! let result = runner.run(&pipeline, CancellationToken::new()).await;
//! for (node_id, error) in result.node_errors() {
//!   eprintln!("{node_id}: {error}");
//! }
//! ```

mod backend;
mod context;
mod error;
mod events;
mod executor;
mod input;
mod result;
mod runner;

pub use backend::{GenerationBackend, GenerationRequest, ToolBackend, ToolRegistry};
pub use context::ExecutionContext;
pub use error::{BackendError, ContextError, NodeError};
pub use events::{ChannelNotifier, ExecutionEvent, ExecutionNotifier, NoopNotifier};
pub use executor::{NodeExecutor, render_prompt};
pub use input::{PortPolicy, ResolvedInputs, classify, resolve_inputs};
pub use result::{NodePayload, NodeResult, RunError, RunResult};
pub use runner::{ExecutionMode, Runner, RunnerConfig};
