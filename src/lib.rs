//! # depgraph - dependency-ordered execution
//!
//! Orders a set of uniquely keyed executions by the prerequisite keys they
//! declare, rejects duplicate keys and circular dependencies, and runs the
//! executions one at a time in that order.

pub mod cli;
pub mod cli_handlers;
pub mod engine;
pub mod error;
pub mod execution;
pub mod graph;
pub mod key;
pub mod manifest;
pub mod result;
pub mod shell;
pub mod sorter;

pub use engine::DependencyExecutionEngine;
pub use error::{ExecutionError, GraphError, GraphResult};
pub use execution::{
    ContextDependencyExecution, DependencyExecution, DependencyExecutionIdentifier,
    ExecutionIdentifier, ResultDependencyExecution,
};
pub use graph::{Cycle, Graph};
pub use key::Key;
pub use result::{ExecutionResult, ExecutionResultCollection};
pub use tokio_util::sync::CancellationToken;
