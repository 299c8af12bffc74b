//! # Domain Traits
//!
//! Abstract interfaces for the router's collaborators (inference backend, executors).
//! Allows for pluggable implementations in the Infrastructure layer.

use async_trait::async_trait;

use crate::domain::types::{ExecutionResult, ProcessError, QueryError, TransportError};

/// Abstract interface for a text-generation backend
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Ask the backend how to carry out `task`. Returns the raw reply text.
    async fn infer(&self, task: &str) -> Result<String, TransportError>;
}

/// Runs SQL statements against the data store
#[async_trait]
pub trait QueryRunner: Send + Sync {
    async fn run_query(&self, statement: &str) -> Result<ExecutionResult, QueryError>;
}

/// Runs command lines as child processes
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run_command(&self, command: &str) -> Result<ExecutionResult, ProcessError>;
}
