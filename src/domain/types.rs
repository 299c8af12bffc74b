//! # Domain Types
//!
//! Common data structures and enums used across the application logic.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A typed instruction extracted from an inference reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Directive {
    Sql { statement: String },
    Shell { command: String },
}

/// Outcome of one tool invocation. Always rendered to text at the tool boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    Success { text: String },
    Failure { message: String },
}

impl ExecutionResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success { text: text.into() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Success { text } => text,
            Self::Failure { message } => message,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Success { text } => text,
            Self::Failure { message } => message,
        }
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Failure talking to the inference backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),
    #[error("HTTP request failed: {0}")]
    Request(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("empty statement")]
    Empty,
    #[error("{0}")]
    Backend(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProcessError {
    #[error("empty command")]
    Empty,
    /// Non-zero exit, or the process never started. Carries the trimmed
    /// standard error or the launch failure text.
    #[error("{0}")]
    NonZero(String),
}

/// Host and process metadata reported by the `mcp_info` tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerInfo {
    pub system: String,
    pub version: String,
    pub uptime: String,
    pub available_memory_mb: String,
    pub current_user: String,
    pub database: String,
    pub sqlite_tables: Vec<String>,
    pub ollama_model: String,
    pub available_methods: Vec<String>,
}
