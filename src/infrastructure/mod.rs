//! # Infrastructure Layer
//!
//! Handles interactions with external systems: the SQLite store, child processes,
//! the inference backend, and the two transports (JSON-RPC over HTTP, MCP on stdio).
//! Implements the traits defined in the Domain layer.

pub mod database;
pub mod llm;
pub mod mcp;
pub mod rpc;
pub mod tools;
