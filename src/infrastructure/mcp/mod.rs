//! # MCP Module
//!
//! Model Context Protocol transport for the tool set.

pub mod server;

pub use server::serve_stdio;
