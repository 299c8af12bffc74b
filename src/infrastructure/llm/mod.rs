//! Inference backend access
//!
//! The router only needs one capability from a language model: turn a task into
//! free-form text that may contain a fenced `sql` or `bash` block. This module
//! implements that against Ollama's `/api/generate` endpoint.

mod client;
pub mod types;

pub use client::OllamaClient;
