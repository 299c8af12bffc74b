//! # Application Layer
//!
//! Contains the core logic and orchestration of the server.
//! This includes the action router, directive parsing, metadata reporting and shared state.

pub mod info;
pub mod logging;
pub mod parsing;
pub mod router;
pub mod state;
