//! # Templates
//!
//! Exposes the prompt templates from `templates/` directory.

pub const ROUTER_TEMPLATE: &str = include_str!("../../templates/router.md");
