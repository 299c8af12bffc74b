//! # Strings Module
//!
//! Centralizes user-facing strings and prompts.
//! Ensures consistency in messaging and easier updates.

pub mod messages;
pub mod prompts;
pub mod templates;
