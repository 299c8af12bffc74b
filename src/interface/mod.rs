//! # Interface Layer
//!
//! Transport-neutral entry points for the exposed tools.

pub mod tools;
