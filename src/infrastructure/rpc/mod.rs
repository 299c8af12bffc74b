//! JSON-RPC 2.0 over HTTP transport

pub mod protocol;
pub mod server;

pub use server::serve;
