//! # Messages
//!
//! Contains constant strings and format functions for tool output.
//! Every failure a caller can see is worded here.

pub const EMPTY_INPUT: &str = "⚠️ Empty input.";
pub const EMPTY_SQL: &str = "⚠️ Empty SQL query.";
pub const EMPTY_COMMAND: &str = "⚠️ Empty CLI command.";

pub const NO_RESULTS: &str = "✅ No results.";
pub const NO_OUTPUT: &str = "✅ Command executed with no output.";

pub const ONE_STATEMENT: &str = "You can only execute one statement at a time.";

pub fn sql_error(err: &str) -> String {
    format!("⚠️ SQL error: {err}")
}

pub fn cli_error(err: &str) -> String {
    format!("⚠️ CLI error: {err}")
}

pub fn inference_error(err: &str) -> String {
    format!("❌ Inference error: {err}")
}

pub fn unrecognized_response(reply: &str) -> String {
    format!("⚠️ Unrecognized response:\n{reply}")
}

pub fn info_error(err: &str) -> String {
    format!("⚠️ Info error: {err}")
}
