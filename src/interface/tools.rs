//! # Tool Dispatch
//!
//! Maps a tool name plus JSON arguments onto [`AppState`]. Used by the JSON-RPC
//! transport, where the tool name is the RPC method and arguments arrive either
//! by name (`{"query": "..."}`) or by position (`["..."]`).

use serde_json::Value;
use thiserror::Error;

use crate::application::info::{METHOD_CLI, METHOD_INFO, METHOD_ROUTER, METHOD_SQL};
use crate::application::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Info,
    Sql,
    Cli,
    Router,
}

impl Tool {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            METHOD_INFO => Some(Tool::Info),
            METHOD_SQL => Some(Tool::Sql),
            METHOD_CLI => Some(Tool::Cli),
            METHOD_ROUTER => Some(Tool::Router),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tool::Info => METHOD_INFO,
            Tool::Sql => METHOD_SQL,
            Tool::Cli => METHOD_CLI,
            Tool::Router => METHOD_ROUTER,
        }
    }

    /// Name of the single string argument, if the tool takes one.
    pub fn argument(&self) -> Option<&'static str> {
        match self {
            Tool::Info => None,
            Tool::Sql | Tool::Router => Some("query"),
            Tool::Cli => Some("command"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("missing string argument '{argument}' for {tool}")]
    MissingArgument { tool: &'static str, argument: &'static str },
    #[error("{0}")]
    Internal(String),
}

pub async fn call_tool(state: &AppState, name: &str, params: Option<&Value>) -> Result<Value, ToolError> {
    let tool = Tool::from_name(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
    tracing::info!(tool = tool.name(), "Tool call");

    match tool {
        Tool::Info => {
            let info = state.info().await.map_err(|e| ToolError::Internal(format!("{e:#}")))?;
            serde_json::to_value(info).map_err(|e| ToolError::Internal(e.to_string()))
        }
        Tool::Sql => {
            let query = string_argument(tool, params)?;
            Ok(Value::String(state.sql_tool(query).await))
        }
        Tool::Cli => {
            let command = string_argument(tool, params)?;
            Ok(Value::String(state.cli_tool(command).await))
        }
        Tool::Router => {
            let task = string_argument(tool, params)?;
            Ok(Value::String(state.router_tool(task).await))
        }
    }
}

fn string_argument<'a>(tool: Tool, params: Option<&'a Value>) -> Result<&'a str, ToolError> {
    let argument = tool.argument().unwrap_or_default();
    let value = match params {
        Some(Value::Object(map)) => map.get(argument),
        Some(Value::Array(items)) => items.first(),
        _ => None,
    };
    value
        .and_then(Value::as_str)
        .ok_or(ToolError::MissingArgument {
            tool: tool.name(),
            argument,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::state::test_support::seeded_state;
    use crate::strings::messages;
    use serde_json::json;

    #[test]
    fn test_tool_names_round_trip() {
        for tool in [Tool::Info, Tool::Sql, Tool::Cli, Tool::Router] {
            assert_eq!(Tool::from_name(tool.name()), Some(tool));
        }
        assert_eq!(Tool::from_name("mcp_unknown"), None);
    }

    #[tokio::test]
    async fn test_named_and_positional_arguments() {
        let (_dir, state) = seeded_state("");
        let named = call_tool(&state, "mcp_sql_tool", Some(&json!({"query": "SELECT COUNT(*) FROM users"})))
            .await
            .unwrap();
        assert_eq!(named, json!("(3,)"));

        let positional = call_tool(&state, "mcp_cli_tool", Some(&json!(["echo positional"])))
            .await
            .unwrap();
        assert_eq!(positional, json!("positional"));
    }

    #[tokio::test]
    async fn test_empty_argument_is_a_tool_message_not_an_error() {
        let (_dir, state) = seeded_state("");
        let result = call_tool(&state, "mcp_tool_router", Some(&json!({"query": "  "})))
            .await
            .unwrap();
        assert_eq!(result, json!(messages::EMPTY_INPUT));
    }

    #[tokio::test]
    async fn test_missing_argument() {
        let (_dir, state) = seeded_state("");
        let err = call_tool(&state, "mcp_cli_tool", Some(&json!({"query": "ls"})))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ToolError::MissingArgument {
                tool: "mcp_cli_tool",
                argument: "command"
            }
        );
        assert!(call_tool(&state, "mcp_sql_tool", None).await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let (_dir, state) = seeded_state("");
        let err = call_tool(&state, "drop_everything", None).await.unwrap_err();
        assert_eq!(err, ToolError::UnknownTool("drop_everything".to_string()));
    }

    #[tokio::test]
    async fn test_info_is_an_object() {
        let (_dir, state) = seeded_state("");
        let info = call_tool(&state, "mcp_info", None).await.unwrap();
        assert!(info["sqlite_tables"].as_array().unwrap().contains(&json!("users")));
    }

    #[tokio::test]
    async fn test_info_runs_alongside_other_tools() {
        let (_dir, state) = seeded_state("");
        let sql_args = json!({ "query": "SELECT COUNT(*) FROM users" });
        let (info, count) = tokio::join!(
            call_tool(&state, "mcp_info", None),
            call_tool(&state, "mcp_sql_tool", Some(&sql_args)),
        );
        assert_eq!(info.unwrap()["ollama_model"], "llama3");
        assert_eq!(count.unwrap(), json!("(3,)"));
    }
}
