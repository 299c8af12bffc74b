//! # MCP Server
//!
//! Exposes the four tools over the Model Context Protocol on stdio, using the
//! `rmcp` tool macros. Each tool returns a single text content item.

use anyhow::{Context, Result};
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
    transport::stdio,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::application::state::AppState;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct QueryArgs {
    /// SQL statement, or the natural-language task for the router
    pub query: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CommandArgs {
    /// Command line, split with shell quoting rules and run without a shell
    pub command: String,
}

#[derive(Clone)]
pub struct ToolServer {
    state: Arc<AppState>,
    tool_router: ToolRouter<ToolServer>,
}

#[tool_router]
impl ToolServer {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Report server metadata: uptime, memory, user, database tables, model")]
    async fn mcp_info(&self) -> Result<CallToolResult, McpError> {
        let info = self
            .state
            .info()
            .await
            .map_err(|e| McpError::internal_error(format!("{e:#}"), None))?;
        let json = serde_json::to_string_pretty(&info)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Execute a SQL statement against the SQLite database")]
    async fn mcp_sql_tool(
        &self,
        Parameters(QueryArgs { query }): Parameters<QueryArgs>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.state.sql_tool(&query).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Run a command line as a child process and return its output")]
    async fn mcp_cli_tool(
        &self,
        Parameters(CommandArgs { command }): Parameters<CommandArgs>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.state.cli_tool(&command).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Ask the language model whether a task is SQL or a shell command, then run it")]
    async fn mcp_tool_router(
        &self,
        Parameters(QueryArgs { query }): Parameters<QueryArgs>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.state.router_tool(&query).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_handler]
impl ServerHandler for ToolServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "SQL, shell and natural-language routing tools over a local SQLite database".to_string(),
            ),
            ..Default::default()
        }
    }
}

/// Serve MCP on stdin/stdout until the client disconnects.
pub async fn serve_stdio(state: Arc<AppState>) -> Result<()> {
    tracing::info!("Starting MCP server on stdio");
    let service = ToolServer::new(state)
        .serve(stdio())
        .await
        .context("Failed to start MCP stdio server")?;
    service.waiting().await.context("MCP server terminated abnormally")?;
    tracing::info!("MCP client disconnected, shutting down");
    Ok(())
}
