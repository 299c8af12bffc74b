//! # Server Info
//!
//! Builds the metadata report returned by the `mcp_info` tool.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use crate::domain::types::ServerInfo;
use crate::infrastructure::database::Database;

pub const SYSTEM_NAME: &str = "Hybrid MCP Tool Router";

pub const METHOD_INFO: &str = "mcp_info";
pub const METHOD_SQL: &str = "mcp_sql_tool";
pub const METHOD_CLI: &str = "mcp_cli_tool";
pub const METHOD_ROUTER: &str = "mcp_tool_router";

pub const AVAILABLE_METHODS: [&str; 4] = [METHOD_INFO, METHOD_SQL, METHOD_CLI, METHOD_ROUTER];

pub fn server_info(database: &Database, model: &str, started_at: DateTime<Local>) -> Result<ServerInfo> {
    let elapsed = (Local::now() - started_at).num_seconds();
    let tables = database
        .list_tables()
        .with_context(|| format!("Failed to list tables in {}", database.path().display()))?;

    Ok(ServerInfo {
        system: SYSTEM_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: format_uptime(elapsed),
        available_memory_mb: format!("{:.2}", available_memory_mb()),
        current_user: current_user(),
        database: database.path().display().to_string(),
        sqlite_tables: tables,
        ollama_model: model.to_string(),
        available_methods: AVAILABLE_METHODS.iter().map(|m| m.to_string()).collect(),
    })
}

/// `H:MM:SS`, with a `N day(s), ` prefix once a day has passed.
pub fn format_uptime(total_secs: i64) -> String {
    let total = total_secs.max(0);
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    let clock = format!("{hours}:{minutes:02}:{seconds:02}");
    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}

/// `MemAvailable` from `/proc/meminfo`, in MiB. Zero where it cannot be read.
fn available_memory_mb() -> f64 {
    std::fs::read_to_string("/proc/meminfo")
        .ok()
        .and_then(|content| parse_mem_available_kb(&content))
        .map(|kb| kb as f64 / 1024.0)
        .unwrap_or(0.0)
}

fn parse_mem_available_kb(meminfo: &str) -> Option<u64> {
    meminfo
        .lines()
        .find_map(|line| line.strip_prefix("MemAvailable:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|kb| kb.parse().ok())
}

fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}
