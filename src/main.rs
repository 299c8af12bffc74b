//! # Main Entry Point
//!
//! Initializes the tool router server:
//! - Domain: Configuration and Types
//! - Infrastructure: SQLite, process executor, inference client, transports
//! - Application: Router, Parsing, Info, Logging
//! - Interface: Tool dispatch
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::state::AppState;
use crate::domain::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "toolrouter", version, about = "SQL, shell and LLM-routed tools over JSON-RPC and MCP")]
struct Args {
    /// Path to config.yaml (defaults to data/config.yaml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Inference endpoint (Ollama /api/generate)
    #[arg(long, global = true)]
    ollama_url: Option<String>,

    /// Model name sent to the inference endpoint
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve JSON-RPC 2.0 over HTTP at /jsonrpc (default)
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Serve MCP on stdin/stdout
    Stdio,
    /// Run one SQL statement and print the result
    Sql { query: String },
    /// Run one command line and print the result
    Cli { command: String },
    /// Route one natural-language task and print the result
    Route { task: String },
    /// Print server metadata as JSON
    Info,
}

impl Args {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(db) = &self.db {
            config.database.path = db.clone();
        }
        if let Some(url) = &self.ollama_url {
            config.inference.url = url.clone();
        }
        if let Some(model) = &self.model {
            config.inference.model = model.clone();
        }
        if let Some(Command::Serve { host, port }) = &self.command {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load Configuration
    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply_overrides(&mut config);

    // 2. Logging Setup
    let _guard = application::logging::init(&config.logging)?;
    tracing::info!("Starting toolrouter v{}", env!("CARGO_PKG_VERSION"));

    // 3. Shared State
    let state = Arc::new(AppState::from_config(config)?);
    state.bootstrap()?;
    tracing::info!(
        database = %state.database().path().display(),
        model = %state.config().inference.model,
        "Database ready"
    );

    // 4. Dispatch
    match args.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    }) {
        Command::Serve { .. } => {
            let server = &state.config().server;
            let addr: SocketAddr = format!("{}:{}", server.host, server.port)
                .parse()
                .with_context(|| format!("Invalid listen address {}:{}", server.host, server.port))?;
            infrastructure::rpc::serve(state.clone(), addr).await
        }
        Command::Stdio => infrastructure::mcp::serve_stdio(state).await,
        Command::Sql { query } => {
            println!("{}", state.sql_tool(&query).await);
            Ok(())
        }
        Command::Cli { command } => {
            println!("{}", state.cli_tool(&command).await);
            Ok(())
        }
        Command::Route { task } => {
            println!("{}", state.router_tool(&task).await);
            Ok(())
        }
        Command::Info => {
            println!("{}", state.info_text().await);
            Ok(())
        }
    }
}
