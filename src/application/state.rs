//! # Application State
//!
//! Everything a transport needs to serve the four tools, built once at startup
//! and shared behind an `Arc`. Nothing in here is mutated after construction.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::sync::Arc;

use crate::application::info;
use crate::application::router::ActionRouter;
use crate::domain::config::AppConfig;
use crate::domain::traits::InferenceProvider;
use crate::domain::types::ServerInfo;
use crate::infrastructure::database::Database;
use crate::infrastructure::llm::OllamaClient;
use crate::infrastructure::tools::ToolExecutor;
use crate::strings::messages;

pub struct AppState {
    config: AppConfig,
    database: Arc<Database>,
    router: ActionRouter,
    started_at: DateTime<Local>,
}

impl AppState {
    /// Wire the production components: SQLite store, process executor and Ollama client.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let llm = OllamaClient::new(&config.inference).context("Failed to create inference client")?;
        Ok(Self::with_inference(config, Arc::new(llm)))
    }

    /// Same wiring with a caller-supplied inference backend.
    pub fn with_inference(config: AppConfig, llm: Arc<dyn InferenceProvider>) -> Self {
        let database = Arc::new(Database::new(config.database.path.clone()));
        let router = ActionRouter::new(llm, database.clone(), Arc::new(ToolExecutor::new()));
        Self {
            config,
            database,
            router,
            started_at: Local::now(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn bootstrap(&self) -> Result<()> {
        self.database.bootstrap().with_context(|| {
            format!("Failed to initialise database at {}", self.database.path().display())
        })
    }

    /// Metadata report. The table listing and `/proc` read run on the blocking pool.
    pub async fn info(&self) -> Result<ServerInfo> {
        let database = self.database.clone();
        let model = self.config.inference.model.clone();
        let started_at = self.started_at;
        tokio::task::spawn_blocking(move || info::server_info(&database, &model, started_at))
            .await
            .context("Info task failed")?
    }

    /// `mcp_info` rendered as pretty JSON, or an error line.
    pub async fn info_text(&self) -> String {
        match self
            .info()
            .await
            .and_then(|info| Ok(serde_json::to_string_pretty(&info)?))
        {
            Ok(json) => json,
            Err(e) => messages::info_error(&format!("{e:#}")),
        }
    }

    pub async fn sql_tool(&self, query: &str) -> String {
        self.router.run_sql(query).await.into_text()
    }

    pub async fn cli_tool(&self, command: &str) -> String {
        self.router.run_command(command).await.into_text()
    }

    pub async fn router_tool(&self, task: &str) -> String {
        self.router.route(task).await.into_text()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::domain::types::TransportError;
    use async_trait::async_trait;
    use tempfile::TempDir;

    /// Always answers with the same reply text.
    pub struct FixedReply(pub String);

    #[async_trait]
    impl InferenceProvider for FixedReply {
        async fn infer(&self, _task: &str) -> Result<String, TransportError> {
            Ok(self.0.clone())
        }
    }

    /// A bootstrapped state over a temporary database.
    pub fn seeded_state(reply: &str) -> (TempDir, Arc<AppState>) {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.database.path = dir.path().join("database.db");
        let state = AppState::with_inference(config, Arc::new(FixedReply(reply.to_string())));
        state.bootstrap().unwrap();
        (dir, Arc::new(state))
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::seeded_state;
    use super::*;

    #[tokio::test]
    async fn test_tools_render_text() {
        let (_dir, state) = seeded_state("```sql\nSELECT name FROM users WHERE age = 25\n```");

        assert_eq!(state.sql_tool("SELECT COUNT(*) FROM users").await, "(3,)");
        assert_eq!(state.sql_tool("").await, messages::EMPTY_SQL);
        assert_eq!(state.cli_tool("echo hi there").await, "hi there");
        assert_eq!(state.cli_tool(" ").await, messages::EMPTY_COMMAND);
        assert_eq!(state.router_tool("who is 25?").await, "('user',)");
        assert_eq!(state.router_tool("").await, messages::EMPTY_INPUT);
    }

    #[tokio::test]
    async fn test_info_text_is_json() {
        let (_dir, state) = seeded_state("");
        let value: serde_json::Value = serde_json::from_str(&state.info_text().await).unwrap();
        assert_eq!(value["ollama_model"], "llama3");
        assert_eq!(value["available_methods"][3], "mcp_tool_router");
    }

    #[tokio::test]
    async fn test_info_error_is_reported_as_text() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.database.path = dir.path().join("missing").join("database.db");
        let state = AppState::with_inference(
            config,
            Arc::new(super::test_support::FixedReply(String::new())),
        );

        assert!(state.info().await.is_err());
        assert!(state.info_text().await.starts_with("⚠️ Info error: "));
    }
}
