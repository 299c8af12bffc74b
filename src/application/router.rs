//! # Action Router
//!
//! Turns a natural-language task into exactly one action. The task goes to the
//! inference backend, the reply is parsed into a [`Directive`], and the directive
//! is dispatched to the query or command executor. Every outcome, including
//! transport and executor errors, comes back as an [`ExecutionResult`]; nothing
//! escapes as an error.

use std::sync::Arc;

use crate::application::parsing;
use crate::domain::traits::{CommandRunner, InferenceProvider, QueryRunner};
use crate::domain::types::{Directive, ExecutionResult, ProcessError, QueryError};
use crate::strings::messages;

/// Stages of a single `route` call. Strictly linear; the first failure ends the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStage {
    AwaitingReply,
    Parsing,
    Dispatching,
    Done,
}

pub struct ActionRouter {
    llm: Arc<dyn InferenceProvider>,
    queries: Arc<dyn QueryRunner>,
    commands: Arc<dyn CommandRunner>,
}

impl ActionRouter {
    pub fn new(
        llm: Arc<dyn InferenceProvider>,
        queries: Arc<dyn QueryRunner>,
        commands: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            llm,
            queries,
            commands,
        }
    }

    pub async fn route(&self, task: &str) -> ExecutionResult {
        if task.trim().is_empty() {
            return ExecutionResult::failure(messages::EMPTY_INPUT);
        }

        tracing::info!(stage = ?RouteStage::AwaitingReply, "Routing task: {}", task);
        let reply = match self.llm.infer(task).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("Inference failed: {}", e);
                return ExecutionResult::failure(messages::inference_error(&e.to_string()));
            }
        };

        tracing::debug!(stage = ?RouteStage::Parsing, "Inference reply: {}", reply);
        let Some(directive) = parsing::parse_directive(&reply) else {
            tracing::warn!(stage = ?RouteStage::Done, "No directive in inference reply");
            return ExecutionResult::failure(messages::unrecognized_response(&reply));
        };

        tracing::info!(stage = ?RouteStage::Dispatching, directive = ?directive, "Dispatching");
        let result = self.dispatch(directive).await;
        tracing::info!(stage = ?RouteStage::Done, success = result.is_success(), "Route finished");
        result
    }

    pub async fn dispatch(&self, directive: Directive) -> ExecutionResult {
        match directive {
            Directive::Sql { statement } => self.run_sql(&statement).await,
            Directive::Shell { command } => self.run_command(&command).await,
        }
    }

    /// Run a statement directly, with the same error wording the router uses.
    pub async fn run_sql(&self, statement: &str) -> ExecutionResult {
        match self.queries.run_query(statement).await {
            Ok(result) => result,
            Err(e) => query_failure(e),
        }
    }

    /// Run a command line directly, with the same error wording the router uses.
    pub async fn run_command(&self, command: &str) -> ExecutionResult {
        match self.commands.run_command(command).await {
            Ok(result) => result,
            Err(e) => process_failure(e),
        }
    }
}

fn query_failure(err: QueryError) -> ExecutionResult {
    match err {
        QueryError::Empty => ExecutionResult::failure(messages::EMPTY_SQL),
        QueryError::Backend(msg) => ExecutionResult::failure(messages::sql_error(&msg)),
    }
}

fn process_failure(err: ProcessError) -> ExecutionResult {
    match err {
        ProcessError::Empty => ExecutionResult::failure(messages::EMPTY_COMMAND),
        ProcessError::NonZero(stderr) => ExecutionResult::failure(messages::cli_error(&stderr)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::TransportError;
    use crate::infrastructure::database::Database;
    use crate::infrastructure::tools::ToolExecutor;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Replies with a fixed text and counts calls.
    struct ScriptedLlm {
        reply: Result<String, TransportError>,
        calls: AtomicUsize,
    }

    impl ScriptedLlm {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(err: TransportError) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(err),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl InferenceProvider for ScriptedLlm {
        async fn infer(&self, _task: &str) -> Result<String, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    /// Records what each executor was asked to run.
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl QueryRunner for Recorder {
        async fn run_query(&self, statement: &str) -> Result<ExecutionResult, QueryError> {
            self.seen.lock().unwrap().push(statement.to_string());
            Ok(ExecutionResult::success(format!("sql:{statement}")))
        }
    }

    #[async_trait]
    impl CommandRunner for Recorder {
        async fn run_command(&self, command: &str) -> Result<ExecutionResult, ProcessError> {
            self.seen.lock().unwrap().push(command.to_string());
            Ok(ExecutionResult::success(format!("sh:{command}")))
        }
    }

    fn recording_router(llm: Arc<ScriptedLlm>) -> (ActionRouter, Arc<Recorder>, Arc<Recorder>) {
        let queries = Arc::new(Recorder::default());
        let commands = Arc::new(Recorder::default());
        let router = ActionRouter::new(llm, queries.clone(), commands.clone());
        (router, queries, commands)
    }

    fn seeded_db() -> (TempDir, Arc<Database>) {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("database.db"));
        db.bootstrap().unwrap();
        (dir, Arc::new(db))
    }

    #[tokio::test]
    async fn test_empty_task_skips_inference() {
        for task in ["", "   ", "\n\t "] {
            let llm = ScriptedLlm::replying("```sql\nSELECT 1```");
            let (router, queries, commands) = recording_router(llm.clone());

            let result = router.route(task).await;
            assert_eq!(result, ExecutionResult::failure(messages::EMPTY_INPUT));
            assert_eq!(llm.calls(), 0);
            assert!(queries.seen().is_empty());
            assert!(commands.seen().is_empty());
        }
    }

    #[tokio::test]
    async fn test_sql_block_goes_to_query_runner_trimmed() {
        let llm = ScriptedLlm::replying("Here you go:\n```sql\n   SELECT * FROM users;  \n```");
        let (router, queries, commands) = recording_router(llm.clone());

        let result = router.route("show users").await;
        assert_eq!(result, ExecutionResult::success("sql:SELECT * FROM users;"));
        assert_eq!(queries.seen(), vec!["SELECT * FROM users;".to_string()]);
        assert!(commands.seen().is_empty());
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_bash_block_goes_to_command_runner() {
        let llm = ScriptedLlm::replying("```bash\nuptime\n```");
        let (router, queries, commands) = recording_router(llm);

        let result = router.route("how long has the box been up").await;
        assert_eq!(result, ExecutionResult::success("sh:uptime"));
        assert_eq!(commands.seen(), vec!["uptime".to_string()]);
        assert!(queries.seen().is_empty());
    }

    #[tokio::test]
    async fn test_sql_beats_bash() {
        let llm = ScriptedLlm::replying("```bash\nls\n```\n```sql\nSELECT 1\n```");
        let (router, queries, commands) = recording_router(llm);

        router.route("either").await;
        assert_eq!(queries.seen(), vec!["SELECT 1".to_string()]);
        assert!(commands.seen().is_empty());
    }

    #[tokio::test]
    async fn test_unrecognized_reply_is_surfaced_verbatim() {
        let reply = "I'm not sure what you mean.\n```python\nprint('hi')\n```";
        let (router, queries, commands) = recording_router(ScriptedLlm::replying(reply));

        let result = router.route("do the thing").await;
        assert!(!result.is_success());
        assert!(result.text().contains(reply));
        assert_eq!(result.text(), messages::unrecognized_response(reply));
        assert!(queries.seen().is_empty());
        assert!(commands.seen().is_empty());
    }

    #[tokio::test]
    async fn test_inference_error_becomes_failure() {
        let llm = ScriptedLlm::failing(TransportError::Request("connection refused".to_string()));
        let (router, queries, _) = recording_router(llm);

        let result = router.route("count users").await;
        assert_eq!(
            result,
            ExecutionResult::failure("❌ Inference error: HTTP request failed: connection refused")
        );
        assert!(queries.seen().is_empty());
    }

    #[tokio::test]
    async fn test_count_scenario_against_seeded_store() {
        let (_dir, db) = seeded_db();
        let router = ActionRouter::new(
            ScriptedLlm::replying("```sql\nSELECT COUNT(*) FROM users```"),
            db.clone(),
            Arc::new(ToolExecutor::new()),
        );

        let routed = router.route("how many users?").await;
        assert_eq!(routed, ExecutionResult::success("(3,)"));

        let direct = db.run_query("SELECT COUNT(*) FROM users").await.unwrap();
        assert_eq!(routed, direct);
    }

    #[tokio::test]
    async fn test_echo_scenario() {
        let (_dir, db) = seeded_db();
        let router = ActionRouter::new(
            ScriptedLlm::replying("```bash\necho hello```"),
            db,
            Arc::new(ToolExecutor::new()),
        );
        assert_eq!(router.route("say hello").await, ExecutionResult::success("hello"));
    }

    #[tokio::test]
    async fn test_executor_errors_are_normalized() {
        let (_dir, db) = seeded_db();
        let router = ActionRouter::new(
            ScriptedLlm::replying("```sql\nSELECT * FROM nowhere\n```"),
            db.clone(),
            Arc::new(ToolExecutor::new()),
        );
        let result = router.route("read nowhere").await;
        assert_eq!(
            result,
            ExecutionResult::failure("⚠️ SQL error: no such table: nowhere")
        );

        // An empty block still reaches the executor, which rejects it.
        let router = ActionRouter::new(
            ScriptedLlm::replying("```bash\n   \n```"),
            db,
            Arc::new(ToolExecutor::new()),
        );
        assert_eq!(
            router.route("nothing").await,
            ExecutionResult::failure(messages::EMPTY_COMMAND)
        );
    }

    #[tokio::test]
    async fn test_direct_helpers_share_error_wording() {
        let (_dir, db) = seeded_db();
        let router = ActionRouter::new(
            ScriptedLlm::replying(""),
            db,
            Arc::new(ToolExecutor::new()),
        );
        assert_eq!(router.run_sql(" ").await, ExecutionResult::failure(messages::EMPTY_SQL));
        assert_eq!(
            router.run_command("").await,
            ExecutionResult::failure(messages::EMPTY_COMMAND)
        );
        let failed = router.run_command("ls /no/such/dir/for/toolrouter").await;
        assert!(failed.text().starts_with("⚠️ CLI error: "));
        let not_started = router.run_command("no-such-binary-for-toolrouter").await;
        assert!(
            not_started
                .text()
                .starts_with("⚠️ CLI error: failed to run 'no-such-binary-for-toolrouter'")
        );
        assert_eq!(
            router.run_sql("SELECT 1; SELECT 2").await,
            ExecutionResult::failure(messages::sql_error(messages::ONE_STATEMENT))
        );
    }
}
