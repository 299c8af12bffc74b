//! # Database
//!
//! SQLite store behind the `mcp_sql_tool` and the router's SQL directives.
//! Each call opens its own connection, so no handle is shared between requests.

use async_trait::async_trait;
use rusqlite::types::ValueRef;
use rusqlite::{Batch, Connection, params};
use std::path::{Path, PathBuf};

use crate::domain::traits::QueryRunner;
use crate::domain::types::{ExecutionResult, QueryError};
use crate::strings::messages;

const USERS_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    age INTEGER NOT NULL
)
"#;

const SEED_USERS: &[(&str, i64)] = &[("admin", 30), ("user", 25), ("guest", 20)];

#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> rusqlite::Result<Connection> {
        Connection::open(&self.path)
    }

    /// Create the `users` table and seed it when empty. Safe to call on every start.
    pub fn bootstrap(&self) -> rusqlite::Result<()> {
        let mut conn = self.open()?;
        conn.execute_batch(USERS_SCHEMA)?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        if count == 0 {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare("INSERT INTO users (name, age) VALUES (?1, ?2)")?;
                for (name, age) in SEED_USERS {
                    stmt.execute(params![name, age])?;
                }
            }
            tx.commit()?;
            tracing::info!("Seeded users table with {} rows", SEED_USERS.len());
        }
        Ok(())
    }

    pub fn list_tables(&self) -> rusqlite::Result<Vec<String>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table'")?;
        let tables = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tables)
    }

    /// Execute `statement` verbatim and render every returned row on its own line.
    ///
    /// Input holding more than one statement is rejected before anything runs.
    /// Blocking; async callers go through [`QueryRunner::run_query`].
    pub fn execute(&self, statement: &str) -> Result<ExecutionResult, QueryError> {
        if statement.trim().is_empty() {
            return Err(QueryError::Empty);
        }

        let conn = self.open().map_err(backend)?;
        let mut batch = Batch::new(&conn, statement);
        let Some(mut stmt) = batch.next().map_err(backend)? else {
            // Comments only.
            return Ok(ExecutionResult::success(messages::NO_RESULTS));
        };
        // Any trailing text that is not blank or a comment counts as a second statement,
        // including text that fails to prepare.
        if !matches!(batch.next(), Ok(None)) {
            return Err(QueryError::Backend(messages::ONE_STATEMENT.to_string()));
        }

        let column_count = stmt.column_count();
        let mut rows = stmt.query([]).map_err(backend)?;

        let mut lines = Vec::new();
        while let Some(row) = rows.next().map_err(backend)? {
            let mut values = Vec::with_capacity(column_count);
            for idx in 0..column_count {
                values.push(render_value(row.get_ref(idx).map_err(backend)?));
            }
            lines.push(render_tuple(&values));
        }

        if lines.is_empty() {
            Ok(ExecutionResult::success(messages::NO_RESULTS))
        } else {
            Ok(ExecutionResult::success(lines.join("\n")))
        }
    }
}

#[async_trait]
impl QueryRunner for Database {
    async fn run_query(&self, statement: &str) -> Result<ExecutionResult, QueryError> {
        if statement.trim().is_empty() {
            return Err(QueryError::Empty);
        }

        let db = self.clone();
        let statement = statement.to_string();
        tokio::task::spawn_blocking(move || db.execute(&statement))
            .await
            .map_err(|e| QueryError::Backend(format!("query task failed: {e}")))?
    }
}

fn backend(err: rusqlite::Error) -> QueryError {
    QueryError::Backend(err.to_string())
}

/// Rows print as tuples: `(3,)` for one column, `(1, 'admin', 30)` for several.
fn render_tuple(values: &[String]) -> String {
    match values {
        [single] => format!("({single},)"),
        _ => format!("({})", values.join(", ")),
    }
}

fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "None".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => render_real(f),
        ValueRef::Text(bytes) => quote_text(&String::from_utf8_lossy(bytes)),
        ValueRef::Blob(bytes) => quote_blob(bytes),
    }
}

/// Shortest round-trip form, `.0` when integral, exponent written as `e+16` / `e-05`.
fn render_real(f: f64) -> String {
    let repr = format!("{f:?}");
    let Some((mantissa, exponent)) = repr.split_once('e') else {
        return repr;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

fn pick_quote(has_single: bool, has_double: bool) -> char {
    if has_single && !has_double { '"' } else { '\'' }
}

fn quote_text(text: &str) -> String {
    let quote = pick_quote(text.contains('\''), text.contains('"'));
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn quote_blob(bytes: &[u8]) -> String {
    let quote = pick_quote(bytes.contains(&b'\''), bytes.contains(&b'"'));
    let mut out = String::with_capacity(bytes.len() + 3);
    out.push('b');
    out.push(quote);
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            b if b as char == quote => {
                out.push('\\');
                out.push(b as char);
            }
            0x20..=0x7e => out.push(b as char),
            b => out.push_str(&format!("\\x{b:02x}")),
        }
    }
    out.push(quote);
    out
}
