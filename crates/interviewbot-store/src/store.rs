//! SQLite-backed session store.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use tracing::debug;

use interviewbot_core::error::ServiceError;
use interviewbot_core::model::SessionRecord;
use interviewbot_core::traits::SessionLog;

use crate::error::StoreError;

const CREATE_SESSIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    question TEXT,
    answer TEXT,
    evaluation TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);
"#;

/// Append-only log of evaluated answers in a SQLite file.
///
/// Holds only the path; a fresh connection is opened for every call.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Ok(Connection::open(&self.path)?)
    }

    /// Ensure the `sessions` table exists. Safe to call on every start.
    pub fn initialize(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = self.connect()?;
        conn.execute_batch(CREATE_SESSIONS_TABLE)?;
        debug!(path = %self.path.display(), "session table ready");
        Ok(())
    }

    /// Insert one record stamped with the current time. Returns its id.
    pub fn append(&self, question: &str, answer: &str, evaluation: &str) -> Result<i64, StoreError> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO sessions (question, answer, evaluation) VALUES (?1, ?2, ?3)",
            params![question, answer, evaluation],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// The newest `limit` records, newest first.
    pub fn recent(&self, limit: u32) -> Result<Vec<SessionRecord>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, question, answer, evaluation, created_at
            FROM sessions
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )?;
        let records = stmt
            .query_map(params![limit], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Total number of records.
    pub fn count(&self) -> Result<u64, StoreError> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<SessionRecord> {
    let question: Option<String> = row.get("question")?;
    let answer: Option<String> = row.get("answer")?;
    let evaluation: Option<String> = row.get("evaluation")?;

    Ok(SessionRecord {
        id: row.get("id")?,
        question: question.unwrap_or_default(),
        answer: answer.unwrap_or_default(),
        evaluation: evaluation.unwrap_or_default(),
        created_at: row.get("created_at")?,
    })
}

impl SessionLog for SessionStore {
    fn append(&self, question: &str, answer: &str, evaluation: &str) -> Result<(), ServiceError> {
        SessionStore::append(self, question, answer, evaluation)
            .map(|_| ())
            .map_err(|e| ServiceError::Persistence(e.to_string()))
    }
}
