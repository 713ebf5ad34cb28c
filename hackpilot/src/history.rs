//! Per-project history backed by SQLite.
//!
//! Every successful idea batch, stack recommendation, generated app,
//! deployment, research report and pitch is appended here so earlier
//! results can be listed and reused.

use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::error::{AssistantError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Idea,
    App,
    Deployment,
    Research,
    Pitch,
    Stack,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Idea => "idea",
            EntryKind::App => "app",
            EntryKind::Deployment => "deployment",
            EntryKind::Research => "research",
            EntryKind::Pitch => "pitch",
            EntryKind::Stack => "stack",
        }
    }
}

impl std::str::FromStr for EntryKind {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "idea" | "ideas" => Ok(EntryKind::Idea),
            "app" | "apps" => Ok(EntryKind::App),
            "deployment" | "deployments" | "deploy" => Ok(EntryKind::Deployment),
            "research" => Ok(EntryKind::Research),
            "pitch" | "pitches" => Ok(EntryKind::Pitch),
            "stack" | "stacks" => Ok(EntryKind::Stack),
            other => Err(AssistantError::invalid(format!(
                "unknown history kind `{other}` (idea, app, deployment, research, pitch, stack)"
            ))),
        }
    }
}

/// A stored history entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub id: i64,
    pub project: String,
    pub kind: String,
    /// One-line description for listings.
    pub summary: String,
    /// The full result as JSON.
    pub payload: serde_json::Value,
    pub created_at: String,
}

pub struct History {
    db: Mutex<Connection>,
}

impl History {
    /// Open or create a history database, creating parent directories.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    /// Open an in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(db: Connection) -> Result<Self> {
        db.execute_batch(
            "CREATE TABLE IF NOT EXISTS history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project TEXT NOT NULL,
                kind TEXT NOT NULL,
                summary TEXT NOT NULL,
                payload TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_history_project_kind
                ON history(project, kind);",
        )?;
        Ok(Self { db: Mutex::new(db) })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.db
            .lock()
            .map_err(|_| AssistantError::History("history lock poisoned".into()))
    }

    /// Append a result.
    pub fn record<T: Serialize>(
        &self,
        project: &str,
        kind: EntryKind,
        summary: &str,
        payload: &T,
    ) -> Result<i64> {
        let payload = serde_json::to_string(payload)
            .map_err(|e| AssistantError::History(format!("can't encode entry: {e}")))?;
        let db = self.conn()?;
        db.execute(
            "INSERT INTO history (project, kind, summary, payload, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![project, kind.as_str(), summary, payload, Utc::now().to_rfc3339()],
        )?;
        let id = db.last_insert_rowid();
        tracing::debug!(project, kind = kind.as_str(), id, "Recorded history entry");
        Ok(id)
    }

    /// Newest-first entries, optionally filtered by project and kind.
    pub fn list(
        &self,
        project: Option<&str>,
        kind: Option<EntryKind>,
        limit: usize,
    ) -> Result<Vec<Entry>> {
        let db = self.conn()?;
        let mut stmt = db.prepare(
            "SELECT id, project, kind, summary, payload, created_at
             FROM history
             WHERE (?1 IS NULL OR project = ?1) AND (?2 IS NULL OR kind = ?2)
             ORDER BY id DESC
             LIMIT ?3",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(
                rusqlite::params![project, kind.map(|k| k.as_str()), limit],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows
            .into_iter()
            .map(|(id, project, kind, summary, payload, created_at)| Entry {
                id,
                project,
                kind,
                summary,
                payload: serde_json::from_str(&payload).unwrap_or(serde_json::Value::Null),
                created_at,
            })
            .collect())
    }

    /// Payloads of one kind for a project, newest first, decoded as `T`.
    /// Rows that no longer decode are skipped.
    pub fn payloads<T: DeserializeOwned>(&self, project: &str, kind: EntryKind) -> Result<Vec<T>> {
        Ok(self
            .list(Some(project), Some(kind), usize::MAX)?
            .into_iter()
            .filter_map(|e| serde_json::from_value(e.payload).ok())
            .collect())
    }
}
