//! SQLite Repository
//!
//! Key/value table with one row per document section. Sections are
//! written in a single transaction so a reader never sees a mix of two saves.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use super::traits::StateRepository;
use crate::domain::{DomainError, DomainResult};
use crate::store::PlannerDocument;

const SECTIONS: [&str; 4] = ["tasks", "days", "drawer", "settings"];

pub struct SqliteRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRepository {
    /// Open (or create) the database; `":memory:"` gives a private in-memory one
    pub fn open(path: impl AsRef<Path>) -> DomainResult<Self> {
        let path = path.as_ref();
        let conn = if path.as_os_str() == ":memory:" {
            Connection::open_in_memory()
        } else {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(DomainError::storage)?;
            }
            Connection::open(path)
        }
        .map_err(DomainError::storage)?;

        run_migrations(&conn)?;
        Ok(Self::new(Arc::new(Mutex::new(conn))))
    }

    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        )",
        [],
    )
    .map_err(DomainError::storage)?;
    Ok(())
}

#[async_trait]
impl StateRepository for SqliteRepository {
    async fn load(&self) -> DomainResult<Option<PlannerDocument>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare("SELECT value FROM kv WHERE key = ?")
            .map_err(DomainError::storage)?;

        let mut sections = Map::new();
        for key in SECTIONS {
            let raw: Option<String> = stmt
                .query_row(params![key], |row| row.get(0))
                .optional()
                .map_err(DomainError::storage)?;
            if let Some(raw) = raw {
                let value: Value = serde_json::from_str(&raw)
                    .map_err(|e| DomainError::storage(format!("section {}: {}", key, e)))?;
                sections.insert(key.to_string(), value);
            }
        }

        if sections.is_empty() {
            return Ok(None);
        }
        let document = serde_json::from_value(Value::Object(sections)).map_err(DomainError::storage)?;
        Ok(Some(document))
    }

    async fn save(&self, document: &PlannerDocument) -> DomainResult<()> {
        let value = serde_json::to_value(document).map_err(DomainError::storage)?;
        let Value::Object(sections) = value else {
            return Err(DomainError::storage("document did not serialize to an object"));
        };

        let mut conn = self.conn.lock().await;
        let tx = conn.transaction().map_err(DomainError::storage)?;
        let now = chrono::Utc::now().timestamp_millis();
        for key in SECTIONS {
            let section = sections.get(key).cloned().unwrap_or(Value::Null);
            tx.execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, section.to_string(), now],
            )
            .map_err(DomainError::storage)?;
        }
        tx.commit().map_err(DomainError::storage)?;
        Ok(())
    }
}
