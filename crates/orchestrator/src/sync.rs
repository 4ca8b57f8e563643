#![forbid(unsafe_code)]

use crate::error::Error;
use async_trait::async_trait;
use chrono::Utc;
use kernel::document::decode_document;
use kernel::json::rewrite_keys;
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Destination of raw state documents.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Insert or replace the document stored under `id`.
    async fn upsert(&self, id: &str, body: &Value) -> Result<(), Error>;
}

#[derive(Debug, Default)]
pub struct NoopSink;

#[async_trait]
impl DocumentSink for NoopSink {
    async fn upsert(&self, _id: &str, _body: &Value) -> Result<(), Error> {
        Ok(())
    }
}

/// Documents in a `game_files` table of a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteDocumentSink {
    path: PathBuf,
    pool: SqlitePool,
}

impl SqliteDocumentSink {
    pub async fn new(path: PathBuf) -> Result<Self, Error> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS game_files (\
             id TEXT PRIMARY KEY NOT NULL, \
             body TEXT NOT NULL, \
             updated_at TEXT NOT NULL)",
        )
        .execute(&pool)
        .await?;

        Ok(Self { path, pool })
    }

    pub async fn body(&self, id: &str) -> Result<Option<Value>, Error> {
        let body: Option<String> = sqlx::query_scalar("SELECT body FROM game_files WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(body.map(|body| serde_json::from_str(&body)).transpose()?)
    }
}

#[async_trait]
impl DocumentSink for SqliteDocumentSink {
    async fn upsert(&self, id: &str, body: &Value) -> Result<(), Error> {
        let body = serde_json::to_string(body)?;
        sqlx::query(
            "INSERT INTO game_files (id, body, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at",
        )
        .bind(id)
        .bind(&body)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        debug!(db = %self.path.display(), id, bytes = body.len(), "document upserted");
        Ok(())
    }
}

/// Upsert every `*.json` document of `dir`, keyed by file stem, with keys
/// rewritten to storable names. Returns the ids written, sorted.
pub async fn sync_directory(dir: &Path, sink: &dyn DocumentSink) -> Result<Vec<String>, Error> {
    let mut paths = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") && entry.file_type().await?.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut ids = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
            return Err(Error::InvalidPath(path.clone()));
        };
        let bytes = tokio::fs::read(&path).await?;
        let document = rewrite_keys(decode_document(&path, &bytes)?);
        sink.upsert(id, &document).await?;
        info!(id, "synced");
        ids.push(id.to_owned());
    }
    Ok(ids)
}
