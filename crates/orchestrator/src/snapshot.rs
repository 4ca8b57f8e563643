#![forbid(unsafe_code)]

use crate::error::Error;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kernel::game::{MatchResult, Outcome};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tracing::{debug, info};
use uuid::Uuid;

/// Name a snapshot is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotName {
    /// `game_state_<timestamp>.json`, for in-progress states.
    Timestamped(DateTime<Utc>),
    /// `win-<id>.json` or `loss-<id>.json`, for the final state of a game.
    Result { outcome: Outcome, game_id: Uuid },
}

impl SnapshotName {
    pub fn for_result(result: &MatchResult, game_id: Option<Uuid>, now: DateTime<Utc>) -> Self {
        match game_id {
            Some(game_id) => Self::Result {
                outcome: result.outcome,
                game_id,
            },
            None => Self::Timestamped(now),
        }
    }

    pub fn file_name(&self) -> String {
        match self {
            Self::Timestamped(ts) => format!("game_state_{}.json", ts.format("%Y%m%dT%H%M%S%6f")),
            Self::Result {
                outcome: Outcome::Win,
                game_id,
            } => format!("win-{game_id}.json"),
            Self::Result {
                outcome: Outcome::Loss,
                game_id,
            } => format!("loss-{game_id}.json"),
        }
    }
}

#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Store `contents` under `name`, replacing any previous snapshot of that name.
    async fn write(&self, name: &str, contents: &[u8]) -> Result<(), Error>;
}

#[derive(Debug, Default)]
pub struct NoopSnapshotRepository;

#[async_trait]
impl SnapshotRepository for NoopSnapshotRepository {
    async fn write(&self, _name: &str, _contents: &[u8]) -> Result<(), Error> {
        Ok(())
    }
}

/// Snapshots as plain files in one directory.
#[derive(Debug, Clone)]
pub struct FsSnapshotRepository {
    dir: PathBuf,
}

impl FsSnapshotRepository {
    /// Creates `dir` if needed.
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self, Error> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }
}

#[async_trait]
impl SnapshotRepository for FsSnapshotRepository {
    async fn write(&self, name: &str, contents: &[u8]) -> Result<(), Error> {
        let path = self.dir.join(name);
        tokio::fs::write(&path, contents).await?;
        debug!(path = %path.display(), bytes = contents.len(), "snapshot written");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Written { name: String, bytes: usize },
    Unchanged,
}

/// Persists game states, skipping any identical to the last one written.
pub struct SnapshotStore {
    repo: Box<dyn SnapshotRepository + Send + Sync>,
    last_hash: Option<String>,
}

impl SnapshotStore {
    pub fn new(repo: Box<dyn SnapshotRepository + Send + Sync>) -> Self {
        Self {
            repo,
            last_hash: None,
        }
    }

    pub fn last_hash(&self) -> Option<&str> {
        self.last_hash.as_deref()
    }

    pub async fn save(&mut self, state: &Value, name: SnapshotName) -> Result<SaveOutcome, Error> {
        let contents = serde_json::to_vec(state)?;
        let hash = format!("{:x}", Sha256::digest(&contents));
        if self.last_hash.as_deref() == Some(hash.as_str()) {
            debug!("no change in game state");
            return Ok(SaveOutcome::Unchanged);
        }

        let name = name.file_name();
        self.repo.write(&name, &contents).await?;
        self.last_hash = Some(hash);
        info!(bytes = contents.len(), %name, "state updated");
        Ok(SaveOutcome::Written {
            name,
            bytes: contents.len(),
        })
    }
}
