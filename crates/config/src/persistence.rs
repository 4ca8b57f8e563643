#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Persistence {
    /// Directory receiving state snapshots.
    pub snapshot_dir: PathBuf,

    /// Optional SQLite database for the raw document sync.
    pub database_path: Option<PathBuf>,
}

impl Default for Persistence {
    fn default() -> Self {
        Self {
            snapshot_dir: default_cache_dir(),
            database_path: None,
        }
    }
}

impl Persistence {
    /// The sync database, `game_files.db` next to the snapshots unless set.
    pub fn database(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| self.snapshot_dir.join("game_files.db"))
    }
}

fn default_cache_dir() -> PathBuf {
    let base = std::env::var_os("LOCALAPPDATA")
        .or_else(|| std::env::var_os("XDG_CACHE_HOME"))
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache")))
        .unwrap_or_else(std::env::temp_dir);
    base.join("snap-tracker")
}
