#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::{ffi::OsString, path::PathBuf};

/// Where the game client keeps its local files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Game {
    /// Root of the client's data directory.
    pub data_dir: PathBuf,

    /// State documents directory, relative to `data_dir`.
    pub state_subdir: PathBuf,

    /// Append-only text logs to tail, relative to `data_dir`.
    pub log_files: Vec<PathBuf>,
}

impl Default for Game {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            state_subdir: ["Standalone", "States", "nvprod"].iter().collect(),
            log_files: vec!["Player.log".into(), "ErrorLog.txt".into()],
        }
    }
}

impl Game {
    pub fn state_dir(&self) -> PathBuf {
        self.data_dir.join(&self.state_subdir)
    }

    /// Path of a named state document, e.g. `Game` -> `.../GameState.json`.
    pub fn state_file(&self, name: &str) -> PathBuf {
        self.state_dir().join(format!("{name}State.json"))
    }

    pub fn log_paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.log_files.iter().map(|file| self.data_dir.join(file))
    }
}

/// `%LOCALAPPDATA%Low\Second Dinner\SNAP`, the client's LocalLow folder.
fn default_data_dir() -> PathBuf {
    let local_low = match std::env::var_os("LOCALAPPDATA") {
        Some(mut local) => {
            local.push("Low");
            PathBuf::from(local)
        }
        None => PathBuf::from(OsString::from(".")),
    };
    local_low.join("Second Dinner").join("SNAP")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_file_is_inside_state_dir() {
        let game = Game {
            data_dir: PathBuf::from("/data"),
            ..Default::default()
        };
        let path = game.state_file("Game");
        assert!(path.starts_with("/data/Standalone/States/nvprod"));
        assert!(path.ends_with("GameState.json"));
    }

    #[test]
    fn log_paths_are_joined_to_data_dir() {
        let game = Game {
            data_dir: PathBuf::from("/data"),
            ..Default::default()
        };
        let logs: Vec<_> = game.log_paths().collect();
        assert_eq!(
            logs,
            vec![
                PathBuf::from("/data/Player.log"),
                PathBuf::from("/data/ErrorLog.txt")
            ]
        );
    }
}
