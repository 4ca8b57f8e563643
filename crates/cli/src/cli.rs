use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use std::path::{Path, PathBuf};

/// Companion for Marvel Snap
///
/// Follows the running game through its logs and state files, saving a
/// snapshot of every new game state, and plans card upgrades for the
/// credits at hand.
#[derive(Debug, Parser, Clone)]
#[command(about, long_about, version)]
pub struct Cli {
    /// Path to configuration file.
    #[arg(short, long, value_parser = validate_file)]
    pub conffile: Option<PathBuf>,

    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Track games until interrupted.
    Run,
    /// Recommend upgrades for the available credits.
    Upgrades,
    /// List owned cards by score.
    CardStats,
    /// Show the cost of upgrading each rarity to Infinity.
    Prices,
    /// Copy the state documents into the sync database.
    Sync,
    /// Print the effective configuration.
    Config,
}

/// Check if the file exists.
#[inline(always)]
fn validate_file(file: &str) -> Result<PathBuf, String> {
    let path = Path::new(file);
    if path.exists() {
        Ok(path.to_owned())
    } else {
        Err(format!("File not found: {:?}", path))
    }
}
