#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::time::Duration;

/// Placeholder in [`Flush::args`] replaced by [`Flush::volume`].
pub const VOLUME_PLACEHOLDER: &str = "{volume}";

/// Periodic OS cache flush, run beside the tracker.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Flush {
    pub enabled: bool,

    /// Seconds to sleep between two flushes.
    #[serde_as(as = "serde_with::DurationSeconds")]
    pub interval: Duration,

    pub program: String,

    pub args: Vec<String>,

    /// Volume (drive letter) to flush.
    pub volume: String,
}

impl Default for Flush {
    fn default() -> Self {
        Self {
            enabled: cfg!(windows),
            interval: Duration::from_secs(5),
            program: "pwsh.exe".into(),
            args: vec![
                "-NoProfile".into(),
                "-Command".into(),
                format!("Start-Job -ScriptBlock {{Write-VolumeCache {VOLUME_PLACEHOLDER}}}"),
            ],
            volume: "C".into(),
        }
    }
}

impl Flush {
    /// Arguments with the volume placeholder substituted.
    pub fn resolved_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(VOLUME_PLACEHOLDER, &self.volume))
            .collect()
    }
}
