#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::time::Duration;

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Watch {
    /// Poll file metadata instead of relying on OS notifications. The client
    /// writes through handles that native watchers miss on some systems.
    pub force_polling: bool,

    /// Poll interval in seconds (only used when polling).
    #[serde_as(as = "serde_with::DurationSeconds")]
    pub poll_interval: Duration,
}

impl Default for Watch {
    fn default() -> Self {
        Self {
            force_polling: true,
            poll_interval: Duration::from_secs(1),
        }
    }
}
