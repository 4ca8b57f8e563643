#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Optimizer {
    /// Split recommendations to show before cutting the list. Rows that
    /// reach the terminal tier are always shown.
    pub max_split_rows: usize,
}

impl Default for Optimizer {
    fn default() -> Self {
        Self { max_split_rows: 20 }
    }
}
