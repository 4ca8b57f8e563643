#![forbid(unsafe_code)]

//! Greedy upgrade planners over an owned collection and a credit budget.
//!
//! Both planners are pure: they read a [`Collection`](crate::Collection) and
//! keep any simulated spending on private copies.

mod level;
mod splits;

pub use level::{LevelUpgrade, maximize_level};
pub use splits::{LARGE_BUDGET, SplitCandidate, maximize_splits};
