//! # lasttime Core Library
//!
//! This library provides the core logic for lasttime, a personal tracker that
//! remembers when each task was last done, how many days in a row it has been
//! done, and how many times it has been done overall. The `lasttime` CLI is a
//! thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Streak Engine**: a pure function from (record, now, grace period) to the
//!   updated record and a [`StreakOutcome`]
//! - **Storage**: JSON or line-oriented task stores behind the [`TaskStore`]
//!   trait, plus TOML-based configuration
//! - **Tracker**: add/complete/list/statistics operations that load, mutate and
//!   save the whole task set
//!
//! ## Key Components
//!
//! - [`StreakEngine`]: streak accounting
//! - [`Tracker`]: task lifecycle
//! - [`TaskStore`]: persistence boundary
//! - [`Config`]: application configuration management

pub mod elapsed;
pub mod error;
pub mod stats;
pub mod storage;
pub mod streak;
pub mod task;
pub mod tracker;

#[cfg(test)]
mod test_support;

pub use elapsed::format_elapsed;
pub use error::{ConfigError, CoreError, StoreError, TaskError};
pub use stats::{Leaders, Statistics};
pub use storage::{open_store, Config, JsonTaskStore, LineTaskStore, MemoryTaskStore, TaskStore};
pub use streak::{record_completion, StreakEngine, StreakOutcome, StreakPolicy};
pub use task::{TaskMap, TaskRecord};
pub use tracker::{Completion, Tracker};
