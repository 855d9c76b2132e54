pub mod config;
pub mod stats;
pub mod task;

use lasttime_core::{open_store, Config, TaskStore, Tracker};

/// Open a tracker using the on-disk configuration, or defaults if it is unreadable.
pub fn open_tracker() -> Result<Tracker<Box<dyn TaskStore>>, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    tracing::debug!(grace_days = config.streak.grace_days, "loaded configuration");
    let store = open_store(&config)?;
    Ok(Tracker::new(store, config.streak_policy()))
}
