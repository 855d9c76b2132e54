mod config;
mod json_store;
mod line_store;
mod memory;

pub use config::{Config, StorageConfig, StoreFormat, StreakConfig};
pub use json_store::JsonTaskStore;
pub use line_store::LineTaskStore;
pub use memory::MemoryTaskStore;

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result, StoreError};
use crate::task::TaskMap;

/// Durable home for the task set.
///
/// Every lifecycle operation loads the whole map, mutates it, and saves it
/// back. Loads recover from missing or damaged data by returning what could
/// be read; saves must surface failures.
pub trait TaskStore {
    /// Load every task.
    fn load_all(&self) -> Result<TaskMap>;

    /// Replace the stored task set with `tasks`.
    fn save_all(&self, tasks: &TaskMap) -> Result<()>;
}

impl<S: TaskStore + ?Sized> TaskStore for &S {
    fn load_all(&self) -> Result<TaskMap> {
        (**self).load_all()
    }

    fn save_all(&self, tasks: &TaskMap) -> Result<()> {
        (**self).save_all(tasks)
    }
}

impl<S: TaskStore + ?Sized> TaskStore for Box<S> {
    fn load_all(&self) -> Result<TaskMap> {
        (**self).load_all()
    }

    fn save_all(&self, tasks: &TaskMap) -> Result<()> {
        (**self).save_all(tasks)
    }
}

/// Open the store described by `config`.
pub fn open_store(config: &Config) -> Result<Box<dyn TaskStore>> {
    let path = config.data_file()?;
    tracing::debug!(path = %path.display(), format = ?config.storage.format, "opening task store");
    Ok(match config.storage.format {
        StoreFormat::Json => Box::new(JsonTaskStore::new(path)),
        StoreFormat::Lines => Box::new(LineTaskStore::new(path)),
    })
}

/// Returns `~/.config/lasttime[-dev]/`, or `$LASTTIME_HOME` when set.
///
/// Set LASTTIME_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the data directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("LASTTIME_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("LASTTIME_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("lasttime-dev")
            } else {
                base_dir.join("lasttime")
            }
        }
    };

    fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Write `data` to a sibling temp file, then rename it over `path`.
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let failed = |source| StoreError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(failed)?;
    }

    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path).map_err(failed)?;
    file.write_all(data).map_err(failed)?;
    file.sync_all().map_err(failed)?;

    fs::rename(&temp_path, path).map_err(failed)?;
    Ok(())
}

/// Read a store file, treating a missing file as empty.
pub(crate) fn read_store_file(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read task store, starting empty");
            None
        }
    }
}
