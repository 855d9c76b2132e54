//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Streak grace period
//! - Task store format and location
//!
//! Configuration is stored at `~/.config/lasttime/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::streak::StreakPolicy;

/// Streak accounting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakConfig {
    /// Missed days forgiven before a streak breaks.
    #[serde(default = "default_grace_days")]
    pub grace_days: u32,
}

/// On-disk encoding of the task store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreFormat {
    /// One JSON object keyed by task name
    #[default]
    Json,
    /// One tab-separated task per line
    Lines,
}

impl StoreFormat {
    fn default_file_name(self) -> &'static str {
        match self {
            StoreFormat::Json => "tasks.json",
            StoreFormat::Lines => "tasks.txt",
        }
    }
}

/// Task store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub format: StoreFormat,
    /// Explicit store path. Defaults to a file in the data directory.
    #[serde(default)]
    pub data_file: Option<PathBuf>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/lasttime/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub streak: StreakConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_grace_days() -> u32 {
    StreakPolicy::default().grace_days
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            grace_days: default_grace_days(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        if key.is_empty() {
            return Err(unknown());
        }
        let mut parts = key.split('.').peekable();

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    // Strings and unset optionals take the raw text; "none" clears an optional.
                    _ => {
                        if value.eq_ignore_ascii_case("none") {
                            serde_json::Value::Null
                        } else {
                            serde_json::Value::String(value.into())
                        }
                    }
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Location of `config.toml` in the data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        Self::get_json_value_by_path(&json, key).map(render_value)
    }

    /// Every setting as a `(dot.path, value)` pair, sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            collect_entries(String::new(), &json, &mut entries);
        }
        entries
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Streak policy derived from this configuration.
    pub fn streak_policy(&self) -> StreakPolicy {
        StreakPolicy {
            grace_days: self.streak.grace_days,
        }
    }

    /// Resolved path of the task store file.
    pub fn data_file(&self) -> Result<PathBuf> {
        match &self.storage.data_file {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join(self.storage.format.default_file_name())),
        }
    }

    /// Load from disk, returning default on error.
    ///
    /// Task commands use this so a damaged `config.toml` does not lock the
    /// user out of their tasks; `config` commands still see the error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }
}

fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "none".to_string(),
        other => other.to_string(),
    }
}

fn collect_entries(prefix: String, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
    match value {
        serde_json::Value::Object(map) => {
            for (name, child) in map {
                let key = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}.{name}")
                };
                collect_entries(key, child, out);
            }
        }
        leaf => out.push((prefix, render_value(leaf))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.streak.grace_days, 1);
        assert_eq!(parsed.storage.format, StoreFormat::Json);
        assert!(parsed.storage.data_file.is_none());
    }

    #[test]
    fn missing_sections_take_defaults() {
        let parsed: Config = toml::from_str("[storage]\nformat = \"lines\"\n").unwrap();
        assert_eq!(parsed.streak.grace_days, 1);
        assert_eq!(parsed.storage.format, StoreFormat::Lines);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("streak.grace_days").as_deref(), Some("1"));
        assert_eq!(cfg.get("storage.format").as_deref(), Some("json"));
        assert_eq!(cfg.get("storage.data_file").as_deref(), Some("none"));
        assert!(cfg.get("streak.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn entries_flatten_every_setting() {
        let mut cfg = Config::default();
        cfg.streak.grace_days = 2;
        let entries = cfg.entries();
        assert_eq!(
            entries,
            vec![
                ("storage.data_file".to_string(), "none".to_string()),
                ("storage.format".to_string(), "json".to_string()),
                ("streak.grace_days".to_string(), "2".to_string()),
            ]
        );
        for (key, value) in &entries {
            assert_eq!(cfg.get(key).as_ref(), Some(value));
        }
    }

    #[test]
    fn set_value_updates_number() {
        let mut cfg = Config::default();
        cfg.set_value("streak.grace_days", "3").unwrap();
        assert_eq!(cfg.streak.grace_days, 3);
        assert_eq!(cfg.streak_policy().grace_days, 3);
    }

    #[test]
    fn set_value_updates_enum_and_optional_path() {
        let mut cfg = Config::default();
        cfg.set_value("storage.format", "lines").unwrap();
        cfg.set_value("storage.data_file", "/tmp/my-tasks.txt").unwrap();
        assert_eq!(cfg.storage.format, StoreFormat::Lines);
        assert_eq!(
            cfg.storage.data_file.as_deref(),
            Some(Path::new("/tmp/my-tasks.txt"))
        );

        cfg.set_value("storage.data_file", "none").unwrap();
        assert!(cfg.storage.data_file.is_none());
    }

    #[test]
    fn set_value_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.set_value("streak.nonexistent_key", "1").unwrap_err();
        assert!(err.to_string().contains("unknown config key"));
    }

    #[test]
    fn set_value_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set_value("streak.grace_days", "-1").is_err());
        assert!(cfg.set_value("streak.grace_days", "soon").is_err());
        assert!(cfg.set_value("storage.format", "yaml").is_err());
        assert_eq!(cfg.streak.grace_days, 1);
        assert_eq!(cfg.storage.format, StoreFormat::Json);
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.streak.grace_days, 1);
        assert!(path.exists());
    }

    #[test]
    fn load_from_rejects_broken_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "streak = [[[").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn explicit_data_file_wins() {
        let mut cfg = Config::default();
        cfg.storage.data_file = Some(PathBuf::from("/srv/tasks.json"));
        assert_eq!(cfg.data_file().unwrap(), PathBuf::from("/srv/tasks.json"));
    }
}
