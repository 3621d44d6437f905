//! Configuration read port.
//!
//! The pipeline never writes settings. It asks a [`ConfigStore`] for a set of
//! keys and turns the returned record into [`Settings`] and presets.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::paths::config_json_path;
use crate::preset::{KEY_INSTRUCTION_PRESETS, KEY_STYLE_EXAMPLES};

pub const KEY_API_KEY: &str = "apiKey";
pub const KEY_API_MODEL: &str = "apiModel";
pub const KEY_API_ENDPOINT: &str = "apiEndpoint";
pub const KEY_SUGGESTION_COUNT: &str = "suggestionCount";

/// Every key the pipeline reads from the store.
pub const SETTINGS_KEYS: &[&str] = &[
    KEY_API_KEY,
    KEY_API_MODEL,
    KEY_API_ENDPOINT,
    KEY_SUGGESTION_COUNT,
    KEY_INSTRUCTION_PRESETS,
    KEY_STYLE_EXAMPLES,
];

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

/// Environment variables layered over the settings file.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("SMART_REPLY_API_KEY", KEY_API_KEY),
    ("SMART_REPLY_MODEL", KEY_API_MODEL),
    ("SMART_REPLY_ENDPOINT", KEY_API_ENDPOINT),
    ("SMART_REPLY_SUGGESTION_COUNT", KEY_SUGGESTION_COUNT),
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Settings store unavailable: {0}")]
    Unavailable(String),
}

/// Asynchronous key-value read port.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Return the subset of stored values for `keys`. Missing keys are simply absent.
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, ConfigError>;
}

fn select_keys(record: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    keys.iter()
        .filter_map(|key| record.get(*key).map(|value| (key.to_string(), value.clone())))
        .collect()
}

/// In-memory store, used by tests and by the CLI for one-off overrides.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    values: RwLock<Map<String, Value>>,
}

impl MemoryConfigStore {
    pub fn new(values: Map<String, Value>) -> Self {
        Self {
            values: RwLock::new(values),
        }
    }

    /// Build from a JSON object; non-object values produce an empty store.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::new(map),
            _ => Self::default(),
        }
    }

    pub fn set(&self, key: impl Into<String>, value: Value) -> Result<(), ConfigError> {
        let mut values = self.values.write().map_err(|_| poisoned())?;
        values.insert(key.into(), value);
        Ok(())
    }
}

fn poisoned() -> ConfigError {
    ConfigError::Unavailable("memory store lock poisoned".to_string())
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, ConfigError> {
        let values = self.values.read().map_err(|_| poisoned())?;
        Ok(select_keys(&values, keys))
    }
}

/// Settings stored as one JSON object on disk, re-read on every lookup.
#[derive(Debug, Clone)]
pub struct JsonFileConfigStore {
    path: PathBuf,
    env_overrides: bool,
}

impl JsonFileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            env_overrides: true,
        }
    }

    /// Store at `~/.smart-reply/config.json`.
    pub fn default_location() -> Self {
        Self::new(config_json_path())
    }

    pub fn without_env_overrides(mut self) -> Self {
        self.env_overrides = false;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Map<String, Value>, ConfigError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Map::new()),
            Ok(content) => serde_json::from_str::<Map<String, Value>>(&content).map_err(|e| {
                log::warn!("Settings file {} is not a JSON object: {}", self.path.display(), e);
                ConfigError::Parse(e)
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No settings file at {}, using defaults", self.path.display());
                Ok(Map::new())
            }
            Err(e) => Err(ConfigError::Io(e)),
        }
    }
}

#[async_trait]
impl ConfigStore for JsonFileConfigStore {
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, ConfigError> {
        let mut record = self.load().await?;
        if self.env_overrides {
            apply_env_overrides(&mut record, |name| std::env::var(name).ok());
        }
        Ok(select_keys(&record, keys))
    }
}

/// Layer `SMART_REPLY_*` variables over a record. Blank variables are ignored.
pub fn apply_env_overrides<F>(record: &mut Map<String, Value>, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for (variable, key) in ENV_OVERRIDES {
        if let Some(value) = lookup(variable).filter(|value| !value.trim().is_empty()) {
            record.insert(key.to_string(), Value::String(value.trim().to_string()));
        }
    }
}

/// Provider settings resolved from a configuration record.
#[derive(Clone, PartialEq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    /// Raw stored count, interpreted by `resolve_suggestion_count`.
    pub suggestion_count: Option<Value>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("suggestion_count", &self.suggestion_count)
            .finish()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            suggestion_count: None,
        }
    }
}

impl Settings {
    pub fn from_record(record: &Map<String, Value>) -> Self {
        let text = |key: &str| {
            record
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        Self {
            api_key: text(KEY_API_KEY),
            model: text(KEY_API_MODEL).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            endpoint: text(KEY_API_ENDPOINT).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            suggestion_count: record.get(KEY_SUGGESTION_COUNT).cloned(),
        }
    }
}
