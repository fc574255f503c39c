//! Runtime configuration for the CRM core.
//!
//! # Responsibility
//! - Provide defaults for storage location, blob keys and logging.
//! - Apply `CRM_*` environment overrides.
//!
//! # Invariants
//! - Blob keys are never empty.
//! - A configured log directory is absolute.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_ORDERS_KEY: &str = "web_studio_crm_orders";
pub const DEFAULT_CLIENTS_KEY: &str = "web_studio_crm_clients";

pub const ENV_DB_PATH: &str = "CRM_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "CRM_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "CRM_LOG_DIR";
pub const ENV_ORDERS_KEY: &str = "CRM_ORDERS_KEY";
pub const ENV_CLIENTS_KEY: &str = "CRM_CLIENTS_KEY";

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    RelativeLogDir(PathBuf),
    EmptyKey(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(value) => write!(
                f,
                "unsupported log level `{value}`; expected trace|debug|info|warn|error"
            ),
            Self::RelativeLogDir(path) => {
                write!(f, "log directory must be absolute, got `{}`", path.display())
            }
            Self::EmptyKey(name) => write!(f, "`{name}` cannot be empty"),
        }
    }
}

impl Error for ConfigError {}

/// Blob keys holding the two collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub orders: String,
    pub clients: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            orders: DEFAULT_ORDERS_KEY.to_string(),
            clients: DEFAULT_CLIENTS_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file; `None` keeps everything in memory.
    pub db_path: Option<PathBuf>,
    pub log_level: &'static str,
    /// Rolling log directory; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    pub keys: StorageKeys,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level(),
            log_dir: None,
            keys: StorageKeys::default(),
        }
    }
}

impl CoreConfig {
    /// Defaults overridden by `CRM_*` process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `CRM_*` name.
    ///
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = Some(PathBuf::from(path));
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config = config.with_log_level(&level)?;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config = config.with_log_dir(dir)?;
        }
        if let Some(key) = read(ENV_ORDERS_KEY) {
            config.keys.orders = key;
        }
        if let Some(key) = read(ENV_CLIENTS_KEY) {
            config.keys.clients = key;
        }
        Ok(config)
    }

    pub fn with_log_level(mut self, level: &str) -> Result<Self, ConfigError> {
        self.log_level = normalize_level(level)
            .map_err(|_| ConfigError::InvalidLogLevel(level.trim().to_string()))?;
        Ok(self)
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let dir = dir.into();
        if !dir.is_absolute() {
            return Err(ConfigError::RelativeLogDir(dir));
        }
        self.log_dir = Some(dir);
        Ok(self)
    }

    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = Some(path.into());
        self
    }

    pub fn with_keys(mut self, keys: StorageKeys) -> Result<Self, ConfigError> {
        if keys.orders.trim().is_empty() {
            return Err(ConfigError::EmptyKey("orders key"));
        }
        if keys.clients.trim().is_empty() {
            return Err(ConfigError::EmptyKey("clients key"));
        }
        self.keys = keys;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| env.get(name).cloned()
    }

    #[test]
    fn defaults_use_fixed_keys_and_memory_storage() {
        let config = CoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.keys.orders, "web_studio_crm_orders");
        assert_eq!(config.keys.clients, "web_studio_crm_clients");
        assert!(config.db_path.is_none());
    }

    #[test]
    fn environment_overrides_defaults() {
        let log_dir = std::env::temp_dir();
        let log_dir = log_dir.to_str().unwrap();
        let config = CoreConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, "/tmp/crm.sqlite3"),
            (ENV_LOG_LEVEL, " WARNING "),
            (ENV_LOG_DIR, log_dir),
            (ENV_ORDERS_KEY, "orders_v2"),
            (ENV_CLIENTS_KEY, "  "),
        ]))
        .unwrap();

        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/crm.sqlite3")));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from(log_dir)));
        assert_eq!(config.keys.orders, "orders_v2");
        assert_eq!(config.keys.clients, DEFAULT_CLIENTS_KEY);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = CoreConfig::from_lookup(lookup(&[(ENV_LOG_LEVEL, "loud")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidLogLevel("loud".to_string()));

        let err = CoreConfig::from_lookup(lookup(&[(ENV_LOG_DIR, "logs")])).unwrap_err();
        assert!(matches!(err, ConfigError::RelativeLogDir(_)));

        let keys = StorageKeys {
            orders: String::new(),
            clients: "c".to_string(),
        };
        assert_eq!(
            CoreConfig::default().with_keys(keys).unwrap_err(),
            ConfigError::EmptyKey("orders key")
        );
    }
}
