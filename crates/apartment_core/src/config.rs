//! Runtime configuration loaded from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `APARTMENT_DB_PATH` | unset, in-memory database |
//! | `APARTMENT_LOG_LEVEL` | `debug` in debug builds, `info` in release |
//! | `APARTMENT_LOG_DIR` | unset, logging stays off |
//! | `APARTMENT_VALIDATE_WRITES` | `false` |

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "APARTMENT_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "APARTMENT_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "APARTMENT_LOG_DIR";
pub const ENV_VALIDATE_WRITES: &str = "APARTMENT_VALIDATE_WRITES";

/// Storage location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbConfig {
    /// `None` opens an in-memory database.
    pub path: Option<PathBuf>,
}

/// File logging settings, consumed by `init_logging`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    /// Must be absolute.
    pub dir: PathBuf,
}

/// Service-layer behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Run opt-in entity validation before every service write.
    pub validate_writes: bool,
}

/// Complete configuration for one process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreConfig {
    pub db: DbConfig,
    /// `None` when no log directory is configured.
    pub log: Option<LogConfig>,
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBool { var: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBool { var, value } => write!(
                f,
                "{var} must be one of true|false|1|0|yes|no, got `{value}`"
            ),
        }
    }
}

impl Error for ConfigError {}

impl CoreConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which returns a variable's value.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db = DbConfig {
            path: read(ENV_DB_PATH).map(PathBuf::from),
        };
        let log = read(ENV_LOG_DIR).map(|dir| LogConfig {
            level: read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            dir: PathBuf::from(dir),
        });
        let validate_writes = match read(ENV_VALIDATE_WRITES) {
            Some(value) => parse_bool(ENV_VALIDATE_WRITES, &value)?,
            None => false,
        };

        Ok(Self {
            db,
            log,
            service: ServiceConfig { validate_writes },
        })
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ConfigError, CoreConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL, ENV_VALIDATE_WRITES,
    };
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = CoreConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn reads_all_variables() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "/var/lib/rentals.db"),
            (ENV_LOG_DIR, "/var/log/rentals"),
            (ENV_LOG_LEVEL, "warn"),
            (ENV_VALIDATE_WRITES, "YES"),
        ]))
        .unwrap();

        assert_eq!(config.db.path, Some(PathBuf::from("/var/lib/rentals.db")));
        let log = config.log.unwrap();
        assert_eq!(log.level, "warn");
        assert_eq!(log.dir, PathBuf::from("/var/log/rentals"));
        assert!(config.service.validate_writes);
    }

    #[test]
    fn log_level_is_ignored_without_directory() {
        let config = CoreConfig::from_lookup(lookup_from(&[(ENV_LOG_LEVEL, "trace")])).unwrap();
        assert!(config.log.is_none());
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = CoreConfig::from_lookup(lookup_from(&[(ENV_DB_PATH, "   ")])).unwrap();
        assert!(config.db.path.is_none());
    }

    #[test]
    fn rejects_unknown_bool() {
        let err =
            CoreConfig::from_lookup(lookup_from(&[(ENV_VALIDATE_WRITES, "maybe")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidBool {
                var: ENV_VALIDATE_WRITES,
                value: "maybe".to_string(),
            }
        );
    }
}
