//! TOML configuration file parsing and loading
//!
//! The file is read as a raw `toml::Table` and applied key by key, so that
//! single values, arrays and comma-separated strings are all accepted.
//! Environment overrides are applied after the file.

use std::path::{Path, PathBuf};

use crate::core::error_handling::ContextualError;
use crate::core::validation::{
    split_comma_separated, validate_extension, validate_positive_int, validate_user_id,
};
use crate::indexer::config::IndexConfig;

pub const CONFIG_DIR_NAME: &str = "Mediaindex";
pub const CONFIG_FILE_NAME: &str = "mediaindex.toml";

pub const ENV_ADMINS: &str = "MEDIAINDEX_ADMINS";
pub const ENV_INDEX_EXTENSIONS: &str = "MEDIAINDEX_INDEX_EXTENSIONS";
pub const ENV_LOG_CHANNEL: &str = "MEDIAINDEX_LOG_CHANNEL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("The specified configuration file does not exist: {}", path.display())]
    Missing { path: PathBuf },

    #[error("Error reading configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing configuration file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value for '{key}': {message}")]
    Invalid { key: String, message: String },
}

impl ConfigError {
    fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, ConfigError::Invalid { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::Invalid { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Effective configuration: pipeline settings plus logging preferences
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub index: IndexConfig,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub log_file: Option<String>,
    pub color: Option<bool>,
    /// File the values were read from, if any
    pub source: Option<PathBuf>,
    /// Problems that did not prevent loading, logged once logging is up
    pub warnings: Vec<String>,
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load configuration from `explicit` (which must exist) or the default path
/// (used only if present), then apply environment overrides
pub async fn load_config(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let path = match explicit {
        Some(path) if !path.exists() => {
            return Err(ConfigError::Missing {
                path: path.to_path_buf(),
            })
        }
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|path| path.exists()),
    };

    let mut config = AppConfig::default();
    if let Some(path) = path {
        let contents =
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;
        let table = toml::from_str::<toml::Table>(&contents).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;
        apply_toml_values(&mut config, &table)?;
        config.source = Some(path);
    }

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Apply TOML configuration values
pub fn apply_toml_values(config: &mut AppConfig, table: &toml::Table) -> Result<(), ConfigError> {
    for (key, value) in table {
        match key.as_str() {
            "admins" => config.index.admins = integer_list(key, value)?.into_iter().collect(),
            "index-extensions" => config.index.index_extensions = extensions(key, &strings(key, value)?)?,
            "log-channel" => config.index.log_channel = Some(single_integer(key, value)?),
            "progress-interval" => {
                let interval = match value {
                    toml::Value::Integer(n) if *n > 0 => *n as u64,
                    toml::Value::String(s) => validate_positive_int(s)
                        .map_err(|e| ConfigError::invalid(key, e.message()))?
                        as u64,
                    _ => return Err(ConfigError::invalid(key, "expected a positive integer")),
                };
                config.index.progress_interval = interval;
            }
            "log-level" => config.log_level = Some(string(key, value)?),
            "log-format" => config.log_format = Some(string(key, value)?),
            "log-file" => {
                let file = string(key, value)?;
                config.log_file = (!file.eq_ignore_ascii_case("none") && file != "-").then_some(file);
            }
            "color" => {
                config.color = Some(
                    value
                        .as_bool()
                        .ok_or_else(|| ConfigError::invalid(key, "expected true or false"))?,
                )
            }
            unknown => config
                .warnings
                .push(format!("Ignoring unknown configuration key '{unknown}'")),
        }
    }
    Ok(())
}

/// Apply `MEDIAINDEX_*` overrides; `lookup` returns the variable's value
pub fn apply_env_overrides(
    config: &mut AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(admins) = lookup(ENV_ADMINS) {
        config.index.admins = split_comma_separated(&[admins])
            .iter()
            .map(|id| validate_user_id(id).map_err(|e| ConfigError::invalid(ENV_ADMINS, e.message())))
            .collect::<Result<_, _>>()?;
    }
    if let Some(exts) = lookup(ENV_INDEX_EXTENSIONS) {
        config.index.index_extensions = extensions(ENV_INDEX_EXTENSIONS, &[exts])?;
    }
    if let Some(channel) = lookup(ENV_LOG_CHANNEL) {
        config.index.log_channel = match channel.trim() {
            "" => None,
            id => Some(
                validate_user_id(id)
                    .map_err(|e| ConfigError::invalid(ENV_LOG_CHANNEL, e.message()))?,
            ),
        };
    }
    Ok(())
}

fn string(key: &str, value: &toml::Value) -> Result<String, ConfigError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ConfigError::invalid(key, "expected a string"))
}

/// A string or an array of strings
fn strings(key: &str, value: &toml::Value) -> Result<Vec<String>, ConfigError> {
    match value {
        toml::Value::String(s) => Ok(vec![s.clone()]),
        toml::Value::Array(items) => items.iter().map(|item| string(key, item)).collect(),
        _ => Err(ConfigError::invalid(key, "expected a string or an array of strings")),
    }
}

fn single_integer(key: &str, value: &toml::Value) -> Result<i64, ConfigError> {
    match value {
        toml::Value::Integer(n) => Ok(*n),
        toml::Value::String(s) => {
            validate_user_id(s).map_err(|e| ConfigError::invalid(key, e.message()))
        }
        _ => Err(ConfigError::invalid(key, "expected an integer id")),
    }
}

/// An integer, a comma-separated string, or an array of either
fn integer_list(key: &str, value: &toml::Value) -> Result<Vec<i64>, ConfigError> {
    match value {
        toml::Value::Integer(n) => Ok(vec![*n]),
        toml::Value::String(s) => split_comma_separated(&[s.clone()])
            .iter()
            .map(|id| validate_user_id(id).map_err(|e| ConfigError::invalid(key, e.message())))
            .collect(),
        toml::Value::Array(items) => {
            let mut ids = Vec::with_capacity(items.len());
            for item in items {
                ids.extend(integer_list(key, item)?);
            }
            Ok(ids)
        }
        _ => Err(ConfigError::invalid(key, "expected integer ids")),
    }
}

fn extensions(key: &str, values: &[String]) -> Result<Vec<String>, ConfigError> {
    let mut normalised = Vec::new();
    for ext in split_comma_separated(values) {
        let ext = validate_extension(&ext).map_err(|e| ConfigError::invalid(key, e.message()))?;
        if !normalised.contains(&ext) {
            normalised.push(ext);
        }
    }
    if normalised.is_empty() {
        return Err(ConfigError::invalid(key, "at least one extension is required"));
    }
    Ok(normalised)
}

impl AppConfig {
    /// `key: value` lines describing the effective settings
    pub fn summary_lines(&self) -> Vec<String> {
        let admins = self
            .index
            .admins
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let source = match (&self.source, default_config_path()) {
            (Some(path), _) => path.display().to_string(),
            (None, Some(default)) => format!("none (looked for {})", default.display()),
            (None, None) => "none".to_string(),
        };
        vec![
            format!("config-file: {source}"),
            format!("admins: {}", if admins.is_empty() { "none" } else { admins.as_str() }),
            format!("index-extensions: {}", self.index.index_extensions.join(", ")),
            format!(
                "log-channel: {}",
                self.index
                    .log_channel
                    .map_or_else(|| "none".to_string(), |id| id.to_string())
            ),
            format!("progress-interval: {}", self.index.progress_interval),
            format!("log-level: {}", self.log_level.as_deref().unwrap_or("info")),
            format!("log-format: {}", self.log_format.as_deref().unwrap_or("text")),
            format!("log-file: {}", self.log_file.as_deref().unwrap_or("none")),
        ]
    }
}
