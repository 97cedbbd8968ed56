//! TOML configuration file parsing and loading
//!
//! ```toml
//! identity = "alice"
//!
//! [logging]
//! level = "info"
//! format = "text"
//! file = "msgbridge.log"
//! color = true
//!
//! [dispatch]
//! high-water-mark = 10000
//! ```

use crate::core::logging::LogFormat;
use crate::dispatch::DEFAULT_HIGH_WATER_MARK;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{message}")]
    Missing { message: String },

    #[error("Error reading configuration file {path}: {message}")]
    Read { path: String, message: String },

    #[error("{message}")]
    Parse { message: String },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

impl crate::core::error_handling::ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        match self {
            ConfigError::Missing { .. } => true,
            ConfigError::Parse { .. } => true,
            ConfigError::Invalid { .. } => true,
            ConfigError::Read { .. } => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::Missing { message }
            | ConfigError::Parse { message }
            | ConfigError::Invalid { message } => Some(message),
            ConfigError::Read { .. } => None,
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
    pub file: Option<PathBuf>,
    pub color: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DispatchConfig {
    pub high_water_mark: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            high_water_mark: DEFAULT_HIGH_WATER_MARK,
        }
    }
}

/// Settings read from `msgbridge.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AppConfig {
    pub identity: Option<String>,
    pub logging: LoggingConfig,
    pub dispatch: DispatchConfig,
}

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

impl AppConfig {
    /// `<config dir>/msgbridge/msgbridge.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("msgbridge").join("msgbridge.toml"))
    }

    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let config: AppConfig = toml::from_str(contents).map_err(|e| ConfigError::Parse {
            message: format!("Error parsing configuration: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration
    ///
    /// An explicitly given file must exist. Without one, the default path is
    /// used when present, and defaults otherwise.
    pub async fn load(config_file: Option<&Path>) -> ConfigResult<Self> {
        let path = match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::Missing {
                        message: format!(
                            "The specified configuration file does not exist: {}",
                            path.display()
                        ),
                    });
                }
                path.to_path_buf()
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    log::trace!("No configuration file found; using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ConfigError::Read {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse { message } => ConfigError::Parse {
                message: format!("{} ({})", message, path.display()),
            },
            other => other,
        })
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(identity) = &self.identity {
            validate_identity(identity)?;
        }
        if let Some(level) = &self.logging.level {
            if !LOG_LEVELS.contains(&level.as_str()) {
                return Err(ConfigError::Invalid {
                    message: format!(
                        "log level '{}' is not one of {}",
                        level,
                        LOG_LEVELS.join(", ")
                    ),
                });
            }
        }
        if self.dispatch.high_water_mark == 0 {
            return Err(ConfigError::Invalid {
                message: "dispatch high-water-mark must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Identity tags name a queue, so they must be non-empty and free of whitespace
pub fn validate_identity(identity: &str) -> ConfigResult<()> {
    if identity.trim().is_empty() {
        return Err(ConfigError::Invalid {
            message: "identity must not be empty".to_string(),
        });
    }
    if identity.chars().any(char::is_whitespace) {
        return Err(ConfigError::Invalid {
            message: format!("identity '{}' must not contain whitespace", identity),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_full_config_parses() {
        let config = AppConfig::from_toml_str(
            r#"
            identity = "alice"

            [logging]
            level = "debug"
            format = "json"
            file = "/tmp/msgbridge.log"
            color = false

            [dispatch]
            high-water-mark = 64
            "#,
        )
        .unwrap();

        assert_eq!(config.identity.as_deref(), Some("alice"));
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.logging.format, Some(LogFormat::Json));
        assert_eq!(
            config.logging.file,
            Some(PathBuf::from("/tmp/msgbridge.log"))
        );
        assert_eq!(config.logging.color, Some(false));
        assert_eq!(config.dispatch.high_water_mark, 64);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.dispatch.high_water_mark, DEFAULT_HIGH_WATER_MARK);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            AppConfig::from_toml_str("identity = \"\""),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            AppConfig::from_toml_str("identity = \"two words\""),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            AppConfig::from_toml_str("[dispatch]\nhigh-water-mark = 0"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            AppConfig::from_toml_str("[logging]\nlevel = \"loud\""),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            AppConfig::from_toml_str("[logging]\nformat = \"xml\""),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            AppConfig::from_toml_str("identity = "),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_from_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "identity = \"carol\"").unwrap();

        let config = AppConfig::load(Some(file.path())).await.unwrap();
        assert_eq!(config.identity.as_deref(), Some("carol"));
    }

    #[tokio::test]
    async fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        let error = AppConfig::load(Some(&missing)).await.unwrap_err();
        assert!(matches!(error, ConfigError::Missing { .. }));
        assert!(error.to_string().contains("absent.toml"));
    }

    #[tokio::test]
    async fn test_load_reports_parse_errors_with_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[dispatch").unwrap();

        let error = AppConfig::load(Some(file.path())).await.unwrap_err();
        match error {
            ConfigError::Parse { message } => {
                assert!(message.contains(&file.path().display().to_string()))
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
