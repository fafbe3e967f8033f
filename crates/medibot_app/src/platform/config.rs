use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use engine_logging::{LogDestination, LogSettings};
use log::LevelFilter;
use medibot_engine::{
    ChatSettings, EngineConfig, RecognitionConfig, DEFAULT_ENDPOINT, DEFAULT_LANGUAGE,
};
use serde::Deserialize;

const CONFIG_FILENAME: &str = "medibot.ron";
const CONFIG_ENV: &str = "MEDIBOT_CONFIG";
const DEFAULT_BOOKING_URL: &str = "https://www.tdhospital.jp/reservation";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("invalid {field} {value:?}: {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        source: url::ParseError,
    },
    #[error("unknown log level {0:?}")]
    LogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub endpoint: String,
    /// Unset keeps the transport default.
    pub request_timeout_secs: Option<u64>,
    pub booking_url: String,
    pub speech_language: String,
    pub log_destination: LogDestination,
    pub log_level: String,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: None,
            booking_url: DEFAULT_BOOKING_URL.to_string(),
            speech_language: DEFAULT_LANGUAGE.to_string(),
            log_destination: LogDestination::File,
            log_level: "info".to_string(),
            log_file: PathBuf::from("./medibot.log"),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_url("endpoint", &self.endpoint)?;
        parse_url("booking_url", &self.booking_url)?;
        self.level_filter()?;
        Ok(())
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            chat: ChatSettings {
                endpoint: self.endpoint.clone(),
                request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            },
            recognition: RecognitionConfig::for_language(self.speech_language.clone()),
        }
    }

    pub fn log_settings(&self) -> Result<LogSettings, ConfigError> {
        Ok(LogSettings {
            destination: self.log_destination,
            level: self.level_filter()?,
            file: self.log_file.clone(),
        })
    }

    fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }
}

/// `$MEDIBOT_CONFIG` if set, otherwise `./medibot.ron`.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".").join(CONFIG_FILENAME))
}

/// Loads and validates the config; a missing file yields the defaults.
pub fn load(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = match fs::read_to_string(path) {
        Ok(text) => ron::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    config.validate()?;
    Ok(config)
}

fn parse_url(field: &'static str, value: &str) -> Result<url::Url, ConfigError> {
    url::Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load(&temp.path().join("absent.ron")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.engine_config().chat.request_timeout, None);
        assert_eq!(config.engine_config().recognition.language, "ja-JP");
    }

    #[test]
    fn partial_file_overrides_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            r#"(
                endpoint: "http://localhost:7071/api/chat",
                request_timeout_secs: Some(20),
                log_destination: Both,
                log_level: "debug",
            )"#,
        )
        .unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.endpoint, "http://localhost:7071/api/chat");
        assert_eq!(config.booking_url, DEFAULT_BOOKING_URL);
        assert_eq!(
            config.engine_config().chat.request_timeout,
            Some(Duration::from_secs(20))
        );
        let logs = config.log_settings().unwrap();
        assert_eq!(logs.destination, LogDestination::Both);
        assert_eq!(logs.level, LevelFilter::Debug);
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(&path, r#"(endpoint: "not a url")"#).unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { field: "endpoint", .. }));
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let config = AppConfig {
            log_level: "loud".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::LogLevel(_))));
    }

    #[test]
    fn syntax_error_reports_parse_failure() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(&path, "(endpoint: ").unwrap();

        assert!(matches!(load(&path), Err(ConfigError::Parse { .. })));
    }
}
