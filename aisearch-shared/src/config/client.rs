//! Client settings and their resolution order.

use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

const ENV_API_URL: &str = "AISEARCH_API_URL";
const ENV_REQUEST_TIMEOUT: &str = "AISEARCH_REQUEST_TIMEOUT";
const ENV_LOG_LEVEL: &str = "AISEARCH_LOG_LEVEL";
const ENV_LOG_FORMAT: &str = "AISEARCH_LOG_FORMAT";
const ENV_TOKEN_PATH: &str = "AISEARCH_TOKEN_PATH";
const SERVER_FLAG: &str = "--server";

const DEFAULT_API_URL: &str = "http://localhost:8000/";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {}: {source}", .path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid YAML for [`Config`].
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yml::Error),
    /// The file is not valid JSON for [`Config`].
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// Neither `yaml`/`yml` nor `json`.
    #[error("Unsupported configuration format {0:?}. Use 'yaml' or 'json'.")]
    UnsupportedFormat(String),
    /// A single setting could not be parsed.
    #[error("invalid value for {key}: {message}")]
    InvalidValue {
        /// Environment variable or flag the value came from.
        key: &'static str,
        /// What was wrong with it.
        message: String,
    },
    /// Every problem found by [`Config::validate`].
    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Output format of log lines.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format {other:?}; use 'text' or 'json'")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    /// Root URL of the backend; API paths are joined onto it.
    pub base_url: Url,
    /// Timeout for non-streaming requests, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// [`Self::request_timeout_secs`] as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Log filtering and output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// Line format written to stderr.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Where the bearer token is kept between invocations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    /// Explicit token file; defaults to the per-user config directory.
    pub token_path: Option<PathBuf>,
}

impl SessionConfig {
    /// Resolved token file location.
    #[must_use]
    pub fn token_path(&self) -> PathBuf {
        self.token_path.clone().unwrap_or_else(|| {
            BaseDirs::new().map_or_else(
                || PathBuf::from("./aisearch.token"),
                |dirs| dirs.config_dir().join("aisearch").join("token"),
            )
        })
    }
}

/// The main configuration structure for the AI Search client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Backend connection settings.
    pub api: ApiConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
    /// Token storage.
    pub session: SessionConfig,
}

impl Config {
    /// Generates a default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Loads the configuration from a file, environment variables, or defaults.
    ///
    /// Values set by the file take precedence over the environment; the
    /// environment only fills values still at their defaults. `api_url_override`
    /// (the `--server` flag) wins over both.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when the file cannot be read or parsed, an
    /// environment variable holds an invalid value, or validation fails.
    pub fn load_config(
        config_path: Option<&Path>,
        api_url_override: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::with_defaults(),
        };

        config.apply_env_overrides()?;

        if let Some(url) = api_url_override {
            config.api.base_url = parse_base_url(url, SERVER_FLAG)?;
        }
        config.api.base_url = normalize_base_url(config.api.base_url);

        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Reads a YAML or JSON file, chosen by extension.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] on I/O, parse, or format errors.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match extension.as_str() {
            "yaml" | "yml" => Ok(serde_yml::from_str(&content)?),
            "json" => Ok(serde_json::from_str(&content)?),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Serializes the configuration as `yaml` or `json`.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnsupportedFormat`] for any other format.
    pub fn render(&self, format: &str) -> Result<String, ConfigError> {
        match format {
            "yaml" | "yml" => Ok(serde_yml::to_string(self)?),
            "json" => Ok(serde_json::to_string_pretty(self)?),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let defaults = Self::with_defaults();

        if self.api.base_url == defaults.api.base_url
            && let Ok(url) = env::var(ENV_API_URL)
        {
            self.api.base_url = parse_base_url(&url, ENV_API_URL)?;
        }
        if self.api.request_timeout_secs == defaults.api.request_timeout_secs
            && let Ok(timeout) = env::var(ENV_REQUEST_TIMEOUT)
        {
            self.api.request_timeout_secs =
                timeout.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: ENV_REQUEST_TIMEOUT,
                    message: format!("{timeout:?} is not a number of seconds"),
                })?;
        }
        if self.logging.level == defaults.logging.level
            && let Ok(level) = env::var(ENV_LOG_LEVEL)
        {
            self.logging.level = level;
        }
        if self.logging.format == defaults.logging.format
            && let Ok(format) = env::var(ENV_LOG_FORMAT)
        {
            self.logging.format = format
                .parse()
                .map_err(|message| ConfigError::InvalidValue {
                    key: ENV_LOG_FORMAT,
                    message,
                })?;
        }
        if self.session.token_path.is_none()
            && let Ok(path) = env::var(ENV_TOKEN_PATH)
        {
            self.session.token_path = Some(PathBuf::from(path));
        }

        Ok(())
    }

    /// Validates the resolved configuration, collecting every problem.
    ///
    /// # Errors
    /// Returns the list of validation messages when anything is invalid.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !matches!(self.api.base_url.scheme(), "http" | "https") {
            errors.push(format!(
                "API base URL must use http or https, got {}",
                self.api.base_url
            ));
        }
        if self.api.request_timeout_secs == 0 {
            errors.push("Request timeout must be greater than 0 seconds.".to_string());
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            errors.push(format!(
                "Unknown log level {:?}; expected one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_API_URL).unwrap_or_else(|_| unreachable!("default API URL is valid"))
}

/// Parses a base URL, reporting failures under `key`.
fn parse_base_url(raw: &str, key: &'static str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|err| ConfigError::InvalidValue {
        key,
        message: format!("{raw:?}: {err}"),
    })
}

/// Ensures the path ends with `/` so relative joins keep any prefix.
fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
