//! Configuration system for Persona Advisor
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (ADVISOR_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::error::{Error, Result};

/// Main advisor configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Form server settings
    pub server: ServerSettings,

    /// Completion endpoint settings
    pub openai: OpenAiSettings,

    /// Where the API credential is looked up
    pub secrets: SecretsSettings,

    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Form server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Interface to bind
    pub host: String,

    /// TCP port to listen on
    pub port: u16,
}

/// OpenAI-compatible completion endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    /// API base URL (e.g., "https://api.openai.com/v1")
    pub base_url: String,

    /// Model identifier sent with every request
    pub model: String,

    /// Request timeout in seconds (unset = HTTP client default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Credential lookup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretsSettings {
    /// `.env` file read for the key when the env var is absent
    pub dotenv_path: String,

    /// TOML secrets file consulted when the env var is absent
    pub secrets_file: String,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Maximum log file size in MB before rotation
    pub max_file_size_mb: u64,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for SecretsSettings {
    fn default() -> Self {
        Self {
            dotenv_path: ".env".to_string(),
            secrets_file: ".streamlit/secrets.toml".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            max_file_size_mb: 100,
            max_files: 5,
            json_format: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = Self::find_config_file(config_path)? {
            debug!(path = %path.display(), "Loading configuration file");
            let content = fs::read_to_string(&path).map_err(|e| Error::IoRead {
                path: path.clone(),
                source: e,
            })?;
            config = toml::from_str(&content).map_err(|e| {
                Error::config_parse(format!("{}: {}", path.display(), e.message()), e)
            })?;
            info!(path = %path.display(), "Configuration loaded from file");
        }

        config.apply_env_overrides();
        config.expand_paths();
        config.validate()?;

        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            return if path.exists() {
                Ok(Some(path))
            } else {
                Err(Error::config_not_found(path))
            };
        }

        let search_paths = [
            PathBuf::from("persona-advisor.toml"),
            PathBuf::from("config.toml"),
            dirs::config_dir()
                .map(|p| p.join("persona-advisor").join("config.toml"))
                .unwrap_or_default(),
        ];

        for path in &search_paths {
            if path.is_file() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("ADVISOR_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("ADVISOR_PORT") {
            if let Ok(n) = val.parse() {
                self.server.port = n;
            }
        }

        if let Ok(val) = std::env::var("ADVISOR_OPENAI_BASE_URL") {
            self.openai.base_url = val;
        }
        if let Ok(val) = std::env::var("ADVISOR_OPENAI_MODEL") {
            self.openai.model = val;
        }
        if let Ok(val) = std::env::var("ADVISOR_OPENAI_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.openai.timeout_secs = Some(n);
            }
        }

        if let Ok(val) = std::env::var("ADVISOR_DOTENV_PATH") {
            self.secrets.dotenv_path = val;
        }
        if let Ok(val) = std::env::var("ADVISOR_SECRETS_FILE") {
            self.secrets.secrets_file = val;
        }

        if let Ok(val) = std::env::var("ADVISOR_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("ADVISOR_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Ok(val) = std::env::var("ADVISOR_LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        self.secrets.dotenv_path = expand_path(&self.secrets.dotenv_path);
        self.secrets.secrets_file = expand_path(&self.secrets.secrets_file);

        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        match Url::parse(&self.openai.base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => {
                return Err(Error::config_field_invalid(
                    "openai.base_url",
                    format!("base_url must use http or https, got '{}'", url.scheme()),
                ));
            }
            Err(e) => {
                return Err(Error::config_field_invalid(
                    "openai.base_url",
                    format!("invalid base_url '{}': {}", self.openai.base_url, e),
                ));
            }
        }

        if self.openai.model.trim().is_empty() {
            return Err(Error::config_field_invalid(
                "openai.model",
                "model identifier cannot be empty",
            ));
        }

        if self.server.port == 0 {
            return Err(Error::config_field_invalid(
                "server.port",
                "port must be between 1 and 65535",
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        Ok(())
    }

    /// Socket address string for the form server
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or(std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Initialize a new configuration file
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(|| PathBuf::from("persona-advisor.toml"));

    if config_path.exists() && !force {
        return Err(Error::ConfigValidation {
            message: format!(
                "Configuration file already exists: {}. Use --force to overwrite.",
                config_path.display()
            ),
            field: None,
        });
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| Error::IoWrite {
        path: config_path.clone(),
        source: e,
    })?;

    Ok(config_path)
}

const DEFAULT_CONFIG: &str = r#"# Persona Advisor Configuration

[server]
# Interface and port for the form server
host = "127.0.0.1"
port = 8501

[openai]
# API base URL (OpenAI or any compatible endpoint)
base_url = "https://api.openai.com/v1"

# Model identifier sent with every request
model = "gpt-4o-mini"

# Request timeout in seconds (leave unset for the HTTP client default)
# timeout_secs = 60

[secrets]
# OPENAI_API_KEY is read from the environment first, then this .env file,
# then the secrets file. Never commit either file.
dotenv_path = ".env"
secrets_file = ".streamlit/secrets.toml"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file path (comment out to disable file logging)
# file = "~/.persona-advisor/logs/advisor.log"

max_file_size_mb = 100
max_files = 5
json_format = false
"#;
