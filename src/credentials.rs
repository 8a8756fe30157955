//! API credential resolution.
//!
//! `OPENAI_API_KEY` is resolved once at startup, first match wins:
//! 1. the process environment
//! 2. the `.env` file (read, not loaded into the environment)
//! 3. the TOML secrets file, the hosted-deployment secret store
//!
//! Empty values count as absent.

use std::fmt;
use std::fs;
use std::path::Path;

use secrecy::SecretString;
use tracing::{debug, warn};

use crate::config::SecretsSettings;

/// Name of the credential in every source
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Where a credential was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Environment,
    DotEnv,
    SecretsFile,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::DotEnv => write!(f, ".env"),
            CredentialSource::SecretsFile => write!(f, "secrets file"),
        }
    }
}

/// A resolved API key
pub struct Credential {
    pub key: SecretString,
    pub source: CredentialSource,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("key", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}

/// Resolve the credential from the real process environment and the configured files
pub fn resolve(settings: &SecretsSettings) -> Option<Credential> {
    resolve_with_env(std::env::var(API_KEY_VAR).ok(), settings)
}

/// Resolve with an explicit environment value
pub fn resolve_with_env(env_value: Option<String>, settings: &SecretsSettings) -> Option<Credential> {
    let found = non_empty(env_value)
        .map(|key| (key, CredentialSource::Environment))
        .or_else(|| read_dotenv(Path::new(&settings.dotenv_path)).map(|k| (k, CredentialSource::DotEnv)))
        .or_else(|| {
            read_secrets_file(Path::new(&settings.secrets_file))
                .map(|k| (k, CredentialSource::SecretsFile))
        });

    match found {
        Some((key, source)) => {
            debug!(source = %source, "API credential resolved");
            Some(Credential {
                key: SecretString::from(key),
                source,
            })
        }
        None => {
            debug!("No API credential found");
            None
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Look the key up in a `.env` file without touching the process environment
fn read_dotenv(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }

    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read .env file");
            return None;
        }
    };

    for entry in entries {
        match entry {
            Ok((name, value)) if name == API_KEY_VAR => return non_empty(Some(value)),
            Ok(_) => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping malformed .env line");
            }
        }
    }

    None
}

/// Look the key up at the top level of a TOML secrets file
fn read_secrets_file(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read secrets file");
            return None;
        }
    };

    let table: toml::Table = match toml::from_str(&content) {
        Ok(table) => table,
        Err(e) => {
            warn!(path = %path.display(), error = %e.message(), "Failed to parse secrets file");
            return None;
        }
    };

    non_empty(table.get(API_KEY_VAR).and_then(|v| v.as_str()).map(str::to_string))
}
