//! Environment-driven runtime settings.
//!
//! Settings resolve in two layers: compiled defaults, then `MAPSMITH_*`
//! environment variables (a `.env` file is honored when present). Invalid
//! values fail loading instead of being silently replaced.

use std::str::FromStr;

use thiserror::Error;

/// Errors raised while resolving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was set but could not be parsed.
    #[error("failed to parse environment variable {key}: {message}")]
    EnvParse { key: String, message: String },
}

/// Connection settings for the generation backend.
#[derive(Debug, Clone)]
pub struct OllamaSettings {
    pub base_url: String,
    pub model: String,
    /// Bound on one synchronous generation call.
    pub timeout_secs: u64,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "mistral".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Full service configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub ollama: OllamaSettings,
    /// Upper bound on chunks processed per upload request.
    pub max_chunks: usize,
    /// Token budget handed to the chunker.
    pub chunk_token_budget: usize,
    /// Attempt bound for the single-unit retry path.
    pub max_retries: usize,
    /// Lifetime of stored upload content used for follow-up requests.
    pub upload_ttl_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            ollama: OllamaSettings::default(),
            max_chunks: 3,
            chunk_token_budget: 1500,
            max_retries: 3,
            upload_ttl_secs: 1800,
        }
    }
}

impl Settings {
    /// Loads settings from the environment on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvParse`] when a set variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut settings = Self::default();
        if let Some(host) = string_var("MAPSMITH_HOST") {
            settings.host = host;
        }
        if let Some(port) = parsed_var("MAPSMITH_PORT")? {
            settings.port = port;
        }
        if let Some(base_url) = string_var("MAPSMITH_OLLAMA_BASE_URL") {
            settings.ollama.base_url = base_url;
        }
        if let Some(model) = string_var("MAPSMITH_OLLAMA_MODEL") {
            settings.ollama.model = model;
        }
        if let Some(timeout) = parsed_var("MAPSMITH_OLLAMA_TIMEOUT_SECS")? {
            settings.ollama.timeout_secs = timeout;
        }
        if let Some(max_chunks) = parsed_var("MAPSMITH_MAX_CHUNKS")? {
            settings.max_chunks = max_chunks;
        }
        if let Some(budget) = parsed_var("MAPSMITH_CHUNK_TOKEN_BUDGET")? {
            settings.chunk_token_budget = budget;
        }
        if let Some(retries) = parsed_var("MAPSMITH_MAX_RETRIES")? {
            settings.max_retries = retries;
        }
        if let Some(ttl) = parsed_var("MAPSMITH_UPLOAD_TTL_SECS")? {
            settings.upload_ttl_secs = ttl;
        }

        Ok(settings)
    }

    /// Socket address string the server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn string_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

fn parsed_var<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match string_var(key) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|err: T::Err| {
            ConfigError::EnvParse {
                key: key.to_string(),
                message: err.to_string(),
            }
        }),
    }
}
