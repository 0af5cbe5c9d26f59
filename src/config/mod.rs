//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `FLASHQUERY_*` environment variables.
//! The SerpAPI key is read from `SERPAPI_API_KEY`; provider keys for generation
//! (e.g. `GROQ_API_KEY`) are resolved by `genai` itself.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DEFAULT_CONTEXT_PREFIX_CHARS, DEFAULT_SCORE_THRESHOLD};

/// Service configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `FLASHQUERY_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8000`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Model identifier handed to the generation provider. Default: `llama3-8b-8192`.
    pub generation_model: String,

    /// Upper bound on a single generation call. Default: 30s.
    pub generation_timeout: Duration,

    /// SerpAPI key. Web search is disabled when unset.
    pub serpapi_key: Option<String>,

    /// Number of search results requested. Default: `3`.
    pub search_results: u32,

    /// Search request timeout. Default: 3s.
    pub search_timeout: Duration,

    /// Directory holding the sentence-embedding model (config.json, model.safetensors, tokenizer.json).
    pub embedding_model_path: Option<PathBuf>,

    /// Directory holding the toxicity classifier model.
    pub toxicity_model_path: Option<PathBuf>,

    /// JSON object file mapping prompts to reference answers.
    pub references_path: Option<PathBuf>,

    /// Hybrid score threshold used when a request does not supply one. Default: `0.6`.
    pub score_threshold: f64,

    /// Characters of document context injected into prompts. Default: `1500`.
    pub context_prefix_chars: usize,
}

/// Default generation model used when `FLASHQUERY_GENERATION_MODEL` is not set.
pub const DEFAULT_GENERATION_MODEL: &str = "llama3-8b-8192";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            generation_timeout: Duration::from_secs(30),
            serpapi_key: None,
            search_results: 3,
            search_timeout: Duration::from_secs(3),
            embedding_model_path: None,
            toxicity_model_path: None,
            references_path: None,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            context_prefix_chars: DEFAULT_CONTEXT_PREFIX_CHARS,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "FLASHQUERY_PORT";
    const ENV_BIND_ADDR: &'static str = "FLASHQUERY_BIND_ADDR";
    const ENV_GENERATION_MODEL: &'static str = "FLASHQUERY_GENERATION_MODEL";
    const ENV_GENERATION_TIMEOUT_SECS: &'static str = "FLASHQUERY_GENERATION_TIMEOUT_SECS";
    const ENV_SERPAPI_KEY: &'static str = "SERPAPI_API_KEY";
    const ENV_SEARCH_RESULTS: &'static str = "FLASHQUERY_SEARCH_RESULTS";
    const ENV_SEARCH_TIMEOUT_SECS: &'static str = "FLASHQUERY_SEARCH_TIMEOUT_SECS";
    const ENV_EMBEDDING_MODEL_PATH: &'static str = "FLASHQUERY_EMBEDDING_MODEL_PATH";
    const ENV_TOXICITY_MODEL_PATH: &'static str = "FLASHQUERY_TOXICITY_MODEL_PATH";
    const ENV_REFERENCES_PATH: &'static str = "FLASHQUERY_REFERENCES_PATH";
    const ENV_SCORE_THRESHOLD: &'static str = "FLASHQUERY_SCORE_THRESHOLD";
    const ENV_CONTEXT_PREFIX_CHARS: &'static str = "FLASHQUERY_CONTEXT_PREFIX_CHARS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let generation_model =
            Self::parse_string_from_env(Self::ENV_GENERATION_MODEL, defaults.generation_model);
        let generation_timeout = Self::parse_secs_from_env(
            Self::ENV_GENERATION_TIMEOUT_SECS,
            defaults.generation_timeout,
        )?;
        let serpapi_key = Self::parse_optional_string_from_env(Self::ENV_SERPAPI_KEY);
        let search_results =
            Self::parse_count_from_env(Self::ENV_SEARCH_RESULTS, defaults.search_results)?;
        let search_timeout =
            Self::parse_secs_from_env(Self::ENV_SEARCH_TIMEOUT_SECS, defaults.search_timeout)?;
        let embedding_model_path =
            Self::parse_optional_path_from_env(Self::ENV_EMBEDDING_MODEL_PATH);
        let toxicity_model_path = Self::parse_optional_path_from_env(Self::ENV_TOXICITY_MODEL_PATH);
        let references_path = Self::parse_optional_path_from_env(Self::ENV_REFERENCES_PATH);
        let score_threshold = Self::parse_threshold_from_env(defaults.score_threshold)?;
        let context_prefix_chars = Self::parse_count_from_env(
            Self::ENV_CONTEXT_PREFIX_CHARS,
            defaults.context_prefix_chars,
        )?;

        Ok(Self {
            port,
            bind_addr,
            generation_model,
            generation_timeout,
            serpapi_key,
            search_results,
            search_timeout,
            embedding_model_path,
            toxicity_model_path,
            references_path,
            score_threshold,
            context_prefix_chars,
        })
    }

    /// Validates paths and basic invariants (does not touch model files).
    pub fn validate(&self) -> Result<(), ConfigError> {
        for path in [&self.embedding_model_path, &self.toxicity_model_path]
            .into_iter()
            .flatten()
        {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if let Some(ref path) = self.references_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        if self.search_results == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_SEARCH_RESULTS,
                reason: "must be at least 1".to_string(),
            });
        }

        if self.context_prefix_chars == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_CONTEXT_PREFIX_CHARS,
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_threshold_from_env(default: f64) -> Result<f64, ConfigError> {
        match env::var(Self::ENV_SCORE_THRESHOLD) {
            Ok(value) => {
                let threshold: f64 =
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue {
                            name: Self::ENV_SCORE_THRESHOLD,
                            reason: format!("'{value}' is not a number"),
                        })?;

                if !(0.0..=1.0).contains(&threshold) {
                    return Err(ConfigError::InvalidValue {
                        name: Self::ENV_SCORE_THRESHOLD,
                        reason: format!("{threshold} is outside 0.0..=1.0"),
                    });
                }

                Ok(threshold)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        Self::parse_optional_string_from_env(var_name).map(PathBuf::from)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &'static str) -> Result<Option<u64>, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse::<u64>()
                .map(Some)
                .map_err(|e| ConfigError::InvalidValue {
                    name: var_name,
                    reason: format!("'{value}' is not a whole number: {e}"),
                }),
            Err(_) => Ok(None),
        }
    }

    fn parse_count_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: TryFrom<u64>,
    {
        match Self::parse_u64_from_env(var_name)? {
            Some(value) => T::try_from(value).map_err(|_| ConfigError::InvalidValue {
                name: var_name,
                reason: format!("{value} is too large"),
            }),
            None => Ok(default),
        }
    }

    /// Timeouts must be at least one second.
    fn parse_secs_from_env(
        var_name: &'static str,
        default: Duration,
    ) -> Result<Duration, ConfigError> {
        match Self::parse_u64_from_env(var_name)? {
            Some(0) => Err(ConfigError::InvalidValue {
                name: var_name,
                reason: "timeout must be at least 1 second".to_string(),
            }),
            Some(secs) => Ok(Duration::from_secs(secs)),
            None => Ok(default),
        }
    }
}
