//! Configuration management for the architecture copilot
//!
//! Values resolve as env > TOML file > built-in default.

pub mod file;

use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;

use crate::{Error, Result};
use file::CopilotConfigFile;

/// Default OpenAI-compatible API base URL
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default completion model
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-instruct";

/// Default number of records placed in the context
pub const DEFAULT_TOP_K: usize = 4;

/// Default seed for the sampling fallback
pub const DEFAULT_SEED: u64 = 42;

/// Copilot configuration
#[derive(Debug)]
pub struct Config {
    /// Corpus CSV to load; `None` uses the embedded dataset
    pub corpus_path: Option<PathBuf>,

    /// Completion service configuration
    pub completion: CompletionConfig,

    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
}

/// Completion service configuration
#[derive(Debug)]
pub struct CompletionConfig {
    /// Base URL of an OpenAI-compatible API
    pub api_base: String,

    /// API key (from `OPENAI_API_KEY` or the config file)
    pub api_key: Option<SecretString>,

    /// Model identifier
    pub model: String,

    /// Maximum output tokens per answer
    pub max_tokens: u32,

    /// Temperature for the question-only baseline
    pub basic_temperature: f32,

    /// Temperature for context-grounded answers
    pub grounded_temperature: f32,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 350,
            basic_temperature: 0.4,
            grounded_temperature: 0.2,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrievalConfig {
    /// Number of records placed in the context
    pub top_k: usize,

    /// Seed for the no-overlap sampling fallback
    pub seed: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            seed: DEFAULT_SEED,
        }
    }
}

impl Config {
    /// Load configuration from the environment and a TOML file
    ///
    /// An explicit `config_path` must exist and parse; otherwise the standard
    /// location is tried and silently skipped when absent.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit config file is unreadable, an environment
    /// override cannot be parsed, or the resulting values are out of range
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let fc = match config_path {
            Some(path) => file::read_config_file(path)?,
            None => file::load_config_file(),
        };

        Self::from_sources(fc, |key| std::env::var(key).ok())
    }

    /// Merge a parsed config file with environment lookups
    ///
    /// # Errors
    ///
    /// Returns error if an override cannot be parsed or validation fails
    pub fn from_sources<F>(fc: CopilotConfigFile, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = CompletionConfig::default();

        let completion = CompletionConfig {
            api_base: env("EA_COPILOT_API_BASE")
                .or(fc.completion.api_base)
                .unwrap_or(defaults.api_base),
            api_key: env("OPENAI_API_KEY")
                .or(fc.completion.api_key)
                .filter(|key| !key.trim().is_empty())
                .map(SecretString::from),
            model: env("EA_COPILOT_MODEL")
                .or(fc.completion.model)
                .unwrap_or(defaults.model),
            max_tokens: fc.completion.max_tokens.unwrap_or(defaults.max_tokens),
            basic_temperature: fc
                .completion
                .basic_temperature
                .unwrap_or(defaults.basic_temperature),
            grounded_temperature: fc
                .completion
                .grounded_temperature
                .unwrap_or(defaults.grounded_temperature),
            timeout: fc
                .completion
                .timeout_secs
                .map_or(defaults.timeout, Duration::from_secs),
        };

        let retrieval = RetrievalConfig {
            top_k: parse_env(&env, "EA_COPILOT_TOP_K")?
                .or(fc.retrieval.top_k)
                .unwrap_or(DEFAULT_TOP_K),
            seed: parse_env(&env, "EA_COPILOT_SEED")?
                .or(fc.retrieval.seed)
                .unwrap_or(DEFAULT_SEED),
        };

        let corpus_path = env("EA_COPILOT_CORPUS")
            .or(fc.corpus_path)
            .map(|p| PathBuf::from(expand_home(&p)));

        let config = Self {
            corpus_path,
            completion,
            retrieval,
        };
        config.validate()?;

        tracing::debug!(
            model = %config.completion.model,
            api_base = %config.completion.api_base,
            top_k = config.retrieval.top_k,
            seed = config.retrieval.seed,
            corpus = ?config.corpus_path,
            "configuration resolved"
        );

        Ok(config)
    }

    /// Check that every value is within its accepted range
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("retrieval.top_k must be at least 1".to_string()));
        }
        if self.completion.max_tokens == 0 {
            return Err(Error::Config(
                "completion.max_tokens must be at least 1".to_string(),
            ));
        }
        if self.completion.timeout.is_zero() {
            return Err(Error::Config(
                "completion.timeout_secs must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("basic_temperature", self.completion.basic_temperature),
            ("grounded_temperature", self.completion.grounded_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(Error::Config(format!(
                    "completion.{name} must be between 0.0 and 2.0, got {value}"
                )));
            }
        }
        if self.completion.api_base.trim().is_empty() {
            return Err(Error::Config("completion.api_base is empty".to_string()));
        }
        Ok(())
    }
}

fn parse_env<F, T>(env: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    env(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| Error::Config(format!("{key} has an invalid value: {raw}")))
        })
        .transpose()
}

/// Expand a leading `~/` to the user's home directory
fn expand_home(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(dirs) = directories::BaseDirs::new()
    {
        return dirs.home_dir().join(rest).to_string_lossy().into_owned();
    }
    path.to_string()
}
