//! TOML configuration file loading
//!
//! Supports `~/.config/omni/ea-copilot/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Result;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct CopilotConfigFile {
    /// Corpus CSV to load instead of the embedded dataset
    #[serde(default)]
    pub corpus_path: Option<String>,

    /// Completion service configuration
    #[serde(default)]
    pub completion: CompletionFileConfig,

    /// Context retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalFileConfig,
}

/// Completion service configuration
#[derive(Debug, Default, Deserialize)]
pub struct CompletionFileConfig {
    /// Base URL of an OpenAI-compatible API (e.g. "https://api.openai.com/v1")
    pub api_base: Option<String>,

    /// API key; `OPENAI_API_KEY` takes precedence
    pub api_key: Option<String>,

    /// Model identifier (e.g. "gpt-3.5-turbo-instruct")
    pub model: Option<String>,

    /// Maximum output tokens per answer
    pub max_tokens: Option<u32>,

    /// Sampling temperature for ungrounded answers
    pub basic_temperature: Option<f32>,

    /// Sampling temperature for context-grounded answers
    pub grounded_temperature: Option<f32>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Retrieval configuration
#[derive(Debug, Default, Deserialize)]
pub struct RetrievalFileConfig {
    /// Number of records placed in the context
    pub top_k: Option<usize>,

    /// Seed for the no-overlap sampling fallback
    pub seed: Option<u64>,
}

/// Load the TOML config file from the standard path
///
/// Returns `CopilotConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> CopilotConfigFile {
    let Some(path) = config_file_path() else {
        return CopilotConfigFile::default();
    };

    if !path.exists() {
        return CopilotConfigFile::default();
    }

    match read_config_file(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to load config file, using defaults"
            );
            CopilotConfigFile::default()
        }
    }
}

/// Read and parse a config file at an explicit path
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid TOML
pub fn read_config_file(path: &Path) -> Result<CopilotConfigFile> {
    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str(&content)?;
    tracing::info!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Return the config file path: `~/.config/omni/ea-copilot/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| {
        d.config_dir()
            .join("omni")
            .join("ea-copilot")
            .join("config.toml")
    })
}
