mod env_manager;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};

pub use env_manager::{get_env_value, Credentials, API_KEY_VAR};

/// Environment variable overriding [`LlmSettings::base_url`]
pub const API_BASE_VAR: &str = "GROQ_API_BASE";
/// Environment variable overriding [`LlmSettings::model`]
pub const MODEL_VAR: &str = "GROQ_MODEL";

/// Main configuration struct for the application
///
/// Every section falls back to its defaults when absent from the config file,
/// so an empty TOML document is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model endpoint and generation parameters
    pub llm: LlmSettings,
    /// Retry behaviour around model calls
    pub retry: RetrySettings,
    /// Which files are picked up and how large they may be
    pub acquisition: AcquisitionSettings,
}

/// Settings for the chat-completions endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Base URL of an OpenAI-compatible API, without the `/chat/completions` suffix
    pub base_url: String,
    /// Model name sent with every request
    pub model: String,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling cutoff
    pub top_p: f32,
    /// Per-request timeout
    pub timeout_seconds: u64,
}

/// Retry policy applied to each model call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Fixed pause between attempts
    pub delay_seconds: u64,
}

/// Eligibility rules for source files
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionSettings {
    /// Largest file, in bytes, that is sent for analysis
    pub max_file_size: u64,
    /// File name suffixes that are analysed
    pub extensions: Vec<String>,
    /// Regular expressions matched against root-relative paths during a walk
    pub exclude_patterns: Vec<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.1-8b-instant".to_string(),
            max_tokens: 4000,
            temperature: 0.5,
            top_p: 0.95,
            timeout_seconds: 120,
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_seconds: 5,
        }
    }
}

impl RetrySettings {
    /// Pause between attempts as a [`Duration`]
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_seconds)
    }
}

impl Default for AcquisitionSettings {
    fn default() -> Self {
        Self {
            max_file_size: 1_000_000,
            extensions: vec![".py".to_string(), ".ts".to_string()],
            exclude_patterns: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or from the default location when `path` is `None`
    ///
    /// An explicit path must exist. The default location
    /// (`<config dir>/predicate-audit/config.toml`) is optional; when it is
    /// missing the built-in defaults are returned.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(AuditError::config(format!(
                        "Config file {} not found",
                        path.display()
                    )));
                }
                Self::from_file(path)
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Default config file location, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("predicate-audit").join("config.toml"))
    }

    /// Parses a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AuditError::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parses TOML text into a configuration
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| AuditError::config(format!("Failed to parse config file: {}", e)))
    }

    /// Applies `GROQ_API_BASE` / `GROQ_MODEL` from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_from(get_env_value);
    }

    /// Applies endpoint overrides using `lookup` to resolve variables
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(API_BASE_VAR) {
            self.llm.base_url = base_url;
        }
        if let Some(model) = lookup(MODEL_VAR) {
            self.llm.model = model;
        }
    }

    /// Checks settings that would otherwise fail deep inside a run
    pub fn validate(&self) -> Result<()> {
        if self.retry.max_attempts == 0 {
            return Err(AuditError::config("retry.max_attempts must be at least 1"));
        }
        if self.acquisition.extensions.is_empty() {
            return Err(AuditError::config("acquisition.extensions must not be empty"));
        }
        if self.llm.base_url.trim().is_empty() {
            return Err(AuditError::config("llm.base_url must not be empty"));
        }
        Ok(())
    }
}
