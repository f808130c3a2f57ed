use std::fmt;

use crate::error::{AuditError, Result};

/// Environment variable holding the model API key
pub const API_KEY_VAR: &str = "GROQ_API_KEY";

/// API credentials for the model endpoint
///
/// Constructed once at startup and handed to the client; nothing reads the
/// key from the environment after that.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    /// Wraps an explicit API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// Loads the API key from a local `.env` file or the process environment
    ///
    /// A missing `.env` file is not an error; a missing or empty
    /// `GROQ_API_KEY` is.
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(get_env_value)
    }

    /// Resolves the API key through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(API_KEY_VAR).map(Self::new).ok_or_else(|| {
            AuditError::config(format!(
                "{} not found in .env file or environment variables. \
                 Set it in .env or as an environment variable.",
                API_KEY_VAR
            ))
        })
    }

    /// The raw API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Reads an environment variable, treating empty and whitespace-only values as unset
pub fn get_env_value(key: &str) -> Option<String> {
    let value = std::env::var(key).ok()?;
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
