use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom result type alias for the application
pub type Result<T> = std::result::Result<T, AuditError>;

/// Errors that can occur while acquiring sources or analysing them
#[derive(Debug, Error)]
pub enum AuditError {
    /// I/O errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing/serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration and credential errors
    #[error("Config error: {0}")]
    Config(String),

    /// Neither a repository nor a file was supplied
    #[error("{0}")]
    MissingInput(String),

    /// `git clone` could not be run or exited unsuccessfully
    #[error("Failed to clone repository {url}: {reason}")]
    CloneFailure {
        /// Repository that was requested
        url: String,
        /// Trimmed stderr from git, or the spawn failure
        reason: String,
    },

    /// A repository-relative path that would leave the repository root
    #[error("File {} must be a path inside the repository", .0.display())]
    OutsideRoot(PathBuf),

    /// Requested path does not exist
    #[error("File {} not found", .0.display())]
    NotFound(PathBuf),

    /// Requested file is not one of the analysed languages
    #[error("File {} must be a {allowed} file", .path.display())]
    WrongExtension {
        /// Offending file
        path: PathBuf,
        /// Allowed extensions, joined for display
        allowed: String,
    },

    /// File is larger than the configured limit
    #[error("File {} exceeds size limit of {limit} bytes ({size} bytes)", .path.display())]
    TooLarge {
        /// Offending file
        path: PathBuf,
        /// Size on disk
        size: u64,
        /// Configured limit
        limit: u64,
    },

    /// File contains only whitespace
    #[error("File {} is empty", .0.display())]
    Empty(PathBuf),

    /// File is not valid UTF-8
    #[error("Unable to decode {} as UTF-8", .0.display())]
    DecodeFailure(PathBuf),

    /// Retryable failure talking to the model endpoint
    #[error("Transient error: {0}")]
    Transient(String),

    /// Non-retryable rejection from the model endpoint
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message returned by the endpoint
        message: String,
    },

    /// The model call failed for good after the given number of attempts
    #[error("Failed to analyze {file} after {attempts} attempt(s): {reason}")]
    CallFailed {
        /// Display path of the analysed file
        file: String,
        /// Attempts that were made
        attempts: u32,
        /// Last error seen
        reason: String,
    },

    /// The model returned blank text
    #[error("Empty response from model for {0}")]
    EmptyResponse(String),

    /// No JSON object could be located in the reply
    #[error("No valid JSON found in response for {0}")]
    NoJsonFound(String),

    /// A JSON object was located but did not decode
    #[error("Invalid JSON response for {file}: {message}")]
    InvalidJson {
        /// Display path of the analysed file
        file: String,
        /// Decoder message
        message: String,
    },

    /// The reply decoded but is not a `{"vulnerabilities": [...]}` report
    #[error("Unexpected report shape for {file}: {message}")]
    UnexpectedShape {
        /// Display path of the analysed file
        file: String,
        /// What was wrong with the shape
        message: String,
    },
}

impl AuditError {
    /// Creates a configuration error with the specified message
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Checks if this error is transient and retryable
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_) | Self::Http(_) | Self::Io(_))
    }

    /// Checks if this error is fatal and should not be retried
    pub fn is_fatal(&self) -> bool {
        !self.is_transient()
    }
}
