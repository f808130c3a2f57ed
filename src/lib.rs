//! predicate-audit - flag superficial predicate functions with a hosted language model
//!
//! The library acquires Python and TypeScript sources from a git remote or a
//! local path, asks an OpenAI-compatible chat-completions endpoint to review
//! each file for type guards and predicates whose checks are weaker than
//! their signatures, and folds the per-file replies into one report.
//!
//! ## Usage
//! ```rust,no_run
//! use std::sync::Arc;
//! use predicate_audit::{Auditor, Config, Credentials, GroqClient, Location};
//!
//! async fn example() -> predicate_audit::Result<()> {
//!     let config = Config::default();
//!     let client = GroqClient::new(&Credentials::load()?, &config.llm)?;
//!     let auditor = Auditor::new(Arc::new(client), &config)?;
//!
//!     let location = Location::Remote("https://github.com/user/repo.git".into());
//!     let report = auditor.run(&location, None).await?;
//!     println!("{}", serde_json::to_string_pretty(&report)?);
//!     Ok(())
//! }
//! ```

/// Per-file analysis, response recovery and aggregation
pub mod analysis;
/// Configuration file, environment overrides and credentials
pub mod config;
/// Error handling types and utilities
pub mod error;
/// Model endpoint client and the backend trait
pub mod llm;
/// Logging configuration and utilities
pub mod logging;
/// The detection prompt
pub mod prompts;
/// Source acquisition and eligibility rules
pub mod source;
/// Utilities (retry helper, path normalization)
pub mod utils;

pub use analysis::{AggregateReport, Auditor, Finding, ReportEntry};
pub use config::{Config, Credentials};
pub use error::{AuditError, Result};
pub use llm::{CompletionBackend, GroqClient};
pub use source::{Location, SourceAcquirer};
