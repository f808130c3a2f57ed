//! Text-generation boundary
//!
//! The analysis pipeline only sees [`CompletionBackend`]; [`GroqClient`] is
//! the production implementation and tests substitute their own.

use async_trait::async_trait;

use crate::error::Result;

pub mod client;
pub mod types;

pub use client::GroqClient;
pub use types::{ChatMessage, ChatRequest, Role};

/// Something that turns a chat request into the assistant's raw text
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Issues one non-streaming completion and returns the reply text
    ///
    /// Errors for which [`crate::AuditError::is_transient`] holds are retried
    /// by the caller; anything else is final.
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}
