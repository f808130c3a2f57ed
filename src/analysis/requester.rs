use std::sync::Arc;

use log::{error, warn};

use super::recover;
use super::report::AnalysisReport;
use crate::config::{Config, LlmSettings};
use crate::error::AuditError;
use crate::llm::{ChatMessage, ChatRequest, CompletionBackend};
use crate::prompts;
use crate::utils::retry::{with_retry, Exhausted, RetryPolicy};

/// Outcome of analysing one file; errors are recorded, never raised
pub type FileOutcome = std::result::Result<AnalysisReport, AuditError>;

/// Sends one file at a time to the model and recovers its report
pub struct ReportRequester {
    backend: Arc<dyn CompletionBackend>,
    settings: LlmSettings,
    retry: RetryPolicy,
}

impl ReportRequester {
    /// Takes model parameters and retry policy from `config`
    pub fn new(backend: Arc<dyn CompletionBackend>, config: &Config) -> Self {
        Self {
            backend,
            settings: config.llm.clone(),
            retry: RetryPolicy::from(&config.retry),
        }
    }

    /// Chat request for one file: fixed system prompt plus the file itself
    pub fn build_request(&self, content: &str, display_path: &str) -> ChatRequest {
        ChatRequest {
            model: self.settings.model.clone(),
            messages: vec![
                ChatMessage::system(prompts::SYSTEM_PROMPT),
                ChatMessage::user(prompts::user_message(display_path, content)),
            ],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            top_p: self.settings.top_p,
            stream: false,
        }
    }

    /// Analyses `content`, retrying transient failures with a fixed delay
    pub async fn request(&self, content: &str, display_path: &str) -> FileOutcome {
        let request = self.build_request(content, display_path);
        let request = &request;
        let backend = &self.backend;

        let raw = with_retry(
            &self.retry,
            display_path,
            move || backend.complete(request),
            AuditError::is_transient,
        )
        .await
        .map_err(|Exhausted { error, attempts }| {
            error!("Failed to analyze {}: {}", display_path, error);
            AuditError::CallFailed {
                file: display_path.to_string(),
                attempts,
                reason: error.to_string(),
            }
        })?;

        if raw.trim().is_empty() {
            warn!("Empty response from model for {}", display_path);
            return Err(AuditError::EmptyResponse(display_path.to_string()));
        }

        recover::recover_report(&raw, display_path)
    }
}
