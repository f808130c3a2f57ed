use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};

use super::types::{ApiErrorBody, ChatCompletionResponse, ChatRequest};
use super::CompletionBackend;
use crate::config::{Credentials, LlmSettings};
use crate::error::{AuditError, Result};

/// Chat-completions client for Groq or any OpenAI-compatible endpoint
pub struct GroqClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GroqClient {
    pub fn new(credentials: &Credentials, settings: &LlmSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .user_agent(concat!("predicate-audit/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: credentials.api_key().to_string(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionBackend for GroqClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        debug!("POST {} (model {})", self.completions_url(), request.model);

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| AuditError::Transient(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AuditError::Transient(format!("Unreadable completion body: {}", e)))?;

        let choice = completion.choices.into_iter().next().ok_or_else(|| AuditError::Api {
            status: status.as_u16(),
            message: "response contained no choices".to_string(),
        })?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

/// Maps a non-success HTTP status to a retryable or final error
fn status_error(status: StatusCode, body: &str) -> AuditError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        AuditError::Transient(format!("HTTP {}: {}", status, message))
    } else {
        AuditError::Api {
            status: status.as_u16(),
            message,
        }
    }
}
