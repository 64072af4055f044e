use std::time::Duration;

use serde_json::Value;

use crate::completion::{CompletionBackend, CompletionFuture, CompletionRequest, CompletionResponse};
use crate::{Config, ExtractError};

/// Chat-completions client for the OpenAI REST API (or any compatible server).
pub struct OpenAiBackend {
    client: reqwest::Client,
    api_base: String,
    timeout: Option<Duration>,
}

impl OpenAiBackend {
    pub fn new(client: reqwest::Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            timeout: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let backend = Self::new(reqwest::Client::new(), config.api_base.clone());
        match config.timeout() {
            Some(timeout) => backend.with_timeout(timeout),
            None => backend,
        }
    }

    /// Per-request timeout. Unset means the client and network defaults apply.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

impl CompletionBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "OpenAI"
    }

    fn complete<'a>(
        &'a self,
        request: &'a CompletionRequest,
        api_key: &'a str,
    ) -> CompletionFuture<'a> {
        Box::pin(async move {
            let url = self.endpoint();
            tracing::debug!(%url, model = %request.model, "sending completion request");

            let mut builder = self.client.post(&url).bearer_auth(api_key).json(request);
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }
            let resp = builder.send().await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await?;
                tracing::warn!(status = status.as_u16(), "completion service returned an error");
                return Err(ExtractError::Upstream {
                    status: status.as_u16(),
                    body,
                });
            }

            let envelope: Value = resp
                .json()
                .await
                .map_err(|e| ExtractError::Decode(e.to_string()))?;
            Ok(CompletionResponse::from_envelope(envelope))
        })
    }
}
