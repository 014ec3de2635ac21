mod client;
pub(crate) mod types;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::error::AiError;
use crate::traits::{GenerationRequest, TextGenerator};
use crate::util::truncate_to_char_boundary;

use client::ClaudeClient;
use types::*;

pub const DEFAULT_CLAUDE_MODEL: &str = "claude-haiku-4-5-20251001";

// =============================================================================
// Claude Agent
// =============================================================================

#[derive(Clone)]
pub struct Claude {
    api_key: String,
    pub(crate) model: String,
    http: reqwest::Client,
    base_url: Option<String>,
}

impl Claude {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            http: reqwest::Client::new(),
            base_url: None,
        }
    }

    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            AiError::Config("ANTHROPIC_API_KEY environment variable not set".to_string())
        })?;
        Ok(Self::new(api_key, model))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Share a preconfigured HTTP client (timeouts, proxies) with this agent.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    fn client(&self) -> ClaudeClient {
        let client = ClaudeClient::new(&self.api_key, self.http.clone());
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    pub async fn chat_completion(
        &self,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Result<String> {
        self.generate(&GenerationRequest::new(system, user).temperature(0.0))
            .await
    }
}

#[async_trait]
impl TextGenerator for Claude {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let chat = ChatRequest::new(&self.model)
            .system(request.system.clone())
            .message(WireMessage::user(request.user.clone()))
            .max_tokens(request.max_output_tokens)
            .temperature(request.temperature);

        let response = self.client().chat(&chat).await?;

        if let Some(ref usage) = response.usage {
            debug!(
                model = %self.model,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                stop_reason = ?response.stop_reason,
                "Claude response received"
            );
        }

        let text = response
            .text()
            .ok_or_else(|| anyhow!(AiError::EmptyResponse("Claude")))?;
        debug!(preview = truncate_to_char_boundary(&text, 200), "Claude text");
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
