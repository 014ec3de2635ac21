mod client;
pub(crate) mod types;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::AiError;
use crate::traits::{GenerationRequest, TextGenerator};
use crate::util::truncate_to_char_boundary;

use client::GeminiClient;
use types::*;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

// =============================================================================
// Gemini Agent
// =============================================================================

#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    pub(crate) model: String,
    http: reqwest::Client,
    base_url: Option<String>,
}

impl Gemini {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            http: reqwest::Client::new(),
            base_url: None,
        }
    }

    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            AiError::Config("GEMINI_API_KEY environment variable not set".to_string())
        })?;
        Ok(Self::new(api_key, model))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    fn client(&self) -> GeminiClient {
        let client = GeminiClient::new(&self.api_key, self.http.clone());
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }
}

#[async_trait]
impl TextGenerator for Gemini {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![Content::user(request.user.clone())],
            system_instruction: (!request.system.is_empty())
                .then(|| Content::instruction(request.system.clone())),
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: Some(request.max_output_tokens),
            },
        };

        let response = self.client().generate_content(&self.model, &body).await?;

        if let Some(ref usage) = response.usage_metadata {
            debug!(
                model = %self.model,
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                finish_reason = ?response.finish_reason(),
                "Gemini response received"
            );
        }

        match response.text() {
            Some(text) => {
                debug!(preview = truncate_to_char_boundary(&text, 200), "Gemini text");
                Ok(text)
            }
            None => {
                warn!(
                    model = %self.model,
                    finish_reason = ?response.finish_reason(),
                    "Gemini returned no text"
                );
                Err(anyhow!(AiError::EmptyResponse("Gemini")))
            }
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}
