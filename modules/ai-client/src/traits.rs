use anyhow::Result;
use async_trait::async_trait;

/// Default output budget when the caller does not set one.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 4096;

// =============================================================================
// Generation Request
// =============================================================================

/// A single-turn request: one system instruction and one user message.
/// No conversation state is carried between requests.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system: String,
    pub user: String,
    pub temperature: Option<f32>,
    pub max_output_tokens: u32,
}

impl GenerationRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: None,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }
}

// =============================================================================
// TextGenerator Trait
// =============================================================================

/// Dyn-compatible text generation seam. Providers return the model's raw text;
/// interpreting it is the caller's job.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;

    fn model(&self) -> &str;
}
