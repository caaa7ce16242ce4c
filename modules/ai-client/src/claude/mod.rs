mod client;
pub(crate) mod types;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AiError, Result};
use crate::image::ImageInput;
use crate::traits::{TextModel, VisionModel};

use client::{ClaudeClient, ANTHROPIC_API_URL};
use types::*;

// =============================================================================
// Claude Agent
// =============================================================================

#[derive(Clone)]
pub struct Claude {
    api_key: String,
    pub(crate) model: String,
    base_url: Option<String>,
    max_tokens: u32,
    timeout: Option<Duration>,
}

impl Claude {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            max_tokens: 4096,
            timeout: None,
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

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn client(&self) -> Result<ClaudeClient> {
        let base_url = self.base_url.as_deref().unwrap_or(ANTHROPIC_API_URL);
        ClaudeClient::new(&self.api_key, base_url, self.timeout)
    }

    // =========================================================================
    // Convenience methods
    // =========================================================================

    pub async fn chat_completion(
        &self,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Result<String> {
        let request = ChatRequest::new(&self.model)
            .system(system)
            .message(WireMessage::user(user))
            .max_tokens(self.max_tokens)
            .temperature(0.0);

        let response = self.client()?.chat(&request).await?;

        response
            .text()
            .ok_or_else(|| AiError::EmptyResponse(format!("Claude ({})", self.model)))
    }

    pub async fn complete(&self, prompt: &str) -> Result<String> {
        self.chat_completion("You are a helpful assistant.", prompt)
            .await
    }

    /// Send an image to Claude vision and return the text it produces.
    pub async fn describe_image(&self, image: &ImageInput, prompt: &str) -> Result<String> {
        let source = ImageSource {
            source_type: "base64".to_string(),
            media_type: image.mime_type.clone(),
            data: image.to_base64(),
        };

        let request = ChatRequest::new(&self.model)
            .message(WireMessage::user_with_image(source, prompt))
            .max_tokens(self.max_tokens)
            .temperature(0.0);

        let response = self.client()?.chat(&request).await?;

        response
            .text()
            .ok_or_else(|| AiError::EmptyResponse(format!("Claude vision ({})", self.model)))
    }
}

// =============================================================================
// Model Implementations
// =============================================================================

#[async_trait]
impl TextModel for Claude {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        Claude::complete(self, prompt).await
    }
}

#[async_trait]
impl VisionModel for Claude {
    fn model(&self) -> &str {
        &self.model
    }

    async fn describe_image(&self, image: &ImageInput, prompt: &str) -> Result<String> {
        Claude::describe_image(self, image, prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claude_new() {
        let ai = Claude::new("sk-ant-test", "claude-sonnet-4-20250514");
        assert_eq!(ai.model, "claude-sonnet-4-20250514");
        assert_eq!(ai.api_key(), "sk-ant-test");
        assert_eq!(ai.max_tokens, 4096);
    }

    #[test]
    fn test_claude_with_base_url() {
        let ai = Claude::new("sk-ant-test", "claude-sonnet-4-20250514")
            .with_base_url("https://custom.api.com");
        assert_eq!(ai.base_url, Some("https://custom.api.com".to_string()));
    }

    #[test]
    fn test_claude_with_max_tokens() {
        let ai = Claude::new("sk-ant-test", "claude-sonnet-4-20250514").with_max_tokens(250);
        assert_eq!(ai.max_tokens, 250);
    }
}
