mod client;
pub(crate) mod types;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AiError, Result};
use crate::image::ImageInput;
use crate::traits::{TextModel, VisionModel};

use client::{OllamaClient, OLLAMA_API_URL};
use types::{GenerateRequest, ModelOptions};

// =============================================================================
// Ollama Agent
// =============================================================================

/// A model served by an Ollama instance. Vision models (llava and friends)
/// receive images through the `images` field of `/api/generate`.
#[derive(Clone)]
pub struct Ollama {
    pub(crate) model: String,
    base_url: String,
    max_tokens: Option<u32>,
    num_gpu: Option<u32>,
    timeout: Option<Duration>,
}

impl Ollama {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            base_url: OLLAMA_API_URL.to_string(),
            max_tokens: None,
            num_gpu: None,
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Cap the number of generated tokens (`num_predict`).
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_num_gpu(mut self, num_gpu: u32) -> Self {
        self.num_gpu = Some(num_gpu);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn client(&self) -> Result<OllamaClient> {
        OllamaClient::new(&self.base_url, self.timeout)
    }

    fn options(&self) -> ModelOptions {
        ModelOptions {
            num_predict: self.max_tokens,
            num_gpu: self.num_gpu,
        }
    }

    async fn send(&self, request: GenerateRequest) -> Result<String> {
        let response = self.client()?.generate(&request.options(self.options())).await?;

        if response.response.trim().is_empty() {
            return Err(AiError::EmptyResponse(format!("Ollama ({})", self.model)));
        }
        Ok(response.response)
    }
}

// =============================================================================
// Model Implementations
// =============================================================================

#[async_trait]
impl TextModel for Ollama {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.send(GenerateRequest::new(&self.model, prompt)).await
    }
}

#[async_trait]
impl VisionModel for Ollama {
    fn model(&self) -> &str {
        &self.model
    }

    async fn describe_image(&self, image: &ImageInput, prompt: &str) -> Result<String> {
        let request = GenerateRequest::new(&self.model, prompt).image(image.to_base64());
        self.send(request).await
    }
}
