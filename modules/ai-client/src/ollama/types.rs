use serde::{Deserialize, Serialize};

// =============================================================================
// Generate Request
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub(crate) struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<ModelOptions>,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: false,
            images: Vec::new(),
            options: None,
        }
    }

    pub fn image(mut self, base64: String) -> Self {
        self.images.push(base64);
        self
    }

    pub fn options(mut self, options: ModelOptions) -> Self {
        if !options.is_empty() {
            self.options = Some(options);
        }
        self
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub(crate) struct ModelOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_gpu: Option<u32>,
}

impl ModelOptions {
    fn is_empty(&self) -> bool {
        self.num_predict.is_none() && self.num_gpu.is_none()
    }
}

// =============================================================================
// Generate Response
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    pub response: String,
}
