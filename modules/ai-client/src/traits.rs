use async_trait::async_trait;

use crate::error::Result;
use crate::image::ImageInput;

// =============================================================================
// TextModel Trait
// =============================================================================

/// A model that turns a text instruction into free text.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Model identifier, used for logging.
    fn model(&self) -> &str;

    async fn complete(&self, prompt: &str) -> Result<String>;
}

// =============================================================================
// VisionModel Trait
// =============================================================================

/// A model that accepts a text instruction together with one image.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Model identifier, used for logging.
    fn model(&self) -> &str;

    async fn describe_image(&self, image: &ImageInput, prompt: &str) -> Result<String>;
}
