use ai_client::{log_preview, ImageInput, VisionModel};
use tracing::info;

use crate::outcome::{Step, StepError, Stepped};
use crate::state::PipelineState;

pub const DESCRIBE_PROMPT: &str = "Describe the clothing item in the image in detail, \
including type, color, style, and any distinctive features only in one sentence.";

/// Describe the garment at `image_path`. On failure the state comes back unchanged.
pub async fn process_image(state: PipelineState, vision: &dyn VisionModel) -> Stepped {
    info!(
        image = %state.image_path.display(),
        model = vision.model(),
        "Describing image"
    );

    match describe(&state, vision).await {
        Ok(description) => {
            info!(
                description = %log_preview(&description, 160),
                "Image described"
            );
            Stepped::applied(PipelineState {
                image_description: description,
                ..state
            })
        }
        Err(e) => Stepped::degraded(Step::ProcessImage, state, e),
    }
}

async fn describe(state: &PipelineState, vision: &dyn VisionModel) -> Result<String, StepError> {
    let image = ImageInput::from_path(&state.image_path)
        .await
        .map_err(|e| StepError::Image(e.to_string()))?;

    let description = vision.describe_image(&image, DESCRIBE_PROMPT).await?;
    if description.trim().is_empty() {
        return Err(StepError::EmptyModelOutput);
    }
    Ok(description)
}
