use std::fmt;

use ai_client::AiError;
use serper_client::SerperError;
use thiserror::Error;
use tracing::warn;

use crate::state::PipelineState;

/// The four stages, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ProcessImage,
    GenerateQuery,
    SearchInternet,
    RecommendStores,
}

impl Step {
    pub const ALL: [Step; 4] = [
        Step::ProcessImage,
        Step::GenerateQuery,
        Step::SearchInternet,
        Step::RecommendStores,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::ProcessImage => "process_image",
            Step::GenerateQuery => "generate_query",
            Step::SearchInternet => "search_internet",
            Step::RecommendStores => "recommend_stores",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a step fell back to its default. Never returned to callers as an
/// `Err`; it rides along in [`StepOutcome::Degraded`].
#[derive(Debug, Error)]
pub enum StepError {
    #[error("No image description available")]
    MissingDescription,

    #[error("No search query available")]
    MissingQuery,

    #[error("No search results available")]
    MissingSearchResults,

    #[error("Image unavailable: {0}")]
    Image(String),

    #[error("Model call failed: {0}")]
    Model(#[from] AiError),

    #[error("Model returned no usable text")]
    EmptyModelOutput,

    #[error("Search failed: {0}")]
    Search(#[from] SerperError),

    #[error("Search response was not a mapping")]
    NotAMapping,

    #[error("Malformed search results: {0}")]
    Malformed(String),
}

#[derive(Debug)]
pub enum StepOutcome {
    /// The step produced its value.
    Applied,
    /// The step failed and left its documented default in place.
    Degraded(StepError),
}

impl StepOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, StepOutcome::Applied)
    }

    pub fn error(&self) -> Option<&StepError> {
        match self {
            StepOutcome::Applied => None,
            StepOutcome::Degraded(e) => Some(e),
        }
    }
}

/// What every step returns: the state to hand on, and how it got there.
#[derive(Debug)]
pub struct Stepped {
    pub state: PipelineState,
    pub outcome: StepOutcome,
}

impl Stepped {
    pub(crate) fn applied(state: PipelineState) -> Self {
        Self {
            state,
            outcome: StepOutcome::Applied,
        }
    }

    /// Logs the failure where it happened, then records it.
    pub(crate) fn degraded(step: Step, state: PipelineState, error: StepError) -> Self {
        warn!(step = %step, error = %error, "Step degraded");
        Self {
            state,
            outcome: StepOutcome::Degraded(error),
        }
    }
}
