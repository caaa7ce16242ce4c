use ai_client::TextModel;
use tracing::{debug, info};

use crate::outcome::{Step, StepError, Stepped};
use crate::state::PipelineState;

pub const MAX_QUERY_WORDS: usize = 3;

pub fn query_prompt(description: &str) -> String {
    format!(
        "Generate a search query to find similar clothing items online based on this description: {}\n\
         The search query must be at most three words.\n\
         search query:",
        description.trim()
    )
}

/// Turn raw model output into a query: drop surrounding whitespace and double
/// quotes, then keep at most [`MAX_QUERY_WORDS`] words.
pub fn clean_query(raw: &str) -> String {
    let unquoted = raw.trim().trim_matches('"');
    let words: Vec<&str> = unquoted.split_whitespace().collect();
    if words.len() > MAX_QUERY_WORDS {
        debug!(raw, "Query longer than {MAX_QUERY_WORDS} words, truncating");
    }
    words
        .into_iter()
        .take(MAX_QUERY_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Derive a short search query from the description. Without a description,
/// or on any model failure, the state comes back unchanged.
pub async fn generate_query(state: PipelineState, text: &dyn TextModel) -> Stepped {
    match query_for(&state, text).await {
        Ok(query) => {
            info!(query = query.as_str(), "Search query generated");
            Stepped::applied(PipelineState {
                search_query: query,
                ..state
            })
        }
        Err(e) => Stepped::degraded(Step::GenerateQuery, state, e),
    }
}

async fn query_for(state: &PipelineState, text: &dyn TextModel) -> Result<String, StepError> {
    if state.image_description.is_empty() {
        return Err(StepError::MissingDescription);
    }

    info!(model = text.model(), "Generating search query");
    let raw = text.complete(&query_prompt(&state.image_description)).await?;

    let query = clean_query(&raw);
    if query.is_empty() {
        return Err(StepError::EmptyModelOutput);
    }
    Ok(query)
}
